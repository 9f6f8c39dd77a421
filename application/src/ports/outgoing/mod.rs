pub mod clock;
pub mod kv_store;
pub mod scheduler;
