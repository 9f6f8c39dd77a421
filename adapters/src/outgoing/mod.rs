pub mod clock;
pub mod memory_kv;
pub mod redis_deadpool;
pub mod scheduler_notify;
