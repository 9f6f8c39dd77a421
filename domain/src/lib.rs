pub mod actor;
pub mod error;
pub mod events;
pub mod history;
pub mod temp_entry;
