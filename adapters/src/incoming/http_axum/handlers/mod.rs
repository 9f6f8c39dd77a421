pub mod health;
pub mod history;
pub mod temp_state;
