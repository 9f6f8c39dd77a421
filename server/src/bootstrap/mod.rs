pub mod router;
pub mod scheduler_bridge;
pub mod state;
pub mod sweeper;
