use std::sync::Arc;

pub trait ClockPort: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

pub type DynClockPort = Arc<dyn ClockPort>;
