use chrono::Utc;

/// Clock abstraction. Everything time-dependent in the core reads the
/// clock through this trait so tests can pin "now".
pub trait ISys: Send + Sync {
    /// Current wall-clock time as millis since the epoch
    fn get_timestamp_millis(&self) -> i64;
}

/// The real clock, wired into every non-test context
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
