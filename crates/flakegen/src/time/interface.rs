/// Default epoch: Tuesday, November 14, 2023 22:13:20 UTC, in milliseconds
/// since the UNIX epoch.
///
/// Every party that generates or decodes a given population of IDs must agree
/// on the same epoch.
pub const DEFAULT_EPOCH: u64 = 1_700_000_000_000;

/// A source of wall-clock time in milliseconds since the UNIX epoch.
///
/// The generator subtracts its own epoch from this reading. Implementations
/// may move backwards (a wall clock stepped by NTP, for instance); the
/// generator refuses to issue IDs while they do.
///
/// # Example
///
/// ```
/// use flakegen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_123
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_700_000_000_123);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
