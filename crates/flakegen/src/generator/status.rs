use crate::SnowflakeId;

/// The outcome of one non-blocking generation attempt.
///
/// - [`Poll::Ready`]: a new ID was issued.
/// - [`Poll::Pending`]: every sequence value of the current millisecond has
///   been handed out. Nothing was mutated; retry once the clock has advanced.
///
/// # Example
///
/// ```
/// use flakegen::{IdGenerator, Poll};
///
/// let generator = IdGenerator::builder().machine_id(1).build().unwrap();
/// let id = loop {
///     match generator.try_poll().unwrap() {
///         Poll::Ready { id } => break id,
///         Poll::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert_eq!(id.machine_id(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// Milliseconds to wait before the next attempt can succeed.
        yield_for: u64,
    },
}
