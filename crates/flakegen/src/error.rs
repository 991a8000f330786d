/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `flakegen` can produce.
///
/// Errors are always returned to the caller. The generator never logs,
/// swallows, or retries them internally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No usable machine ID could be resolved, or a supplied setting is out of
    /// range. Construction aborts.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Human-readable description of what was missing or invalid.
        reason: String,
    },

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// Both values are milliseconds since the generator's epoch. The generator
    /// state is left untouched; retrying, sleeping, or aborting is up to the
    /// caller.
    #[error("clock moved backwards: last issued {last} ms, observed {now} ms")]
    ClockRegression {
        /// The timestamp of the last issued ID.
        last: u64,
        /// The (earlier) timestamp the clock just reported, or `0` if it
        /// reads before the epoch.
        now: u64,
    },

    /// The input to a decode call is not a valid non-negative 64-bit integer.
    #[error("malformed id: {input:?}")]
    MalformedId {
        /// The rejected input.
        input: String,
    },

    /// The time since the epoch no longer fits in the 41-bit timestamp field.
    #[error("timestamp {timestamp} ms exceeds the 41-bit timestamp field")]
    TimestampOverflow {
        /// The epoch-relative timestamp that could not be encoded.
        timestamp: u64,
    },

    /// The generator's lock was poisoned by a thread that panicked while
    /// holding it.
    ///
    /// With the `parking-lot` feature mutexes do not poison, so this variant
    /// is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// The process-wide generator has already been initialized.
    #[error("global generator already initialized")]
    AlreadyInitialized,
}

impl Error {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(input: &str) -> Self {
        Self::MalformedId {
            input: input.to_owned(),
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
