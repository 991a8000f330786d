use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::{instrument, trace};

use super::{Mutex, MutexGuard};
use crate::{Error, IdGeneratorBuilder, Poll, Result, SnowflakeId, SystemClock, TimeSource};

/// Mutable generator state, guarded by the generator's lock.
#[derive(Debug, Default)]
pub(crate) struct State {
    /// Epoch-relative millisecond of the last issued ID. `None` until the
    /// first ID is issued.
    pub(crate) last_timestamp: Option<u64>,
    /// Sequence of the last issued ID within `last_timestamp`.
    pub(crate) sequence: u16,
}

/// A thread-safe Snowflake ID generator.
///
/// The read-compare-increment-write over the last timestamp and sequence runs
/// under a single mutex, so any number of threads may share one generator
/// (behind a `&`, an [`Arc`], or the [`crate::global`] accessor) without ever
/// observing a duplicate.
///
/// ## Guarantees
/// - IDs from one generator are unique and strictly increasing while the clock
///   does not regress.
/// - Up to 4096 IDs per millisecond (4096 minus the configured first
///   sequence).
/// - A clock that moves backwards is reported as
///   [`Error::ClockRegression`], never papered over.
///
/// ## Precondition
/// Run exactly one generator per machine ID. Two generators with the same
/// machine ID, whether in one process or on two hosts, can issue the same ID.
/// Use [`crate::init_global`] to hold the process's one instance.
///
/// [`Arc`]: std::sync::Arc
pub struct IdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    pub(crate) state: Mutex<State>,
    pub(crate) clock: T,
    pub(crate) epoch: u64,
    pub(crate) machine_id: u16,
    pub(crate) first_sequence: u16,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator on the system clock with [`crate::DEFAULT_EPOCH`]
    /// and the machine ID resolved by [`crate::DefaultMachineId`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no machine ID can be resolved.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Like [`Self::new`], with a custom epoch (ms since the UNIX epoch).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no machine ID can be resolved or
    /// the epoch lies in the future.
    pub fn with_epoch(epoch: u64) -> Result<Self> {
        Self::builder().epoch(epoch).build()
    }

    /// Starts configuring a generator.
    pub fn builder() -> IdGeneratorBuilder {
        IdGeneratorBuilder::default()
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// The machine ID stamped into every ID.
    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// The epoch, in milliseconds since the UNIX epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The sequence value each fresh millisecond starts at.
    pub fn first_sequence(&self) -> u16 {
        self.first_sequence
    }

    /// The underlying time source.
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Generates the next ID, busy-waiting through sequence exhaustion.
    ///
    /// Exhaustion lasts at most until the clock ticks over to the next
    /// millisecond. Callers that need bounded latency should wrap this in their
    /// own timeout, or use [`Self::generate_async`] where available.
    ///
    /// # Example
    ///
    /// ```
    /// use flakegen::{decode, IdGenerator};
    ///
    /// let generator = IdGenerator::builder().machine_id(5).build().unwrap();
    /// let a = generator.generate().unwrap();
    /// let b = generator.generate().unwrap();
    /// assert!(a < b);
    /// assert_eq!(decode(b.to_raw(), generator.epoch()).machine_id, 5);
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock moved backwards.
    /// - [`Error::TimestampOverflow`] once the epoch is ~69 years in the past.
    /// - [`Error::LockPoisoned`] if another thread panicked mid-generation
    ///   (std mutex only).
    pub fn generate(&self) -> Result<SnowflakeId> {
        self.generate_with(|_| core::hint::spin_loop())
    }

    /// Generates the next ID, calling `f` with the suggested wait (in
    /// milliseconds) each time the sequence is exhausted.
    ///
    /// ```
    /// use flakegen::IdGenerator;
    ///
    /// let generator = IdGenerator::builder().machine_id(0).build().unwrap();
    /// let id = generator.generate_with(|_| std::thread::yield_now()).unwrap();
    /// assert_eq!(id.machine_id(), 0);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn generate_with(&self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        #[cfg(feature = "tracing")]
        let mut waiting = false;

        loop {
            match self.try_poll()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => {
                    #[cfg(feature = "tracing")]
                    if !waiting {
                        waiting = true;
                        trace!(yield_for, "sequence exhausted, waiting for next millisecond");
                    }
                    f(yield_for);
                }
            }
        }
    }

    /// Generates the next ID as a decimal string, for consumers that cannot
    /// hold a 64-bit integer losslessly.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn generate_string(&self) -> Result<String> {
        self.generate().map(|id| id.to_string())
    }

    /// Makes one non-blocking generation attempt.
    ///
    /// The clock is read while holding the lock, so concurrent callers can
    /// never see each other's readings out of order.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID was issued
    /// - `Ok(Poll::Pending { yield_for })`: sequence exhausted for this
    ///   millisecond; state unchanged
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued timestamp, including readings before the epoch (reported as
    ///   `now: 0`). State is unchanged.
    /// - [`Error::Configuration`] if the clock reads earlier than the epoch
    ///   before any ID has been issued.
    /// - [`Error::TimestampOverflow`] if the timestamp no longer fits 41 bits.
    /// - [`Error::LockPoisoned`] (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<Poll> {
        let mut state = self.lock()?;
        let now = self.elapsed(state.last_timestamp)?;

        let Some(last) = state.last_timestamp else {
            return Ok(self.start_millisecond(&mut state, now));
        };

        match now.cmp(&last) {
            Ordering::Equal => {
                if state.sequence < SnowflakeId::MAX_SEQUENCE {
                    state.sequence += 1;
                    Ok(Poll::Ready {
                        id: SnowflakeId::from_components(now, self.machine_id, state.sequence),
                    })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => Ok(self.start_millisecond(&mut state, now)),
            Ordering::Less => Err(Self::cold_clock_behind(last, now)),
        }
    }

    fn start_millisecond(&self, state: &mut State, now: u64) -> Poll {
        state.last_timestamp = Some(now);
        state.sequence = self.first_sequence;
        Poll::Ready {
            id: SnowflakeId::from_components(now, self.machine_id, self.first_sequence),
        }
    }

    /// Milliseconds since the generator's epoch. Once an ID has been issued,
    /// a reading before the epoch is a regression to `now: 0`.
    fn elapsed(&self, last: Option<u64>) -> Result<u64> {
        let now = self.clock.current_millis();
        let Some(elapsed) = now.checked_sub(self.epoch) else {
            return Err(match last {
                Some(last) => Self::cold_clock_behind(last, 0),
                None => Error::configuration(format!(
                    "clock reads {now} ms, before epoch {}",
                    self.epoch
                )),
            });
        };
        if elapsed > SnowflakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { timestamp: elapsed });
        }
        Ok(elapsed)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        Error::ClockRegression { last, now }
    }
}

impl<T> fmt::Debug for IdGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("epoch", &self.epoch)
            .field("machine_id", &self.machine_id)
            .field("first_sequence", &self.first_sequence)
            .finish_non_exhaustive()
    }
}
