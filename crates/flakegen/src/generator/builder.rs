use core::fmt;

#[cfg(feature = "tracing")]
use tracing::debug;

use super::{Mutex, lock::State};
use crate::{
    DEFAULT_EPOCH, DefaultMachineId, Error, IdGenerator, MachineIdSource, Result, SnowflakeId,
    SystemClock, TimeSource, validate_machine_id,
};

/// Configures and constructs an [`IdGenerator`].
///
/// Machine-ID resolution order: [`Self::machine_id`], then
/// [`Self::machine_id_source`], then [`DefaultMachineId`].
///
/// # Example
///
/// ```
/// use flakegen::{IdGenerator, MonotonicClock};
///
/// let generator = IdGenerator::builder()
///     .epoch(1_288_834_974_657)
///     .machine_id(7)
///     .clock(MonotonicClock::default())
///     .build()
///     .unwrap();
/// assert_eq!(generator.machine_id(), 7);
/// ```
pub struct IdGeneratorBuilder<T = SystemClock> {
    epoch: u64,
    machine_id: Option<u16>,
    source: Option<Box<dyn MachineIdSource>>,
    first_sequence: u16,
    clock: T,
}

impl Default for IdGeneratorBuilder<SystemClock> {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            machine_id: None,
            source: None,
            first_sequence: 0,
            clock: SystemClock,
        }
    }
}

impl<T> IdGeneratorBuilder<T>
where
    T: TimeSource,
{
    /// Sets the epoch, in milliseconds since the UNIX epoch. Defaults to
    /// [`DEFAULT_EPOCH`].
    #[must_use]
    pub fn epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Assigns the machine ID explicitly. Takes precedence over any source.
    #[must_use]
    pub fn machine_id(mut self, machine_id: u16) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Resolves the machine ID from `source` at build time.
    #[must_use]
    pub fn machine_id_source(mut self, source: impl MachineIdSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sequence value every fresh millisecond starts at. Defaults to `0`,
    /// which allows 4096 IDs per millisecond; `1` allows 4095.
    #[must_use]
    pub fn first_sequence(mut self, first_sequence: u16) -> Self {
        self.first_sequence = first_sequence;
        self
    }

    /// Replaces the time source.
    #[must_use]
    pub fn clock<U: TimeSource>(self, clock: U) -> IdGeneratorBuilder<U> {
        IdGeneratorBuilder {
            epoch: self.epoch,
            machine_id: self.machine_id,
            source: self.source,
            first_sequence: self.first_sequence,
            clock,
        }
    }

    /// Resolves the machine ID and constructs the generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no machine ID can be resolved, a
    /// setting is out of range, or the clock reads earlier than the epoch.
    pub fn build(self) -> Result<IdGenerator<T>> {
        let (machine_id, _origin) = match (self.machine_id, &self.source) {
            (Some(id), _) => (validate_machine_id(id)?, "explicit"),
            (None, Some(source)) => (validate_machine_id(source.resolve()?)?, "source"),
            (None, None) => (
                validate_machine_id(DefaultMachineId::default().resolve()?)?,
                "default",
            ),
        };

        if self.first_sequence > SnowflakeId::MAX_SEQUENCE {
            return Err(Error::configuration(format!(
                "first sequence {} exceeds maximum {}",
                self.first_sequence,
                SnowflakeId::MAX_SEQUENCE
            )));
        }

        let now = self.clock.current_millis();
        if now < self.epoch {
            return Err(Error::configuration(format!(
                "epoch {} is later than the current time {now}",
                self.epoch
            )));
        }

        #[cfg(feature = "tracing")]
        debug!(
            machine_id,
            origin = _origin,
            epoch = self.epoch,
            first_sequence = self.first_sequence,
            "id generator ready"
        );

        Ok(IdGenerator {
            state: Mutex::new(State::default()),
            clock: self.clock,
            epoch: self.epoch,
            machine_id,
            first_sequence: self.first_sequence,
        })
    }
}

impl<T> fmt::Debug for IdGeneratorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGeneratorBuilder")
            .field("epoch", &self.epoch)
            .field("machine_id", &self.machine_id)
            .field("has_source", &self.source.is_some())
            .field("first_sequence", &self.first_sequence)
            .finish_non_exhaustive()
    }
}
