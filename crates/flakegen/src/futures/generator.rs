use core::time::Duration;

use crate::{IdGenerator, Poll, Result, SleepProvider, SnowflakeId, TimeSource};

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// Generates the next ID, awaiting `S::sleep_for` instead of spinning when
    /// the sequence is exhausted.
    ///
    /// The lock is never held across an await point. Because the future
    /// yields, it composes with runtime timeouts for callers that need bounded
    /// latency.
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::generate`].
    pub async fn generate_async<S>(&self) -> Result<SnowflakeId>
    where
        S: SleepProvider,
    {
        loop {
            let dur = match self.try_poll()? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { yield_for } => Duration::from_millis(yield_for),
            };
            S::sleep_for(dur).await;
        }
    }
}
