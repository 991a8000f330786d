use core::{future::Future, time::Duration};

use crate::{IdGenerator, Result, SleepProvider, SnowflakeId, TimeSource};

/// A [`SleepProvider`] backed by Tokio's timer.
///
/// This is the default provider for async applications built on Tokio.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// A [`SleepProvider`] that yields to the Tokio scheduler instead of arming a
/// timer.
///
/// More responsive at low concurrency, at the cost of tighter polling loops
/// and more CPU under load. With many concurrent callers, [`TokioSleep`] is
/// usually cheaper.
pub struct TokioYield;

impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

/// Async generation on Tokio without naming a [`SleepProvider`].
pub trait IdGeneratorAsyncTokioExt {
    /// [`IdGenerator::generate_async`] with [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::generate`].
    fn generate_async_tokio(&self) -> impl Future<Output = Result<SnowflakeId>>;
}

impl<T> IdGeneratorAsyncTokioExt for IdGenerator<T>
where
    T: TimeSource,
{
    fn generate_async_tokio(&self) -> impl Future<Output = Result<SnowflakeId>> {
        self.generate_async::<TokioSleep>()
    }
}
