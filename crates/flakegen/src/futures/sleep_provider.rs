use core::{future::Future, time::Duration};

/// Abstracts over how to sleep for a [`Duration`] in async contexts, so async
/// generation is not tied to one runtime.
pub trait SleepProvider {
    /// The returned future must be `Send` so generation can run on
    /// work-stealing executors.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
