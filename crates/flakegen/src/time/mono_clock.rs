use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock-anchored time source that never goes backwards.
///
/// At construction the clock reads the system wall clock once; afterwards it
/// advances by the monotonic time elapsed since then. Wall-clock steps (NTP,
/// manual changes) are therefore invisible to it, and a generator driven by it
/// never observes a clock regression. Over long uptimes it may drift from the
/// wall clock by however much the system clock was adjusted.
///
/// A background thread refreshes a shared counter once per millisecond so the
/// hot path is a single atomic load. The thread exits once the last clone of
/// the clock is dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    start_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current wall-clock time.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn the ticker thread.
    pub fn new() -> Self {
        Self::anchored_at(SystemClock.current_millis())
    }

    /// Anchors a new clock at `start_millis` (ms since the UNIX epoch).
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn the ticker thread.
    pub fn anchored_at(start_millis: u64) -> Self {
        let start = Instant::now();
        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                tick = now_ms + 1;
            }
        });
        let _ = inner._handle.set(handle);

        Self {
            inner,
            start_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start_millis + self.inner.current.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_anchor_and_never_decreases() {
        let clock = MonotonicClock::anchored_at(1_000);
        let mut last = clock.current_millis();
        assert!(last >= 1_000);

        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_elapsed_time() {
        let clock = MonotonicClock::anchored_at(0);
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() >= 10);
    }
}
