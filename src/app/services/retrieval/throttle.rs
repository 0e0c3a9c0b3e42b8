//! Rate limiting for a shared resource

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Enforces a minimum interval between successive accesses
///
/// Callers block in [`wait`](Self::wait) until the interval since the previous
/// access has elapsed. The lock is held while sleeping, so concurrent callers
/// are released one at a time.
#[derive(Debug)]
pub struct ThrottledSection {
    state: Mutex<ThrottleState>,
}

#[derive(Debug)]
struct ThrottleState {
    min_interval: Duration,
    last_access: Option<Instant>,
}

impl ThrottledSection {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: Mutex::new(ThrottleState {
                min_interval,
                last_access: None,
            }),
        }
    }

    /// Change the minimum interval; applies from the next access
    pub fn set_min_interval(&self, min_interval: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.min_interval = min_interval;
    }

    pub fn min_interval(&self) -> Duration {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .min_interval
    }

    /// Block until access is allowed, then record this access
    ///
    /// The first access never waits.
    pub fn wait(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(last) = state.last_access {
            let elapsed = last.elapsed();
            if elapsed < state.min_interval {
                let remaining = state.min_interval - elapsed;
                trace!("Throttling for {:?}", remaining);
                thread::sleep(remaining);
            }
        }

        state.last_access = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_access_does_not_wait() {
        let throttle = ThrottledSection::new(Duration::from_secs(60));
        let start = Instant::now();

        throttle.wait();

        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_successive_accesses_are_spaced() {
        let throttle = ThrottledSection::new(Duration::from_millis(50));
        let start = Instant::now();

        throttle.wait();
        throttle.wait();
        throttle.wait();

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_concurrent_accesses_are_spaced() {
        let throttle = Arc::new(ThrottledSection::new(Duration::from_millis(30)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let throttle = Arc::clone(&throttle);
                thread::spawn(move || throttle.wait())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[test]
    fn test_set_min_interval() {
        let throttle = ThrottledSection::new(Duration::ZERO);
        throttle.set_min_interval(Duration::from_millis(250));
        assert_eq!(throttle.min_interval(), Duration::from_millis(250));
    }
}
