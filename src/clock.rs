use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::model::Ms;

/// Injected time source. `reserve` reads it exactly once per call so a
/// single admission decision is judged against a single "now".
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> Ms;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Ms {
        (**self).now_ms()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Ms {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as Ms
    }
}

/// Settable clock for tests and simulations — pins "the present" without
/// any real-time dependency.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now: Ms) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: Ms) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: Ms) {
        self.0.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Ms {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now_ms(), 1000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1500);
        clock.set(100);
        assert_eq!(clock.now_ms(), 100);
    }

    #[test]
    fn shared_clock_through_arc() {
        let clock = Arc::new(ManualClock::new(42));
        let view: &dyn Clock = &clock;
        clock.advance(8);
        assert_eq!(view.now_ms(), 50);
    }
}
