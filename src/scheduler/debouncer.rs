use std::cell::Cell;

use web_time::{Duration, Instant};

use super::{Scheduler, TimerHandle, WeakScheduler};

/// One debounce timer: bursts of [`trigger`](Self::trigger) calls collapse
/// into a single execution `delay` after the last one.
///
/// The debouncer starts idle. Dropping it cancels its timer.
pub struct Debouncer {
    scheduler: WeakScheduler,
    handle: TimerHandle,
    delay: Cell<Duration>,
}

impl Debouncer {
    /// Register an idle debounce timer running `f` on expiry.
    pub fn new(
        scheduler: &Scheduler,
        delay: Duration,
        name: &'static str,
        f: impl FnMut(Instant) + 'static,
    ) -> Self {
        let handle = scheduler.run_debounced(delay, name, f);
        // Registration arms the timer; a debouncer waits for its first
        // trigger.
        scheduler.disarm(handle);
        Self {
            scheduler: scheduler.downgrade(),
            handle,
            delay: Cell::new(delay),
        }
    }

    /// Arm (or push out) the pending execution.
    pub fn trigger(&self) {
        if let Some(s) = self.scheduler.upgrade() {
            s.retrigger(self.handle, Some(self.delay.get()));
        }
    }

    /// Drop the pending execution, if any. The debouncer can be
    /// triggered again afterwards.
    pub fn cancel(&self) {
        if let Some(s) = self.scheduler.upgrade() {
            s.disarm(self.handle);
        }
    }

    /// Whether an execution is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|s| s.is_armed(self.handle))
    }

    /// Change the delay used by subsequent triggers.
    pub fn set_delay(&self, delay: Duration) {
        self.delay.set(delay);
    }

    /// Current delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay.get()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(s) = self.scheduler.upgrade() {
            s.cancel(self.handle);
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("handle", &self.handle)
            .field("delay", &self.delay.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counting(sched: &Scheduler, delay: u64) -> (Debouncer, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let d = Debouncer::new(sched, ms(delay), "test", move |_| c.set(c.get() + 1));
        (d, count)
    }

    #[test]
    fn starts_idle() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, count) = counting(&sched, 10);
        assert!(!d.is_pending());
        sched.run_pending(t0 + ms(100));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn trigger_resets_delay() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, count) = counting(&sched, 100);
        d.trigger();
        sched.run_pending(t0 + ms(60));
        d.trigger();
        sched.run_pending(t0 + ms(120));
        assert_eq!(count.get(), 0);
        sched.run_pending(t0 + ms(160));
        assert_eq!(count.get(), 1);
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_then_retrigger() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, count) = counting(&sched, 10);
        d.trigger();
        d.cancel();
        assert!(!d.is_pending());
        sched.run_pending(t0 + ms(20));
        assert_eq!(count.get(), 0);
        d.trigger();
        sched.run_pending(t0 + ms(30));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn set_delay_applies_to_next_trigger() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, count) = counting(&sched, 10);
        d.set_delay(ms(50));
        d.trigger();
        sched.run_pending(t0 + ms(20));
        assert_eq!(count.get(), 0);
        sched.run_pending(t0 + ms(50));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn drop_cancels_timer() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, count) = counting(&sched, 10);
        d.trigger();
        drop(d);
        assert!(sched.is_empty());
        sched.run_pending(t0 + ms(20));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn outliving_the_scheduler_is_harmless() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let (d, _count) = counting(&sched, 10);
        drop(sched);
        d.trigger();
        d.cancel();
        assert!(!d.is_pending());
    }
}
