//! Single-threaded cooperative timer table.
//!
//! The host owns the clock: it calls [`Scheduler::run_pending`] from its
//! main loop and every due timer fires in `(deadline, id)` order. Three
//! timer kinds exist:
//!
//! - **loops** fire every interval until cancelled, and can park
//!   themselves by returning [`LoopControl::Pause`]
//! - **one-shots** fire once and are removed
//! - **debounce** timers fire once per trigger burst and stay registered
//!   so they can be retriggered
//!
//! Callbacks run with no internal borrow held, so a callback may cancel,
//! re-arm or register timers on the same scheduler.

mod debouncer;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use debouncer::Debouncer;
use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

/// Smallest interval or delay the scheduler accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Opaque handle to a registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What a loop callback wants after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Fire again one interval from now.
    Continue,
    /// Park without a deadline until [`Scheduler::rearm_loop`].
    Pause,
}

type LoopFn = Box<dyn FnMut(Instant) -> LoopControl>;
type OnceFn = Box<dyn FnOnce(Instant)>;
type DebounceFn = Box<dyn FnMut(Instant)>;

enum Callback {
    Loop(LoopFn),
    Once(OnceFn),
    Debounce(DebounceFn),
}

struct Timer {
    name: &'static str,
    interval: Duration,
    deadline: Option<Instant>,
    /// `None` while the callback is executing.
    callback: Option<Callback>,
}

struct Inner {
    name: String,
    now: Instant,
    next_id: u64,
    timers: FxHashMap<u64, Timer>,
    shut_down: bool,
}

/// Cloneable handle to one timer table.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<Inner>>,
}

/// Non-owning scheduler handle for back-references from callbacks.
#[derive(Clone, Default)]
pub struct WeakScheduler {
    inner: Weak<RefCell<Inner>>,
}

impl WeakScheduler {
    /// Recover a strong handle if the scheduler is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Scheduler> {
        self.inner.upgrade().map(|inner| Scheduler { inner })
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("name", &inner.name)
            .field("timers", &inner.timers.len())
            .field("shut_down", &inner.shut_down)
            .finish()
    }
}

impl Scheduler {
    /// Create an empty scheduler whose clock starts at `now`.
    #[must_use]
    pub fn new(name: impl Into<String>, now: Instant) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                name: name.into(),
                now,
                next_id: 1,
                timers: FxHashMap::default(),
                shut_down: false,
            })),
        }
    }

    /// Weak handle to this scheduler.
    #[must_use]
    pub fn downgrade(&self) -> WeakScheduler {
        WeakScheduler {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Last time passed to [`run_pending`](Self::run_pending) (or the
    /// creation time).
    #[must_use]
    pub fn now(&self) -> Instant {
        self.inner.borrow().now
    }

    fn register(
        &self,
        name: &'static str,
        interval: Duration,
        delay: Duration,
        callback: Callback,
    ) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        if inner.shut_down {
            log::trace!(
                "scheduler `{}`: ignoring `{name}` after shutdown",
                inner.name
            );
            return TimerHandle(id);
        }
        let deadline = Some(inner.now + delay.max(MIN_INTERVAL));
        inner.timers.insert(
            id,
            Timer {
                name,
                interval: interval.max(MIN_INTERVAL),
                deadline,
                callback: Some(callback),
            },
        );
        TimerHandle(id)
    }

    /// Fire `f` every `interval` until cancelled or paused.
    pub fn run_loop(
        &self,
        interval: Duration,
        name: &'static str,
        f: impl FnMut(Instant) -> LoopControl + 'static,
    ) -> TimerHandle {
        self.register(name, interval, interval, Callback::Loop(Box::new(f)))
    }

    /// Re-arm an existing loop without allocating a new handle.
    ///
    /// A parked loop fires on the next [`run_pending`](Self::run_pending).
    /// An armed loop keeps its deadline unless `interval` differs from the
    /// current one, in which case it is rescheduled one new interval from
    /// now. Returns `false` for unknown or non-loop handles.
    pub fn rearm_loop(
        &self,
        handle: TimerHandle,
        interval: Option<Duration>,
    ) -> bool {
        let mut inner = self.inner.borrow_mut();
        let now = inner.now;
        let Some(timer) = inner.timers.get_mut(&handle.0) else {
            return false;
        };
        if matches!(timer.callback, Some(Callback::Once(_) | Callback::Debounce(_)))
        {
            return false;
        }
        let changed = interval
            .map(|i| i.max(MIN_INTERVAL))
            .filter(|&i| i != timer.interval);
        if let Some(i) = changed {
            timer.interval = i;
        }
        match (timer.deadline, changed) {
            (None, _) => timer.deadline = Some(now),
            (Some(_), Some(i)) => timer.deadline = Some(now + i),
            (Some(_), None) => {}
        }
        true
    }

    /// Fire `f` once after `delay`.
    pub fn run_once(
        &self,
        delay: Duration,
        f: impl FnOnce(Instant) + 'static,
    ) -> TimerHandle {
        self.register("once", delay, delay, Callback::Once(Box::new(f)))
    }

    /// Register a debounce timer, armed to fire after `delay`.
    ///
    /// The timer stays registered after firing; use
    /// [`retrigger`](Self::retrigger) to arm it again.
    pub fn run_debounced(
        &self,
        delay: Duration,
        name: &'static str,
        f: impl FnMut(Instant) + 'static,
    ) -> TimerHandle {
        self.register(name, delay, delay, Callback::Debounce(Box::new(f)))
    }

    /// Reset a debounce timer's pending delay, optionally changing it.
    ///
    /// Repeated triggers push the deadline out instead of stacking
    /// executions. Returns `false` for unknown or non-debounce handles.
    pub fn retrigger(&self, handle: TimerHandle, delay: Option<Duration>) -> bool {
        let mut inner = self.inner.borrow_mut();
        let now = inner.now;
        let Some(timer) = inner.timers.get_mut(&handle.0) else {
            return false;
        };
        if matches!(timer.callback, Some(Callback::Loop(_) | Callback::Once(_))) {
            return false;
        }
        if let Some(d) = delay {
            timer.interval = d.max(MIN_INTERVAL);
        }
        timer.deadline = Some(now + timer.interval);
        true
    }

    /// Remove a timer. Unknown or already-cancelled handles are ignored.
    pub fn cancel(&self, handle: TimerHandle) {
        // Drop the callback outside the borrow: its captures may hold
        // handles that call back into the scheduler on drop.
        let removed = self.inner.borrow_mut().timers.remove(&handle.0);
        drop(removed);
    }

    /// Clear a timer's deadline without unregistering it.
    fn disarm(&self, handle: TimerHandle) {
        if let Some(timer) = self.inner.borrow_mut().timers.get_mut(&handle.0) {
            timer.deadline = None;
        }
    }

    /// Cancel every timer and refuse new ones. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if !inner.shut_down {
                log::debug!(
                    "scheduler `{}`: shutdown, cancelling {} timer(s)",
                    inner.name,
                    inner.timers.len()
                );
            }
            inner.shut_down = true;
            std::mem::take(&mut inner.timers)
        };
        drop(removed);
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.borrow().shut_down
    }

    /// Whether `handle` is still registered.
    #[must_use]
    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.inner.borrow().timers.contains_key(&handle.0)
    }

    /// Whether `handle` is registered and has a pending deadline.
    #[must_use]
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.inner
            .borrow()
            .timers
            .get(&handle.0)
            .is_some_and(|t| t.deadline.is_some())
    }

    /// Number of registered timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Whether no timers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Earliest pending deadline, for hosts that sleep between calls.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .borrow()
            .timers
            .values()
            .filter_map(|t| t.deadline)
            .min()
    }

    fn next_due(
        &self,
        now: Instant,
        fired: &[u64],
    ) -> Option<(u64, Callback)> {
        let mut inner = self.inner.borrow_mut();
        let id = inner
            .timers
            .iter()
            .filter(|(id, t)| t.callback.is_some() && !fired.contains(*id))
            .filter_map(|(&id, t)| {
                t.deadline.filter(|&d| d <= now).map(|d| (d, id))
            })
            .min()
            .map(|(_, id)| id)?;
        let timer = inner.timers.get_mut(&id)?;
        timer.deadline = None;
        let callback = timer.callback.take()?;
        if matches!(callback, Callback::Once(_)) {
            inner.timers.remove(&id);
        }
        Some((id, callback))
    }

    /// Fire every timer due at `now`. Returns how many callbacks ran.
    ///
    /// Each timer fires at most once per call; loops are rescheduled at
    /// `now + interval`, so missed intervals never stack.
    pub fn run_pending(&self, now: Instant) -> usize {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.shut_down {
                return 0;
            }
            if now > inner.now {
                inner.now = now;
            }
        }
        let mut fired = Vec::new();
        while let Some((id, callback)) = self.next_due(now, &fired) {
            fired.push(id);
            let orphan = match callback {
                Callback::Once(f) => {
                    f(now);
                    None
                }
                Callback::Loop(mut f) => {
                    let control = f(now);
                    self.restore(id, Callback::Loop(f), |timer| {
                        // A rearm from inside the callback already set a
                        // deadline; keep it.
                        if timer.deadline.is_none()
                            && control == LoopControl::Continue
                        {
                            timer.deadline = Some(now + timer.interval);
                        }
                    })
                }
                Callback::Debounce(mut f) => {
                    f(now);
                    self.restore(id, Callback::Debounce(f), |_| {})
                }
            };
            // Cancelled from inside its own callback
            drop(orphan);
        }
        fired.len()
    }

    /// Put a callback back after it ran. Hands it back if the timer was
    /// cancelled meanwhile, so it is dropped with no borrow held.
    fn restore(
        &self,
        id: u64,
        callback: Callback,
        update: impl FnOnce(&mut Timer),
    ) -> Option<Callback> {
        let mut inner = self.inner.borrow_mut();
        match inner.timers.get_mut(&id) {
            Some(timer) => {
                update(timer);
                timer.callback = Some(callback);
                None
            }
            None => Some(callback),
        }
    }

    /// Names of the registered timers, sorted.
    #[must_use]
    pub fn timer_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> =
            self.inner.borrow().timers.values().map(|t| t.name).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn loop_fires_every_interval() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _h = sched.run_loop(ms(10), "tick", move |_| {
            c.set(c.get() + 1);
            LoopControl::Continue
        });

        assert_eq!(sched.run_pending(t0 + ms(5)), 0);
        assert_eq!(sched.run_pending(t0 + ms(10)), 1);
        assert_eq!(sched.run_pending(t0 + ms(15)), 0);
        assert_eq!(sched.run_pending(t0 + ms(20)), 1);
        // A long stall fires once, not once per missed interval
        assert_eq!(sched.run_pending(t0 + ms(100)), 1);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn paused_loop_resumes_on_rearm() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let h = sched.run_loop(ms(10), "tick", move |_| {
            c.set(c.get() + 1);
            LoopControl::Pause
        });
        sched.run_pending(t0 + ms(10));
        assert!(!sched.is_armed(h));
        assert!(sched.contains(h));
        assert_eq!(sched.run_pending(t0 + ms(50)), 0);

        assert!(sched.rearm_loop(h, None));
        assert_eq!(sched.run_pending(t0 + ms(50)), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn rearm_is_idempotent_on_armed_loop() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let h = sched.run_loop(ms(10), "tick", |_| LoopControl::Continue);
        let before = sched.next_deadline();
        assert!(sched.rearm_loop(h, None));
        assert!(sched.rearm_loop(h, Some(ms(10))));
        assert_eq!(sched.next_deadline(), before);
        assert_eq!(sched.len(), 1);

        assert!(sched.rearm_loop(h, Some(ms(40))));
        assert_eq!(sched.next_deadline(), Some(t0 + ms(40)));
    }

    #[test]
    fn rearm_rejects_unknown_and_non_loop_handles() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let once = sched.run_once(ms(5), |_| {});
        assert!(!sched.rearm_loop(once, None));
        sched.cancel(once);
        assert!(!sched.rearm_loop(once, None));
    }

    #[test]
    fn once_fires_once_and_is_removed() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let h = sched.run_once(ms(20), move |_| c.set(c.get() + 1));
        sched.run_pending(t0 + ms(20));
        sched.run_pending(t0 + ms(40));
        assert_eq!(count.get(), 1);
        assert!(!sched.contains(h));
    }

    #[test]
    fn debounce_coalesces_bursts() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let h = sched.run_debounced(ms(100), "settle", move |_| c.set(c.get() + 1));

        for step in 1..=5 {
            sched.run_pending(t0 + ms(step * 50));
            assert!(sched.retrigger(h, None));
        }
        assert_eq!(count.get(), 0);
        // Last trigger happened at t0 + 250ms
        sched.run_pending(t0 + ms(349));
        assert_eq!(count.get(), 0);
        sched.run_pending(t0 + ms(350));
        assert_eq!(count.get(), 1);
        assert!(sched.contains(h));
        assert!(!sched.is_armed(h));
    }

    #[test]
    fn cancel_unknown_handle_is_noop() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let h = sched.run_once(ms(1), |_| {});
        sched.cancel(h);
        sched.cancel(h);
        sched.cancel(TimerHandle(999));
        assert!(sched.is_empty());
    }

    #[test]
    fn shutdown_is_idempotent_and_final() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let _ = sched.run_loop(ms(1), "tick", move |_| {
            f.set(true);
            LoopControl::Continue
        });
        sched.shutdown();
        sched.shutdown();
        assert!(sched.is_empty());

        let late = sched.run_once(ms(1), |_| {});
        assert!(!sched.contains(late));
        assert_eq!(sched.run_pending(t0 + ms(10)), 0);
        assert!(!fired.get());
    }

    #[test]
    fn callbacks_can_reenter_the_scheduler() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let weak = sched.downgrade();
        let handle = Rc::new(Cell::new(None));
        let slot = Rc::clone(&handle);
        let h = sched.run_loop(ms(10), "self-cancel", move |_| {
            if let (Some(s), Some(h)) = (weak.upgrade(), slot.get()) {
                s.cancel(h);
                s.run_once(ms(1), |_| {});
            }
            LoopControl::Continue
        });
        handle.set(Some(h));
        assert_eq!(sched.run_pending(t0 + ms(10)), 1);
        assert!(!sched.contains(h));
        assert_eq!(sched.timer_names(), vec!["once"]);
    }

    #[test]
    fn due_timers_fire_in_deadline_order() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, 'c'), (10, 'a'), (20, 'b')] {
            let o = Rc::clone(&order);
            sched.run_once(ms(delay), move |_| o.borrow_mut().push(tag));
        }
        sched.run_pending(t0 + ms(30));
        assert_eq!(*order.borrow(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let t0 = Instant::now();
        let sched = Scheduler::new("test", t0);
        let _ = sched.run_loop(Duration::ZERO, "busy", |_| LoopControl::Continue);
        assert_eq!(sched.next_deadline(), Some(t0 + MIN_INTERVAL));
        assert_eq!(sched.run_pending(t0 + MIN_INTERVAL), 1);
    }
}
