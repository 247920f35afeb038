//! Engine lifecycle: attach to a dock, feed interactions, detach.
//!
//! [`EngineInstance::attach`] registers everything one dock needs on the
//! host's [`Scheduler`]:
//!
//! - the `animation` loop, which runs one [`Ticker::fire`] per interval
//!   and parks itself while the throttle is idle
//! - the `position-watch` loop, which turns dock bounds changes into
//!   [`InteractionKind::DockMoved`]
//! - a cold-start one-shot that synthesizes an enter interaction
//! - the settle debouncer, which starts the throttle countdown once
//!   interaction goes quiet
//! - the dock-destroyed subscription
//!
//! [`EngineInstance::detach`] tears these down in reverse dependency
//! order: timers first, then the dock subscription, then the icon cache.

mod core;
mod options;
mod report;

use std::cell::RefCell;
use std::rc::Rc;

use web_time::Duration;

pub use self::core::Ticker;
use self::core::EngineCore;
pub use self::options::ConfigPatch;
pub use self::report::{IconReport, TickOutcome, TickReport};
use crate::animation::{AnimationSession, ThrottleState};
use crate::host::{DockHost, PointerDevice, Subscription};
use crate::input::{EngineEvent, EventQueue, InteractionKind};
use crate::options::Options;
use crate::scheduler::{
    Debouncer, LoopControl, Scheduler, TimerHandle, WeakScheduler,
};

/// Scheduler handles owned by one engine.
#[derive(Debug, Clone, Copy)]
struct Timers {
    animation: TimerHandle,
    position_watch: TimerHandle,
    cold_start: TimerHandle,
}

/// Magnification engine for one dock.
pub struct EngineInstance {
    core: Option<Rc<RefCell<EngineCore>>>,
    scheduler: WeakScheduler,
    events: EventQueue,
    options: Options,
    pending_options: Rc<RefCell<Option<Options>>>,
    timers: Timers,
    settle: Option<Rc<Debouncer>>,
    dock_subscription: Option<Subscription>,
    ticker: Ticker,
}

/// Queue `kind` and restart the settle countdown if it calls for it.
fn dispatch(events: &EventQueue, settle: Option<&Debouncer>, kind: InteractionKind) {
    events.push(EngineEvent::Interaction(kind));
    if kind.retriggers_settle() {
        if let Some(settle) = settle {
            settle.trigger();
        }
    }
}

impl EngineInstance {
    /// Start animating `dock`. Options are sanitized before use.
    pub fn attach(
        dock: Rc<dyn DockHost>,
        pointer: Rc<dyn PointerDevice>,
        options: Options,
        scheduler: &Scheduler,
    ) -> Self {
        let options = options.sanitized();
        let events = EventQueue::new();
        let pending_options = Rc::new(RefCell::new(None));
        let core = Rc::new(RefCell::new(EngineCore::new(
            Rc::clone(&dock),
            pointer,
            options.clone(),
            Rc::clone(&pending_options),
            events.clone(),
        )));
        let ticker = Ticker::new(&core);

        let animation = {
            let ticker = ticker.clone();
            scheduler.run_loop(
                options.smoothing.tick_interval(),
                "animation",
                move |now| match ticker.fire(now) {
                    TickOutcome::Ran(_) | TickOutcome::Skipped => {
                        LoopControl::Continue
                    }
                    TickOutcome::Halted | TickOutcome::Detached => {
                        LoopControl::Pause
                    }
                },
            )
        };

        // Any queued event re-arms a parked animation loop
        {
            let scheduler = scheduler.downgrade();
            events.set_waker(move || {
                if let Some(s) = scheduler.upgrade() {
                    s.rearm_loop(animation, None);
                }
            });
        }

        let position_watch = {
            let core = Rc::downgrade(&core);
            let events = events.clone();
            scheduler.run_loop(
                options.throttle.position_watch_interval(),
                "position-watch",
                move |_| {
                    let Some(core) = core.upgrade() else {
                        return LoopControl::Pause;
                    };
                    let moved = core
                        .try_borrow_mut()
                        .is_ok_and(|mut c| c.is_attached() && c.dock_moved());
                    if moved {
                        events.push(EngineEvent::Interaction(
                            InteractionKind::DockMoved,
                        ));
                    }
                    LoopControl::Continue
                },
            )
        };

        let settle = {
            let events = events.clone();
            Rc::new(Debouncer::new(
                scheduler,
                options.throttle.settle_delay(),
                "settle",
                move |_| events.push(EngineEvent::Settle),
            ))
        };

        let cold_start = {
            let events = events.clone();
            let settle = Rc::downgrade(&settle);
            scheduler.run_once(options.throttle.cold_start_delay(), move |_| {
                log::debug!("cold start: synthesizing enter");
                let settle = settle.upgrade();
                dispatch(&events, settle.as_deref(), InteractionKind::Enter);
            })
        };

        // The core releases itself on the next tick; the side timers stop
        // here so nothing keeps feeding the queue.
        let dock_subscription = {
            let events = events.clone();
            let scheduler = scheduler.downgrade();
            let settle = Rc::downgrade(&settle);
            dock.on_destroyed(Box::new(move || {
                if let Some(s) = scheduler.upgrade() {
                    s.cancel(position_watch);
                    s.cancel(cold_start);
                }
                if let Some(settle) = settle.upgrade() {
                    settle.cancel();
                }
                events.clear();
                events.push(EngineEvent::DockDestroyed);
            }))
        };

        log::info!(
            "attached to {} dock, tick interval {}ms",
            options.dock.edge.unwrap_or_else(|| dock.edge()).name(),
            options.smoothing.tick_interval().as_millis()
        );

        Self {
            core: Some(core),
            scheduler: scheduler.downgrade(),
            events,
            options,
            pending_options,
            timers: Timers {
                animation,
                position_watch,
                cold_start,
            },
            settle: Some(settle),
            dock_subscription: Some(dock_subscription),
            ticker,
        }
    }

    /// Report a host interaction. No-op after detach or once the dock is
    /// gone.
    pub fn on_interaction(&self, kind: InteractionKind) {
        if !self.is_attached() {
            log::trace!("{kind:?} after detach ignored");
            return;
        }
        dispatch(&self.events, self.settle.as_deref(), kind);
    }

    /// Stop animating and release everything. Safe to call repeatedly.
    pub fn detach(&mut self) {
        let Some(core) = self.core.take() else {
            return;
        };
        if let Some(scheduler) = self.scheduler.upgrade() {
            scheduler.cancel(self.timers.animation);
            scheduler.cancel(self.timers.position_watch);
            scheduler.cancel(self.timers.cold_start);
        }
        if let Some(settle) = self.settle.take() {
            settle.cancel();
        }
        self.events.clear();
        if let Some(sub) = self.dock_subscription.take() {
            sub.dispose();
        }
        match core.try_borrow_mut() {
            Ok(mut core) => core.release(),
            // Detached from inside a tick: the core is dropped when the
            // tick returns.
            Err(_) => log::debug!("detach during tick"),
        }
        drop(core);
        log::info!("detached");
    }

    /// Whether the engine is attached and its dock is alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.core
            .as_ref()
            .is_some_and(|c| c.try_borrow().map_or(true, |c| c.is_attached()))
    }

    /// Weak handle to this engine's tick.
    #[must_use]
    pub fn ticker(&self) -> Ticker {
        self.ticker.clone()
    }

    /// Current (sanitized) options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Report of the last tick that ran.
    #[must_use]
    pub fn last_report(&self) -> Option<TickReport> {
        self.with_core(|c| c.last_report().cloned()).flatten()
    }

    /// Current throttle state.
    #[must_use]
    pub fn throttle_state(&self) -> Option<ThrottleState> {
        self.with_core(|c| c.throttle().state())
    }

    /// Current interaction state.
    #[must_use]
    pub fn session(&self) -> Option<AnimationSession> {
        self.with_core(|c| c.session().clone())
    }

    /// How many times the icon list was discovered.
    #[must_use]
    pub fn discoveries(&self) -> usize {
        self.with_core(|c| c.registry().discoveries()).unwrap_or(0)
    }

    /// Animation loop period.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.options.smoothing.tick_interval()
    }

    /// Whether the animation loop has a pending deadline (not parked).
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|s| s.is_armed(self.timers.animation))
    }

    fn with_core<T>(&self, f: impl FnOnce(&EngineCore) -> T) -> Option<T> {
        let core = self.core.as_ref()?;
        let core = core.try_borrow().ok()?;
        Some(f(&core))
    }
}

impl Drop for EngineInstance {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for EngineInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineInstance")
            .field("attached", &self.is_attached())
            .field("timers", &self.timers)
            .field("throttle", &self.throttle_state())
            .finish_non_exhaustive()
    }
}
