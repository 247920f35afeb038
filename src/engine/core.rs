//! Per-dock engine state and the tick pipeline.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use web_time::Instant;

use super::report::{IconReport, TickOutcome, TickReport};
use crate::animation::{
    layout, proximity, AnimationSession, Coefficients, DockConfiguration,
    IconRegistry, Interpolator, MoveGate, ThrottleController, TickDecision,
};
use crate::host::{DockHost, PointerDevice};
use crate::input::{EngineEvent, EventQueue, InteractionKind};
use crate::options::Options;

/// Everything one dock's animation owns. Only reachable through the
/// [`EngineInstance`](super::EngineInstance) and weak [`Ticker`]s.
pub(crate) struct EngineCore {
    dock: Rc<dyn DockHost>,
    pointer: Rc<dyn PointerDevice>,
    options: Options,
    pending_options: Rc<RefCell<Option<Options>>>,
    registry: IconRegistry,
    throttle: ThrottleController,
    session: AnimationSession,
    events: EventQueue,
    last_origin: Vec2,
    last_report: Option<TickReport>,
    last_tick: Option<Instant>,
    attached: bool,
}

impl EngineCore {
    pub(crate) fn new(
        dock: Rc<dyn DockHost>,
        pointer: Rc<dyn PointerDevice>,
        options: Options,
        pending_options: Rc<RefCell<Option<Options>>>,
        events: EventQueue,
    ) -> Self {
        let registry = IconRegistry::new(
            options.throttle.icon_cache_frames,
            options.dock.show_apps_icon,
        )
        .with_events(events.clone());
        let throttle = ThrottleController::new(
            options.throttle.skip_frames,
            options.throttle.probe_frames,
        );
        let last_origin = dock.bounds().origin;
        Self {
            dock,
            pointer,
            options,
            pending_options,
            registry,
            throttle,
            session: AnimationSession::default(),
            events,
            last_origin,
            last_report: None,
            last_tick: None,
            attached: true,
        }
    }

    pub(crate) const fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) const fn throttle(&self) -> &ThrottleController {
        &self.throttle
    }

    pub(crate) const fn session(&self) -> &AnimationSession {
        &self.session
    }

    pub(crate) const fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    pub(crate) const fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Drop the icon cache and host subscriptions. Ticks no-op afterwards.
    pub(crate) fn release(&mut self) {
        self.attached = false;
        self.registry.release();
        self.last_report = None;
    }

    /// Compare the dock position with the last seen one. Size changes
    /// are the engine's own doing (icons parting) and do not count.
    pub(crate) fn dock_moved(&mut self) -> bool {
        let origin = self.dock.bounds().origin;
        let moved = origin != self.last_origin;
        self.last_origin = origin;
        moved
    }

    fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Interaction(kind) => {
                self.throttle.wake();
                if let Some(inside) = kind.pointer_inside() {
                    self.session.pointer_inside = inside;
                }
                match kind {
                    InteractionKind::DragBegin => {
                        self.session.dragging = true;
                        self.registry.invalidate();
                    }
                    InteractionKind::DragEnd => {
                        self.session.dragging = false;
                        self.registry.invalidate();
                    }
                    InteractionKind::DockMoved => self.registry.invalidate(),
                    InteractionKind::Motion
                    | InteractionKind::Enter
                    | InteractionKind::Leave
                    | InteractionKind::FocusChange => {}
                }
            }
            EngineEvent::Settle => {
                if !self.session.dragging {
                    self.throttle.settle();
                }
            }
            EngineEvent::IconsChanged => {
                self.throttle.wake();
                self.registry.invalidate();
            }
            EngineEvent::ConfigChanged => {
                let pending = self.pending_options.borrow_mut().take();
                if let Some(options) = pending {
                    self.set_options(options);
                }
                self.throttle.wake();
            }
            EngineEvent::DockDestroyed => {
                log::info!("dock destroyed, engine no longer attached");
                self.release();
            }
        }
    }

    fn set_options(&mut self, options: Options) {
        self.registry
            .set_cache_frames(options.throttle.icon_cache_frames);
        self.registry
            .set_include_show_apps(options.dock.show_apps_icon);
        self.registry.invalidate();
        self.throttle.set_windows(
            options.throttle.skip_frames,
            options.throttle.probe_frames,
        );
        self.options = options;
    }

    /// One animation loop firing: apply queued events, consult the
    /// throttle, and run the pipeline if allowed.
    pub(crate) fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.attached {
            self.events.clear();
            return TickOutcome::Detached;
        }
        for event in self.events.drain() {
            self.apply_event(event);
            if !self.attached {
                self.events.clear();
                return TickOutcome::Detached;
            }
        }
        match self.throttle.begin_tick(self.session.dragging) {
            TickDecision::Run => {}
            TickDecision::Skip => return TickOutcome::Skipped,
            TickDecision::Halt => return TickOutcome::Halted,
        }
        if let Some(last) = self.last_tick {
            log::trace!(
                "tick {} after {:?}",
                self.session.ticks + 1,
                now.saturating_duration_since(last)
            );
        }
        self.last_tick = Some(now);
        let report = self.run_pipeline();
        self.last_report = Some(report.clone());
        TickOutcome::Ran(report)
    }

    fn run_pipeline(&mut self) -> TickReport {
        let config = DockConfiguration::resolve(&self.options, &*self.dock);
        let dock_bounds = self.dock.bounds();
        let pointer = self.pointer.position();
        let dragging = self.session.dragging;

        let icons = self.registry.snapshot(
            &*self.dock,
            config.baseline_spacing(),
            dragging,
        );
        for icon in icons.iter_mut() {
            icon.refresh_bounds();
            if !icon.visible {
                log::debug!("{}: non-finite bounds, hiding for this tick", icon.id);
            }
        }
        proximity::sort_by_anchor(icons, dock_bounds.origin);

        let hit = proximity::nearest(icons, pointer, config.hit_radius_px());
        layout::compute_targets(icons, hit.as_ref(), &config, dock_bounds);

        let smoothing = &self.options.smoothing;
        let interpolator = Interpolator::new(
            Coefficients::from_options(smoothing, hit.is_some()),
            MoveGate::new(smoothing, &config),
        );
        let did_change = interpolator.step(icons);
        let settled = Interpolator::is_settled(icons);
        layout::assign_label(icons, hit.as_ref(), &config);

        let pivot = config.edge.pivot();
        // Hidden icons get their last good geometry with `visible: false`
        for icon in icons.iter() {
            icon.provider.apply(&icon.frame(pivot));
        }
        let background = layout::background_bounds(icons, &config);
        let icon_reports: Vec<IconReport> =
            icons.iter().map(IconReport::from).collect();

        // Scale and spacing still easing keep the loop active too
        self.throttle.observe(did_change || !settled, dragging);
        self.session.ticks += 1;
        self.session.record_nearest(hit.map(|h| h.id));

        TickReport {
            tick: self.session.ticks,
            nearest: hit.map(|h| h.id),
            nearest_distance: hit.map(|h| h.distance),
            did_change,
            discovered: self.registry.last_discovered(),
            pointer_inside: self.session.pointer_inside,
            throttle: self.throttle.state(),
            background: background.map(|r| r.to_array()),
            icons: icon_reports,
        }
    }
}

/// Weak handle to an engine's tick.
///
/// Firing after the engine was detached (or its dock destroyed) returns
/// [`TickOutcome::Detached`] without touching anything.
#[derive(Clone)]
pub struct Ticker {
    core: Weak<RefCell<EngineCore>>,
}

impl Ticker {
    pub(crate) fn new(core: &Rc<RefCell<EngineCore>>) -> Self {
        Self {
            core: Rc::downgrade(core),
        }
    }

    /// Run one tick at `now`.
    pub fn fire(&self, now: Instant) -> TickOutcome {
        let Some(core) = self.core.upgrade() else {
            log::trace!("tick after detach ignored");
            return TickOutcome::Detached;
        };
        let Ok(mut core) = core.try_borrow_mut() else {
            // Re-entered from a host callback inside a running tick
            return TickOutcome::Skipped;
        };
        core.tick(now)
    }

    /// Whether the engine behind this ticker still exists.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.core
            .upgrade()
            .is_some_and(|c| c.try_borrow().map_or(true, |c| c.is_attached()))
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("live", &self.is_live())
            .finish()
    }
}
