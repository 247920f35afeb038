use serde::Serialize;

/// Adaptive tick throttling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ThrottleState {
    /// Every tick runs.
    Active,
    /// Nothing moved recently: skip ticks, then probe a few.
    Cooling {
        /// Ticks since cooling started.
        elapsed: u32,
    },
    /// The animation loop is parked until an interaction.
    Idle,
}

/// What the engine should do with the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Run the full pipeline.
    Run,
    /// Do nothing this tick.
    Skip,
    /// Park the loop.
    Halt,
}

/// `Active → Cooling → Idle` state machine over tick results.
///
/// A tick without visible change (and no drag) starts cooling: the next
/// `skip_frames` ticks are skipped outright, then `probe_frames` ticks
/// run normally. If none of them changes anything the controller goes
/// idle. Any change, drag or [`wake`](Self::wake) returns to active.
#[derive(Debug, Clone)]
pub struct ThrottleController {
    state: ThrottleState,
    skip_frames: u32,
    probe_frames: u32,
}

impl ThrottleController {
    /// Active controller with the given cooling windows.
    #[must_use]
    pub const fn new(skip_frames: u32, probe_frames: u32) -> Self {
        Self {
            state: ThrottleState::Active,
            skip_frames,
            probe_frames,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ThrottleState {
        self.state
    }

    /// Change the cooling windows. Takes effect on the next countdown step.
    pub fn set_windows(&mut self, skip_frames: u32, probe_frames: u32) {
        self.skip_frames = skip_frames;
        self.probe_frames = probe_frames;
    }

    fn transition(&mut self, next: ThrottleState) {
        let changed = std::mem::discriminant(&self.state)
            != std::mem::discriminant(&next);
        if changed {
            log::debug!("throttle: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Decide what the tick about to run should do.
    pub fn begin_tick(&mut self, dragging: bool) -> TickDecision {
        if dragging {
            self.transition(ThrottleState::Active);
            return TickDecision::Run;
        }
        match self.state {
            ThrottleState::Active => TickDecision::Run,
            ThrottleState::Cooling { elapsed } => {
                let elapsed = elapsed.saturating_add(1);
                self.state = ThrottleState::Cooling { elapsed };
                if elapsed <= self.skip_frames {
                    TickDecision::Skip
                } else {
                    TickDecision::Run
                }
            }
            ThrottleState::Idle => TickDecision::Halt,
        }
    }

    /// Feed the result of a tick that ran.
    pub fn observe(&mut self, did_change: bool, dragging: bool) {
        if did_change || dragging {
            self.transition(ThrottleState::Active);
            return;
        }
        match self.state {
            ThrottleState::Active => {
                self.transition(ThrottleState::Cooling { elapsed: 0 });
            }
            ThrottleState::Cooling { elapsed }
                if elapsed >= self.skip_frames.saturating_add(self.probe_frames) =>
            {
                self.transition(ThrottleState::Idle);
            }
            ThrottleState::Cooling { .. } | ThrottleState::Idle => {}
        }
    }

    /// An interaction happened: run every tick again.
    pub fn wake(&mut self) {
        self.transition(ThrottleState::Active);
    }

    /// Interaction went quiet: start cooling unless already cooling or
    /// idle.
    pub fn settle(&mut self) {
        if self.state == ThrottleState::Active {
            self.transition(ThrottleState::Cooling { elapsed: 0 });
        }
    }

    /// Whether the loop should be parked.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == ThrottleState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(t: &mut ThrottleController, ticks: u32) -> (u32, u32, u32) {
        let (mut run, mut skip, mut halt) = (0, 0, 0);
        for _ in 0..ticks {
            match t.begin_tick(false) {
                TickDecision::Run => {
                    run += 1;
                    t.observe(false, false);
                }
                TickDecision::Skip => skip += 1,
                TickDecision::Halt => halt += 1,
            }
        }
        (run, skip, halt)
    }

    #[test]
    fn quiet_ticks_cool_then_idle() {
        let mut t = ThrottleController::new(30, 20);
        // 1 run enters cooling, 30 skipped, 20 probes, then idle
        let (run, skip, halt) = drive(&mut t, 60);
        assert_eq!(skip, 30);
        assert_eq!(run, 21);
        assert_eq!(halt, 9);
        assert!(t.is_idle());
    }

    #[test]
    fn change_during_probe_reactivates() {
        let mut t = ThrottleController::new(2, 3);
        t.observe(false, false);
        assert_eq!(t.begin_tick(false), TickDecision::Skip);
        assert_eq!(t.begin_tick(false), TickDecision::Skip);
        assert_eq!(t.begin_tick(false), TickDecision::Run);
        t.observe(true, false);
        assert_eq!(t.state(), ThrottleState::Active);
    }

    #[test]
    fn dragging_forces_active() {
        let mut t = ThrottleController::new(1, 1);
        drive(&mut t, 10);
        assert!(t.is_idle());
        assert_eq!(t.begin_tick(true), TickDecision::Run);
        t.observe(false, true);
        assert_eq!(t.state(), ThrottleState::Active);
    }

    #[test]
    fn wake_and_settle() {
        let mut t = ThrottleController::new(5, 5);
        t.settle();
        assert_eq!(t.state(), ThrottleState::Cooling { elapsed: 0 });
        // Settling again does not restart the countdown
        t.begin_tick(false);
        t.settle();
        assert_eq!(t.state(), ThrottleState::Cooling { elapsed: 1 });
        t.wake();
        assert_eq!(t.begin_tick(false), TickDecision::Run);
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(ThrottleState::Cooling { elapsed: 3 }).unwrap();
        assert_eq!(json["state"], "cooling");
        assert_eq!(json["elapsed"], 3);
    }
}
