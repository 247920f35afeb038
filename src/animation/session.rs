use crate::host::IconId;

/// Per-dock mutable interaction state, owned by one engine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationSession {
    /// An icon drag is in progress.
    pub dragging: bool,
    /// The pointer is over the dock, as far as interactions tell.
    pub pointer_inside: bool,
    /// Nearest icon of the last tick that ran.
    pub last_nearest: Option<IconId>,
    /// Ticks that ran the full pipeline.
    pub ticks: u64,
}

impl AnimationSession {
    /// Record the nearest icon of a finished tick. Returns whether it
    /// differs from the previous one.
    pub fn record_nearest(&mut self, nearest: Option<IconId>) -> bool {
        let changed = self.last_nearest != nearest;
        if changed {
            log::trace!("nearest icon: {:?} -> {:?}", self.last_nearest, nearest);
        }
        self.last_nearest = nearest;
        changed
    }
}
