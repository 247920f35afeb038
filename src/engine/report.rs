use serde::Serialize;

use crate::animation::{IconEntry, ThrottleState};
use crate::host::IconId;

/// Result of one animation loop firing.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The pipeline ran.
    Ran(TickReport),
    /// The throttle skipped this tick.
    Skipped,
    /// The engine is idle; the loop parks until an interaction.
    Halted,
    /// The engine was detached or its dock destroyed. Nothing was touched.
    Detached,
}

impl TickOutcome {
    /// The report, if the pipeline ran.
    #[must_use]
    pub const fn report(&self) -> Option<&TickReport> {
        match self {
            Self::Ran(report) => Some(report),
            _ => None,
        }
    }
}

/// Per-icon state after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconReport {
    /// Icon identity.
    pub id: IconId,
    /// Host image handle, if the host exposes one.
    pub image: Option<String>,
    /// Position written to the host.
    pub position: [f32; 2],
    /// Scale written to the host.
    pub scale: f32,
    /// Slot length written to the host.
    pub spacing: f32,
    /// Target scale the icon is easing toward.
    pub target_scale: f32,
    /// Whether the icon was shown this tick.
    pub visible: bool,
}

impl From<&IconEntry> for IconReport {
    fn from(icon: &IconEntry) -> Self {
        Self {
            id: icon.id,
            image: icon.image.clone(),
            position: icon.current_pos.to_array(),
            scale: icon.current_scale,
            spacing: icon.current_spacing,
            target_scale: icon.target_scale,
            visible: icon.visible,
        }
    }
}

/// Summary of a tick that ran, for hosts, logs and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Ticks that ran so far, this one included.
    pub tick: u64,
    /// Nearest icon, if the pointer was within the hit radius.
    pub nearest: Option<IconId>,
    /// Pointer distance to the nearest icon.
    pub nearest_distance: Option<f32>,
    /// Whether any icon position was eased.
    pub did_change: bool,
    /// Whether the icon list was rediscovered.
    pub discovered: bool,
    /// Whether the pointer is over the dock, per interactions.
    pub pointer_inside: bool,
    /// Throttle state after the tick.
    pub throttle: ThrottleState,
    /// Dock background `[x, y, width, height]`.
    pub background: Option<[f32; 4]>,
    /// Per-icon state in on-screen order.
    pub icons: Vec<IconReport>,
}

impl TickReport {
    /// Report for the icon with `id`.
    #[must_use]
    pub fn icon(&self, id: IconId) -> Option<&IconReport> {
        self.icons.iter().find(|i| i.id == id)
    }
}
