use serde::Serialize;

/// Interactions a host reports through
/// [`EngineInstance::on_interaction`](crate::EngineInstance::on_interaction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Pointer moved over the dock.
    Motion,
    /// Pointer entered the dock.
    Enter,
    /// Pointer left the dock.
    Leave,
    /// The focused window changed (the dock may need to hide or show).
    FocusChange,
    /// An icon drag started.
    DragBegin,
    /// An icon drag ended.
    DragEnd,
    /// The dock's bounds changed (auto-hide slide, monitor change).
    DockMoved,
}

impl InteractionKind {
    /// Whether this interaction restarts the settle countdown.
    #[must_use]
    pub const fn retriggers_settle(self) -> bool {
        matches!(
            self,
            Self::Motion | Self::Enter | Self::Leave | Self::FocusChange
        )
    }

    /// Whether the pointer is over the dock after this interaction, if the
    /// interaction says anything about it.
    #[must_use]
    pub const fn pointer_inside(self) -> Option<bool> {
        match self {
            Self::Motion | Self::Enter => Some(true),
            Self::Leave => Some(false),
            _ => None,
        }
    }
}

/// Everything the tick loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A host interaction.
    Interaction(InteractionKind),
    /// The settle debounce expired: interaction has gone quiet.
    Settle,
    /// An icon was added or removed.
    IconsChanged,
    /// The dock container was destroyed.
    DockDestroyed,
    /// Options changed.
    ConfigChanged,
}
