//! Interaction events and the engine's event queue.
//!
//! Host notifications (pointer motion, focus changes, drags, dock moves)
//! never touch engine state directly. They are queued as
//! [`EngineEvent`]s and applied at the start of the next tick, so a tick
//! always sees a consistent snapshot.

mod event;
mod queue;

pub use event::{EngineEvent, InteractionKind};
pub use queue::EventQueue;
