//! Capabilities the host toolkit provides to the engine.
//!
//! The engine never inspects the host's widget tree. A host adapter
//! implements [`DockHost`] for the dock container, [`IconProvider`] for
//! each icon and [`PointerDevice`] for the pointer; the engine reads
//! geometry through them at tick start and writes one [`IconFrame`] per
//! icon at tick end.
//!
//! Registrations return a [`Subscription`]; disposing (or dropping) it is
//! the only way to unregister.

mod provider;
mod signal;
pub mod sim;

pub use provider::{
    DockChild, DockHost, IconFrame, IconId, IconProvider, PointerDevice,
};
pub use signal::{Signal, Subscription};
