//! Per-tick animation pipeline.
//!
//! One tick runs these stages in strict order:
//!
//! 1. [`IconRegistry::snapshot`] - cached icon discovery
//! 2. [`proximity::nearest`] - nearest icon within the hit radius
//! 3. [`layout::compute_targets`] - target position/scale/spacing with
//!    falloff
//! 4. [`Interpolator::step`] - gated exponential smoothing toward targets
//! 5. [`ThrottleController::observe`] - adaptive tick skipping
//!
//! The stages are plain functions over a `&mut [IconEntry]` slice; the
//! engine owns the loop and the host write-back.

mod config;
mod icon;
pub mod interpolation;
pub mod layout;
pub mod proximity;
mod registry;
mod session;
mod throttle;

pub use config::DockConfiguration;
pub use icon::IconEntry;
pub use interpolation::{Coefficients, Interpolator, MoveGate};
pub use proximity::Nearest;
pub use registry::IconRegistry;
pub use session::AnimationSession;
pub use throttle::{ThrottleController, ThrottleState, TickDecision};
