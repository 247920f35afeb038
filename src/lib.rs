// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// Unused / redundant code
#![warn(unused_qualifications)]
#![warn(unused_results)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]

//! Pointer-proximity magnification engine for icon docks.
//!
//! Magnidock animates a row (or column) of icons docked to a screen edge:
//! the icon nearest the pointer grows and lifts away from the edge, its
//! neighbors follow with a decaying falloff, and the whole row eases
//! toward the moving target layout instead of snapping.
//!
//! # Key entry points
//!
//! - [`engine::EngineInstance`] - attach to a dock, feed interactions,
//!   detach
//! - [`scheduler::Scheduler`] - the cooperative timer table the host drives
//! - [`host`] - the capability traits a host toolkit implements
//! - [`options::Options`] - runtime configuration with TOML presets
//! - [`animation`] - registry, proximity, layout, interpolation, throttle
//!
//! # Architecture
//!
//! Everything runs on one thread. The host calls
//! [`Scheduler::run_pending`](scheduler::Scheduler::run_pending) from its
//! main loop; the engine's animation loop then runs one tick:
//! registry snapshot → nearest-icon search → target layout →
//! interpolation → write-back to the host → throttle bookkeeping.

pub mod animation;
pub mod engine;
pub mod error;
pub mod host;
pub mod input;
pub mod options;
pub mod scheduler;
pub mod util;

pub use engine::{EngineInstance, Ticker, TickOutcome, TickReport};
pub use error::DockError;
pub use options::Options;
