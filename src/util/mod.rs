//! Shared utilities for the dock engine.
//!
//! Geometry helpers for bounding boxes and edge-relative axes.

pub mod geometry;
