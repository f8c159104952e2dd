//! Read-side projections handed to the render sink.
//!
//! # Invariants
//! - Projections are pure functions of store state and filter mode.

pub mod projection;
