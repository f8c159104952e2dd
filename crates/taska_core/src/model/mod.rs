//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by store, persistence and views.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - A task never carries empty text.

pub mod task;
