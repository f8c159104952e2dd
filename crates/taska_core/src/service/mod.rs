//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative task collection and its mutation rules.
//! - Track the transient edit workflow separately from stored state.
//!
//! # Invariants
//! - Every state change is persisted before the call returns.
//! - Services stay storage-agnostic; they only see `TaskRepository`.

pub mod edit_session;
pub mod task_store;
