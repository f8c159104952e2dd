//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the storage slot.
//! - Provide constructors that enforce text and identity invariants.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is trimmed and never empty.
//! - `created_at` is set once at creation and never changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Freshly created tasks get a UUID v4 in simple form. Identifiers read
/// back from storage may be any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an existing identifier value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// User-selected task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Stable lowercase label, identical to the wire value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire/UI label. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation failures for task invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::EmptyText => write!(f, "task text must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized with camelCase keys (`createdAt`) and an RFC 3339 timestamp,
/// matching the layout of the storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new incomplete task with a generated id and `created_at = now`.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is empty after trimming.
    pub fn new(text: &str, priority: Priority) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), text, priority, Utc::now())
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by the load path where identity already exists in storage.
    pub fn with_id(
        id: TaskId,
        text: &str,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: normalize_text(text).ok_or(TaskValidationError::EmptyText)?,
            completed: false,
            priority,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks identity and text invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Flips completion and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Returns trimmed text, or `None` when nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, Priority, Task, TaskId, TaskValidationError};

    #[test]
    fn new_task_trims_text_and_starts_incomplete() {
        let task = Task::new("  buy milk \n", Priority::High).unwrap();
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.id.as_str().len(), 32);
    }

    #[test]
    fn new_task_rejects_whitespace_text() {
        assert_eq!(
            Task::new(" \t ", Priority::Low).unwrap_err(),
            TaskValidationError::EmptyText
        );
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[test]
    fn priority_parse_accepts_labels() {
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::Low.label(), "low");
    }

    #[test]
    fn normalize_text_handles_blank() {
        assert_eq!(normalize_text("  "), None);
        assert_eq!(normalize_text(" a ").as_deref(), Some("a"));
    }
}
