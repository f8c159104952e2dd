//! Task collection persistence adapter.
//!
//! # Responsibility
//! - Load the whole task collection from one named slot.
//! - Save the whole collection back, replacing prior content.
//!
//! # Invariants
//! - `load` never fails: a missing slot, a read error or a top-level value
//!   that is not a JSON array all yield an empty collection.
//! - Entries are sanitized one by one; a malformed entry is dropped without
//!   discarding its neighbours.
//! - Collection order is preserved in both directions.

use crate::model::task::{normalize_text, Priority, Task, TaskId};
use crate::repo::slot_repo::SlotStore;
use crate::repo::RepoResult;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Default slot key holding the serialized collection.
pub const DEFAULT_STORAGE_KEY: &str = "taska_tasks";

/// Load/save contract for the task collection.
pub trait TaskRepository {
    fn load(&self) -> Vec<Task>;
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// Adapter storing the collection as a JSON array in a single slot.
pub struct SlotTaskRepository<S: SlotStore> {
    slots: S,
    key: String,
}

impl<S: SlotStore> SlotTaskRepository<S> {
    /// Uses the default `taska_tasks` key.
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }
}

impl<S: SlotStore> TaskRepository for SlotTaskRepository<S> {
    fn load(&self) -> Vec<Task> {
        match self.slots.read_slot(&self.key) {
            Ok(Some(raw)) => {
                let tasks = decode_collection(&raw);
                info!(
                    "event=tasks_load module=repo status=ok key={} count={}",
                    self.key,
                    tasks.len()
                );
                tasks
            }
            Ok(None) => {
                info!(
                    "event=tasks_load module=repo status=empty key={}",
                    self.key
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=error key={} error_code=slot_read_failed error={err}",
                    self.key
                );
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.slots.write_slot(&self.key, &encoded)?;
        debug!(
            "event=tasks_save module=repo status=ok key={} count={} bytes={}",
            self.key,
            tasks.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Lenient on-disk shape. Required: `id`, `text`, `createdAt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: String,
    text: String,
    completed: Option<bool>,
    priority: Option<Value>,
    created_at: DateTime<Utc>,
}

/// Decodes a raw slot value into a sanitized collection.
///
/// Drops entries that fail to decode, carry a blank id or empty text, or
/// repeat an earlier id. A missing or null `completed` reads as `false`;
/// unknown or missing priorities fall back to `Priority::default()`.
pub fn decode_collection(raw: &str) -> Vec<Task> {
    let entries = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "event=tasks_decode module=repo status=error error_code=invalid_top_level error={err}"
            );
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match decode_entry(entry) {
            Ok(task) if seen.insert(task.id.clone()) => tasks.push(task),
            Ok(_) => warn!(
                "event=tasks_decode module=repo status=dropped index={index} reason=duplicate_id"
            ),
            Err(reason) => warn!(
                "event=tasks_decode module=repo status=dropped index={index} reason={reason}"
            ),
        }
    }
    tasks
}

fn decode_entry(entry: Value) -> Result<Task, &'static str> {
    let stored: StoredTask = serde_json::from_value(entry).map_err(|_| "malformed_record")?;

    // Ids are opaque: kept byte-for-byte so reloads hand back the same key.
    if stored.id.trim().is_empty() {
        return Err("empty_id");
    }
    let text = normalize_text(&stored.text).ok_or("empty_text")?;
    let priority = stored
        .priority
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Priority::parse)
        .unwrap_or_default();

    let task = Task {
        id: TaskId::new(stored.id),
        text,
        completed: stored.completed.unwrap_or(false),
        priority,
        created_at: stored.created_at,
    };
    task.validate().map_err(|_| "invalid_record")?;
    Ok(task)
}
