use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::{CreateOptions, ListOptions, RecordStore, UpdateOptions};
use crate::error::CoreError;
use crate::model::{Record, RecordStatus};
use crate::time::current_timestamp;

/// In-memory record store for tests and embedding.
#[derive(Debug)]
pub struct MemStore {
    prefix: String,
    records: Mutex<BTreeMap<String, Record>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_prefix("gt")
    }

    /// New record IDs look like `<prefix>-<6 hex chars>`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            records: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed a record as-is, replacing any record with the same ID.
    pub fn insert(&self, record: Record) {
        self.records().insert(record.id.clone(), record);
    }

    /// Make every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful create/update/close calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<String, Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_write(&self, op: &str) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Command {
                args: op.to_string(),
                stderr: "simulated write failure".to_string(),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> String {
        let suffix = Uuid::new_v4().as_simple().to_string();
        format!("{}-{}", self.prefix, &suffix[..6])
    }
}

fn passes_filters(record: &Record, opts: &ListOptions) -> bool {
    if let Some(status) = opts.status.as_deref() {
        if status != "all" && record.status.as_str() != status {
            return false;
        }
    }
    if let Some(kind) = &opts.issue_type {
        if &record.issue_type != kind {
            return false;
        }
    }
    if opts.priority.is_some_and(|p| p != record.priority) {
        return false;
    }
    if opts.parent.is_some() && record.parent != opts.parent {
        return false;
    }
    if opts.assignee.is_some() && record.assignee != opts.assignee {
        return false;
    }
    if opts.no_assignee && record.assignee.as_deref().is_some_and(|a| !a.is_empty()) {
        return false;
    }
    true
}

impl RecordStore for MemStore {
    fn get(&self, id: &str) -> Result<Record, CoreError> {
        self.records()
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }

    fn list(&self, opts: &ListOptions) -> Result<Vec<Record>, CoreError> {
        Ok(self
            .records()
            .values()
            .filter(|r| passes_filters(r, opts))
            .cloned()
            .collect())
    }

    fn create(&self, opts: &CreateOptions) -> Result<Record, CoreError> {
        self.begin_write("create")?;
        let now = current_timestamp();
        let record = Record {
            id: self.next_id(),
            title: opts.title.clone(),
            description: opts.description.clone().unwrap_or_default(),
            status: RecordStatus::Open,
            priority: opts.priority.unwrap_or(2),
            issue_type: opts.issue_type.clone().unwrap_or_else(|| "task".into()),
            created_at: now.clone(),
            created_by: opts.actor.clone(),
            updated_at: now,
            parent: opts.parent.clone(),
            ..Record::default()
        };
        self.records().insert(record.id.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    fn update(&self, id: &str, opts: &UpdateOptions) -> Result<(), CoreError> {
        self.begin_write("update")?;
        let mut records = self.records();
        let record = records
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;

        if let Some(title) = &opts.title {
            record.title = title.clone();
        }
        if let Some(status) = &opts.status {
            record.status = status.clone();
        }
        if let Some(priority) = opts.priority {
            record.priority = priority;
        }
        if let Some(description) = &opts.description {
            record.description = description.clone();
        }
        if let Some(assignee) = &opts.assignee {
            record.assignee = (!assignee.is_empty()).then(|| assignee.clone());
        }
        if !opts.set_labels.is_empty() {
            record.labels = opts.set_labels.clone();
        } else {
            for label in &opts.add_labels {
                if !record.labels.contains(label) {
                    record.labels.push(label.clone());
                }
            }
            record.labels.retain(|l| !opts.remove_labels.contains(l));
        }
        record.updated_at = current_timestamp();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self, ids: &[String], _reason: Option<&str>) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.begin_write("close")?;
        let mut records = self.records();
        if let Some(missing) = ids.iter().find(|id| !records.contains_key(id.as_str())) {
            return Err(CoreError::NotFound {
                id: missing.clone(),
            });
        }
        let now = current_timestamp();
        for id in ids {
            if let Some(record) = records.get_mut(id) {
                record.status = RecordStatus::Closed;
                record.closed_at = Some(now.clone());
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
