//! The record store this crate annotates.
//!
//! Records are owned by an external store; this crate only reads them and
//! writes `description` and `status` back through [`RecordStore`].

pub mod bd;
pub mod memory;

pub use bd::BdStore;
pub use memory::MemStore;

use crate::error::CoreError;
use crate::model::{Record, RecordStatus};

/// Filters for listing records. `None` means "don't filter".
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// A status name, or `all`.
    pub status: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<i32>,
    pub parent: Option<String>,
    pub assignee: Option<String>,
    pub no_assignee: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: String,
    pub issue_type: Option<String>,
    pub priority: Option<i32>,
    pub description: Option<String>,
    pub parent: Option<String>,
    /// Who is creating the record; becomes `created_by`.
    pub actor: Option<String>,
}

/// A partial update. `None` leaves a field untouched; `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub title: Option<String>,
    pub status: Option<RecordStatus>,
    pub priority: Option<i32>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub add_labels: Vec<String>,
    pub remove_labels: Vec<String>,
    /// Replaces all labels; when non-empty, add/remove are ignored.
    pub set_labels: Vec<String>,
}

impl UpdateOptions {
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn status(status: RecordStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

pub trait RecordStore {
    /// Fetch one record. Fails with `CoreError::NotFound` when absent.
    fn get(&self, id: &str) -> Result<Record, CoreError>;

    fn list(&self, opts: &ListOptions) -> Result<Vec<Record>, CoreError>;

    fn create(&self, opts: &CreateOptions) -> Result<Record, CoreError>;

    fn update(&self, id: &str, opts: &UpdateOptions) -> Result<(), CoreError>;

    /// Close records, optionally recording why. Closing nothing is a no-op.
    fn close(&self, ids: &[String], reason: Option<&str>) -> Result<(), CoreError>;
}
