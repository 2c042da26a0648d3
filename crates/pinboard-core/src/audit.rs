use std::path::{Path, PathBuf};

use crate::config::PinboardConfig;
use crate::error::CoreError;
use crate::jsonl::{self, LineAppender};
use crate::model::AuditEntry;

/// Append-only JSONL log of detach, burn and squash transitions for one
/// workspace, stored at `<workspace>/.beads/audit.log` by default.
#[derive(Debug)]
pub struct AuditTrail {
    path: PathBuf,
    appender: LineAppender,
}

impl AuditTrail {
    /// The audit trail of `workspace` under the configured audit directory.
    pub fn for_workspace(workspace: &Path, config: &PinboardConfig) -> Self {
        Self::at(config.audit_path(workspace))
    }

    /// An audit trail writing to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            appender: LineAppender::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line. Never rewrites existing lines.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), CoreError> {
        self.appender
            .append(&self.path, entry)
            .map_err(|e| e.context(format!("writing audit log {}", self.path.display())))?;
        tracing::debug!(
            operation = %entry.operation,
            pinned = %entry.pinned_record_id,
            molecule = %entry.detached_molecule,
            "Appended audit entry"
        );
        Ok(())
    }

    /// All entries in append order.
    pub fn read_entries(&self) -> Result<Vec<AuditEntry>, CoreError> {
        jsonl::read_lines(&self.path)
    }
}
