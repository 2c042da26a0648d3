//! Attaching molecules to pinned records.
//!
//! A pinned record is *attached* while its description carries an
//! attachment overlay (`attached_molecule`, `attached_at`, ...), and
//! *unattached* otherwise. Both transitions are fetch, merge, persist,
//! re-fetch; nothing guards against another writer between the fetch and
//! the persist, so callers serialize access to a record themselves.

use chrono::{DateTime, Utc};

use crate::audit::AuditTrail;
use crate::error::{CoreError, ResultExt};
use crate::fields::AttachmentFields;
use crate::model::{AuditEntry, AuditOperation, Record};
use crate::store::{RecordStore, UpdateOptions};
use crate::time::format_timestamp;

/// Context recorded alongside a detach.
#[derive(Debug, Clone, Default)]
pub struct DetachOptions {
    pub operation: AuditOperation,
    /// Who is performing the detach.
    pub agent: Option<String>,
    pub reason: Option<String>,
}

/// Result of a detach.
#[derive(Debug)]
pub struct DetachOutcome {
    /// The record as stored after the transition.
    pub record: Record,
    /// What was removed; `None` when nothing was attached.
    pub detached: Option<AttachmentFields>,
    /// Set when the audit entry could not be written. The detach itself
    /// still went through.
    pub audit_failure: Option<CoreError>,
}

impl DetachOutcome {
    pub fn is_noop(&self) -> bool {
        self.detached.is_none()
    }
}

/// Attach `molecule_id` to a pinned record, stamped with the current time.
/// Returns the record as re-read from the store.
pub fn attach_molecule<S: RecordStore + ?Sized>(
    store: &S,
    pinned_id: &str,
    molecule_id: &str,
) -> Result<Record, CoreError> {
    attach_molecule_at(store, pinned_id, molecule_id, None, Utc::now())
}

/// Attach with explicit args and timestamp. Any previous attachment
/// overlay is replaced as a whole.
pub fn attach_molecule_at<S: RecordStore + ?Sized>(
    store: &S,
    pinned_id: &str,
    molecule_id: &str,
    args: Option<&str>,
    at: DateTime<Utc>,
) -> Result<Record, CoreError> {
    let record = store
        .get(pinned_id)
        .context("fetching pinned record")?;

    if !record.is_pinned() {
        return Err(CoreError::InvalidState {
            id: pinned_id.to_string(),
            status: record.status.to_string(),
        });
    }

    let fields = AttachmentFields {
        attached_molecule: Some(molecule_id.to_string()),
        attached_at: Some(format_timestamp(&at)),
        attached_args: args.map(str::to_string),
    };
    let description = fields.apply_to(&record.description);

    store
        .update(pinned_id, &UpdateOptions::description(description))
        .context("updating pinned record")?;
    tracing::debug!(pinned = pinned_id, molecule = molecule_id, "Attached molecule");

    store.get(pinned_id).context("re-fetching pinned record")
}

/// Remove the attachment overlay without writing an audit entry.
pub fn detach_molecule<S: RecordStore + ?Sized>(
    store: &S,
    pinned_id: &str,
) -> Result<DetachOutcome, CoreError> {
    detach(store, None, pinned_id, &DetachOptions::default())
}

/// Remove the attachment overlay and record the transition in `audit`.
///
/// Detaching a record with nothing attached returns it unchanged and
/// writes no audit entry. An audit write failure is logged and reported in
/// [`DetachOutcome::audit_failure`]; it never fails the detach.
pub fn detach_molecule_with_audit<S: RecordStore + ?Sized>(
    store: &S,
    audit: &AuditTrail,
    pinned_id: &str,
    opts: &DetachOptions,
) -> Result<DetachOutcome, CoreError> {
    detach(store, Some(audit), pinned_id, opts)
}

fn detach<S: RecordStore + ?Sized>(
    store: &S,
    audit: Option<&AuditTrail>,
    pinned_id: &str,
    opts: &DetachOptions,
) -> Result<DetachOutcome, CoreError> {
    let record = store
        .get(pinned_id)
        .context("fetching pinned record")?;

    let Some(attachment) = AttachmentFields::parse(&record.description) else {
        tracing::debug!(pinned = pinned_id, "Nothing attached; detach is a no-op");
        return Ok(DetachOutcome {
            record,
            detached: None,
            audit_failure: None,
        });
    };

    let audit_failure = audit.and_then(|trail| {
        let entry = AuditEntry {
            timestamp: Utc::now(),
            operation: opts.operation,
            pinned_record_id: pinned_id.to_string(),
            detached_molecule: attachment.attached_molecule.clone().unwrap_or_default(),
            detached_by: opts.agent.clone().filter(|a| !a.is_empty()),
            reason: opts.reason.clone().filter(|r| !r.is_empty()),
            previous_state: Some(record.status.to_string()),
        };
        let err = trail.append(&entry).err()?;
        tracing::warn!("Failed to write audit log: {err}");
        Some(err)
    });

    let description = AttachmentFields::clear_from(&record.description);
    store
        .update(pinned_id, &UpdateOptions::description(description))
        .context("updating pinned record")?;
    tracing::debug!(
        pinned = pinned_id,
        operation = %opts.operation,
        "Detached molecule"
    );

    let record = store.get(pinned_id).context("re-fetching pinned record")?;
    Ok(DetachOutcome {
        record,
        detached: Some(attachment),
        audit_failure,
    })
}

/// The attachment of a record, or `None` if nothing is attached.
pub fn get_attachment<S: RecordStore + ?Sized>(
    store: &S,
    pinned_id: &str,
) -> Result<Option<AttachmentFields>, CoreError> {
    let record = store.get(pinned_id)?;
    Ok(AttachmentFields::parse(&record.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordStatus;
    use crate::store::MemStore;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn pinned(id: &str, description: &str) -> Record {
        Record {
            id: id.into(),
            title: "mayor Handoff".into(),
            description: description.into(),
            status: RecordStatus::Pinned,
            ..Default::default()
        }
    }

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, secs).unwrap()
    }

    #[test]
    fn test_attach_to_empty_pinned_record() {
        let store = MemStore::new();
        store.insert(pinned("gt-1", ""));

        let record = attach_molecule_at(&store, "gt-1", "gt-42", None, at(5)).unwrap();
        assert_eq!(
            record.description,
            "attached_molecule: gt-42\nattached_at: 2026-01-15T10:00:05Z"
        );
        assert_eq!(record.status, RecordStatus::Pinned);
    }

    #[test]
    fn test_attach_now_stamps_parseable_time() {
        let store = MemStore::new();
        store.insert(pinned("gt-1", "Handoff notes"));

        let record = attach_molecule(&store, "gt-1", "gt-42").unwrap();
        let fields = AttachmentFields::parse(&record.description).unwrap();
        let stamped = fields.attached_at.unwrap();
        assert!(DateTime::parse_from_rfc3339(&stamped).is_ok());
        assert!(record.description.ends_with("\n\nHandoff notes"));
    }

    #[test]
    fn test_attach_requires_pinned_status() {
        let store = MemStore::new();
        store.insert(Record {
            id: "gt-2".into(),
            status: RecordStatus::InProgress,
            ..Default::default()
        });

        match attach_molecule(&store, "gt-2", "gt-42").unwrap_err() {
            CoreError::InvalidState { id, status } => {
                assert_eq!(id, "gt-2");
                assert_eq!(status, "in_progress");
            }
            other => panic!("unexpected: {other}"),
        }
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_attach_missing_record() {
        let store = MemStore::new();
        let err = attach_molecule(&store, "gt-404", "gt-42").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("fetching pinned record"));
    }

    #[test]
    fn test_reattach_replaces_overlay() {
        let store = MemStore::new();
        store.insert(pinned("gt-1", "Notes\n\nMore notes"));

        attach_molecule_at(&store, "gt-1", "gt-42", Some("quick pass"), at(5)).unwrap();
        let first = store.get("gt-1").unwrap();
        let same = attach_molecule_at(&store, "gt-1", "gt-42", Some("quick pass"), at(9)).unwrap();
        let other = attach_molecule_at(&store, "gt-1", "gt-77", None, at(12)).unwrap();

        assert_eq!(
            first.description.replace("10:00:05", "10:00:09"),
            same.description
        );
        assert_eq!(
            other.description,
            "attached_molecule: gt-77\nattached_at: 2026-01-15T10:00:12Z\n\nNotes\n\nMore notes"
        );
    }

    #[test]
    fn test_attach_propagates_persist_failure() {
        let store = MemStore::new();
        store.insert(pinned("gt-1", ""));
        store.set_fail_writes(true);

        let err = attach_molecule(&store, "gt-1", "gt-42").unwrap_err();
        assert!(err.to_string().starts_with("updating pinned record"));
        assert!(matches!(err.root(), CoreError::Command { .. }));
    }

    #[test]
    fn test_detach_without_attachment_is_noop() {
        let tmp = TempDir::new().unwrap();
        let trail = AuditTrail::at(tmp.path().join("audit.log"));
        let store = MemStore::new();
        let original = pinned("gt-1", "just notes\nowner: mayor");
        store.insert(original.clone());

        let outcome =
            detach_molecule_with_audit(&store, &trail, "gt-1", &DetachOptions::default()).unwrap();

        assert!(outcome.is_noop());
        assert_eq!(outcome.record, original);
        assert_eq!(store.write_count(), 0);
        assert!(!trail.path().exists());
    }

    #[test]
    fn test_detach_twice_writes_one_audit_entry() {
        let tmp = TempDir::new().unwrap();
        let trail = AuditTrail::at(tmp.path().join(".beads/audit.log"));
        let store = MemStore::new();
        store.insert(pinned(
            "gt-1",
            "attached_molecule: gt-42\nattached_at: 2026-01-15T10:00:05Z\n\nNotes",
        ));
        let opts = DetachOptions {
            operation: AuditOperation::Squash,
            agent: Some("gastown/Toast".into()),
            reason: Some("molecule complete".into()),
        };

        let first = detach_molecule_with_audit(&store, &trail, "gt-1", &opts).unwrap();
        let second = detach_molecule_with_audit(&store, &trail, "gt-1", &opts).unwrap();

        assert_eq!(first.record.description, "Notes");
        assert_eq!(
            first.detached.unwrap().attached_molecule.as_deref(),
            Some("gt-42")
        );
        assert!(first.audit_failure.is_none());
        assert!(second.is_noop());
        assert_eq!(second.record, first.record);

        let entries = trail.read_entries().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.operation, AuditOperation::Squash);
        assert_eq!(entry.pinned_record_id, "gt-1");
        assert_eq!(entry.detached_molecule, "gt-42");
        assert_eq!(entry.detached_by.as_deref(), Some("gastown/Toast"));
        assert_eq!(entry.reason.as_deref(), Some("molecule complete"));
        assert_eq!(entry.previous_state.as_deref(), Some("pinned"));
    }

    #[test]
    fn test_detach_survives_audit_failure() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blocked"), "").unwrap();
        let trail = AuditTrail::at(tmp.path().join("blocked/audit.log"));
        let store = MemStore::new();
        store.insert(pinned("gt-1", "attached_molecule: gt-42"));

        let outcome =
            detach_molecule_with_audit(&store, &trail, "gt-1", &DetachOptions::default()).unwrap();

        assert!(!outcome.is_noop());
        assert!(outcome.audit_failure.is_some());
        assert_eq!(outcome.record.description, "");
    }

    #[test]
    fn test_detach_does_not_require_pinned() {
        let store = MemStore::new();
        store.insert(Record {
            id: "gt-3".into(),
            status: RecordStatus::Closed,
            description: "attached_molecule: gt-42\n\nwrap-up".into(),
            ..Default::default()
        });

        let outcome = detach_molecule(&store, "gt-3").unwrap();
        assert_eq!(outcome.record.description, "wrap-up");
        assert!(outcome.audit_failure.is_none());
    }

    #[test]
    fn test_detach_propagates_persist_failure() {
        let tmp = TempDir::new().unwrap();
        let trail = AuditTrail::at(tmp.path().join("audit.log"));
        let store = MemStore::new();
        store.insert(pinned("gt-1", "attached_molecule: gt-42"));
        store.set_fail_writes(true);

        let err = detach_molecule_with_audit(&store, &trail, "gt-1", &DetachOptions::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("updating pinned record"));
        // The audit entry precedes the persist.
        assert_eq!(trail.read_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_get_attachment() {
        let store = MemStore::new();
        store.insert(pinned("gt-1", ""));
        assert_eq!(get_attachment(&store, "gt-1").unwrap(), None);

        attach_molecule_at(&store, "gt-1", "gt-42", None, at(5)).unwrap();
        let attachment = get_attachment(&store, "gt-1").unwrap().unwrap();
        assert_eq!(attachment.attached_molecule.as_deref(), Some("gt-42"));
        assert!(get_attachment(&store, "gt-404").unwrap_err().is_not_found());
    }
}
