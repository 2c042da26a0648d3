//! Per-role pinned handoff records.

use crate::error::{CoreError, ResultExt};
use crate::model::{Record, RecordStatus};
use crate::store::{CreateOptions, ListOptions, RecordStore, UpdateOptions};

/// Well-known title of a role's handoff record.
pub fn handoff_title(role: &str) -> String {
    format!("{role} Handoff")
}

/// The pinned handoff record for `role`, if one exists.
pub fn find_handoff<S: RecordStore + ?Sized>(
    store: &S,
    role: &str,
) -> Result<Option<Record>, CoreError> {
    let pinned = store
        .list(&ListOptions {
            status: Some(RecordStatus::Pinned.to_string()),
            ..Default::default()
        })
        .context("listing pinned records")?;

    let title = handoff_title(role);
    Ok(pinned.into_iter().find(|r| r.title == title))
}

/// The handoff record for `role`, created and pinned if missing.
pub fn get_or_create_handoff<S: RecordStore + ?Sized>(
    store: &S,
    role: &str,
) -> Result<Record, CoreError> {
    if let Some(existing) = find_handoff(store, role)? {
        return Ok(existing);
    }

    let created = store
        .create(&CreateOptions {
            title: handoff_title(role),
            issue_type: Some("task".into()),
            priority: Some(2),
            description: None,
            parent: None,
            actor: Some(role.to_string()),
        })
        .context("creating handoff record")?;
    store
        .update(&created.id, &UpdateOptions::status(RecordStatus::Pinned))
        .context("pinning handoff record")?;
    tracing::debug!(role, id = %created.id, "Created handoff record");

    store.get(&created.id)
}

/// Replace the handoff record's description, creating the record if needed.
pub fn update_handoff_content<S: RecordStore + ?Sized>(
    store: &S,
    role: &str,
    content: &str,
) -> Result<(), CoreError> {
    let record = get_or_create_handoff(store, role)?;
    store.update(&record.id, &UpdateOptions::description(content))
}

/// Empty the handoff record's description. No record, nothing to clear.
pub fn clear_handoff_content<S: RecordStore + ?Sized>(
    store: &S,
    role: &str,
) -> Result<(), CoreError> {
    match find_handoff(store, role)? {
        Some(record) => store.update(&record.id, &UpdateOptions::description("")),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearMailResult {
    /// Messages closed.
    pub closed: usize,
    /// Pinned messages whose content was cleared.
    pub cleared: usize,
}

/// Close every open message; pinned messages are emptied but stay open.
pub fn clear_mail<S: RecordStore + ?Sized>(
    store: &S,
    reason: &str,
) -> Result<ClearMailResult, CoreError> {
    let messages = store
        .list(&ListOptions {
            status: Some(RecordStatus::Open.to_string()),
            issue_type: Some("message".into()),
            ..Default::default()
        })
        .context("listing messages")?;

    let (pinned, to_close): (Vec<_>, Vec<_>) = messages.into_iter().partition(Record::is_pinned);
    let mut result = ClearMailResult::default();

    if !to_close.is_empty() {
        let ids: Vec<String> = to_close.into_iter().map(|r| r.id).collect();
        store
            .close(&ids, Some(reason))
            .context("closing messages")?;
        result.closed = ids.len();
    }

    for record in pinned {
        store
            .update(&record.id, &UpdateOptions::description(""))
            .context(&format!("clearing pinned message {}", record.id))?;
        result.cleared += 1;
    }

    Ok(result)
}
