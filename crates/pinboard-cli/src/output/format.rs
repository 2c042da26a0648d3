use pinboard_core::fields::AttachmentFields;
use pinboard_core::model::{AuditEntry, Record};
use pinboard_core::time::format_timestamp;
use pinboard_core::DetachOutcome;
use serde_json::json;

use super::OutputFormat;

pub fn format_record(record: &Record, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(record).unwrap_or_default(),
        OutputFormat::Text => format_record_text(record),
    }
}

fn format_record_text(record: &Record) -> String {
    let mut out = String::new();
    out.push_str(&format!("Record: {}\n", record.id));
    if !record.title.is_empty() {
        out.push_str(&format!("Title:  {}\n", record.title));
    }
    out.push_str(&format!("Status: {}\n", record.status));
    if !record.description.is_empty() {
        out.push('\n');
        out.push_str(&record.description);
        out.push('\n');
    }
    out
}

pub fn format_attachment(attachment: Option<&AttachmentFields>, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(&attachment).unwrap_or_default(),
        OutputFormat::Text => match attachment {
            Some(fields) => fields.format(),
            None => "Nothing attached.".to_string(),
        },
    }
}

pub fn format_detach(outcome: &DetachOutcome, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "record": outcome.record,
            "detached": outcome.detached,
            "audit_failure": outcome.audit_failure.as_ref().map(|e| e.to_string()),
        }))
        .unwrap_or_default(),
        OutputFormat::Text => {
            let molecule = outcome
                .detached
                .as_ref()
                .and_then(|d| d.attached_molecule.as_deref());
            match (outcome.is_noop(), molecule) {
                (true, _) => format!("Nothing attached to {}.", outcome.record.id),
                (false, Some(molecule)) => {
                    format!("Detached {molecule} from {}.", outcome.record.id)
                }
                (false, None) => format!("Cleared attachment on {}.", outcome.record.id),
            }
        }
    }
}

pub fn format_audit_entries(entries: &[AuditEntry], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(entries).unwrap_or_default(),
        OutputFormat::Text => format_audit_entries_text(entries),
    }
}

fn format_audit_entries_text(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries.".to_string();
    }

    let mut out = String::new();
    for e in entries {
        let by = e.detached_by.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{}  {:<7} {} <- {}  by {by}",
            format_timestamp(&e.timestamp),
            e.operation,
            e.pinned_record_id,
            e.detached_molecule,
        ));
        if let Some(reason) = &e.reason {
            out.push_str(&format!("  ({reason})"));
        }
        out.push('\n');
    }
    out
}
