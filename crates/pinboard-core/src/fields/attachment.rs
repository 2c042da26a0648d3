use serde::{Deserialize, Serialize};

use super::codec::{self, FieldValues};
use super::schema::ATTACHMENT;

/// Which molecule is attached to a pinned record, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFields {
    /// Root record ID of the attached molecule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_molecule: Option<String>,
    /// RFC 3339 UTC time of attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_at: Option<String>,
    /// Free-form arguments handed over with the molecule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_args: Option<String>,
}

impl AttachmentFields {
    /// Read the attachment overlay from a description.
    /// Returns `None` when nothing is attached.
    pub fn parse(description: &str) -> Option<Self> {
        let mut values = codec::parse(description, &ATTACHMENT)?;
        Some(Self {
            attached_molecule: values.remove("attached_molecule"),
            attached_at: values.remove("attached_at"),
            attached_args: values.remove("attached_args"),
        })
    }

    pub fn to_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        let pairs = [
            ("attached_molecule", &self.attached_molecule),
            ("attached_at", &self.attached_at),
            ("attached_args", &self.attached_args),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                values.insert(name, value.clone());
            }
        }
        values
    }

    pub fn format(&self) -> String {
        codec::format(&self.to_values(), &ATTACHMENT)
    }

    /// Write these fields over the attachment overlay of `description`.
    pub fn apply_to(&self, description: &str) -> String {
        codec::merge(description, &self.to_values(), &ATTACHMENT)
    }

    /// Strip the attachment overlay from `description`.
    pub fn clear_from(description: &str) -> String {
        codec::merge(description, &FieldValues::new(), &ATTACHMENT)
    }
}
