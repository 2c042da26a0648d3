use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of sensitive transition an audit entry records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    #[default]
    Detach,
    Burn,
    Squash,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detach => "detach",
            Self::Burn => "burn",
            Self::Squash => "squash",
        }
    }
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for AuditOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detach" => Ok(Self::Detach),
            "burn" => Ok(Self::Burn),
            "squash" => Ok(Self::Squash),
            other => Err(format!("unknown audit operation: {other}")),
        }
    }
}

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(with = "crate::time::rfc3339_seconds")]
    pub timestamp: DateTime<Utc>,
    pub operation: AuditOperation,
    #[serde(rename = "pinned_bead_id")]
    pub pinned_record_id: String,
    pub detached_molecule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detached_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<String>,
}
