use serde::{Deserialize, Serialize};

/// Lifecycle status of a record.
///
/// Statuses this crate does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    #[default]
    Open,
    InProgress,
    Blocked,
    Closed,
    /// A durable slot that never closes; the attachment point for molecules.
    Pinned,
    Other(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Pinned => "pinned",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "blocked" => Self::Blocked,
            "closed" => Self::Closed,
            "pinned" => Self::Pinned,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A work record as reported by the record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Free text; carries the `key: value` overlays.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
}

impl Record {
    pub fn is_pinned(&self) -> bool {
        self.status == RecordStatus::Pinned
    }
}
