use serde::{Deserialize, Serialize};

use super::codec::{self, FieldValues};
use super::schema::MERGE_REQUEST;

/// Structured fields of a merge-request record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestFields {
    /// Source branch, e.g. `polecat/Nux/gt-xyz`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Target branch, e.g. `main` or `integration/gt-epic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// The work item being merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rig: Option<String>,
    /// SHA of the merge commit, set on close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit: Option<String>,
    /// merged, rejected, conflict or superseded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
}

impl MergeRequestFields {
    pub fn parse(description: &str) -> Option<Self> {
        let mut values = codec::parse(description, &MERGE_REQUEST)?;
        Some(Self {
            branch: values.remove("branch"),
            target: values.remove("target"),
            source_issue: values.remove("source_issue"),
            worker: values.remove("worker"),
            rig: values.remove("rig"),
            merge_commit: values.remove("merge_commit"),
            close_reason: values.remove("close_reason"),
        })
    }

    pub fn to_values(&self) -> FieldValues {
        let pairs = [
            ("branch", &self.branch),
            ("target", &self.target),
            ("source_issue", &self.source_issue),
            ("worker", &self.worker),
            ("rig", &self.rig),
            ("merge_commit", &self.merge_commit),
            ("close_reason", &self.close_reason),
        ];
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
            .collect()
    }

    pub fn format(&self) -> String {
        codec::format(&self.to_values(), &MERGE_REQUEST)
    }

    pub fn apply_to(&self, description: &str) -> String {
        codec::merge(description, &self.to_values(), &MERGE_REQUEST)
    }
}
