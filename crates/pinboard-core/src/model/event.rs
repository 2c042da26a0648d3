use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Free-form event payload.
pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Sling,
    Hook,
    Unhook,
    Handoff,
    Done,
    Mail,
    Spawn,
    Kill,
    Nudge,
    Boot,
    Halt,
}

impl EventType {
    pub const ALL: [EventType; 11] = [
        Self::Sling,
        Self::Hook,
        Self::Unhook,
        Self::Handoff,
        Self::Done,
        Self::Mail,
        Self::Spawn,
        Self::Kill,
        Self::Nudge,
        Self::Boot,
        Self::Halt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sling => "sling",
            Self::Hook => "hook",
            Self::Unhook => "unhook",
            Self::Handoff => "handoff",
            Self::Done => "done",
            Self::Mail => "mail",
            Self::Spawn => "spawn",
            Self::Kill => "kill",
            Self::Nudge => "nudge",
            Self::Boot => "boot",
            Self::Halt => "halt",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown event type: {s}"))
    }
}

/// Where an event is surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Raw events log only.
    Audit,
    /// Curated activity feed.
    #[default]
    Feed,
    Both,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Feed => "feed",
            Self::Both => "both",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audit" => Ok(Self::Audit),
            "feed" => Ok(Self::Feed),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// One line of the workspace events log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "ts", with = "crate::time::rfc3339_seconds")]
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub payload: Payload,
    pub visibility: Visibility,
}

// Conventional payload shapes.

pub fn sling_payload(record_id: &str, target: &str) -> Payload {
    to_payload(json!({ "bead": record_id, "target": target }))
}

pub fn hook_payload(record_id: &str) -> Payload {
    to_payload(json!({ "bead": record_id }))
}

pub fn handoff_payload(subject: Option<&str>, to_session: bool) -> Payload {
    let mut payload = to_payload(json!({ "to_session": to_session }));
    if let Some(subject) = subject.filter(|s| !s.is_empty()) {
        payload.insert("subject".into(), subject.into());
    }
    payload
}

pub fn done_payload(record_id: &str, branch: &str) -> Payload {
    to_payload(json!({ "bead": record_id, "branch": branch }))
}

pub fn mail_payload(to: &str, subject: &str) -> Payload {
    to_payload(json!({ "to": to, "subject": subject }))
}

pub fn spawn_payload(rig: &str, polecat: &str) -> Payload {
    to_payload(json!({ "rig": rig, "polecat": polecat }))
}

pub fn boot_payload(rig: &str, agents: &[&str]) -> Payload {
    to_payload(json!({ "rig": rig, "agents": agents }))
}

fn to_payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}
