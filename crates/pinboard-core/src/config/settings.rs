use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinboardConfig {
    /// Record store CLI to invoke.
    pub bd_program: String,
    /// Directory, relative to the workspace, holding the audit log.
    pub audit_dir: String,
    pub audit_file: String,
    /// Events log file name, relative to the town root.
    pub events_file: String,
    /// `source` stamped on every event.
    pub event_source: String,
    /// Path whose presence marks a directory as the town root.
    pub town_marker: String,
}

impl PinboardConfig {
    /// Read config from `PINBOARD_*` environment variables.
    pub fn load() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Read config through an arbitrary key lookup. Empty values are ignored.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default_init();
        Self {
            bd_program: get("PINBOARD_BD").unwrap_or(defaults.bd_program),
            audit_dir: get("PINBOARD_AUDIT_DIR").unwrap_or(defaults.audit_dir),
            audit_file: defaults.audit_file,
            events_file: defaults.events_file,
            event_source: get("PINBOARD_EVENT_SOURCE").unwrap_or(defaults.event_source),
            town_marker: get("PINBOARD_TOWN_MARKER").unwrap_or(defaults.town_marker),
        }
    }

    pub fn default_init() -> Self {
        Self {
            bd_program: "bd".to_string(),
            audit_dir: ".beads".to_string(),
            audit_file: "audit.log".to_string(),
            events_file: ".events.jsonl".to_string(),
            event_source: "gt".to_string(),
            town_marker: "mayor/town.json".to_string(),
        }
    }

    /// `<workspace>/<audit_dir>/<audit_file>`
    pub fn audit_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.audit_dir).join(&self.audit_file)
    }

    /// `<town_root>/<events_file>`
    pub fn events_path(&self, town_root: &Path) -> PathBuf {
        town_root.join(&self.events_file)
    }
}

impl Default for PinboardConfig {
    fn default() -> Self {
        Self::default_init()
    }
}
