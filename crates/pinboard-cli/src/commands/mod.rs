pub mod attach;
pub mod attachment;
pub mod audit;
pub mod detach;
pub mod event;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Subcommand;
use pinboard_core::model::{EventType, Payload};
use pinboard_core::{workspace, AuditTrail, BdStore, EventLog, PinboardConfig};

#[derive(Subcommand)]
pub enum Commands {
    /// Attach a molecule to a pinned record
    Attach(attach::AttachArgs),
    /// Detach the molecule from a pinned record (audited)
    Detach(detach::DetachArgs),
    /// Show what is attached to a pinned record
    Attachment(attachment::AttachmentArgs),
    /// Append an activity event to the town events log
    Event(event::EventArgs),
    /// Print the workspace audit trail
    Audit,
}

/// Everything a command needs to reach the store and the logs.
pub struct Context {
    pub dir: PathBuf,
    pub config: PinboardConfig,
}

impl Context {
    pub fn load(dir: &Path) -> Result<Self> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Cannot access directory {}", dir.display()))?;
        Ok(Self {
            dir,
            config: PinboardConfig::load(),
        })
    }

    pub fn store(&self) -> BdStore {
        BdStore::new(&self.dir, &self.config)
    }

    pub fn audit_trail(&self) -> AuditTrail {
        AuditTrail::for_workspace(&self.dir, &self.config)
    }

    /// Events log rooted at the town enclosing `dir`, if any.
    pub fn event_log(&self) -> EventLog {
        let dir = self.dir.clone();
        let marker = self.config.town_marker.clone();
        EventLog::with_resolver(&self.config, move || {
            workspace::find_town_root(&dir, &marker)
        })
    }

    /// Best-effort activity logging for commands whose real work already
    /// succeeded.
    pub fn log_activity(&self, event_type: EventType, actor: &str, payload: Payload) {
        if let Err(e) = self.event_log().log_feed(event_type, actor, payload) {
            tracing::warn!("Failed to log {event_type} event: {e}");
        }
    }
}
