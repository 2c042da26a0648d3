//! Workspace activity log.
//!
//! Events are appended to `<town_root>/.events.jsonl`. Outside a town there
//! is nowhere meaningful to write, so logging quietly does nothing.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::PinboardConfig;
use crate::error::CoreError;
use crate::jsonl::{self, LineAppender};
use crate::model::{Event, EventType, Payload, Visibility};
use crate::workspace;

type RootResolver = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Appends events for every caller in the process that shares this instance.
///
/// Share one `EventLog` (e.g. behind an `Arc`) so its lock serializes all
/// appends.
pub struct EventLog {
    resolve_root: RootResolver,
    events_file: String,
    source: String,
    appender: LineAppender,
}

impl EventLog {
    /// Resolve the town root from the current directory on every call.
    pub fn discover(config: &PinboardConfig) -> Self {
        let marker = config.town_marker.clone();
        Self::with_resolver(config, move || workspace::find_from_cwd(&marker))
    }

    /// Always log under `town_root`.
    pub fn at(town_root: impl Into<PathBuf>, config: &PinboardConfig) -> Self {
        let root = town_root.into();
        Self::with_resolver(config, move || Some(root.clone()))
    }

    pub fn with_resolver(
        config: &PinboardConfig,
        resolve_root: impl Fn() -> Option<PathBuf> + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolve_root: Box::new(resolve_root),
            events_file: config.events_file.clone(),
            source: config.event_source.clone(),
            appender: LineAppender::new(),
        }
    }

    /// The events file for the current context, if there is a town root.
    pub fn events_path(&self) -> Option<PathBuf> {
        (self.resolve_root)().map(|root| root.join(&self.events_file))
    }

    /// Append an event stamped with the current time.
    ///
    /// Returns `Ok(false)` without touching the filesystem when no town root
    /// can be resolved.
    pub fn log(
        &self,
        event_type: EventType,
        actor: &str,
        payload: Payload,
        visibility: Visibility,
    ) -> Result<bool, CoreError> {
        let Some(path) = self.events_path() else {
            tracing::debug!("No town root; dropping {event_type} event");
            return Ok(false);
        };

        let event = Event {
            timestamp: Utc::now(),
            source: self.source.clone(),
            event_type,
            actor: actor.to_string(),
            payload,
            visibility,
        };
        self.appender
            .append(&path, &event)
            .map_err(|e| e.context("writing event"))?;
        Ok(true)
    }

    pub fn log_feed(
        &self,
        event_type: EventType,
        actor: &str,
        payload: Payload,
    ) -> Result<bool, CoreError> {
        self.log(event_type, actor, payload, Visibility::Feed)
    }

    pub fn log_audit(
        &self,
        event_type: EventType,
        actor: &str,
        payload: Payload,
    ) -> Result<bool, CoreError> {
        self.log(event_type, actor, payload, Visibility::Audit)
    }
}

/// Read an events file back, skipping lines that do not parse.
pub fn read_events(path: &Path) -> Result<Vec<Event>, CoreError> {
    jsonl::read_lines(path)
}
