use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

/// Serialized appends of JSON lines to a log file.
///
/// Each append holds the in-process lock and an exclusive advisory file
/// lock across open, write and close, so concurrent writers never
/// interleave bytes within a line.
#[derive(Debug, Default)]
pub(crate) struct LineAppender {
    lock: Mutex<()>,
}

impl LineAppender {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CoreError> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        fs2::FileExt::lock_exclusive(&file).map_err(CoreError::Io)?;
        (&file).write_all(&line)?;
        fs2::FileExt::unlock(&file).map_err(CoreError::Io)?;
        Ok(())
    }
}

/// Read every parseable line of a JSONL file. A missing file reads as empty.
pub(crate) fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Skipping unparseable line in {}: {e}", path.display()),
        }
    }
    Ok(entries)
}
