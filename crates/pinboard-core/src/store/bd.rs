use std::path::{Path, PathBuf};
use std::process::Command;

use serde::de::DeserializeOwned;

use super::{CreateOptions, ListOptions, RecordStore, UpdateOptions};
use crate::config::PinboardConfig;
use crate::error::{CoreError, ResultExt};
use crate::model::Record;

/// Record store backed by the `bd` command-line tool, run in a working
/// directory.
#[derive(Debug, Clone)]
pub struct BdStore {
    program: String,
    workdir: PathBuf,
}

impl BdStore {
    pub fn new(workdir: impl Into<PathBuf>, config: &PinboardConfig) -> Self {
        Self {
            program: config.bd_program.clone(),
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[String]) -> Result<Vec<u8>, CoreError> {
        tracing::debug!("Running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CoreError::NotInstalled,
                _ => CoreError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr, args, output.status.code()));
        }
        Ok(output.stdout)
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[String], what: &str) -> Result<T, CoreError> {
        let out = self.run(args)?;
        serde_json::from_slice(&out)
            .map_err(CoreError::from)
            .context(&format!("parsing bd {what} output"))
    }
}

/// Map a failed `bd` invocation to the most specific error its stderr allows.
pub(crate) fn classify_failure(stderr: &str, args: &[String], code: Option<i32>) -> CoreError {
    let stderr = stderr.trim();

    if stderr.contains("not a beads repository")
        || stderr.contains("No .beads directory")
        || (stderr.contains(".beads") && stderr.contains("not found"))
    {
        return CoreError::NotARepo;
    }
    if stderr.contains("sync conflict") || stderr.contains("CONFLICT") {
        return CoreError::SyncConflict;
    }
    if stderr.contains("not found") || stderr.contains("Issue not found") {
        return CoreError::NotFound {
            id: args.get(1).cloned().unwrap_or_default(),
        };
    }

    let stderr = if stderr.is_empty() {
        match code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        stderr.to_string()
    };
    CoreError::Command {
        args: args.join(" "),
        stderr,
    }
}

pub(crate) fn list_args(opts: &ListOptions) -> Vec<String> {
    let mut args = vec!["list".to_string(), "--json".to_string()];
    if let Some(status) = &opts.status {
        args.push(format!("--status={status}"));
    }
    if let Some(kind) = &opts.issue_type {
        args.push(format!("--type={kind}"));
    }
    if let Some(priority) = opts.priority {
        args.push(format!("--priority={priority}"));
    }
    if let Some(parent) = &opts.parent {
        args.push(format!("--parent={parent}"));
    }
    if let Some(assignee) = &opts.assignee {
        args.push(format!("--assignee={assignee}"));
    }
    if opts.no_assignee {
        args.push("--no-assignee".to_string());
    }
    args
}

pub(crate) fn create_args(opts: &CreateOptions) -> Vec<String> {
    let mut args = vec!["create".to_string(), "--json".to_string()];
    if !opts.title.is_empty() {
        args.push(format!("--title={}", opts.title));
    }
    if let Some(kind) = &opts.issue_type {
        args.push(format!("--type={kind}"));
    }
    if let Some(priority) = opts.priority {
        args.push(format!("--priority={priority}"));
    }
    if let Some(description) = opts.description.as_deref().filter(|d| !d.is_empty()) {
        args.push(format!("--description={description}"));
    }
    if let Some(parent) = &opts.parent {
        args.push(format!("--parent={parent}"));
    }
    if let Some(actor) = &opts.actor {
        args.push(format!("--actor={actor}"));
    }
    args
}

pub(crate) fn update_args(id: &str, opts: &UpdateOptions) -> Vec<String> {
    let mut args = vec!["update".to_string(), id.to_string()];
    if let Some(title) = &opts.title {
        args.push(format!("--title={title}"));
    }
    if let Some(status) = &opts.status {
        args.push(format!("--status={status}"));
    }
    if let Some(priority) = opts.priority {
        args.push(format!("--priority={priority}"));
    }
    if let Some(description) = &opts.description {
        args.push(format!("--description={description}"));
    }
    if let Some(assignee) = &opts.assignee {
        args.push(format!("--assignee={assignee}"));
    }
    if !opts.set_labels.is_empty() {
        args.extend(opts.set_labels.iter().map(|l| format!("--set-labels={l}")));
    } else {
        args.extend(opts.add_labels.iter().map(|l| format!("--add-label={l}")));
        args.extend(opts.remove_labels.iter().map(|l| format!("--remove-label={l}")));
    }
    args
}

pub(crate) fn close_args(ids: &[String], reason: Option<&str>) -> Vec<String> {
    let mut args = vec!["close".to_string()];
    args.extend(ids.iter().cloned());
    if let Some(reason) = reason {
        args.push(format!("--reason={reason}"));
    }
    args
}

impl RecordStore for BdStore {
    fn get(&self, id: &str) -> Result<Record, CoreError> {
        let args = vec!["show".to_string(), id.to_string(), "--json".to_string()];
        // `bd show --json` answers with a one-element array.
        let records: Vec<Record> = self.run_json(&args, "show")?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }

    fn list(&self, opts: &ListOptions) -> Result<Vec<Record>, CoreError> {
        self.run_json(&list_args(opts), "list")
    }

    fn create(&self, opts: &CreateOptions) -> Result<Record, CoreError> {
        self.run_json(&create_args(opts), "create")
    }

    fn update(&self, id: &str, opts: &UpdateOptions) -> Result<(), CoreError> {
        self.run(&update_args(id, opts)).map(|_| ())
    }

    fn close(&self, ids: &[String], reason: Option<&str>) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.run(&close_args(ids, reason)).map(|_| ())
    }
}
