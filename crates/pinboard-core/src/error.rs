use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record not found: {id}")]
    NotFound { id: String },

    #[error("Record {id} is not pinned (status: {status})")]
    InvalidState { id: String, status: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("bd not installed: install beads-cli or set PINBOARD_BD")]
    NotInstalled,

    #[error("Not a beads repository (no .beads directory found)")]
    NotARepo,

    #[error("Beads sync conflict")]
    SyncConflict,

    #[error("bd {args}: {stderr}")]
    Command { args: String, stderr: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Wrap an error with the operation that produced it.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error beneath any `Context` layers.
    pub fn root(&self) -> &CoreError {
        let mut err = self;
        while let Self::Context { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }
}

/// Attach operation context to the error side of a result.
pub(crate) trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T, CoreError>;
}

impl<T> ResultExt<T> for Result<T, CoreError> {
    fn context(self, context: &str) -> Result<T, CoreError> {
        self.map_err(|e| e.context(context))
    }
}
