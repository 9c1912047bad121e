use crate::command::ExitCode;
use std::io;

/// Failures surfaced by the plugin to its host.
#[derive(Debug, thiserror::Error)]
pub enum StackxError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("`{program}` was not found in PATH")]
    DelegateNotFound { program: String },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument {0:?}: not valid UTF-8")]
    InvalidArgument(String),

    #[error("`{program}` exited with status {code}")]
    DelegateExecutionFailure { program: String, code: ExitCode },

    #[error("failed to write plugin metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl StackxError {
    /// Exit status the process should terminate with for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            StackxError::DelegateExecutionFailure { code, .. } => *code,
            _ => 1,
        }
    }

    /// Whether the message still needs printing. A failing delegate has
    /// already reported on the shared stderr.
    pub fn is_reported(&self) -> bool {
        matches!(self, StackxError::DelegateExecutionFailure { .. })
    }
}
