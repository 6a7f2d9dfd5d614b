//! Error types for Alice

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Alice operations
pub type AliceResult<T> = Result<T, AliceError>;

/// Main error type for Alice
#[derive(Error, Debug)]
pub enum AliceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred while {action} {}: {source}", path.display())]
    FileOperation {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("You need to run this program as administrator (root) to {0}.")]
    NotElevated(&'static str),

    #[error("Invalid argument count for '{command}': expected {expected}, got {given}.")]
    ArgumentCount {
        command: &'static str,
        expected: String,
        given: usize,
    },

    #[error("The installPath {} is not empty. Installation canceled.", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("{0} is not available. Please install it and try again.")]
    ToolUnavailable(String),

    #[error("Invalid language '{0}'.")]
    InvalidLanguage(String),

    #[error("The project path {} does not exist, build canceled.", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("The project path {} is empty, build canceled.", .0.display())]
    ProjectEmpty(PathBuf),

    #[error("The project {} is not a valid project.", .0.display())]
    InvalidProject(PathBuf),

    #[error("Could not start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("An error occurred while cloning the repository {url}.")]
    CloneFailed { url: String },

    #[error("The following error occurred while building the docker image:\n{output}")]
    BuildFailed { output: String, command: String },

    #[error("The following error occurred while pushing the docker image:\n{output}")]
    PushFailed { output: String, command: String },

    #[error("Access to the machine PATH was denied: {0}")]
    PathAccessDenied(String),

    #[error("Could not update the machine PATH: {0}")]
    PathUpdate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User input error: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

impl From<dialoguer::Error> for AliceError {
    fn from(err: dialoguer::Error) -> Self {
        AliceError::Prompt(err.to_string())
    }
}

impl AliceError {
    /// Create a generic error from a string
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AliceError::Other(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AliceError::Config(msg.into())
    }

    /// Wrap an I/O error with the operation and path it happened on
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AliceError::FileOperation {
            action,
            path: path.into(),
            source,
        }
    }

    /// Guidance printed below the error message, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            AliceError::NotElevated(_) | AliceError::PathAccessDenied(_) => Some(
                "Re-run from an administrator terminal (Windows) or as root (sudo -E alice ...)."
                    .to_string(),
            ),
            AliceError::ArgumentCount { command, .. } => {
                Some(format!("Try \"alice help {}\" first.", command))
            }
            AliceError::InvalidLanguage(_) => {
                Some("Try \"alice help create\" first.".to_string())
            }
            AliceError::BuildFailed { command, .. } => Some(format!(
                "Try building manually using this command:\n  {}",
                command
            )),
            AliceError::PushFailed { command, .. } => Some(format!(
                "Have you logged in? Run \"docker login\" and retry with:\n  {}",
                command
            )),
            _ => None,
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AliceError::NotElevated(_)
            | AliceError::ArgumentCount { .. }
            | AliceError::DirectoryNotEmpty(_)
            | AliceError::ToolUnavailable(_)
            | AliceError::InvalidLanguage(_)
            | AliceError::ProjectNotFound(_)
            | AliceError::ProjectEmpty(_)
            | AliceError::InvalidProject(_) => 2,
            AliceError::Spawn { .. }
            | AliceError::CloneFailed { .. }
            | AliceError::BuildFailed { .. }
            | AliceError::PushFailed { .. } => 3,
            AliceError::PathAccessDenied(_) => 4,
            _ => 1,
        }
    }
}
