//! Error types for model invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Failures at the external-model boundary. None of these are retried.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Control parameters out of range
    #[error("Invalid control parameters: {0}")]
    InvalidControl(String),

    /// The model executable could not be found
    #[error("Model executable not found: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    /// The executable exists but could not be started
    #[error("Failed to start {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model ran and reported failure
    #[error("Model exited with {}: {stderr}", exit_code_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The model did not finish within the configured timeout
    #[error("Model timed out after {0} seconds")]
    TimedOut(u64),

    /// The model exited successfully but left no trajectory dump
    #[error("Model produced no output file at {}", .0.display())]
    MissingOutput(PathBuf),

    /// File I/O error around the run (control file, output file)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl RunnerError {
    /// True for errors caused by the caller's parameters rather than the model.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RunnerError::InvalidControl(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_exit_message() {
        let err = RunnerError::NonZeroExit {
            code: Some(2),
            stderr: "missing met file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status 2"));
        assert!(msg.contains("missing met file"));
    }

    #[test]
    fn test_signal_exit_message() {
        let err = RunnerError::NonZeroExit {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(RunnerError::InvalidControl("lat".to_string()).is_invalid_input());
        assert!(!RunnerError::TimedOut(5).is_invalid_input());
    }
}
