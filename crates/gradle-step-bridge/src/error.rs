//! Error types for gradle-step-bridge.

/// A failure reported by an asynchronous build operation.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The build process could not be started.
    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The build ran and exited unsuccessfully.
    #[error("build failed with exit code {exit_code}")]
    BuildFailed { exit_code: i32 },

    /// The exit status of the build process could not be collected.
    #[error("cannot wait for the build process: {source}")]
    Wait { source: std::io::Error },

    /// The build process was killed before it could exit.
    #[error("build process was terminated by a signal")]
    Terminated,

    /// Build output could not be read or forwarded to the log.
    #[error("cannot forward build output: {source}")]
    Output { source: std::io::Error },

    /// Any other failure the operation chose to report.
    #[error("{message}")]
    Failed { message: String },
}

/// Why a wait for a build result ended without a value.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// The operation itself reported failure.
    #[error("{0}")]
    Remote(#[from] ConnectionError),

    /// The waiter was interrupted before a result arrived.
    #[error("interrupted while waiting for the build result")]
    Interrupted,
}

/// Errors surfaced by [`BlockingResultHandler`](crate::BlockingResultHandler).
#[derive(Debug, thiserror::Error)]
pub enum ResultError {
    /// The operation failed, or the wait was interrupted. Both are reported
    /// the same way; inspect `source` to tell them apart.
    #[error("build did not complete: {source}")]
    Failed { source: Cause },

    /// The delivered value is not of the type the handler was created for.
    #[error("build result is not a {expected}")]
    TypeMismatch { expected: &'static str },

    /// A second completion was delivered to a handler that already has one.
    #[error("build result was already delivered; a result handler accepts a single completion")]
    AlreadySettled,

    /// The result was already read out of the handler.
    #[error("build result was already taken; a result handler can be read once")]
    AlreadyTaken,
}

impl ResultError {
    /// Whether this error came from an interrupted wait rather than the operation.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            ResultError::Failed {
                source: Cause::Interrupted
            }
        )
    }
}
