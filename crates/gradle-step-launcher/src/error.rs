//! Error types for gradle-step-launcher.

use std::path::PathBuf;

/// Errors produced while connecting to a project or running a build step.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// No project directory was given to the connector.
    #[error("no project directory set; call `for_project_directory` before connecting")]
    NoProjectDir,

    /// The project directory does not exist or is not a directory.
    #[error("project directory {path} does not exist")]
    ProjectDirMissing { path: PathBuf },

    /// Neither an installation nor the wrapper was chosen.
    #[error("no Gradle distribution chosen; select an installation or use the wrapper")]
    NoDistribution,

    /// The Gradle executable is missing from the chosen distribution.
    #[error("Gradle executable not found at {path}")]
    ExecutableMissing { path: PathBuf },

    /// The Gradle executable exists but cannot be run.
    #[error("Gradle found at {path} but is not executable; check file permissions")]
    NotExecutable { path: PathBuf },

    /// The build log could not be written.
    #[error("cannot write to the build log: {source}")]
    Log { source: std::io::Error },

    /// The step configuration is incomplete.
    #[error("{0}")]
    Config(#[from] gradle_step_config::ConfigError),

    /// The build failed or the wait for it was interrupted.
    #[error("{0}")]
    Result(#[from] gradle_step_bridge::ResultError),
}
