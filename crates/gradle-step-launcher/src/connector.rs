//! Connecting to a Gradle project.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LauncherError;
use crate::launcher::BuildLauncher;

/// Which Gradle to run a project with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// An installation rooted at the given home directory.
    Installation(PathBuf),
    /// The project's own wrapper script.
    Wrapper,
}

impl Distribution {
    /// The Gradle executable this distribution provides for `project_dir`.
    pub fn executable(&self, project_dir: &Path) -> PathBuf {
        match self {
            Distribution::Installation(home) => home.join("bin").join(script_name("gradle")),
            Distribution::Wrapper => project_dir.join(script_name("gradlew")),
        }
    }
}

fn script_name(base: &str) -> String {
    if cfg!(windows) {
        format!("{base}.bat")
    } else {
        base.to_owned()
    }
}

/// Builder for a [`ProjectConnection`].
#[derive(Debug, Default)]
pub struct GradleConnector {
    project_dir: Option<PathBuf>,
    distribution: Option<Distribution>,
}

impl GradleConnector {
    /// Create a connector with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory of the project to build.
    pub fn for_project_directory(mut self, dir: &Path) -> Self {
        self.project_dir = Some(dir.to_path_buf());
        self
    }

    /// Run the Gradle installation at `home`.
    pub fn use_installation(mut self, home: &Path) -> Self {
        self.distribution = Some(Distribution::Installation(home.to_path_buf()));
        self
    }

    /// Run the project's `gradlew` wrapper.
    pub fn use_wrapper(mut self) -> Self {
        self.distribution = Some(Distribution::Wrapper);
        self
    }

    /// Validate the configuration and open a connection.
    ///
    /// # Errors
    /// Returns an error if:
    /// - no project directory is set, or it does not exist
    /// - no distribution is chosen
    /// - the distribution's executable is missing or not executable
    pub fn connect(self) -> Result<ProjectConnection, LauncherError> {
        let project_dir = self.project_dir.ok_or(LauncherError::NoProjectDir)?;
        if !project_dir.is_dir() {
            return Err(LauncherError::ProjectDirMissing { path: project_dir });
        }
        let distribution = self.distribution.ok_or(LauncherError::NoDistribution)?;
        let executable = distribution.executable(&project_dir);
        check_executable(&executable)?;

        debug!(
            project = %project_dir.display(),
            executable = %executable.display(),
            "connected to Gradle project"
        );
        Ok(ProjectConnection {
            project_dir,
            distribution,
            executable,
        })
    }
}

fn check_executable(path: &Path) -> Result<(), LauncherError> {
    let metadata = std::fs::metadata(path).map_err(|_| LauncherError::ExecutableMissing {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(LauncherError::ExecutableMissing {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(LauncherError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// An open connection to a Gradle project.
#[derive(Debug, Clone)]
pub struct ProjectConnection {
    project_dir: PathBuf,
    distribution: Distribution,
    executable: PathBuf,
}

impl ProjectConnection {
    /// The project root the connection was opened for.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The distribution builds are run with.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The Gradle executable builds are run with.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Start configuring a build in this project.
    pub fn new_build(&self) -> BuildLauncher {
        BuildLauncher::new(&self.executable, &self.project_dir)
    }
}
