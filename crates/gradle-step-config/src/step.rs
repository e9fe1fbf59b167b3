use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The `gradle-step.toml` build-step configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub step: Step,
    #[serde(default, rename = "installation", skip_serializing_if = "Vec::is_empty")]
    pub installations: Vec<Installation>,
}

/// One Gradle invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Shown in the build log before the invocation starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra command line switches, separated by whitespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switches: Option<String>,
    /// Tasks to run, separated by spaces or commas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<String>,
    /// Directory of the root build script, relative to the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_build_script_dir: Option<String>,
    /// Build file to use instead of the default one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_file: Option<String>,
    /// Name of the configured installation to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradle_name: Option<String>,
    /// Run the project's `gradlew` instead of an installation.
    #[serde(default)]
    pub use_wrapper: bool,
}

/// A named Gradle installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub name: String,
    pub home: PathBuf,
}

impl Step {
    /// The configured tasks, split on spaces and commas.
    pub fn task_list(&self) -> Vec<String> {
        self.tasks
            .as_deref()
            .map(split_tasks)
            .unwrap_or_default()
    }

    /// The configured switches, split on whitespace.
    pub fn switch_list(&self) -> Vec<String> {
        self.switches
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

/// Split a task string such as `"clean, build test"` into task names.
pub fn split_tasks(tasks: &str) -> Vec<String> {
    tasks
        .split([' ', ','])
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

impl StepConfig {
    /// Read and parse a `gradle-step.toml` from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parse configuration text. `origin` names the source in error messages.
    ///
    /// # Errors
    /// Returns an error if `content` is not valid configuration TOML.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_owned(),
            source: e,
        })
    }

    /// The installation named by `step.gradle_name`.
    ///
    /// # Errors
    /// Returns an error if no name is set or no installation has that name.
    pub fn select_installation(&self) -> Result<&Installation, ConfigError> {
        let Some(name) = self.step.gradle_name.as_deref() else {
            return Err(ConfigError::NoInstallationSelected);
        };
        self.installations
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| ConfigError::UnknownInstallation {
                name: name.to_owned(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid gradle-step.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("no Gradle installation selected; set `gradle_name` or `use_wrapper = true`")]
    NoInstallationSelected,
    #[error("no Gradle installation named \"{name}\"; add an [[installation]] entry for it")]
    UnknownInstallation { name: String },
}
