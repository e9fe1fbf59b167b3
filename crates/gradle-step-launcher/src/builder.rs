//! The Gradle build step.

use std::path::{Path, PathBuf};

use gradle_step_bridge::{BlockingResultHandler, ResultError};
use gradle_step_config::StepConfig;
use tracing::info;

use crate::connector::GradleConnector;
use crate::error::LauncherError;
use crate::log::BuildLog;

/// Runs one configured Gradle invocation inside a build workspace.
#[derive(Debug, Clone)]
pub struct GradleBuilder {
    config: StepConfig,
}

impl GradleBuilder {
    /// Create a build step from its configuration.
    pub fn new(config: StepConfig) -> Self {
        Self { config }
    }

    /// The configuration this step runs with.
    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// The directory Gradle is run in: the workspace, or the configured root
    /// build script directory inside it.
    pub fn project_dir(&self, workspace: &Path) -> PathBuf {
        match self.config.step.root_build_script_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => workspace.join(dir.trim()),
            _ => workspace.to_path_buf(),
        }
    }

    /// A connector for `workspace` with the configured distribution chosen.
    ///
    /// # Errors
    /// Returns an error if the wrapper is not used and no configured
    /// installation is selected.
    pub fn connector(&self, workspace: &Path) -> Result<GradleConnector, LauncherError> {
        let connector = GradleConnector::new().for_project_directory(&self.project_dir(workspace));
        if self.config.step.use_wrapper {
            return Ok(connector.use_wrapper());
        }
        let installation = self.config.select_installation()?;
        Ok(connector.use_installation(&installation.home))
    }

    /// Run the build and block until it finishes.
    ///
    /// # Errors
    /// Returns an error if the project cannot be connected, the build fails,
    /// or the build log cannot be written.
    pub fn perform(&self, workspace: &Path, log: &BuildLog) -> Result<(), LauncherError> {
        self.perform_with(workspace, log, &BlockingResultHandler::new())
    }

    /// Like [`perform`](Self::perform), reporting through a caller-supplied
    /// handler so the caller can interrupt the wait via
    /// [`BlockingResultHandler::interrupt_handle`].
    ///
    /// `handler` must be fresh: one that already holds or has handed out a
    /// result is rejected before anything is started. An interrupted wait
    /// returns an error; the build itself keeps running.
    ///
    /// # Errors
    /// Same as [`perform`](Self::perform), plus an interrupted wait and
    /// [`ResultError::AlreadySettled`] for a used handler.
    pub fn perform_with(
        &self,
        workspace: &Path,
        log: &BuildLog,
        handler: &BlockingResultHandler<()>,
    ) -> Result<(), LauncherError> {
        if handler.is_settled() {
            return Err(ResultError::AlreadySettled.into());
        }

        let step = &self.config.step;
        if let Some(description) = step.description.as_deref() {
            log.message(description)
                .map_err(|source| LauncherError::Log { source })?;
        }

        let connection = self.connector(workspace)?.connect()?;
        let tasks = step.task_list();
        info!(
            project = %connection.project_dir().display(),
            "running Gradle tasks [{}]",
            tasks.join(", ")
        );

        let mut launcher = connection
            .new_build()
            .for_tasks(&tasks)
            .with_arguments(&step.switch_list())
            .set_standard_output(log.clone())
            .set_standard_error(log.clone());
        if let Some(build_file) = step.build_file.as_deref() {
            launcher = launcher.build_file(build_file);
        }

        launcher.run(handler.clone());
        handler.get_result()?;

        info!("Gradle build finished");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gradle_step_config::Step;

    fn config(step: Step) -> StepConfig {
        StepConfig {
            step,
            installations: Vec::new(),
        }
    }

    #[test]
    fn project_dir_defaults_to_workspace() {
        let builder = GradleBuilder::new(StepConfig::default());
        assert_eq!(builder.project_dir(Path::new("/ws")), PathBuf::from("/ws"));
    }

    #[test]
    fn project_dir_uses_root_build_script_dir() {
        let builder = GradleBuilder::new(config(Step {
            root_build_script_dir: Some("app".to_owned()),
            ..Step::default()
        }));
        assert_eq!(builder.project_dir(Path::new("/ws")), PathBuf::from("/ws/app"));
    }

    #[test]
    fn blank_root_build_script_dir_is_ignored() {
        let builder = GradleBuilder::new(config(Step {
            root_build_script_dir: Some("  ".to_owned()),
            ..Step::default()
        }));
        assert_eq!(builder.project_dir(Path::new("/ws")), PathBuf::from("/ws"));
    }

    #[test]
    fn connector_requires_installation_without_wrapper() {
        let builder = GradleBuilder::new(StepConfig::default());
        let err = builder.connector(Path::new("/ws")).unwrap_err();
        assert!(matches!(err, LauncherError::Config(_)));
    }

    #[cfg(unix)]
    mod process {
        use super::config;
        use crate::builder::GradleBuilder;
        use crate::error::LauncherError;
        use crate::log::BuildLog;
        use crate::testutil::{write_script, Capture};
        use gradle_step_bridge::{BlockingResultHandler, Cause, ConnectionError, ResultError};
        use gradle_step_config::{Installation, Step, StepConfig};
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        const ECHO_ARGS: &str = "echo \"gradle $*\"";

        #[test]
        fn wrapper_build_logs_description_and_output() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("gradlew"), ECHO_ARGS);
            let capture = Capture::default();

            let builder = GradleBuilder::new(config(Step {
                description: Some("Compile everything".to_owned()),
                switches: Some("--info".to_owned()),
                tasks: Some("clean,build".to_owned()),
                use_wrapper: true,
                ..Step::default()
            }));
            builder
                .perform(ws.path(), &BuildLog::new(capture.clone()))
                .unwrap();

            assert_eq!(
                capture.contents(),
                "Compile everything\ngradle --info clean build\n"
            );
        }

        #[test]
        fn installation_build_with_build_file() {
            let ws = tempfile::tempdir().unwrap();
            let home = ws.path().join("gradle-8");
            write_script(&home.join("bin").join("gradle"), ECHO_ARGS);
            let capture = Capture::default();

            let builder = GradleBuilder::new(StepConfig {
                step: Step {
                    tasks: Some("test".to_owned()),
                    build_file: Some("ci.gradle".to_owned()),
                    gradle_name: Some("gradle-8".to_owned()),
                    ..Step::default()
                },
                installations: vec![Installation {
                    name: "gradle-8".to_owned(),
                    home,
                }],
            });
            builder
                .perform(ws.path(), &BuildLog::new(capture.clone()))
                .unwrap();

            assert_eq!(capture.contents(), "gradle --build-file ci.gradle test\n");
        }

        #[test]
        fn build_runs_in_root_build_script_dir() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("app").join("gradlew"), "pwd");
            let capture = Capture::default();

            let builder = GradleBuilder::new(config(Step {
                root_build_script_dir: Some("app".to_owned()),
                use_wrapper: true,
                ..Step::default()
            }));
            builder
                .perform(ws.path(), &BuildLog::new(capture.clone()))
                .unwrap();

            assert!(capture.contents().trim_end().ends_with("app"));
        }

        #[test]
        fn failing_build_propagates() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("gradlew"), "exit 1");

            let builder = GradleBuilder::new(config(Step {
                use_wrapper: true,
                ..Step::default()
            }));
            let err = builder
                .perform(ws.path(), &BuildLog::new(Capture::default()))
                .unwrap_err();

            assert!(matches!(
                err,
                LauncherError::Result(ResultError::Failed {
                    source: Cause::Remote(ConnectionError::BuildFailed { exit_code: 1 })
                })
            ));
        }

        #[test]
        fn interrupt_ends_wait_on_running_build() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("gradlew"), "sleep 2");
            let workspace = ws.path().to_path_buf();

            let handler = BlockingResultHandler::<()>::new();
            let interrupt = handler.interrupt_handle();
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let builder = GradleBuilder::new(config(Step {
                    use_wrapper: true,
                    ..Step::default()
                }));
                let result =
                    builder.perform_with(&workspace, &BuildLog::new(Capture::default()), &handler);
                let _ = tx.send(result);
            });

            thread::sleep(Duration::from_millis(100));
            interrupt.interrupt();

            let err = rx
                .recv_timeout(Duration::from_secs(1))
                .unwrap()
                .unwrap_err();
            assert!(matches!(err, LauncherError::Result(ref e) if e.is_interrupted()));
        }

        #[test]
        fn settled_handler_is_rejected_before_build_starts() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("gradlew"), "touch ran; exit 1");
            let builder = GradleBuilder::new(config(Step {
                use_wrapper: true,
                ..Step::default()
            }));

            let handler = BlockingResultHandler::<()>::new();
            handler.complete(()).unwrap();
            let err = builder
                .perform_with(ws.path(), &BuildLog::new(Capture::default()), &handler)
                .unwrap_err();
            assert!(matches!(
                err,
                LauncherError::Result(ResultError::AlreadySettled)
            ));

            thread::sleep(Duration::from_millis(200));
            assert!(!ws.path().join("ran").exists());
        }

        #[test]
        fn read_handler_is_rejected_before_build_starts() {
            let ws = tempfile::tempdir().unwrap();
            write_script(&ws.path().join("gradlew"), "touch ran; exit 1");
            let builder = GradleBuilder::new(config(Step {
                use_wrapper: true,
                ..Step::default()
            }));

            let handler = BlockingResultHandler::<()>::new();
            handler.complete(()).unwrap();
            handler.get_result().unwrap();
            let err = builder
                .perform_with(ws.path(), &BuildLog::new(Capture::default()), &handler)
                .unwrap_err();
            assert!(matches!(
                err,
                LauncherError::Result(ResultError::AlreadySettled)
            ));

            thread::sleep(Duration::from_millis(200));
            assert!(!ws.path().join("ran").exists());
        }
    }
}
