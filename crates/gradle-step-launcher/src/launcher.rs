//! Running a build and reporting its result through a [`ResultHandler`].

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use gradle_step_bridge::{ConnectionError, ResultHandler};
use tracing::{debug, info};

use crate::log::BuildLog;

/// Builder for one build invocation in a connected project.
///
/// Created by [`ProjectConnection::new_build`](crate::ProjectConnection::new_build).
#[derive(Debug)]
pub struct BuildLauncher {
    executable: PathBuf,
    project_dir: PathBuf,
    tasks: Vec<String>,
    arguments: Vec<String>,
    build_file: Option<String>,
    stdout: Option<BuildLog>,
    stderr: Option<BuildLog>,
}

impl BuildLauncher {
    pub(crate) fn new(executable: &Path, project_dir: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            project_dir: project_dir.to_path_buf(),
            tasks: Vec::new(),
            arguments: Vec::new(),
            build_file: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Set the tasks to run. With no tasks Gradle runs the project defaults.
    pub fn for_tasks(mut self, tasks: &[String]) -> Self {
        self.tasks = tasks.to_vec();
        self
    }

    /// Set extra command line arguments, passed before the tasks.
    pub fn with_arguments(mut self, arguments: &[String]) -> Self {
        self.arguments = arguments.to_vec();
        self
    }

    /// Use a build file other than the project default.
    pub fn build_file(mut self, path: &str) -> Self {
        self.build_file = Some(path.to_owned());
        self
    }

    /// Forward the build's standard output to `log`. Discarded when unset.
    pub fn set_standard_output(mut self, log: BuildLog) -> Self {
        self.stdout = Some(log);
        self
    }

    /// Forward the build's standard error to `log`. Discarded when unset.
    pub fn set_standard_error(mut self, log: BuildLog) -> Self {
        self.stderr = Some(log);
        self
    }

    /// The argument list the executable will be started with.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.arguments.clone();

        if let Some(build_file) = &self.build_file {
            args.push("--build-file".to_owned());
            args.push(build_file.clone());
        }

        args.extend(self.tasks.iter().cloned());
        args
    }

    /// Start the build on a background thread and return immediately.
    ///
    /// `handler` receives exactly one call once the build has exited and its
    /// output has been forwarded: `on_complete(())` if it succeeded,
    /// `on_failure` otherwise.
    pub fn run<H>(self, handler: H) -> JoinHandle<()>
    where
        H: ResultHandler<()> + 'static,
    {
        thread::spawn(move || match self.execute() {
            Ok(()) => handler.on_complete(()),
            Err(failure) => handler.on_failure(failure),
        })
    }

    fn execute(&self) -> Result<(), ConnectionError> {
        let args = self.build_args();
        info!(
            executable = %self.executable.display(),
            project = %self.project_dir.display(),
            "starting Gradle: {}",
            args.join(" ")
        );

        let mut child = Command::new(&self.executable)
            .args(&args)
            .current_dir(&self.project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConnectionError::Spawn {
                program: self.executable.display().to_string(),
                source,
            })?;

        let pumps = [
            child.stdout.take().map(|out| pump(out, self.stdout.clone())),
            child.stderr.take().map(|err| pump(err, self.stderr.clone())),
        ];

        let status = child
            .wait()
            .map_err(|source| ConnectionError::Wait { source })?;

        // Drain output before reporting, so everything the build printed is
        // in the log when the waiter wakes up.
        for pump in pumps.into_iter().flatten() {
            pump.join()
                .map_err(|_| ConnectionError::Failed {
                    message: "build output forwarding thread panicked".to_owned(),
                })?
                .map_err(|source| ConnectionError::Output { source })?;
        }

        check_status(status)
    }
}

fn check_status(status: ExitStatus) -> Result<(), ConnectionError> {
    if status.success() {
        debug!("Gradle exited successfully");
        return Ok(());
    }
    match status.code() {
        Some(exit_code) => Err(ConnectionError::BuildFailed { exit_code }),
        None => Err(ConnectionError::Terminated),
    }
}

/// Copy `reader` line by line into `log` until end of stream.
fn pump<R>(reader: R, log: Option<BuildLog>) -> JoinHandle<io::Result<()>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            if let Some(log) = &log {
                log.write_line(&line)?;
            }
        }
    })
}
