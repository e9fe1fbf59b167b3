#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use gradle_step_config::{Installation, StepConfig};
use gradle_step_launcher::{BuildLog, GradleBuilder};
use gradle_step_reporters::{JavadocArchiver, MojoInfo};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn Error>>;

/// Name given to the installation passed with `--gradle-home`.
const COMMAND_LINE_INSTALLATION: &str = "command-line";

#[derive(Debug, Parser)]
#[command(name = "gradle-step", about = "Run Gradle as a build step")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a Gradle build step
    Run(RunArgs),
    /// Show which Javadoc archiver records a Maven mojo
    Javadoc {
        /// Mojo as groupId:artifactId:goal
        mojo: String,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Step configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Build workspace (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,
    /// Tasks to run, separated by spaces or commas
    #[arg(long)]
    tasks: Option<String>,
    /// Extra Gradle switches
    #[arg(long, allow_hyphen_values = true)]
    switches: Option<String>,
    /// Gradle installation to run
    #[arg(long, conflicts_with = "wrapper")]
    gradle_home: Option<PathBuf>,
    /// Run the project's gradlew
    #[arg(long)]
    wrapper: bool,
    /// Build file to use instead of the default
    #[arg(long)]
    build_file: Option<String>,
    /// Root build script directory, relative to the workspace
    #[arg(long)]
    root_dir: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => cmd_run(&args),
        Command::Javadoc { mojo } => cmd_javadoc(&mojo),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(args: &RunArgs) -> CliResult {
    let workspace = match &args.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = step_config(args, &workspace)?;
    debug!(workspace = %workspace.display(), ?config, "loaded step configuration");

    GradleBuilder::new(config).perform(&workspace, &BuildLog::stdout())?;
    Ok(())
}

/// Load the step configuration and apply command line overrides.
///
/// Without `--config`, `gradle-step.toml` in the workspace is used if present.
fn step_config(args: &RunArgs, workspace: &Path) -> Result<StepConfig, Box<dyn Error>> {
    let default_path = workspace.join("gradle-step.toml");
    let mut config = match &args.config {
        Some(path) => StepConfig::from_path(path)?,
        None if default_path.is_file() => StepConfig::from_path(&default_path)?,
        None => StepConfig::default(),
    };

    let step = &mut config.step;
    if let Some(tasks) = &args.tasks {
        step.tasks = Some(tasks.clone());
    }
    if let Some(switches) = &args.switches {
        step.switches = Some(switches.clone());
    }
    if let Some(build_file) = &args.build_file {
        step.build_file = Some(build_file.clone());
    }
    if let Some(root_dir) = &args.root_dir {
        step.root_build_script_dir = Some(root_dir.clone());
    }
    if args.wrapper {
        step.use_wrapper = true;
    }
    if let Some(home) = &args.gradle_home {
        step.use_wrapper = false;
        step.gradle_name = Some(COMMAND_LINE_INSTALLATION.to_owned());
        config
            .installations
            .retain(|i| i.name != COMMAND_LINE_INSTALLATION);
        config.installations.push(Installation {
            name: COMMAND_LINE_INSTALLATION.to_owned(),
            home: home.clone(),
        });
    }

    Ok(config)
}

fn cmd_javadoc(mojo: &str) -> CliResult {
    let mojo: MojoInfo = mojo.parse()?;
    match JavadocArchiver::for_mojo(&mojo) {
        Some(archiver) => {
            let action = archiver.project_action();
            println!("{}: {mojo}", archiver.display_name());
            println!("  archived to: {}", archiver.archive_target_path());
            println!("  published as: {} (/{})", action.title, action.url_name);
        }
        None => println!("{mojo} does not produce Javadoc"),
    }
    Ok(())
}
