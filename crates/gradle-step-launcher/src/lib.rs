#![forbid(unsafe_code)]
//! Gradle connection, build launching, and the Gradle build step.

pub mod builder;
pub mod connector;
pub mod error;
pub mod launcher;
pub mod log;

pub use builder::GradleBuilder;
pub use connector::{Distribution, GradleConnector, ProjectConnection};
pub use error::LauncherError;
pub use launcher::BuildLauncher;
pub use log::BuildLog;

#[cfg(test)]
mod testutil;
