//! Parse and validate `gradle-step.toml` build-step configuration.

pub mod step;

pub use step::{ConfigError, Installation, Step, StepConfig};
