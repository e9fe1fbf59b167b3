//! Post-build reporters that record Javadoc produced by Maven.

pub mod javadoc;
pub mod mojo;

pub use javadoc::{JavadocAction, JavadocArchiver};
pub use mojo::{MojoInfo, MojoParseError};
