#![forbid(unsafe_code)]
//! Turns the callback-style completion of a build run into a blocking call.

pub mod error;
pub mod handler;

pub use error::{Cause, ConnectionError, ResultError};
pub use handler::{BlockingResultHandler, InterruptHandle, ResultHandler};
