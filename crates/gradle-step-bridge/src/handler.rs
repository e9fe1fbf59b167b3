//! Blocking result handler for asynchronous build operations.
//!
//! A build run reports its outcome through a [`ResultHandler`] callback on a
//! thread of its own choosing. [`BlockingResultHandler`] is a handler whose
//! clones share one completion slot, so the caller can pass a clone to the
//! operation and then block on [`BlockingResultHandler::get_result`].

use std::any::{self, Any};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{Cause, ConnectionError, ResultError};

/// Receives the single completion signal of an asynchronous build operation.
///
/// The operation calls exactly one of these methods, exactly once, from any
/// thread.
pub trait ResultHandler<T>: Send {
    /// The operation finished successfully.
    fn on_complete(&self, result: T);

    /// The operation failed.
    fn on_failure(&self, failure: ConnectionError);
}

enum Outcome {
    Success(Box<dyn Any + Send>),
    Failure(ConnectionError),
}

#[derive(Default)]
enum State {
    #[default]
    Empty,
    Settled(Outcome),
    Taken,
}

#[derive(Default)]
struct Slot {
    state: State,
    interrupted: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Every critical section leaves the slot consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, outcome: Outcome) -> Result<(), ResultError> {
        let mut slot = self.lock();
        if !matches!(slot.state, State::Empty) {
            return Err(ResultError::AlreadySettled);
        }
        slot.state = State::Settled(outcome);
        drop(slot);
        self.settled.notify_all();
        Ok(())
    }
}

/// A [`ResultHandler`] that lets the caller block until the result arrives.
///
/// Clones share the same slot. The slot takes one write (`complete`, `fail`,
/// or their trait forms) and one read (`get_result`).
pub struct BlockingResultHandler<T> {
    shared: Arc<Shared>,
    result_type: PhantomData<fn() -> T>,
}

impl<T> Clone for BlockingResultHandler<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            result_type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for BlockingResultHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settled = !matches!(self.shared.lock().state, State::Empty);
        f.debug_struct("BlockingResultHandler")
            .field("result_type", &any::type_name::<T>())
            .field("settled", &settled)
            .finish()
    }
}

impl<T: Any + Send> Default for BlockingResultHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send> BlockingResultHandler<T> {
    /// Create a handler with an empty slot.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                settled: Condvar::new(),
            }),
            result_type: PhantomData,
        }
    }

    /// Record a successful result.
    ///
    /// # Errors
    /// Returns [`ResultError::AlreadySettled`] if the slot already holds an
    /// outcome; the first outcome is kept.
    pub fn complete(&self, result: T) -> Result<(), ResultError> {
        self.complete_erased(Box::new(result))
    }

    /// Record a successful result whose type is only known at runtime.
    ///
    /// The type is checked against `T` when the result is read.
    ///
    /// # Errors
    /// Returns [`ResultError::AlreadySettled`] if the slot already holds an
    /// outcome.
    pub fn complete_erased(&self, result: Box<dyn Any + Send>) -> Result<(), ResultError> {
        self.shared.settle(Outcome::Success(result))?;
        debug!(result_type = any::type_name::<T>(), "build result settled");
        Ok(())
    }

    /// Record a failure.
    ///
    /// # Errors
    /// Returns [`ResultError::AlreadySettled`] if the slot already holds an
    /// outcome.
    pub fn fail(&self, failure: ConnectionError) -> Result<(), ResultError> {
        debug!("build failure reported: {failure}");
        self.shared.settle(Outcome::Failure(failure))
    }

    /// Whether an outcome has been recorded.
    pub fn is_settled(&self) -> bool {
        !matches!(self.shared.lock().state, State::Empty)
    }

    /// A handle that interrupts a thread blocked in [`get_result`](Self::get_result).
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Block until the result arrives and return it.
    ///
    /// An outcome that is already recorded is returned even if an interrupt
    /// is pending. An interrupt that arrives while the slot is empty ends the
    /// wait; it does not stop the operation.
    ///
    /// # Errors
    /// - [`ResultError::Failed`] with [`Cause::Remote`] if the operation failed
    /// - [`ResultError::Failed`] with [`Cause::Interrupted`] if the wait was interrupted
    /// - [`ResultError::TypeMismatch`] if the delivered value is not a `T`
    /// - [`ResultError::AlreadyTaken`] if the result was already read
    pub fn get_result(&self) -> Result<T, ResultError> {
        let mut slot = self.shared.lock();
        loop {
            match mem::take(&mut slot.state) {
                State::Settled(outcome) => {
                    slot.state = State::Taken;
                    drop(slot);
                    return Self::unpack(outcome);
                }
                State::Taken => {
                    slot.state = State::Taken;
                    return Err(ResultError::AlreadyTaken);
                }
                State::Empty => {}
            }

            if slot.interrupted {
                slot.interrupted = false;
                debug!("wait for build result interrupted");
                return Err(ResultError::Failed {
                    source: Cause::Interrupted,
                });
            }

            slot = self
                .shared
                .settled
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn unpack(outcome: Outcome) -> Result<T, ResultError> {
        match outcome {
            Outcome::Success(value) => value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| ResultError::TypeMismatch {
                    expected: any::type_name::<T>(),
                }),
            Outcome::Failure(failure) => Err(ResultError::Failed {
                source: Cause::Remote(failure),
            }),
        }
    }
}

impl<T: Any + Send> ResultHandler<T> for BlockingResultHandler<T> {
    fn on_complete(&self, result: T) {
        if let Err(err) = self.complete(result) {
            warn!("ignoring build result: {err}");
        }
    }

    fn on_failure(&self, failure: ConnectionError) {
        if let Err(err) = self.fail(failure) {
            warn!("ignoring build failure: {err}");
        }
    }
}

/// Interrupts the wait of a [`BlockingResultHandler`].
///
/// An interrupt with no thread waiting stays pending until the next
/// `get_result`, which then fails unless a result is already recorded.
#[derive(Clone)]
pub struct InterruptHandle {
    shared: Arc<Shared>,
}

impl fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptHandle").finish_non_exhaustive()
    }
}

impl InterruptHandle {
    /// Wake the waiting thread and make its wait fail.
    pub fn interrupt(&self) {
        self.shared.lock().interrupted = true;
        self.shared.settled.notify_all();
    }
}
