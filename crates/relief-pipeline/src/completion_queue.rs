//! Lock-protected FIFO of finished requests awaiting their callbacks.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::GenerationError;
use crate::request::RequestHandle;

/// Consumer callback for a request producing `T`.
pub type Callback<T> = Box<dyn FnOnce(RequestHandle, Result<T, GenerationError>) + Send + 'static>;

/// A finished request paired with the callback that consumes it.
pub struct Completion<T> {
    handle: RequestHandle,
    result: Result<T, GenerationError>,
    callback: Callback<T>,
}

impl<T> Completion<T> {
    pub fn new(handle: RequestHandle, result: Result<T, GenerationError>, callback: Callback<T>) -> Self {
        Self {
            handle,
            result,
            callback,
        }
    }

    pub fn handle(&self) -> RequestHandle {
        self.handle
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Hand the result to its callback.
    pub fn invoke(self) {
        (self.callback)(self.handle, self.result);
    }
}

/// Producers push from worker threads; the consumer swaps the whole queue out
/// with [`take_all`](Self::take_all) and runs callbacks without holding the lock.
pub struct CompletionQueue<T> {
    pending: Mutex<VecDeque<Completion<T>>>,
}

impl<T> Default for CompletionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompletionQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, completion: Completion<T>) {
        self.lock().push_back(completion);
    }

    /// Remove every queued completion in arrival order.
    ///
    /// Anything pushed after this returns stays queued for the next call.
    pub fn take_all(&self) -> VecDeque<Completion<T>> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking callback never runs under this lock, so a poisoned queue
    // still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Completion<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
