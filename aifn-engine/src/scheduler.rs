//! Cross-thread bridge into a single-threaded cooperative scheduler.

use std::fmt;
use std::future::Future;
use std::panic;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use aifn_primitives::{Error, Result};
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Cloneable handle used to submit work to a running scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    runtime: Handle,
    thread: Option<ThreadId>,
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("flavor", &self.runtime.runtime_flavor())
            .field("thread", &self.thread)
            .finish()
    }
}

impl SchedulerHandle {
    /// Wraps a handle to a runtime driven elsewhere.
    ///
    /// The runtime must be driven by a thread other than the ones calling
    /// [`submit_blocking`](Self::submit_blocking); blocking a thread that is
    /// also responsible for driving the runtime never completes.
    #[must_use]
    pub fn from_runtime(runtime: Handle) -> Self {
        Self {
            runtime,
            thread: None,
        }
    }

    /// Returns the underlying runtime handle.
    #[must_use]
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Spawns `future` on the scheduler and blocks the current thread until
    /// it completes. `None` waits indefinitely.
    ///
    /// A panic inside `future` is resumed on the calling thread, the same
    /// way a panicking blocking function would unwind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduler`] when called from the scheduler's own
    /// thread, when the scheduler stops or cancels the task before it
    /// completes, or when `timeout` elapses first. A timed-out future is
    /// aborted.
    pub fn submit_blocking<F, T>(&self, future: F, timeout: Option<Duration>) -> Result<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self.thread == Some(thread::current().id()) {
            return Err(Error::scheduler(
                "cannot block on the scheduler from its own thread",
            ));
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let task = self.runtime.spawn(future);
        let abort = task.abort_handle();
        self.runtime.spawn(async move {
            // The caller may already have given up waiting.
            let _ = tx.send(task.await);
        });

        let outcome = match timeout {
            None => rx.recv().map_err(|_| stopped())?,
            Some(limit) => match rx.recv_timeout(limit) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    abort.abort();
                    return Err(Error::scheduler(format!(
                        "task did not complete within {}ms",
                        limit.as_millis()
                    )));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(stopped()),
            },
        };

        match outcome {
            Ok(output) => Ok(output),
            Err(err) if err.is_panic() => {
                warn!("task submitted to the scheduler panicked");
                panic::resume_unwind(err.into_panic())
            }
            Err(_) => Err(Error::scheduler("task was cancelled before it completed")),
        }
    }
}

fn stopped() -> Error {
    Error::scheduler("scheduler stopped before the task completed")
}

/// A single-threaded scheduler running on a dedicated thread.
///
/// Dropping the loop stops the thread; tasks still pending are cancelled.
pub struct EventLoop {
    handle: SchedulerHandle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("thread", &self.handle.thread)
            .field("running", &self.shutdown.is_some())
            .finish()
    }
}

impl EventLoop {
    /// Starts a scheduler thread with the supplied name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduler`] if the runtime or the thread cannot be
    /// created.
    pub fn start(name: impl Into<String>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| Error::scheduler(format!("failed to build runtime: {err}")))?;
        let runtime_handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let name = name.into();
        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                runtime.block_on(async {
                    // Either an explicit signal or the sender being dropped stops the loop.
                    let _ = shutdown_rx.await;
                });
                debug!("event loop stopped");
            })
            .map_err(|err| Error::scheduler(format!("failed to spawn `{name}` thread: {err}")))?;

        debug!(thread = %name, "event loop started");
        Ok(Self {
            handle: SchedulerHandle {
                runtime: runtime_handle,
                thread: Some(thread.thread().id()),
            },
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Returns a handle for submitting work.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Stops the scheduler and waits for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            warn!("event loop thread panicked");
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
