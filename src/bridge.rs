//! Bridging between synchronous callers and asynchronous acquisition code.
//!
//! Library consumers may be fully synchronous, fully asynchronous, or mixed.
//! [`run_sync`] runs a future to completion from any of those contexts
//! without re-entrantly driving an already-running scheduler, and
//! [`fire_and_forget`] schedules a future without waiting on it.

use std::future::Future;
use std::panic;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, RuntimeFlavor};

use crate::error::{FileError, Result};

/// Ceiling on the bounded join when the computation is offloaded to a
/// dedicated scheduler thread.
pub const DEFAULT_BRIDGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `future` to completion and return its output, from any calling
/// context, with the default 30 second offload ceiling.
///
/// - With no runtime in scope, a fresh current-thread runtime drives the
///   future and is torn down before returning.
/// - Inside a runtime, on the main thread or on a current-thread scheduler,
///   driving the scheduler re-entrantly would deadlock; the future runs on a
///   second scheduler on its own thread and the join is bounded.
/// - Inside a multi-thread runtime on any other thread, the future is handed
///   to the existing scheduler as a new task and only the calling thread
///   blocks until it completes.
///
/// The future's own failure (if its output is a `Result`) passes through
/// unchanged inside the returned output; only the bridge itself produces
/// [`FileError::Timeout`] or [`FileError::Io`].
pub fn run_sync<F>(future: F) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    run_sync_with_timeout(future, DEFAULT_BRIDGE_TIMEOUT)
}

/// [`run_sync`] with an explicit ceiling on the offloaded-scheduler join.
pub fn run_sync_with_timeout<F>(future: F, timeout: Duration) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            let runtime = Builder::new_current_thread().enable_all().build()?;
            return Ok(runtime.block_on(future));
        }
    };

    let on_main = thread::current().name() == Some("main");
    if on_main || handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
        // Blocking this thread would stall the scheduler that lives on it.
        // Run the future on a second scheduler with a bounded join.
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let result = Builder::new_current_thread()
                .enable_all()
                .build()
                .map(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => Ok(result?),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(FileError::Timeout(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => match worker.join() {
                Err(payload) => panic::resume_unwind(payload),
                Ok(()) => Err(FileError::Timeout(timeout)),
            },
        }
    } else {
        // Multi-thread runtime, non-main thread: submit the future to the
        // existing scheduler and block only this thread on its completion.
        let (tx, rx) = mpsc::channel();
        handle.spawn(async move {
            let _ = tx.send(future.await);
        });
        match rx.recv() {
            Ok(output) => Ok(output),
            Err(_) => Err(FileError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "scheduler dropped the submitted task",
            ))),
        }
    }
}

/// Schedule `future` without waiting on its result.
///
/// With a runtime in scope the future is spawned as a new task and this call
/// returns immediately; a failure inside it surfaces only through the
/// runtime's unobserved-task reporting. With no runtime in scope there is
/// nothing else to drive the task, so a fresh runtime runs it to completion
/// before this call returns.
pub fn fire_and_forget<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
        }
        Err(_) => match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(future),
            Err(err) => {
                tracing::error!(%err, "failed to build a runtime for a scheduled task");
            }
        },
    }
}
