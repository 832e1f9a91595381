// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The designated execution context.
//
// Every call into the calling layer must happen on one specific thread (the
// platform's UI thread on a real device). `MainThread` owns such a thread:
// a single-threaded tokio runtime that runs posted tasks in order. Tasks run
// inside the runtime, so a `MethodChannel` implementation may
// `tokio::spawn` work that replies later from the same thread.

use std::sync::{Mutex, PoisonError};
use std::thread::{JoinHandle, ThreadId};

use dd_flutter_core::error::{BridgeError, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the designated execution context.
pub struct MainThread {
    name: String,
    thread_id: ThreadId,
    sender: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl MainThread {
    /// Start the context on a new named thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();

        let join = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(task) = receiver.recv().await {
                        task();
                    }
                });
                debug!("designated context loop exited");
            })?;

        debug!(thread = %name, "designated context started");

        Ok(Self {
            name,
            thread_id: join.thread().id(),
            sender: Mutex::new(Some(sender)),
            join: Mutex::new(Some(join)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schedule `task` to run on the context.
    ///
    /// Fails with [`BridgeError::ContextUnavailable`] once the context has
    /// been stopped or its loop has died.
    pub fn post<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = guard
            .as_ref()
            .ok_or_else(|| self.unavailable("context stopped"))?;
        sender
            .send(Box::new(task))
            .map_err(|_| self.unavailable("context loop is gone"))
    }

    /// Whether the current thread is the designated context.
    pub fn is_current(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Stop accepting tasks, run the ones already queued, and join the thread.
    ///
    /// Does not join when called from the context itself.
    pub fn stop(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if self.is_current() {
            return;
        }
        let join = self
            .join
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(join) = join {
            if join.join().is_err() {
                warn!(thread = %self.name, "designated context panicked");
            }
        }
    }

    fn unavailable(&self, reason: &str) -> BridgeError {
        BridgeError::ContextUnavailable(format!("{}: {reason}", self.name))
    }
}

impl Drop for MainThread {
    fn drop(&mut self) {
        self.stop();
    }
}
