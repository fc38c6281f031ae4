//! Completion delivery.
//!
//! Facade operations complete on whatever task awaited them. UI layers
//! usually need results on one particular execution context (a main
//! thread or an event loop), so a [`Dispatcher`] forwards single-shot
//! callbacks to a [`DeliveryContext`], which runs them one at a time in the
//! order they were enqueued.

use std::future::Future;
use std::thread::JoinHandle;

use thiserror::Error;
use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Delivery context is closed")]
    Closed,

    #[error("Delivery thread panicked")]
    ThreadPanicked,
}

/// Creates a connected dispatcher and delivery context.
pub fn delivery_channel() -> (Dispatcher, DeliveryContext) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx }, DeliveryContext { rx })
}

/// Sends completions to a [`DeliveryContext`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
}

impl Dispatcher {
    /// Queues `callback(value)` on the delivery context.
    pub fn deliver<T, C>(&self, value: T, callback: C) -> Result<(), DeliveryError>
    where
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.tx
            .send(Box::new(move || callback(value)))
            .map_err(|_| DeliveryError::Closed)
    }

    /// Awaits `operation`, then queues `callback` with its output.
    ///
    /// The callback runs exactly once, on the delivery context, unless the
    /// context is gone by the time the operation finishes.
    pub async fn complete<F, C>(&self, operation: F, callback: C) -> Result<(), DeliveryError>
    where
        F: Future,
        F::Output: Send + 'static,
        C: FnOnce(F::Output) + Send + 'static,
    {
        let value = operation.await;
        self.deliver(value, callback)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Runs delivered callbacks in enqueue order on a single execution context.
#[derive(Debug)]
pub struct DeliveryContext {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl DeliveryContext {
    /// Runs callbacks on the current task until every dispatcher is dropped.
    ///
    /// Returns the number of callbacks run.
    pub async fn run(mut self) -> usize {
        let mut delivered = 0;
        while let Some(job) = self.rx.recv().await {
            job();
            delivered += 1;
        }
        delivered
    }

    /// Runs the callbacks already queued without waiting for more.
    ///
    /// For hosts that poll once per frame or loop iteration.
    pub fn run_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            delivered += 1;
        }
        delivered
    }

    /// Moves delivery to a dedicated OS thread.
    ///
    /// The thread exits once every dispatcher is dropped; joining it yields
    /// the number of callbacks run.
    pub fn spawn_thread(self, name: &str) -> std::io::Result<DeliveryThread> {
        let mut rx = self.rx;
        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                tracing::debug!("Delivery thread started");

                let mut delivered = 0;
                while let Some(job) = rx.blocking_recv() {
                    job();
                    delivered += 1;
                }

                tracing::debug!(delivered, "Delivery thread shutting down");
                delivered
            })?;
        Ok(DeliveryThread { handle })
    }
}

/// Handle to a delivery thread started by [`DeliveryContext::spawn_thread`].
#[derive(Debug)]
pub struct DeliveryThread {
    handle: JoinHandle<usize>,
}

impl DeliveryThread {
    /// Waits for the thread to drain its queue without blocking the async
    /// runtime. Returns the number of callbacks run.
    pub async fn join(self) -> Result<usize, DeliveryError> {
        tokio::task::spawn_blocking(move || self.join_blocking())
            .await
            .map_err(|_| DeliveryError::ThreadPanicked)?
    }

    /// Blocks the calling thread until delivery finishes.
    pub fn join_blocking(self) -> Result<usize, DeliveryError> {
        self.handle
            .join()
            .map_err(|_| DeliveryError::ThreadPanicked)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
