//! A strictly ordered async job runner.
//!
//! Jobs are sent over a channel to a single worker task that runs them one at
//! a time, in submission order. Each job reports back on its own oneshot
//! channel, so a failing job never affects the ones queued after it.

use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

type Job = BoxFuture<'static, ()>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Task panicked while running")]
    Panicked,
    #[error("Task queue is not available")]
    Closed,
}

/// Handle to a queued task. Resolves once the task has run to completion.
#[must_use = "a TaskHandle does nothing unless awaited"]
pub struct TaskHandle<T> {
    response_rx: oneshot::Receiver<Result<T, QueueError>>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, QueueError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.response_rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(QueueError::Closed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Sender side of the queue. Cloning shares the same worker.
#[derive(Clone)]
pub struct TaskQueue {
    job_tx: mpsc::UnboundedSender<Job>,
}

impl TaskQueue {
    /// Spawns the worker on the current tokio runtime.
    pub fn new() -> Self {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run(job_rx));
        Self { job_tx }
    }

    async fn run(mut job_rx: mpsc::UnboundedReceiver<Job>) {
        let mut completed: u64 = 0;
        while let Some(job) = job_rx.recv().await {
            job.await;
            completed += 1;
            debug!("Task queue finished job #{}", completed);
        }
        debug!("Task queue drained, worker stopping after {} jobs", completed);
    }

    /// Queues `task`. It starts only after every previously queued task has
    /// finished.
    pub fn enqueue<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (response_tx, response_rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            // Running inside its own tokio task keeps a panic contained to
            // this job's handle.
            let result = match tokio::spawn(task).await {
                Ok(value) => Ok(value),
                Err(err) => {
                    error!("Queued task failed to complete: {}", err);
                    Err(QueueError::Panicked)
                }
            };
            let _ = response_tx.send(result);
        });

        // If the worker is gone the job is dropped along with `response_tx`,
        // which resolves the handle with `QueueError::Closed`.
        let _ = self.job_tx.send(job);

        TaskHandle { response_rx }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
