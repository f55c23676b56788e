//! One-shot background results polled from `update`.

use std::future::Future;

use tokio::sync::oneshot::{self, error::TryRecvError};

/// Poll result of a [`PendingTask`].
#[derive(Debug, PartialEq, Eq)]
pub enum TaskPoll<T> {
    /// Still running.
    Pending,
    /// Finished with a value. Returned once.
    Ready(T),
    /// Worker dropped its sender without producing a value.
    Lost,
}

/// Single-slot channel fed by a spawned worker.
#[derive(Debug)]
pub struct PendingTask<T> {
    rx: Option<oneshot::Receiver<T>>,
}

impl<T: Send + 'static> PendingTask<T> {
    /// Spawns `future` and captures its output.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(future.await);
        });
        Self { rx: Some(rx) }
    }

    /// Creates a task that already holds `value`.
    #[must_use]
    pub fn ready(value: T) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(value);
        Self { rx: Some(rx) }
    }

    /// Takes the result without blocking.
    pub fn try_take(&mut self) -> TaskPoll<T> {
        let Some(rx) = self.rx.as_mut() else {
            return TaskPoll::Lost;
        };
        match rx.try_recv() {
            Ok(value) => {
                self.rx = None;
                TaskPoll::Ready(value)
            }
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Closed) => {
                self.rx = None;
                TaskPoll::Lost
            }
        }
    }
}
