//! Streamed command results with an out-of-band completion status
//!
//! A LIST or FETCH runs on a background task. Items arrive on a
//! bounded channel; the command's own outcome arrives separately on
//! a one-shot channel once the item sender has been dropped. The
//! consumer must drain every item before it looks at the outcome.

use crate::error::{Error, Result};
use std::future::Future;
use tokio::sync::{mpsc, oneshot};

/// Capacity of the item channel between producer and consumer.
pub const CHANNEL_CAPACITY: usize = 10;

/// Receiving half of a streamed command.
#[derive(Debug)]
pub struct Drain<T> {
    items: mpsc::Receiver<T>,
    done: oneshot::Receiver<Result<()>>,
}

impl<T: Send + 'static> Drain<T> {
    /// Run `producer` on a background task.
    ///
    /// The producer owns the item sender; it is dropped when the
    /// producer's future finishes, so the item channel is closed
    /// before the completion status is sent.
    pub fn spawn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(mpsc::Sender<T>) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let (tx, items) = mpsc::channel(CHANNEL_CAPACITY);
        let (done_tx, done) = oneshot::channel();
        let producer = producer(tx);

        tokio::spawn(async move {
            let outcome = producer.await;
            // The consumer may have gone away after a fatal error.
            let _ = done_tx.send(outcome);
        });

        Self { items, done }
    }

    /// Next item, or `None` once the producer has closed the channel.
    pub async fn next(&mut self) -> Option<T> {
        self.items.recv().await
    }

    /// Drain whatever is left, then return the producer's outcome.
    pub async fn finish(mut self) -> Result<()> {
        while self.items.recv().await.is_some() {}
        self.done
            .await
            .map_err(|_| Error::Imap("Producer task ended without a completion status".into()))?
    }

    /// Collect every item, then check the producer's outcome.
    pub async fn collect(mut self) -> Result<Vec<T>> {
        let mut collected = Vec::new();
        while let Some(item) = self.items.recv().await {
            collected.push(item);
        }
        self.finish().await?;
        Ok(collected)
    }
}
