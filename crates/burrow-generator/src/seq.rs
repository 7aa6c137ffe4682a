use crate::error::{GeneratorError, Result};
use burrow_core::Index;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace, warn};

/// Default number of pending requests the counter mailbox buffers.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Messages understood by the counter actor.
#[derive(Debug)]
enum Command {
    Next { reply: oneshot::Sender<u64> },
    Shutdown { response: oneshot::Sender<()> },
}

/// Serial identifier generator backed by a checkpoint in the index.
///
/// A single actor task owns the counter. Requests are answered strictly in
/// mailbox order, so every caller receives a distinct value and values are
/// issued in increasing order. Each issued value schedules a fire-and-forget
/// checkpoint write; callers never wait for it.
///
/// On start the counter resumes one below the stored checkpoint, so the
/// checkpointed value itself is the first one handed out again.
#[derive(Debug)]
pub struct SeqGenerator {
    mailbox: mpsc::Sender<Command>,
    checkpoints: TaskTracker,
    actor: Option<JoinHandle<()>>,
}

impl SeqGenerator {
    /// Reads the checkpoint from `index` and spawns the counter actor.
    pub async fn start<I: Index>(index: Arc<I>) -> Result<Self> {
        Self::start_with_capacity(index, DEFAULT_MAILBOX_CAPACITY).await
    }

    pub async fn start_with_capacity<I: Index>(index: Arc<I>, capacity: usize) -> Result<Self> {
        let checkpoint = index.read_checkpoint().await?;
        let counter = checkpoint.saturating_sub(1);

        let (mailbox, rx) = mpsc::channel(capacity.max(1));
        let checkpoints = TaskTracker::new();
        let actor = tokio::spawn(counter_loop(counter, rx, index, checkpoints.clone()));

        info!(checkpoint, "identifier generator started");

        Ok(Self {
            mailbox,
            checkpoints,
            actor: Some(actor),
        })
    }

    /// Returns the next identifier.
    ///
    /// Fails with [`GeneratorError::Stopped`] once the actor has shut down,
    /// either through [`stop`](Self::stop) or because the counter ran out.
    pub async fn next_id(&self) -> Result<u64> {
        let (reply, response) = oneshot::channel();
        self.mailbox
            .send(Command::Next { reply })
            .await
            .map_err(|_| GeneratorError::Stopped)?;
        response.await.map_err(|_| GeneratorError::Stopped)
    }

    pub fn is_running(&self) -> bool {
        !self.mailbox.is_closed()
    }

    /// Stops the actor and waits for it to exit.
    ///
    /// Requests already queued ahead of the shutdown are still answered.
    /// Checkpoint writes in flight are not awaited here; see
    /// [`wait_checkpoints`](Self::wait_checkpoints). Calling this twice is a
    /// no-op.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(actor) = self.actor.take() else {
            return Ok(());
        };

        let (response, ack) = oneshot::channel();
        if self.mailbox.send(Command::Shutdown { response }).await.is_ok() && ack.await.is_err() {
            debug!("counter actor exited before acknowledging shutdown");
        }

        actor
            .await
            .map_err(|err| GeneratorError::Actor(err.to_string()))?;
        info!("identifier generator stopped");
        Ok(())
    }

    /// Waits until every checkpoint write scheduled so far has finished.
    ///
    /// Meant to be called after [`stop`](Self::stop); writes scheduled after
    /// this returns are not covered.
    pub async fn wait_checkpoints(&self) {
        self.checkpoints.close();
        self.checkpoints.wait().await;
        trace!("checkpoint writes drained");
    }
}

async fn counter_loop<I: Index>(
    mut counter: u64,
    mut rx: mpsc::Receiver<Command>,
    index: Arc<I>,
    checkpoints: TaskTracker,
) {
    trace!(counter, "counter actor started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::Next { reply } => {
                let Some(id) = counter.checked_add(1) else {
                    error!(counter, "identifier space exhausted, stopping generator");
                    break;
                };
                counter = id;

                if reply.send(id).is_err() {
                    trace!(id, "requester dropped before receiving its identifier");
                }

                let index = Arc::clone(&index);
                checkpoints.spawn(async move {
                    if let Err(err) = index.write_checkpoint(id).await {
                        warn!(checkpoint = id, error = %err, "failed to persist checkpoint");
                    }
                });
            }
            Command::Shutdown { response } => {
                debug!(counter, "counter actor received shutdown signal");
                if response.send(()).is_err() {
                    error!("counter actor failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    trace!(counter, "counter actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::ReadIndex;
    use burrow_storage::InMemoryIndex;

    #[tokio::test]
    async fn empty_index_issues_from_one() {
        let index = Arc::new(InMemoryIndex::new());
        let generator = SeqGenerator::start(index).await.unwrap();

        assert_eq!(generator.next_id().await.unwrap(), 1);
        assert_eq!(generator.next_id().await.unwrap(), 2);
        assert_eq!(generator.next_id().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn resumes_at_the_checkpoint() {
        let index = Arc::new(InMemoryIndex::with_checkpoint(7));
        let generator = SeqGenerator::start(index).await.unwrap();

        assert_eq!(generator.next_id().await.unwrap(), 7);
        assert_eq!(generator.next_id().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn checkpoint_of_one_issues_one() {
        let index = Arc::new(InMemoryIndex::with_checkpoint(1));
        let generator = SeqGenerator::start(index).await.unwrap();

        assert_eq!(generator.next_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn issued_ids_are_checkpointed() {
        let index = Arc::new(InMemoryIndex::new());
        let mut generator = SeqGenerator::start(Arc::clone(&index)).await.unwrap();

        for expected in 1..=5 {
            assert_eq!(generator.next_id().await.unwrap(), expected);
        }
        generator.stop().await.unwrap();
        generator.wait_checkpoints().await;

        let checkpoint = index.read_checkpoint().await.unwrap();
        assert!((1..=5).contains(&checkpoint), "checkpoint {checkpoint}");
    }

    #[tokio::test]
    async fn next_after_stop_fails() {
        let index = Arc::new(InMemoryIndex::new());
        let mut generator = SeqGenerator::start(index).await.unwrap();
        assert!(generator.is_running());

        generator.stop().await.unwrap();

        assert!(!generator.is_running());
        assert_eq!(generator.next_id().await, Err(GeneratorError::Stopped));
        // second stop is a no-op
        generator.stop().await.unwrap();
    }

    #[tokio::test]
    async fn exhausted_counter_stops_the_generator() {
        let index = Arc::new(InMemoryIndex::with_checkpoint(u64::MAX));
        let generator = SeqGenerator::start(index).await.unwrap();

        assert_eq!(generator.next_id().await.unwrap(), u64::MAX);
        assert_eq!(generator.next_id().await, Err(GeneratorError::Stopped));
        assert_eq!(generator.next_id().await, Err(GeneratorError::Stopped));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_get_distinct_ids() {
        let index = Arc::new(InMemoryIndex::new());
        let generator = Arc::new(SeqGenerator::start_with_capacity(index, 8).await.unwrap());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(250);
                    for _ in 0..250 {
                        ids.push(generator.next_id().await.unwrap());
                    }
                    ids
                })
            })
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            let ids = handle.await.unwrap();
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            all.extend(ids);
        }

        all.sort_unstable();
        assert_eq!(all, (1..=4000).collect::<Vec<u64>>());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SeqGenerator>();
    }
}
