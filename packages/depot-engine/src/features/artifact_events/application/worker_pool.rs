//! Bounded event queue drained by a fixed set of worker tasks

use super::dispatcher::ArtifactEventDispatcher;
use crate::config::ArtifactEventConfig;
use crate::errors::{EngineError, Result};
use crate::features::artifact_events::domain::ArtifactEvent;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

struct Job {
    event: ArtifactEvent,
    reply: oneshot::Sender<Result<()>>,
}

/// Worker pool for artifact events
///
/// Events on different paths run concurrently; callers that need ordering
/// for one path await the receiver returned by [`submit`](Self::submit)
/// before submitting the next event.
pub struct EventWorkerPool {
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl EventWorkerPool {
    pub fn start(dispatcher: Arc<ArtifactEventDispatcher>, config: &ArtifactEventConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers)
            .map(|worker| {
                tokio::spawn(Self::worker_loop(worker, receiver.clone(), dispatcher.clone()))
            })
            .collect();

        info!(workers = config.workers, queue_capacity = config.queue_capacity, "Event worker pool started");
        Self {
            sender: Some(sender),
            workers,
        }
    }

    async fn worker_loop(
        worker: usize,
        receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
        dispatcher: Arc<ArtifactEventDispatcher>,
    ) {
        loop {
            let job = receiver.lock().await.recv().await;
            let Some(Job { event, reply }) = job else {
                break;
            };

            let result = dispatcher.dispatch(&event).await;
            if let Err(err) = &result {
                error!(worker, event = %event, error = %err, "Artifact event failed");
            }
            // submitter may have stopped listening
            let _ = reply.send(result);
        }
    }

    /// Queue `event`; waits while the queue is full
    pub async fn submit(&self, event: ArtifactEvent) -> Result<oneshot::Receiver<Result<()>>> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| EngineError::worker_pool("pool is shut down"))?;
        let (reply, receiver) = oneshot::channel();
        sender
            .send(Job { event, reply })
            .await
            .map_err(|_| EngineError::worker_pool("all workers have exited"))?;
        Ok(receiver)
    }

    /// Queue `event` and wait for its result
    pub async fn submit_and_wait(&self, event: ArtifactEvent) -> Result<()> {
        self.submit(event)
            .await?
            .await
            .map_err(|_| EngineError::worker_pool("worker dropped the event"))?
    }

    /// Stop accepting events, drain the queue and join the workers
    pub async fn shutdown(mut self) -> Result<()> {
        self.sender.take();
        let results = futures::future::join_all(self.workers.drain(..)).await;

        let mut panicked = 0;
        for result in results {
            if let Err(join_err) = result {
                warn!(error = %join_err, "Event worker panicked");
                panicked += 1;
            }
        }
        info!("Event worker pool stopped");
        if panicked > 0 {
            return Err(EngineError::worker_pool(format!("{} workers panicked", panicked)));
        }
        Ok(())
    }
}
