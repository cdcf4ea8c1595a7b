use leadline_channels::ChannelEvent;
use leadline_core::{display_phone, InboundMessage};
use leadline_engine::SessionEngine;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Routes inbound events to per-sender workers.
///
/// Each sender gets its own bounded queue and worker task, spawned on first
/// contact: messages from one sender are handled strictly in arrival order,
/// while different senders proceed concurrently. A failed `handle` call
/// drops that one message and the worker keeps going.
pub struct Dispatcher {
    engine: Arc<SessionEngine>,
    queue_capacity: usize,
}

impl Dispatcher {
    pub fn new(engine: Arc<SessionEngine>, queue_capacity: usize) -> Self {
        Self {
            engine,
            queue_capacity,
        }
    }

    /// Consume events until the channel closes, then drain every worker.
    ///
    /// Returns once all queued and in-flight messages are fully handled,
    /// so shutting the event source down never abandons accepted work.
    pub async fn run(&self, mut events: mpsc::Receiver<ChannelEvent>) {
        let mut queues: HashMap<String, mpsc::Sender<InboundMessage>> = HashMap::new();
        let mut workers: Vec<JoinHandle<()>> = Vec::new();

        while let Some(event) = events.recv().await {
            let ChannelEvent::MessageReceived(message) = event;

            if !message.is_direct() {
                debug!(
                    sender = %display_phone(&message.sender),
                    kind = ?message.kind,
                    "Skipping non-direct message"
                );
                continue;
            }

            let queue = queues.entry(message.sender.clone()).or_insert_with(|| {
                let (tx, rx) = mpsc::channel(self.queue_capacity);
                workers.push(tokio::spawn(sender_worker(self.engine.clone(), rx)));
                tx
            });

            // The worker only exits when its queue closes, so this send can
            // fail only on shutdown.
            if queue.send(message).await.is_err() {
                break;
            }
        }

        // Close all queues; each worker finishes what it already accepted.
        drop(queues);
        info!(workers = workers.len(), "Event channel closed; draining sender workers");
        for worker in workers {
            let _ = worker.await;
        }
    }
}

async fn sender_worker(engine: Arc<SessionEngine>, mut inbox: mpsc::Receiver<InboundMessage>) {
    while let Some(message) = inbox.recv().await {
        if let Err(e) = engine.handle(&message.sender, &message.text).await {
            error!(
                sender = %display_phone(&message.sender),
                error = %e,
                "Message dropped"
            );
        }
    }
}
