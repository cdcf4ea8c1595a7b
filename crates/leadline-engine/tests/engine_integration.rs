#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end engine tests over in-memory capabilities: full conversation
//! flows, capability-failure handling and the timeout bound.

use async_trait::async_trait;
use leadline_channels::Channel;
use leadline_core::{LeadlineError, LeadlineResult, LogEvent};
use leadline_engine::SessionEngine;
use leadline_session::{ConversationStep, MemorySessionStore, SessionState, SessionStore};
use leadline_sink::EventSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const SENDER: &str = "15550001111@c.us";
const IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Mock channel that records deliveries and can be switched to fail.
struct RecordingChannel {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingChannel {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, to: &str, body: &str) -> LeadlineResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LeadlineError::Channel("mock delivery failure".to_string()));
        }
        self.sent.lock().await.push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Mock sink that records events and can be switched to fail.
struct RecordingSink {
    events: Mutex<Vec<LogEvent>>,
    fail: AtomicBool,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn record(&self, event: &LogEvent) -> LeadlineResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LeadlineError::Sink("mock sink failure".to_string()));
        }
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Store whose every call fails, simulating an unavailable backend.
struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn get(&self, _sender: &str) -> LeadlineResult<Option<SessionState>> {
        Err(LeadlineError::Session("store offline".to_string()))
    }

    async fn put(&self, _sender: &str, _state: &SessionState) -> LeadlineResult<()> {
        Err(LeadlineError::Session("store offline".to_string()))
    }
}

/// Store that never answers, for exercising the timeout bound.
struct StalledStore;

#[async_trait]
impl SessionStore for StalledStore {
    async fn get(&self, _sender: &str) -> LeadlineResult<Option<SessionState>> {
        tokio::time::sleep(Duration::from_secs(300)).await;
        Ok(None)
    }

    async fn put(&self, _sender: &str, _state: &SessionState) -> LeadlineResult<()> {
        tokio::time::sleep(Duration::from_secs(300)).await;
        Ok(())
    }
}

struct Harness {
    engine: SessionEngine,
    store: Arc<MemorySessionStore>,
    channel: Arc<RecordingChannel>,
    sink: Arc<RecordingSink>,
}

fn harness() -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let channel = Arc::new(RecordingChannel::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = SessionEngine::new(
        store.clone(),
        channel.clone(),
        sink.clone(),
        IO_TIMEOUT,
    )
    .unwrap();
    Harness {
        engine,
        store,
        channel,
        sink,
    }
}

#[tokio::test]
async fn cold_start_conversation_reaches_hot_lead() {
    let h = harness();

    let t1 = h.engine.handle(SENDER, "hi").await.unwrap();
    assert_eq!(t1.next.step, ConversationStep::MenuSent);
    assert!(t1.reply.contains("Welcome to Your Business"));

    let t2 = h.engine.handle(SENDER, "2").await.unwrap();
    assert_eq!(t2.next.step, ConversationStep::OptionSelected { choice: 2 });
    assert_eq!(t2.next.last_choice, Some(2));
    assert!(t2.reply.contains("Pricing & Plans"));

    let t3 = h.engine.handle(SENDER, "buy").await.unwrap();
    assert_eq!(t3.next.step, ConversationStep::OptionSelected { choice: 2 });

    let t4 = h.engine.handle(SENDER, "xyz").await.unwrap();
    assert_eq!(t4.next.step, ConversationStep::OptionSelected { choice: 2 });
    assert_eq!(t4.next.last_choice, Some(2));

    let sent = h.channel.sent.lock().await;
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().all(|(to, _)| to == SENDER));

    let statuses: Vec<String> = h
        .sink
        .events
        .lock()
        .await
        .iter()
        .map(|e| e.status.to_string())
        .collect();
    assert_eq!(statuses, vec!["Engaged", "Interested", "HOT_LEAD", "NEEDS_HELP"]);
}

#[tokio::test]
async fn digit_from_brand_new_sender_gets_the_menu() {
    let h = harness();

    let turn = h.engine.handle(SENDER, "2").await.unwrap();

    assert!(turn.reply.contains("Welcome to Your Business"));
    assert_eq!(turn.next.step, ConversationStep::MenuSent);
    assert_eq!(turn.next.last_choice, None);
}

#[tokio::test]
async fn state_survives_engine_reconstruction() {
    let store = Arc::new(MemorySessionStore::new());
    let channel = Arc::new(RecordingChannel::new());
    let sink = Arc::new(RecordingSink::new());

    let first = SessionEngine::new(
        store.clone(),
        channel.clone(),
        sink.clone(),
        IO_TIMEOUT,
    )
    .unwrap();
    first.handle(SENDER, "hi").await.unwrap();

    let second = SessionEngine::new(store, channel, sink, IO_TIMEOUT).unwrap();
    let turn = second.handle(SENDER, "3").await.unwrap();

    assert_eq!(turn.next.step, ConversationStep::OptionSelected { choice: 3 });
    assert!(turn.reply.contains("Schedule Demo"));
}

#[tokio::test]
async fn name_is_kept_across_menu_restarts() {
    let h = harness();

    h.engine.handle(SENDER, "my name is John Doe").await.unwrap();
    let turn = h.engine.handle(SENDER, "menu").await.unwrap();

    assert_eq!(turn.next.display_name.as_deref(), Some("John Doe"));
    let stored = h.store.get(SENDER).await.unwrap().unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("John Doe"));
}

#[tokio::test]
async fn store_failure_drops_the_message() {
    let channel = Arc::new(RecordingChannel::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = SessionEngine::new(
        Arc::new(FailingStore),
        channel.clone(),
        sink.clone(),
        IO_TIMEOUT,
    )
    .unwrap();

    let err = engine.handle(SENDER, "hi").await.unwrap_err();

    assert!(matches!(err, LeadlineError::Session(_)));
    assert!(channel.sent.lock().await.is_empty());
    assert!(sink.events.lock().await.is_empty());
}

#[tokio::test]
async fn delivery_failure_still_persists_and_logs() {
    let h = harness();
    h.channel.fail.store(true, Ordering::SeqCst);

    let turn = h.engine.handle(SENDER, "hi").await.unwrap();

    assert_eq!(turn.next.step, ConversationStep::MenuSent);
    let stored = h.store.get(SENDER).await.unwrap().unwrap();
    assert_eq!(stored.step, ConversationStep::MenuSent);
    assert_eq!(h.sink.events.lock().await.len(), 1);
}

#[tokio::test]
async fn sink_failure_does_not_cost_the_reply() {
    let h = harness();
    h.sink.fail.store(true, Ordering::SeqCst);

    let turn = h.engine.handle(SENDER, "hi").await.unwrap();

    assert_eq!(turn.next.step, ConversationStep::MenuSent);
    assert_eq!(h.channel.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn stalled_store_times_out_instead_of_hanging() {
    let channel = Arc::new(RecordingChannel::new());
    let sink = Arc::new(RecordingSink::new());
    let engine = SessionEngine::new(
        Arc::new(StalledStore),
        channel.clone(),
        sink,
        Duration::from_millis(50),
    )
    .unwrap();

    let err = engine.handle(SENDER, "hi").await.unwrap_err();

    assert!(matches!(err, LeadlineError::Session(_)));
    assert!(err.to_string().contains("timed out"));
    assert!(channel.sent.lock().await.is_empty());
}
