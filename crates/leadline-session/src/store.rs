use crate::state::SessionState;
use async_trait::async_trait;
use leadline_core::{LeadlineError, LeadlineResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Capability trait for durable per-sender session storage.
///
/// Keys are opaque sender identifiers. A `get` miss means the sender has
/// never been seen; the engine creates the state lazily.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, sender: &str) -> LeadlineResult<Option<SessionState>>;
    async fn put(&self, sender: &str, state: &SessionState) -> LeadlineResult<()>;
}

/// File-based session store (one JSON file per sender).
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub async fn new(dir: PathBuf) -> LeadlineResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn session_path(&self, sender: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_sender(sender)))
    }
}

/// Encode a sender id into a filesystem-safe file stem.
///
/// Alphanumerics and `.`/`_`/`-` pass through; every other byte becomes
/// `%XX`, so distinct ids always map to distinct stems.
fn encode_sender(sender: &str) -> String {
    let mut out = String::with_capacity(sender.len());
    for b in sender.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, sender: &str) -> LeadlineResult<Option<SessionState>> {
        let path = self.session_path(sender);
        if !path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(path).await?;
        let state: SessionState = serde_json::from_str(&data)
            .map_err(|e| LeadlineError::Session(format!("Failed to parse session: {e}")))?;
        Ok(Some(state))
    }

    async fn put(&self, sender: &str, state: &SessionState) -> LeadlineResult<()> {
        let path = self.session_path(sender);
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// In-memory session store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, sender: &str) -> LeadlineResult<Option<SessionState>> {
        Ok(self.sessions.read().await.get(sender).cloned())
    }

    async fn put(&self, sender: &str, state: &SessionState) -> LeadlineResult<()> {
        self.sessions
            .write()
            .await
            .insert(sender.to_string(), state.clone());
        Ok(())
    }
}
