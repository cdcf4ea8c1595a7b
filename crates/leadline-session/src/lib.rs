pub mod state;
pub mod store;

pub use state::{ConversationStep, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
