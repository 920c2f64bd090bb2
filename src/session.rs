//! Explicit per-session conversation state
//!
//! The session object owns the conversation history and the identifiers
//! attached to trace records. It is passed explicitly to the answer source
//! and the evaluation loop; there are no process-wide singletons holding
//! chat state.

use uuid::Uuid;

/// Conversation context for one user session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub session_id: String,

    /// (question, answer) turns, oldest first
    history: Vec<(String, String)>,
}

impl SessionContext {
    /// Create a session with a fresh random session id
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: Uuid::new_v4().to_string(),
            history: Vec::new(),
        }
    }

    /// Create a session with a caller-supplied id (e.g. from the web layer)
    pub fn with_id(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            history: Vec::new(),
        }
    }

    /// Record a completed (question, answer) turn
    pub fn push_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.history.push((question.into(), answer.into()));
    }

    /// Conversation turns so far, oldest first
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
