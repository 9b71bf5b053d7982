//! Per-user session state.
//!
//! A [`Session`] is owned by the caller and passed into every generation. It
//! holds the identifiers used to key rendered diagrams, the messages of the
//! current request, and the last displayed diagram.

use std::fmt;

use log::debug;
use uuid::Uuid;

/// Author of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the request conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Creates a message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// The message author.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The message text.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// State of one user's generation session.
///
/// Every new request calls [`Session::reset`], which discards all state and
/// draws a fresh session id. Fragments of an abandoned stream arriving after
/// a reset are not tracked.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    count: u64,
    messages: Vec<Message>,
    current_diagram: Option<String>,
    explanation: String,
    raw_response: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            count: 0,
            messages: Vec::new(),
            current_diagram: None,
            explanation: String::new(),
            raw_response: String::new(),
        }
    }

    /// Discard all state and draw a new session id.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!(session_id:% = self.id; "Session reset");
    }

    /// The session id; stable until the next reset.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of diagrams displayed since the last reset.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Messages of the current request.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last displayed diagram, if any.
    pub fn current_diagram(&self) -> Option<&str> {
        self.current_diagram.as_deref()
    }

    /// Explanation accompanying the current diagram; may be empty.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// The raw model response received so far.
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// Render key of the most recently displayed diagram.
    pub fn render_key(&self) -> String {
        format!("mermaid_{}_{}", self.id, self.count)
    }

    /// Render key for re-displaying the current diagram.
    pub fn current_render_key(&self) -> String {
        format!("current_mermaid_{}", self.id)
    }

    pub(crate) fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    pub(crate) fn set_raw_response(&mut self, text: &str) {
        text.clone_into(&mut self.raw_response);
    }

    pub(crate) fn set_explanation(&mut self, explanation: String) {
        self.explanation = explanation;
    }

    /// Store `diagram` as the current diagram and advance the count.
    ///
    /// Returns the render key for the new diagram.
    pub(crate) fn record_diagram(&mut self, diagram: String) -> String {
        self.current_diagram = Some(diagram);
        self.count += 1;
        self.render_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();

        assert_eq!(session.count(), 0);
        assert!(session.messages().is_empty());
        assert_eq!(session.current_diagram(), None);
        assert_eq!(session.explanation(), "");
        assert_eq!(session.raw_response(), "");
    }

    #[test]
    fn test_record_diagram_advances_count() {
        let mut session = Session::new();

        let first = session.record_diagram("graph LR\nA-->B".to_string());
        let second = session.record_diagram("graph LR\nB-->C".to_string());

        assert_eq!(session.count(), 2);
        assert_eq!(first, format!("mermaid_{}_1", session.id()));
        assert_eq!(second, format!("mermaid_{}_2", session.id()));
        assert_eq!(session.current_diagram(), Some("graph LR\nB-->C"));
    }

    #[test]
    fn test_reset_clears_state_and_id() {
        let mut session = Session::new();
        let old_id = session.id();
        session.push_message(Role::User, "design a shop");
        session.set_raw_response("partial");
        session.set_explanation("why".to_string());
        session.record_diagram("pie".to_string());

        session.reset();

        assert_ne!(session.id(), old_id);
        assert_eq!(session.count(), 0);
        assert!(session.messages().is_empty());
        assert_eq!(session.current_diagram(), None);
        assert_eq!(session.explanation(), "");
        assert_eq!(session.raw_response(), "");
    }

    #[test]
    fn test_current_render_key_is_stable() {
        let mut session = Session::new();
        let key = session.current_render_key();
        session.record_diagram("pie".to_string());

        assert_eq!(session.current_render_key(), key);
        assert!(key.starts_with("current_mermaid_"));
    }

    #[test]
    fn test_message_accessors() {
        let message = Message::new(Role::Assistant, "text");

        assert_eq!(message.role(), Role::Assistant);
        assert_eq!(message.content(), "text");
        assert_eq!(Role::User.to_string(), "user");
    }
}
