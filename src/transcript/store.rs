//! Running transcript of one session
//!
//! Streaming transcription arrives token by token, so consecutive fragments
//! for the same speaker extend the last message instead of creating a new
//! turn. The merge rule is a pure function over the message sequence; the
//! store wraps it for sharing between the session worker and the UI.

use super::types::{Message, Role};
use parking_lot::RwLock;
use std::sync::Arc;

/// Fold one transcript fragment into the message sequence.
///
/// If the last message has the same role, the fragment is appended to its
/// text; otherwise a new message starts. Returns `true` when a new turn
/// started. The sequence only grows by append or last-element mutation.
pub fn apply_fragment(messages: &mut Vec<Message>, role: Role, fragment: &str) -> bool {
    if let Some(last) = messages.last_mut() {
        if last.role == role {
            last.text.push_str(fragment);
            return false;
        }
    }

    messages.push(Message::new(role, fragment));
    true
}

/// Thread-safe, session-scoped message store
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Apply one fragment; returns `true` when it started a new turn
    pub fn push_fragment(&self, role: Role, fragment: &str) -> bool {
        apply_fragment(&mut self.messages.write(), role, fragment)
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_role_fragments_merge() {
        let mut messages = Vec::new();
        assert!(apply_fragment(&mut messages, Role::Assistant, "Hel"));
        assert!(!apply_fragment(&mut messages, Role::Assistant, "lo"));
        assert!(!apply_fragment(&mut messages, Role::Assistant, " there"));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Hello there");
    }

    #[test]
    fn test_alternating_roles_start_new_turns() {
        let mut messages = Vec::new();
        apply_fragment(&mut messages, Role::Assistant, "How can I help?");
        apply_fragment(&mut messages, Role::User, "My car broke down");
        apply_fragment(&mut messages, Role::Assistant, "I'm sorry to hear that");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[test]
    fn test_concatenation_preserves_arrival_order() {
        let mut messages = Vec::new();
        for fragment in ["a", "b", "c", "d"] {
            apply_fragment(&mut messages, Role::User, fragment);
        }
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "abcd");
    }

    #[test]
    fn test_store_shares_state_across_clones() {
        let store = TranscriptStore::new();
        let clone = store.clone();

        assert!(store.push_fragment(Role::User, "hi"));
        assert_eq!(clone.len(), 1);
        assert_eq!(clone.get_all()[0].text, "hi");

        clone.clear();
        assert!(store.is_empty());
    }
}
