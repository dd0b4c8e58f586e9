//! # Message Store
//!
//! The conversation as an ordered list of messages. Insertion order is
//! conversation order: it defines the turn sequence and is what "the next
//! message" means when an edit removes a stale AI reply.
//!
//! ```text
//! MessageStore
//! ├── messages: Vec<Message>   // conversation order
//! ├── next_id: u64             // monotonically increasing, never reused
//! └── revision: u64            // bumped on every mutation
//! ```
//!
//! Readers only ever get `&[Message]`. Every mutation bumps `revision`, so the
//! TUI can tell a new snapshot from the one it last drew (auto-scroll keys off it).

use chrono::{DateTime, Local};

/// Unique identifier for a message within one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Reserved for the render-time loading placeholder. Never issued by a store.
    pub const PLACEHOLDER: MessageId = MessageId(0);

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    /// Only true for the ephemeral "Improving your prompt..." row built at render time.
    pub is_loading_placeholder: bool,
    pub created_at: DateTime<Local>,
}

impl Message {
    /// Builds the trailing placeholder shown while a request is in flight.
    /// It is never inserted into a `MessageStore`.
    pub fn loading_placeholder(text: &str) -> Self {
        Self {
            id: MessageId::PLACEHOLDER,
            role: Role::Ai,
            text: text.to_string(),
            is_loading_placeholder: true,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
    revision: u64,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Snapshot counter. Changes whenever the sequence or any message text changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Text of the most recent AI message, if there is one.
    pub fn last_ai_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Ai)
            .map(|m| m.text.as_str())
    }

    /// Adds a message at the tail and returns its freshly issued id.
    pub fn append(&mut self, role: Role, text: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            text,
            is_loading_placeholder: false,
            created_at: Local::now(),
        });
        self.revision += 1;
        id
    }

    /// Overwrites the text of the user message at `index`.
    ///
    /// If the message right after it is an AI reply, that one reply is removed
    /// so it can be regenerated. Nothing else moves.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range or
    /// does not point at a user message.
    pub fn replace_text_at(&mut self, index: usize, new_text: String) -> bool {
        let Some(message) = self.messages.get_mut(index) else {
            return false;
        };
        if message.role != Role::User {
            return false;
        }
        message.text = new_text;

        if self
            .messages
            .get(index + 1)
            .is_some_and(|next| next.role == Role::Ai)
        {
            self.messages.remove(index + 1);
        }

        self.revision += 1;
        true
    }

    /// Removes every message after `index`. Returns how many were dropped.
    pub fn truncate_after(&mut self, index: usize) -> usize {
        let keep = index.saturating_add(1);
        if keep >= self.messages.len() {
            return 0;
        }
        let removed = self.messages.len() - keep;
        self.messages.truncate(keep);
        self.revision += 1;
        removed
    }
}
