//! Character-by-character reveal for AI replies.
//!
//! Purely a display transform: it hands back a prefix of the stored text and
//! never touches the message itself. Each reply starts revealing the first
//! time it is drawn and then advances one character per interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::core::store::{Message, MessageId, Role};

pub struct Typewriter {
    interval: Duration,
    started: HashMap<MessageId, Instant>,
}

impl Typewriter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started: HashMap::new(),
        }
    }

    /// Number of characters of a `total`-char text visible `elapsed` after start.
    fn visible_chars(&self, elapsed: Duration, total: usize) -> usize {
        if self.interval.is_zero() {
            return total;
        }
        // First character shows on the first tick, like a fresh interval timer.
        let ticks = elapsed.as_nanos() / self.interval.as_nanos();
        (ticks as usize).min(total)
    }

    /// The part of `message.text` to draw at `now`.
    ///
    /// User messages and the loading placeholder are always shown in full.
    pub fn visible_text<'m>(&mut self, message: &'m Message, now: Instant) -> &'m str {
        if message.role != Role::Ai || message.is_loading_placeholder {
            return &message.text;
        }
        let started = *self.started.entry(message.id).or_insert(now);
        let total = message.text.chars().count();
        let shown = self.visible_chars(now.saturating_duration_since(started), total);
        match message.text.char_indices().nth(shown) {
            Some((byte, _)) => &message.text[..byte],
            None => &message.text,
        }
    }

    /// True while any of `messages` is still mid-reveal at `now`.
    pub fn is_animating(&self, messages: &[Message], now: Instant) -> bool {
        messages.iter().any(|m| {
            m.role == Role::Ai
                && !m.is_loading_placeholder
                && match self.started.get(&m.id) {
                    // Not drawn yet: it will start animating on the next frame
                    None => true,
                    Some(started) => {
                        let total = m.text.chars().count();
                        self.visible_chars(now.saturating_duration_since(*started), total) < total
                    }
                }
        })
    }

    /// Drop bookkeeping for messages that no longer exist.
    pub fn retain(&mut self, messages: &[Message]) {
        self.started
            .retain(|id, _| messages.iter().any(|m| m.id == *id));
    }
}
