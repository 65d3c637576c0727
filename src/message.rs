//! Transcript messages.
//!
//! A [`Transcript`] is an ordered, gap-free sequence of [`Message`]s. Indices
//! are assigned once at ingestion and never change afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the transcript (0-based)
    pub index: usize,
    /// Speaker identifier, e.g. "A" or a user handle
    pub speaker: String,
    /// Raw message text
    pub text: String,
}

impl Message {
    /// Create a new message.
    pub fn new(index: usize, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Number of whitespace-delimited words in the message.
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Errors raised while ingesting a transcript.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// A message index does not match its position.
    #[error("message at position {position} has index {found}")]
    IndexGap { position: usize, found: usize },
}

/// An ordered, validated sequence of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Validate and wrap a message sequence.
    ///
    /// Indices must be exactly `0..n` in order.
    pub fn new(messages: Vec<Message>) -> Result<Self, TranscriptError> {
        for (position, message) in messages.iter().enumerate() {
            if message.index != position {
                return Err(TranscriptError::IndexGap {
                    position,
                    found: message.index,
                });
            }
        }
        Ok(Self { messages })
    }

    /// Build a transcript from `(speaker, text)` pairs, numbering them in order.
    pub fn from_texts<S, T>(pairs: impl IntoIterator<Item = (S, T)>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        let messages = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (speaker, text))| Message::new(index, speaker, text))
            .collect();
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
