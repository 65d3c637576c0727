//! Fixed-size, non-overlapping windows over a transcript.

use std::fmt;

use serde::{Deserialize, Serialize};

use layered_markers::{Hit, Message};

/// Half-open range `[start, end)` of message indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// Position of the window in the transcript (0-based)
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, message_index: usize) -> bool {
        self.start <= message_index && message_index < self.end
    }

    /// Index of the window's last message; synthetic hits are placed here.
    pub fn last_index(&self) -> usize {
        self.end.saturating_sub(1)
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Window#{}[{}..{})", self.index, self.start, self.end)
    }
}

/// A window with the messages and hits that fall inside it.
#[derive(Debug, Clone)]
pub struct WindowSlice<'a> {
    pub window: Window,
    pub messages: &'a [Message],
    /// Hits with `message_index` in the window, in their original order
    pub hits: Vec<&'a Hit>,
}

/// Partition `messages` into consecutive windows of `window_size` messages.
///
/// The last window may be shorter. A size of 0 is treated as 1. Messages
/// are grouped by position in the slice, but window bounds are taken from
/// the messages' own indices, so a slice numbered from 10 yields windows
/// starting at 10 and hits are matched against those indices.
pub fn segment<'a>(messages: &'a [Message], hits: &'a [Hit], window_size: usize) -> Vec<WindowSlice<'a>> {
    let size = window_size.max(1);

    messages
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| {
            let positional = index * size;
            let start = chunk.first().map_or(positional, |m| m.index);
            let end = chunk
                .last()
                .map_or(positional + chunk.len(), |m| m.index + 1);
            if end.saturating_sub(start) != chunk.len() {
                tracing::warn!(
                    window = index,
                    start,
                    end,
                    messages = chunk.len(),
                    "message indices in window are not consecutive"
                );
            }
            let window = Window { index, start, end };
            WindowSlice {
                window,
                messages: chunk,
                hits: hits
                    .iter()
                    .filter(|hit| window.contains(hit.message_index))
                    .collect(),
            }
        })
        .collect()
}
