// src/exec/tail.rs

use std::collections::VecDeque;

/// Fixed-capacity buffer of the most recent output lines.
///
/// Only used for failure diagnostics; the full output goes to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTail {
    lines: VecDeque<String>,
    cap: usize,
}

impl LineTail {
    pub fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Build a tail from a line sequence, keeping only the last `cap` lines.
    pub fn from_lines<I, S>(cap: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tail = Self::new(cap);
        for line in lines {
            tail.push(line);
        }
        tail
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.cap == 0 {
            return;
        }
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Retained lines concatenated as-is (they keep their own newlines).
    pub fn joined(&self) -> String {
        self.lines.iter().map(String::as_str).collect()
    }
}
