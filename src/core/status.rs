//! # Status Slot & Activity Log
//!
//! One transient status message at a time. A newer message replaces the old
//! one; an unreplaced message clears itself once its TTL passes. Every
//! message is also appended to a bounded activity log shown by the log view.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const ACTIVITY_LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::Info => "INFO",
            StatusLevel::Warning => "WARN",
            StatusLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: StatusMessage,
}

impl LogEntry {
    pub fn line(&self) -> String {
        format!(
            "{} {:<5} {}",
            self.at.format("%H:%M:%S"),
            self.message.level.label(),
            self.message.text
        )
    }
}

#[derive(Debug)]
pub struct StatusSlot {
    current: Option<(StatusMessage, Instant)>,
    ttl: Duration,
    history: VecDeque<LogEntry>,
}

impl StatusSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            ttl,
            history: VecDeque::new(),
        }
    }

    pub fn set(&mut self, message: StatusMessage) {
        self.set_at(message, Instant::now());
    }

    pub fn set_at(&mut self, message: StatusMessage, now: Instant) {
        if self.history.len() == ACTIVITY_LOG_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(LogEntry {
            at: Local::now(),
            message: message.clone(),
        });
        self.current = Some((message, now));
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref().map(|(m, _)| m)
    }

    /// Clear the message if it has outlived the TTL. Returns true if it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, set_at)) if now.saturating_duration_since(*set_at) >= self.ttl => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &LogEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
