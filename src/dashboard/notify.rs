//! Notification Emitter
//!
//! Toast messages stacked in display order. Auto-dismissal is scheduled by
//! the engine; this module only owns the stack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a toast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A displayed toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Stack of displayed notifications. Identical messages are not merged.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    stack: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            next_id: 1,
        }
    }

    /// Push a new toast on top of the stack
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> Notification {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let notification = Notification {
            id: self.next_id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.stack.push(notification.clone());
        notification
    }

    /// Remove a toast. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.stack.len();
        self.stack.retain(|n| n.id != id);
        self.stack.len() != before
    }

    pub fn contains(&self, id: u64) -> bool {
        self.stack.iter().any(|n| n.id == id)
    }

    pub fn active(&self) -> &[Notification] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
