// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transient user notifications (the console's snackbar queue).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Upper bound on undrained notices; the oldest are dropped first.
const MAX_PENDING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Shared, cloneable notification queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, severity: Severity, message: impl Into<String>) {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() == MAX_PENDING {
            queue.pop_front();
        }
        queue.push_back(Notice {
            severity,
            message: message.into(),
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let notifier = Notifier::new();
        notifier.success("Saved.");
        notifier.error("Nope.");

        let notices = notifier.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].severity, Severity::Success);
        assert_eq!(notices[1].message, "Nope.");
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn drops_oldest_when_full() {
        let notifier = Notifier::new();
        for i in 0..(MAX_PENDING + 3) {
            notifier.push(Severity::Info, format!("n{i}"));
        }
        let notices = notifier.drain();
        assert_eq!(notices.len(), MAX_PENDING);
        assert_eq!(notices[0].message, "n3");
    }
}
