// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Delete confirmation cool-down.
//!
//! The confirm button of a destructive action stays disabled until the
//! countdown reaches zero.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCountdown {
    deadline: Instant,
    length: Duration,
}

impl DeleteCountdown {
    /// Start counting down from now.
    pub fn start(length: Duration) -> Self {
        Self {
            deadline: Instant::now() + length,
            length,
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whole seconds left, rounded up, as shown on the button.
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// True exactly when the countdown has reached zero.
    pub fn is_ready(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Resolve once the countdown reaches zero.
    pub async fn ready(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }

    /// Confirm button label, e.g. `Delete (3)` then `Delete`.
    pub fn confirm_label(&self, verb: &str) -> String {
        match self.remaining_secs() {
            0 => verb.to_string(),
            n => format!("{verb} ({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn disabled_until_exactly_zero() {
        for secs in [1u64, 3, 5, 10] {
            let countdown = DeleteCountdown::start(Duration::from_secs(secs));
            assert!(!countdown.is_ready());
            assert_eq!(countdown.remaining_secs(), secs);

            tokio::time::advance(Duration::from_secs(secs) - Duration::from_millis(1)).await;
            assert!(!countdown.is_ready(), "{secs}s countdown ready early");
            assert_eq!(countdown.remaining_secs(), 1);

            tokio::time::advance(Duration::from_millis(1)).await;
            assert!(countdown.is_ready(), "{secs}s countdown not ready at zero");
            assert_eq!(countdown.remaining_secs(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_length_is_immediately_ready() {
        let countdown = DeleteCountdown::start(Duration::ZERO);
        assert!(countdown.is_ready());
        assert_eq!(countdown.confirm_label("Delete"), "Delete");
    }

    #[tokio::test(start_paused = true)]
    async fn label_counts_down() {
        let countdown = DeleteCountdown::start(Duration::from_secs(5));
        assert_eq!(countdown.confirm_label("Delete"), "Delete (5)");
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(countdown.confirm_label("Delete"), "Delete (3)");
    }

    #[tokio::test(start_paused = true)]
    async fn ready_resolves_at_deadline() {
        let countdown = DeleteCountdown::start(Duration::from_secs(5));
        countdown.ready().await;
        assert!(countdown.is_ready());
    }
}
