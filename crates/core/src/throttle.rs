//! Per-client minimum interval between public submissions.
//!
//! Keys combine the submission kind with the client address, so a visitor
//! who just sent a contact message can still register. State lives in
//! process memory and is lost on restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::CoreError;

/// Default minimum interval between two submissions from the same client.
pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 60;

/// Entry count above which stale entries are pruned on insert.
const PRUNE_THRESHOLD: usize = 10_000;

/// Kind of public submission being throttled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Contact,
    Registration,
}

#[derive(Debug)]
pub struct SubmissionThrottle {
    min_interval: Duration,
    last_seen: HashMap<(SubmissionKind, String), Instant>,
}

impl SubmissionThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_seen: HashMap::new(),
        }
    }

    /// Record a submission attempt at `now`.
    ///
    /// Fails with [`CoreError::TooManyRequests`] (carrying the remaining wait,
    /// rounded up to whole seconds) when the client submitted too recently.
    /// A rejected attempt does not reset the window.
    pub fn check(
        &mut self,
        kind: SubmissionKind,
        client: &str,
        now: Instant,
    ) -> Result<(), CoreError> {
        if self.min_interval.is_zero() {
            return Ok(());
        }

        let key = (kind, client.to_string());
        if let Some(last) = self.last_seen.get(&key) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
                return Err(CoreError::TooManyRequests {
                    retry_after_secs: secs.max(1),
                });
            }
        }

        if self.last_seen.len() >= PRUNE_THRESHOLD {
            let window = self.min_interval;
            self.last_seen
                .retain(|_, seen| now.saturating_duration_since(*seen) < window);
        }
        self.last_seen.insert(key, now);
        Ok(())
    }

    /// Forget the last recorded attempt, for a submission that was checked
    /// but never stored.
    pub fn release(&mut self, kind: SubmissionKind, client: &str) {
        self.last_seen.remove(&(kind, client.to_string()));
    }

    pub fn tracked_clients(&self) -> usize {
        self.last_seen.len()
    }
}

impl Default for SubmissionThrottle {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_MIN_INTERVAL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn second_submission_within_window_is_rejected() {
        let mut throttle = SubmissionThrottle::new(Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(throttle.check(SubmissionKind::Contact, "1.2.3.4", t0).is_ok());
        assert_matches!(
            throttle.check(SubmissionKind::Contact, "1.2.3.4", t0 + Duration::from_secs(20)),
            Err(CoreError::TooManyRequests { retry_after_secs: 40 })
        );
        assert!(throttle
            .check(SubmissionKind::Contact, "1.2.3.4", t0 + Duration::from_secs(60))
            .is_ok());
    }

    #[test]
    fn kinds_and_clients_are_independent() {
        let mut throttle = SubmissionThrottle::default();
        let t0 = Instant::now();

        assert!(throttle.check(SubmissionKind::Contact, "a", t0).is_ok());
        assert!(throttle.check(SubmissionKind::Registration, "a", t0).is_ok());
        assert!(throttle.check(SubmissionKind::Contact, "b", t0).is_ok());
        assert_eq!(throttle.tracked_clients(), 3);
    }

    #[test]
    fn released_attempt_frees_the_window() {
        let mut throttle = SubmissionThrottle::new(Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(throttle.check(SubmissionKind::Registration, "a", t0).is_ok());
        assert!(throttle.check(SubmissionKind::Contact, "a", t0).is_ok());
        throttle.release(SubmissionKind::Registration, "a");

        let t1 = t0 + Duration::from_secs(5);
        assert!(throttle.check(SubmissionKind::Registration, "a", t1).is_ok());
        assert_matches!(
            throttle.check(SubmissionKind::Contact, "a", t1),
            Err(CoreError::TooManyRequests { .. })
        );
    }

    #[test]
    fn zero_interval_disables_throttling() {
        let mut throttle = SubmissionThrottle::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(throttle.check(SubmissionKind::Contact, "a", t0).is_ok());
        assert!(throttle.check(SubmissionKind::Contact, "a", t0).is_ok());
        assert_eq!(throttle.tracked_clients(), 0);
    }
}
