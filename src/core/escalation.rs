// src/core/escalation.rs

//! Per-job termination escalation: TERM, then KILL, then a plain cancel.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Where a job stands in the escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationState {
    /// Never signalled, or its history went stale.
    Clean,
    /// A graceful signal was sent.
    Termed,
    /// A forceful signal was sent.
    Killed,
}

/// What to send to a job next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// `scancel --signal=TERM`
    Term,
    /// `scancel --signal=KILL`
    Kill,
    /// `scancel` with no signal qualifier.
    Cancel,
}

impl Escalation {
    /// The `scancel` argument that selects this signal, if any.
    pub fn signal_arg(self) -> Option<&'static str> {
        match self {
            Self::Term => Some("--signal=TERM"),
            Self::Kill => Some("--signal=KILL"),
            Self::Cancel => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SignalHistory {
    termed_at: Instant,
    killed_at: Option<Instant>,
}

impl SignalHistory {
    fn last_signal(&self) -> Instant {
        self.killed_at.unwrap_or(self.termed_at)
    }
}

/// Tracks the signals sent to each job and decides the next one.
///
/// State belongs to the tracker instance; two trackers never share history.
#[derive(Debug, Clone)]
pub struct EscalationTracker {
    stale_window: Duration,
    history: HashMap<String, SignalHistory>,
}

impl EscalationTracker {
    /// Creates a tracker that forgets a job once its last signal is older than `stale_window`.
    pub fn new(stale_window: Duration) -> Self {
        Self {
            stale_window,
            history: HashMap::new(),
        }
    }

    /// The configured stale window.
    pub fn stale_window(&self) -> Duration {
        self.stale_window
    }

    /// Records an attempt against `job_id` at `now` and returns the signal to send.
    ///
    /// Stale history is pruned first, so a job revisited after the window starts
    /// over with TERM. The attempt is recorded whether or not the signal is
    /// delivered.
    pub fn next_signal(&mut self, job_id: &str, now: Instant) -> Escalation {
        self.prune_stale(now);

        match self.history.get_mut(job_id) {
            None => {
                self.history.insert(
                    job_id.to_string(),
                    SignalHistory {
                        termed_at: now,
                        killed_at: None,
                    },
                );
                log::debug!("Sending SIGTERM to job {}.", job_id);
                Escalation::Term
            }
            Some(entry) if entry.killed_at.is_none() => {
                entry.killed_at = Some(now);
                log::warn!("Failed to SIGTERM job {}. Sending SIGKILL.", job_id);
                Escalation::Kill
            }
            Some(entry) => {
                entry.killed_at = Some(now);
                log::warn!("Failed to SIGKILL job {}. Terminating with scancel.", job_id);
                Escalation::Cancel
            }
        }
    }

    /// Removes every job whose most recent signal is older than the stale window.
    pub fn prune_stale(&mut self, now: Instant) {
        let window = self.stale_window;
        self.history.retain(|job_id, entry| {
            let fresh = now.saturating_duration_since(entry.last_signal()) <= window;
            if !fresh {
                log::debug!("Forgetting stale signal history of job {}.", job_id);
            }
            fresh
        });
    }

    /// The current state of `job_id`.
    pub fn state(&self, job_id: &str) -> EscalationState {
        match self.history.get(job_id) {
            None => EscalationState::Clean,
            Some(entry) if entry.killed_at.is_none() => EscalationState::Termed,
            Some(_) => EscalationState::Killed,
        }
    }

    /// Forgets `job_id` immediately.
    pub fn forget(&mut self, job_id: &str) {
        self.history.remove(job_id);
    }
}

impl Default for EscalationTracker {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_STALE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    #[test]
    fn test_three_attempts_escalate() {
        let mut tracker = EscalationTracker::new(WINDOW);
        let t0 = Instant::now();

        assert_eq!(tracker.next_signal("42", t0), Escalation::Term);
        assert_eq!(tracker.state("42"), EscalationState::Termed);
        assert_eq!(tracker.next_signal("42", t0 + Duration::from_secs(5)), Escalation::Kill);
        assert_eq!(tracker.state("42"), EscalationState::Killed);
        assert_eq!(tracker.next_signal("42", t0 + Duration::from_secs(10)), Escalation::Cancel);
        // Killed is terminal until the history goes stale.
        assert_eq!(tracker.next_signal("42", t0 + Duration::from_secs(15)), Escalation::Cancel);
    }

    #[test]
    fn test_stale_history_restarts_at_term() {
        let mut tracker = EscalationTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.next_signal("42", t0);
        tracker.next_signal("42", t0);

        let later = t0 + WINDOW + Duration::from_secs(1);
        tracker.prune_stale(later);
        assert_eq!(tracker.state("42"), EscalationState::Clean);
        assert_eq!(tracker.next_signal("42", later), Escalation::Term);
    }

    #[test]
    fn test_next_signal_prunes_first() {
        let mut tracker = EscalationTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.next_signal("7", t0);
        let later = t0 + WINDOW * 2;
        assert_eq!(tracker.next_signal("7", later), Escalation::Term);
    }

    #[test]
    fn test_prune_uses_most_recent_signal() {
        let mut tracker = EscalationTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.next_signal("1", t0);
        let kill_time = t0 + WINDOW - Duration::from_secs(1);
        tracker.next_signal("1", kill_time);

        // Past the window for TERM, inside it for KILL.
        tracker.prune_stale(t0 + WINDOW + Duration::from_secs(10));
        assert_eq!(tracker.state("1"), EscalationState::Killed);
    }

    #[test]
    fn test_jobs_are_independent() {
        let mut tracker = EscalationTracker::new(WINDOW);
        let t0 = Instant::now();
        tracker.next_signal("1", t0);
        assert_eq!(tracker.next_signal("2", t0), Escalation::Term);
        assert_eq!(tracker.state("1"), EscalationState::Termed);

        tracker.forget("1");
        assert_eq!(tracker.state("1"), EscalationState::Clean);
    }

    #[test]
    fn test_signal_args() {
        assert_eq!(Escalation::Term.signal_arg(), Some("--signal=TERM"));
        assert_eq!(Escalation::Kill.signal_arg(), Some("--signal=KILL"));
        assert_eq!(Escalation::Cancel.signal_arg(), None);
    }
}
