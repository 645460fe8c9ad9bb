//! # Audio Feedback
//!
//! Fire-and-forget audio cue for "move aside" classifications. Never on the
//! critical path: the scan commit has already happened before the cue is
//! dispatched, and nothing ever awaits it.
//!
//! ## Throttling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cue Dispatch                                       │
//! │                                                                         │
//! │  classification commit ──► Feedback::trigger()                          │
//! │                                 │                                       │
//! │                    enabled? ────┼──── no ──► drop                       │
//! │                                 │                                       │
//! │                    CueGate ─────┼──── < 150ms since last ──► drop       │
//! │                                 │         (never queued)                │
//! │                                 ▼                                       │
//! │                    tokio::spawn(cue) ── fire and forget                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rapid scan burst therefore produces at most one cue per 150 ms of wall
//! clock; everything else is silently dropped.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::warn;

/// Minimum wall-clock gap between two cues.
pub const CUE_THROTTLE: Duration = Duration::from_millis(150);

// =============================================================================
// Cue Gate
// =============================================================================

/// Pure throttle: admits a trigger only when enough wall clock has passed
/// since the last admitted one. Dropped triggers are gone, never queued.
#[derive(Debug)]
pub struct CueGate {
    min_gap: Duration,
    last: Option<Instant>,
}

impl CueGate {
    pub fn new(min_gap: Duration) -> Self {
        CueGate {
            min_gap,
            last: None,
        }
    }

    /// Returns whether a trigger at `now` is admitted, recording it if so.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.min_gap => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

// =============================================================================
// Cue Implementations
// =============================================================================

/// A one-shot audio/visual cue. Implementations must be cheap and must not
/// block the caller for long; they run on a spawned task.
pub trait Cue: Send + Sync + 'static {
    fn play(&self);
}

/// Rings the terminal bell. Best effort: a write failure is logged and
/// otherwise ignored.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Cue for TerminalBell {
    fn play(&self) {
        let mut stderr = std::io::stderr();
        if stderr.write_all(b"\x07").and_then(|_| stderr.flush()).is_err() {
            warn!("audio cue failed");
        }
    }
}

// =============================================================================
// Feedback Dispatcher
// =============================================================================

/// Throttled, toggleable cue dispatcher.
pub struct Feedback {
    gate: Mutex<CueGate>,
    cue: Arc<dyn Cue>,
    enabled: AtomicBool,
}

impl Feedback {
    pub fn new(cue: Arc<dyn Cue>) -> Self {
        Feedback {
            gate: Mutex::new(CueGate::new(CUE_THROTTLE)),
            cue,
            enabled: AtomicBool::new(true),
        }
    }

    /// Operator toggle.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Fire-and-forget dispatch. Returns immediately; the cue itself runs
    /// on a spawned task (or not at all, when disabled or throttled).
    pub fn trigger(&self) {
        if !self.enabled() {
            return;
        }
        let admitted = {
            let mut gate = self.gate.lock().expect("cue gate mutex poisoned");
            gate.admit(Instant::now())
        };
        if !admitted {
            return;
        }
        let cue = Arc::clone(&self.cue);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    cue.play();
                });
            }
            // No runtime (unit tests, early startup): play inline, the
            // cue is cheap by contract.
            Err(_) => cue.play(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_gate_admits_first_trigger() {
        let mut gate = CueGate::new(CUE_THROTTLE);
        assert!(gate.admit(Instant::now()));
    }

    #[test]
    fn test_gate_drops_within_throttle_window() {
        let mut gate = CueGate::new(CUE_THROTTLE);
        let t0 = Instant::now();

        assert!(gate.admit(t0));
        assert!(!gate.admit(t0 + Duration::from_millis(100)));
        assert!(!gate.admit(t0 + Duration::from_millis(149)));
        assert!(gate.admit(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_gate_dropped_triggers_are_not_queued() {
        let mut gate = CueGate::new(CUE_THROTTLE);
        let t0 = Instant::now();

        assert!(gate.admit(t0));
        // Three drops inside the window...
        for ms in [10, 60, 120] {
            assert!(!gate.admit(t0 + Duration::from_millis(ms)));
        }
        // ...and only one admission once it reopens.
        assert!(gate.admit(t0 + Duration::from_millis(200)));
        assert!(!gate.admit(t0 + Duration::from_millis(210)));
    }

    struct CountingCue(AtomicUsize);

    impl Cue for CountingCue {
        fn play(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_disabled_feedback_never_plays() {
        let cue = Arc::new(CountingCue(AtomicUsize::new(0)));
        let feedback = Feedback::new(cue.clone());

        feedback.set_enabled(false);
        feedback.trigger();
        tokio::task::yield_now().await;

        assert_eq!(cue.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_burst_is_throttled_to_one_cue() {
        let cue = Arc::new(CountingCue(AtomicUsize::new(0)));
        let feedback = Feedback::new(cue.clone());

        for _ in 0..10 {
            feedback.trigger();
        }
        // Let any spawned tasks run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(cue.0.load(Ordering::SeqCst), 1);
    }
}
