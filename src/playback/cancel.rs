//! Cooperative cancellation

use super::LoopExit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct TokenState {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

/// Shared stop signal with an optional deadline.
///
/// Clones observe the same state; cancelling any clone stops every loop
/// holding one. Loops poll the token once per iteration.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<TokenState>,
}

impl CancelToken {
    /// Token that only stops when cancelled
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Token that also stops `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout))
    }

    /// Token that also stops at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    fn build(deadline: Option<Instant>) -> Self {
        Self {
            state: Arc::new(TokenState {
                cancelled: AtomicBool::new(false),
                deadline,
            }),
        }
    }

    /// Request a stop
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    /// Deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.state.deadline
    }

    /// True once cancelled or past the deadline
    pub fn is_cancelled(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Why a loop holding this token should stop, if it should
    pub fn stop_reason(&self) -> Option<LoopExit> {
        if self.state.cancelled.load(Ordering::Acquire) {
            return Some(LoopExit::Cancelled);
        }
        match self.state.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(LoopExit::DeadlineElapsed),
            _ => None,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_visible_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert_eq!(clone.stop_reason(), Some(LoopExit::Cancelled));
    }

    #[test]
    fn test_deadline_elapses() {
        let token = CancelToken::with_timeout(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(token.stop_reason(), Some(LoopExit::DeadlineElapsed));
        token.cancel();
        assert_eq!(token.stop_reason(), Some(LoopExit::Cancelled));
    }

    #[test]
    fn test_past_deadline_is_already_elapsed() {
        let token = CancelToken::with_deadline(Instant::now());
        assert!(token.is_cancelled());
    }
}
