use std::time::Duration;

/// What to do about reconnection attempt number `attempt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait out the delay, then try to connect again
    RetryAfter(Duration),
    /// Attempts exhausted; stop retrying
    GiveUp,
}

/// Bounded fixed-interval reconnection policy
///
/// Pure decision logic: given the attempt number (starting at 1) and the
/// configured bound, either schedule the next attempt after the fixed
/// interval or give up. The delay is deliberately fixed rather than
/// exponential; each frame of this protocol is independent and the backend
/// imposes no connect-rate limits.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Decide whether attempt number `attempt` should run
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt > self.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(self.interval)
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
