//! Single-subsystem circuit breaker state machine (spec §4.9, §8 property
//! 8).

use std::collections::VecDeque;

use wot_config::CircuitBreakerConfig;
use wot_types::Timestamp;

/// Circuit breaker state (spec §4.9).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// One subsystem's breaker: consecutive-failure and rolling failure-rate
/// tracking, plus the half-open trial budget.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Timestamp,
    half_open_in_flight: u32,
    /// `(timestamp, was_failure)` pairs within the rolling window, oldest
    /// first, used for the failure-rate trigger.
    window: VecDeque<(Timestamp, bool)>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        CircuitBreaker {
            config,
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: 0,
            half_open_in_flight: 0,
            window: VecDeque::new(),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    fn evict_stale(&mut self, now: Timestamp) {
        let window_secs = (self.config.window_size_ms / 1000) as Timestamp;
        while let Some(&(ts, _)) = self.window.front() {
            if now.saturating_sub(ts) >= window_secs {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }

    fn failure_rate_tripped(&self) -> bool {
        if self.window.len() < self.config.min_requests_for_rate as usize {
            return false;
        }
        let failures = self.window.iter().filter(|(_, f)| *f).count();
        failures as f64 / self.window.len() as f64 > self.config.failure_rate_threshold
    }

    /// Whether a request should be let through right now. Handles the
    /// `Open -> HalfOpen` transition after `open_duration_ms` elapses and the
    /// half-open trial cap (spec §4.9: "caps concurrent test requests").
    pub fn allow_request(&mut self, now: Timestamp) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed_ms = now.saturating_sub(self.opened_at) as u64 * 1000;
                if elapsed_ms >= self.config.open_duration_ms {
                    self.state = CircuitState::HalfOpen;
                    self.half_open_in_flight = 0;
                    self.consecutive_successes = 0;
                    self.allow_request(now)
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if self.half_open_in_flight < self.config.half_open_max_requests {
                    self.half_open_in_flight += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn open(&mut self, now: Timestamp) {
        self.state = CircuitState::Open;
        self.opened_at = now;
        self.consecutive_failures = 0;
        self.consecutive_successes = 0;
        warn!("circuit breaker opened at {}", now);
    }

    /// Record a successful call (spec §8 property 8: "from Closed, a stream
    /// of successes never transitions state").
    pub fn on_success(&mut self, now: Timestamp) {
        self.evict_stale(now);
        self.window.push_back((now, false));
        match self.state {
            CircuitState::Closed => {
                self.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                self.consecutive_successes += 1;
                if self.consecutive_successes >= self.config.success_threshold {
                    self.state = CircuitState::Closed;
                    self.consecutive_failures = 0;
                    self.consecutive_successes = 0;
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed call. `Closed -> Open` on `failure_threshold`
    /// consecutive failures or the rolling failure-rate trigger; any
    /// failure in `HalfOpen` sends it straight back to `Open`.
    pub fn on_failure(&mut self, now: Timestamp) {
        self.evict_stale(now);
        self.window.push_back((now, true));
        match self.state {
            CircuitState::Closed => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.config.failure_threshold || self.failure_rate_tripped() {
                    self.open(now);
                }
            }
            CircuitState::HalfOpen => self.open(now),
            CircuitState::Open => {}
        }
    }

    /// Force the breaker open regardless of history (used by emergency mode
    /// and shutdown drain, spec §5: "flips all circuit breakers to Open").
    pub fn force_open(&mut self, now: Timestamp) {
        self.open(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 5,
            success_threshold: 3,
            open_duration_ms: 30_000,
            half_open_max_requests: 3,
            failure_rate_threshold: 0.5,
            window_size_ms: 60_000,
            min_requests_for_rate: 10,
        }
    }

    #[test]
    fn closed_stream_of_successes_never_transitions() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..20 {
            breaker.on_success(t);
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn five_consecutive_failures_open_the_breaker() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..4 {
            breaker.on_failure(t);
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.on_failure(4);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn open_transitions_to_half_open_after_open_duration() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..5 {
            breaker.on_failure(t);
        }
        assert!(!breaker.allow_request(10));
        assert!(breaker.allow_request(35));
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
    }

    #[test]
    fn half_open_closes_after_success_threshold() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..5 {
            breaker.on_failure(t);
        }
        breaker.allow_request(35);
        breaker.on_success(35);
        breaker.on_success(36);
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.on_success(37);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn half_open_failure_reopens() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..5 {
            breaker.on_failure(t);
        }
        breaker.allow_request(35);
        breaker.on_failure(35);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn half_open_caps_concurrent_trial_requests() {
        let mut breaker = CircuitBreaker::new(config());
        for t in 0..5 {
            breaker.on_failure(t);
        }
        breaker.allow_request(35);
        assert!(breaker.allow_request(35));
        assert!(breaker.allow_request(35));
        assert!(!breaker.allow_request(35));
    }
}
