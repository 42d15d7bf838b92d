//! Statistical anomaly detectors over reputation scores, validator response
//! times, and voting patterns (spec §4.10).

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use wot_types::Address;

const REPUTATION_HISTORY: usize = 100;
const REPUTATION_Z_THRESHOLD: f64 = 2.5;

const RESPONSE_TIME_HISTORY: usize = 100;
const RESPONSE_TIME_SLOW_FRACTION: f64 = 0.5;
const RESPONSE_TIME_CV_THRESHOLD: f64 = 1.5;

const VOTE_HISTORY: usize = 50;
const VOTE_ONE_SIGNED_FRACTION: f64 = 0.95;
const VOTE_IDENTICAL_FRACTION: f64 = 0.80;
const VOTE_IDENTICAL_MIN_SAMPLE: usize = 20;

fn mean(values: &VecDeque<f64>) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn stddev(values: &VecDeque<f64>, mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Flags a new reputation score whose z-score against an address's last 100
/// scores exceeds 2.5 in magnitude (spec §4.10).
#[derive(Default)]
pub struct ReputationAnomalyDetector {
    history: RwLock<HashMap<Address, VecDeque<f64>>>,
}

impl ReputationAnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `address` and report whether it is anomalous
    /// relative to the history observed *before* this call.
    pub fn observe(&self, address: Address, score: i16) -> bool {
        let mut history = self.history.write();
        let series = history.entry(address).or_default();

        let flagged = if series.len() >= 2 {
            let m = mean(series);
            let sd = stddev(series, m);
            if sd > f64::EPSILON {
                ((score as f64 - m) / sd).abs() > REPUTATION_Z_THRESHOLD
            } else {
                false
            }
        } else {
            false
        };

        series.push_back(score as f64);
        if series.len() > REPUTATION_HISTORY {
            series.pop_front();
        }
        flagged
    }
}

/// Flags validators whose recent response-time history looks either
/// consistently slow or erratic (spec §4.10).
#[derive(Default)]
pub struct ValidatorAnomalyDetector {
    history: RwLock<HashMap<Address, VecDeque<f64>>>,
}

impl ValidatorAnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response time (in milliseconds) for `validator` and report
    /// whether its updated history looks anomalous.
    pub fn observe(&self, validator: Address, response_time_ms: u32) -> bool {
        let mut history = self.history.write();
        let series = history.entry(validator).or_default();
        series.push_back(response_time_ms as f64);
        if series.len() > RESPONSE_TIME_HISTORY {
            series.pop_front();
        }
        if series.len() < 2 {
            return false;
        }
        let m = mean(series);
        let sd = stddev(series, m);
        let slow_count = series.iter().filter(|&&t| t > m + sd).count();
        let slow = slow_count as f64 / series.len() as f64 > RESPONSE_TIME_SLOW_FRACTION;
        let erratic = m > f64::EPSILON && sd / m > RESPONSE_TIME_CV_THRESHOLD;
        slow || erratic
    }
}

/// Flags validators whose recent votes look one-sided or suspiciously
/// uniform (spec §4.10). Votes are represented as `-1` (reject), `0`
/// (abstain), `1` (accept) so this crate carries no dependency on
/// `wot-consensus`'s `ValidationVote`.
#[derive(Default)]
pub struct VotingAnomalyDetector {
    history: RwLock<HashMap<Address, VecDeque<i8>>>,
}

impl VotingAnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `vote` for `validator` and report whether its updated history
    /// looks anomalous.
    pub fn observe(&self, validator: Address, vote: i8) -> bool {
        let mut history = self.history.write();
        let series = history.entry(validator).or_default();
        series.push_back(vote);
        if series.len() > VOTE_HISTORY {
            series.pop_front();
        }

        let non_abstain = series.iter().filter(|&&v| v != 0).count();
        let one_signed = if non_abstain > 0 {
            let positive = series.iter().filter(|&&v| v > 0).count();
            let negative = series.iter().filter(|&&v| v < 0).count();
            positive.max(negative) as f64 / non_abstain as f64 > VOTE_ONE_SIGNED_FRACTION
        } else {
            false
        };

        let identical = if series.len() >= VOTE_IDENTICAL_MIN_SAMPLE {
            let mut counts: HashMap<i8, usize> = HashMap::new();
            for &v in series.iter() {
                *counts.entry(v).or_insert(0) += 1;
            }
            let dominant = counts.values().copied().max().unwrap_or(0);
            dominant as f64 / series.len() as f64 > VOTE_IDENTICAL_FRACTION
        } else {
            false
        };

        one_signed || identical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn reputation_anomaly_flags_large_z_score_deviation() {
        let detector = ReputationAnomalyDetector::new();
        for _ in 0..20 {
            detector.observe(addr(1), 50);
        }
        assert!(detector.observe(addr(1), 95));
    }

    #[test]
    fn reputation_anomaly_does_not_flag_stable_scores() {
        let detector = ReputationAnomalyDetector::new();
        for _ in 0..20 {
            assert!(!detector.observe(addr(1), 50));
        }
    }

    #[test]
    fn validator_anomaly_flags_erratic_response_times() {
        let detector = ValidatorAnomalyDetector::new();
        let mut flagged = false;
        for t in [10, 10, 10, 5000, 10, 8000, 10, 9000] {
            flagged = detector.observe(addr(1), t) || flagged;
        }
        assert!(flagged);
    }

    #[test]
    fn voting_anomaly_flags_one_sided_history() {
        let detector = VotingAnomalyDetector::new();
        let mut flagged = false;
        for _ in 0..20 {
            flagged = detector.observe(addr(1), 1) || flagged;
        }
        assert!(flagged);
    }

    #[test]
    fn voting_anomaly_flags_identical_values_on_large_sample() {
        let detector = VotingAnomalyDetector::new();
        let mut flagged = false;
        for i in 0..25 {
            let vote = if i == 0 { 0 } else { 1 };
            flagged = detector.observe(addr(1), vote) || flagged;
        }
        assert!(flagged);
    }

    #[test]
    fn voting_anomaly_ignores_balanced_small_sample() {
        let detector = VotingAnomalyDetector::new();
        assert!(!detector.observe(addr(1), 1));
        assert!(!detector.observe(addr(1), -1));
    }
}
