use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Standard word length used for words-per-minute
pub const CHARS_PER_WORD: f64 = 5.0;

/// Percentage of correct keystrokes, rounded. No keystrokes counts as 100.
pub fn accuracy(correct: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let correct = correct.min(total);
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

/// Words per minute over target characters, rounded.
///
/// A zero elapsed time yields 0 rather than an unbounded rate.
pub fn wpm(chars: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    ((chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Final stats kept by the session once it has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u8,
}

/// What is emitted to the result sink on finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u8,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl SessionResult {
    pub fn new(stats: Stats, timestamp: i64) -> Self {
        Self {
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            timestamp,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            wpm: self.wpm,
            accuracy: self.accuracy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_no_keystrokes() {
        assert_eq!(accuracy(0, 0), 100);
    }

    #[test]
    fn test_accuracy_ninety_percent() {
        assert_eq!(accuracy(18, 20), 90);
    }

    #[test]
    fn test_accuracy_rounds() {
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(1, 8), 13);
    }

    #[test]
    fn test_accuracy_is_bounded() {
        assert_eq!(accuracy(0, 17), 0);
        assert_eq!(accuracy(17, 17), 100);
        // correct never exceeds total in a session, but stay in range regardless
        assert_eq!(accuracy(30, 17), 100);
    }

    #[test]
    fn test_wpm_fifty_chars_one_minute() {
        assert_eq!(wpm(50, Duration::from_secs(60)), 10);
    }

    #[test]
    fn test_wpm_half_minute() {
        assert_eq!(wpm(50, Duration::from_secs(30)), 20);
        assert_eq!(wpm(12, Duration::from_secs(60)), 2);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm(50, Duration::ZERO), 0);
        assert_eq!(wpm(0, Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_result_serializes_wire_shape() {
        let result = SessionResult::new(
            Stats {
                wpm: 42,
                accuracy: 95,
            },
            1_700_000_000_000,
        );
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"wpm": 42, "accuracy": 95, "timestamp": 1_700_000_000_000_i64})
        );
        assert_eq!(result.stats().wpm, 42);
    }
}
