/// Speed and accuracy of a session at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    pub wpm: f64,
    /// Fraction in `[0, 1]`
    pub accuracy: f64,
}

impl Score {
    pub fn accuracy_percent(&self) -> f64 {
        (self.accuracy * 100.0).round()
    }
}

/// Number of positions where `typed` matches `target`.
pub fn correct_chars(typed: &str, target: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count()
}

/// `correct / (typed_len + backspace_errors)`, or 0 when nothing was typed or erased.
pub fn accuracy(typed: &str, target: &str, backspace_errors: u32) -> f64 {
    let denominator = typed.chars().count() + backspace_errors as usize;
    if denominator == 0 {
        return 0.0;
    }

    correct_chars(typed, target) as f64 / denominator as f64
}

/// Words per minute over the attempted part of the target, discounted by accuracy.
pub fn wpm(
    typed: &str,
    target: &str,
    time_left: u32,
    duration: u32,
    backspace_errors: u32,
) -> f64 {
    let typed_len = typed.chars().count();
    if typed_len == 0 {
        return 0.0;
    }

    let elapsed = duration as i64 - time_left as i64;
    if elapsed <= 0 {
        return 0.0;
    }

    let attempted: String = target.chars().take(typed_len).collect();
    let word_count = attempted.split_whitespace().count();

    let raw = word_count as f64 / elapsed as f64 * 60.0;
    round_tenth(raw * accuracy(typed, target, backspace_errors))
}

pub fn score(
    typed: &str,
    target: &str,
    time_left: u32,
    duration: u32,
    backspace_errors: u32,
) -> Score {
    Score {
        wpm: wpm(typed, target, time_left, duration, backspace_errors),
        accuracy: accuracy(typed, target, backspace_errors),
    }
}

/// Rounds to one decimal, halves away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
