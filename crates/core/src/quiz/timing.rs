use serde::{Deserialize, Serialize};

/// Thresholds used to bucket response times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuizTiming {
    pub fast_secs: f64,
    pub slow_secs: f64,
}

impl Default for QuizTiming {
    fn default() -> Self {
        Self {
            fast_secs: 5.0,
            slow_secs: 60.0,
        }
    }
}

/// Display-only pace bucket. Never gates submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePace {
    Fast,
    Normal,
    Slow,
}

impl ResponsePace {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Fast => "timer-fast",
            Self::Normal => "timer-normal",
            Self::Slow => "timer-slow",
        }
    }
}

impl QuizTiming {
    /// Keeps `fast_secs <= slow_secs`; non-finite or negative values fall back to defaults.
    #[must_use]
    pub fn new(fast_secs: f64, slow_secs: f64) -> Self {
        let defaults = Self::default();
        let fast_secs = if fast_secs.is_finite() && fast_secs >= 0.0 {
            fast_secs
        } else {
            defaults.fast_secs
        };
        let slow_secs = if slow_secs.is_finite() && slow_secs >= 0.0 {
            slow_secs
        } else {
            defaults.slow_secs
        };
        Self {
            fast_secs: fast_secs.min(slow_secs),
            slow_secs: slow_secs.max(fast_secs),
        }
    }

    #[must_use]
    pub fn pace(&self, elapsed_secs: f64) -> ResponsePace {
        if elapsed_secs < self.fast_secs {
            ResponsePace::Fast
        } else if elapsed_secs > self.slow_secs {
            ResponsePace::Slow
        } else {
            ResponsePace::Normal
        }
    }

    #[must_use]
    pub fn is_fast(&self, elapsed_secs: f64) -> bool {
        self.pace(elapsed_secs) == ResponsePace::Fast
    }
}

/// Ticker text: `⏱️ 12s` under a minute, `⏱️ 1:05` after.
#[must_use]
pub fn timer_label(elapsed_secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
        elapsed_secs.floor() as u64
    } else {
        0
    };
    let minutes = whole / 60;
    let seconds = whole % 60;
    if minutes > 0 {
        format!("⏱️ {minutes}:{seconds:02}")
    } else {
        format!("⏱️ {whole}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_buckets() {
        let timing = QuizTiming::default();
        assert_eq!(timing.pace(1.0), ResponsePace::Fast);
        assert_eq!(timing.pace(5.0), ResponsePace::Normal);
        assert_eq!(timing.pace(60.0), ResponsePace::Normal);
        assert_eq!(timing.pace(61.0), ResponsePace::Slow);
    }

    #[test]
    fn new_orders_thresholds() {
        let timing = QuizTiming::new(90.0, 10.0);
        assert!(timing.fast_secs <= timing.slow_secs);
        let fallback = QuizTiming::new(f64::NAN, -1.0);
        assert_eq!(fallback, QuizTiming::default());
    }

    #[test]
    fn labels() {
        assert_eq!(timer_label(0.4), "⏱️ 0s");
        assert_eq!(timer_label(42.9), "⏱️ 42s");
        assert_eq!(timer_label(65.0), "⏱️ 1:05");
        assert_eq!(timer_label(-3.0), "⏱️ 0s");
    }
}
