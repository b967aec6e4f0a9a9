use std::time::Duration;

use rand::Rng;

/// Exponential backoff for rate-limit retries: 15s, 30s, 60s, ... capped
/// at 10 minutes, scaled by a random factor in [0.7, 1.3].
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base_secs: f64,
    pub cap_secs: f64,
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_secs: 15.0,
            cap_secs: 600.0,
            max_retries: 5,
        }
    }
}

impl BackoffPolicy {
    /// `min(cap, base * 2^attempt)`, before jitter.
    pub fn raw_delay_secs(&self, attempt: u32) -> f64 {
        (self.base_secs * 2f64.powi(attempt as i32)).min(self.cap_secs)
    }

    /// Jittered delay for a unit-interval factor: the result spans
    /// [0.7, 1.3] of the raw delay as `factor` goes 0 to 1.
    pub fn delay_with_factor(&self, attempt: u32, factor: f64) -> Duration {
        Duration::from_secs_f64(self.raw_delay_secs(attempt) * (0.7 + factor * 0.6))
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with_factor(attempt, rand::thread_rng().gen())
    }
}

/// Pacing delay between units of work: `base + rand() * jitter`,
/// clamped at zero.
pub fn pacing_delay(base_secs: f64, jitter_secs: f64) -> Duration {
    if base_secs <= 0.0 && jitter_secs <= 0.0 {
        return Duration::ZERO;
    }
    let total = base_secs.max(0.0) + rand::thread_rng().gen::<f64>() * jitter_secs.max(0.0);
    Duration::from_secs_f64(total)
}
