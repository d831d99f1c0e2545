use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Uniformly random pause in `[min_ms, max_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pause {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pause {
    pub const fn between(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::between(ms, ms)
    }

    pub fn sample(&self) -> Duration {
        let ms = if self.max_ms <= self.min_ms {
            self.min_ms
        } else {
            fastrand::u64(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }

    pub async fn wait(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}

/// How often a page load is attempted and how long to back off in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Pause,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Pause::between(3_000, 6_000),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt follows attempt number `attempt` (1-based).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    pub fn backoff_delay(&self) -> Duration {
        self.backoff.sample()
    }
}
