use super::retry::RetryPolicy;
use crate::tools::locate::SelectorChain;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When a navigated page counts as loaded.
#[derive(Debug, Clone, Copy)]
pub enum Ready<'c> {
    /// The source is taken as soon as the settle time has passed.
    Loaded,
    /// Poll the DOM until a listing selector matches. A page with no match
    /// is retried like a failed load.
    Listings {
        chain: &'c SelectorChain,
        wait: Duration,
        poll: Duration,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub retry: RetryPolicy,
    /// Wait after navigation before the DOM is read.
    pub settle: Duration,
}

/// Result of a page fetch including telemetry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// Rendered page source
    pub html: String,
    /// Number of attempts before success
    pub attempts: u32,
    /// Total duration in milliseconds, backoff included
    pub duration_ms: u64,
}

impl FetchResult {
    pub fn into_html(self) -> String {
        self.html
    }
}
