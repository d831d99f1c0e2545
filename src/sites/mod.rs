//! Site Extractors
//!
//! One module per storefront. Each turns `(keyword, target)` into admitted
//! candidates using the shared tools; [`Extractor`] numbers the result.

pub mod momo;
pub mod pchome;

use crate::config::Settings;
use crate::tools::extract::Candidate;
use crate::tools::session::Browser;
use crate::types::{ExtractedProduct, Platform, ProductCount};
use tracing::info;

/// Extraction pipeline for one platform.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'s> {
    platform: Platform,
    settings: &'s Settings,
}

impl<'s> Extractor<'s> {
    pub fn new(platform: Platform, settings: &'s Settings) -> Self {
        Self { platform, settings }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// At most `target` products for `keyword`, numbered from 1.
    ///
    /// Page failures end the run early with whatever was collected; this
    /// never fails once a session exists.
    pub async fn extract(
        &self,
        browser: &mut dyn Browser,
        keyword: &str,
        target: usize,
    ) -> Vec<ExtractedProduct> {
        let candidates = match self.platform {
            Platform::Momo => momo::collect(browser, keyword, target, self.settings).await,
            Platform::Pchome => pchome::collect(browser, keyword, target, self.settings).await,
        };
        let products = number(self.platform, candidates);
        info!(platform = %self.platform, keyword, target, extracted = products.len(), "extraction finished");
        products
    }

    /// Whether `keyword` has at least `target` results.
    pub async fn count(&self, browser: &mut dyn Browser, keyword: &str, target: u64) -> ProductCount {
        match self.platform {
            Platform::Momo => momo::count(browser, keyword, target, self.settings).await,
            Platform::Pchome => pchome::count(browser, keyword, target, self.settings).await,
        }
    }
}

/// Assign `sequence_id`s 1..=n in order.
pub fn number(platform: Platform, candidates: Vec<Candidate>) -> Vec<ExtractedProduct> {
    candidates
        .into_iter()
        .zip(1u32..)
        .map(|(candidate, seq)| candidate.into_product(platform, seq))
        .collect()
}
