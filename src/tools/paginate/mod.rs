//! Pagination Controller
//!
//! Walks search result pages until the target is met or the site runs dry.
//! Sites plug in through [`ListingSource`], which turns one page index into
//! admitted candidates.


use crate::error::Result;
use crate::tools::extract::Candidate;
use crate::tools::fetch::Pause;
use crate::types::Platform;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// One fetched and extracted search page.
#[derive(Debug, Clone, Default)]
pub struct PageOutcome {
    /// Listing containers on the page, admitted or not.
    pub raw_listings: usize,
    pub candidates: Vec<Candidate>,
}

#[async_trait]
pub trait ListingSource: Send {
    fn platform(&self) -> Platform;

    /// Fetch and extract page `page` (1-based) of the results for `keyword`.
    async fn fetch_page(&mut self, keyword: &str, page: u32) -> Result<PageOutcome>;

    /// Pause between consecutive pages.
    fn pause(&self) -> Pause;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    NoUsableProducts,
    ShortPage,
    FetchFailed,
}

#[derive(Debug, Clone)]
pub struct Paginated {
    /// At most `target` candidates in page order, then in-page order.
    pub candidates: Vec<Candidate>,
    /// Pages requested.
    pub pages: u32,
    pub stop: StopReason,
}

/// Collect up to `target` candidates from successive pages.
///
/// After each page, in order: stop once `target` is reached (the excess is
/// dropped), stop when the page added nothing new, stop when the page held
/// fewer than `full_page` listings. A failed page stops the walk and keeps
/// what was gathered. Candidates sharing a non-empty SKU with an earlier one
/// are skipped.
pub async fn paginate(
    source: &mut dyn ListingSource,
    keyword: &str,
    target: usize,
    full_page: usize,
) -> Paginated {
    let platform = source.platform();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page = 0;

    if target == 0 {
        return Paginated {
            candidates,
            pages: 0,
            stop: StopReason::TargetReached,
        };
    }

    let stop = loop {
        page += 1;
        let outcome = match source.fetch_page(keyword, page).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(%platform, page, error = %e, "page failed, stopping");
                break StopReason::FetchFailed;
            }
        };

        let mut fresh = 0;
        for candidate in outcome.candidates {
            if !candidate.sku.is_empty() && !seen.insert(candidate.sku.clone()) {
                debug!(%platform, sku = %candidate.sku, "duplicate listing skipped");
                continue;
            }
            candidates.push(candidate);
            fresh += 1;
        }
        debug!(
            %platform,
            page,
            raw = outcome.raw_listings,
            fresh,
            total = candidates.len(),
            "page extracted"
        );

        if candidates.len() >= target {
            candidates.truncate(target);
            break StopReason::TargetReached;
        }
        if fresh == 0 {
            break StopReason::NoUsableProducts;
        }
        if outcome.raw_listings < full_page {
            break StopReason::ShortPage;
        }

        source.pause().wait().await;
    };

    info!(%platform, keyword, pages = page, collected = candidates.len(), ?stop, "pagination finished");
    Paginated {
        candidates,
        pages: page,
        stop,
    }
}
