//! Detail Enricher
//!
//! Search results sometimes carry a shortened product name; the detail page
//! has a secondary name fragment (usually the brand line) that is prepended
//! to it. Detail pages load in batches, one tab per candidate, so their load
//! times overlap.


use crate::config::EnrichSettings;
use crate::error::Result;
use crate::tools::extract::{clean_text, Candidate};
use crate::tools::locate::{locate, SelectorChain};
use crate::tools::session::{Browser, TabHandle};
use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    pub batch_size: usize,
    /// Wait after a batch has been opened before tabs are read.
    pub settle: Duration,
    pub batch_pause: Duration,
}

impl From<&EnrichSettings> for EnrichOptions {
    fn from(s: &EnrichSettings) -> Self {
        Self {
            batch_size: s.batch_size.max(1),
            settle: Duration::from_millis(s.settle_ms),
            batch_pause: Duration::from_millis(s.batch_pause_ms),
        }
    }
}

/// `"{secondary} {base}"`, or `base` when there is no secondary name.
pub fn compose_title(secondary: Option<&str>, base: &str) -> String {
    match secondary.map(str::trim).filter(|s| !s.is_empty()) {
        Some(secondary) => format!("{secondary} {base}"),
        None => base.to_string(),
    }
}

/// Secondary name text of a detail page.
pub fn secondary_name(html: &str, chain: &SelectorChain) -> Option<String> {
    let doc = Html::parse_document(html);
    let found = locate(&doc, chain)?;
    found
        .elements
        .iter()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// Prepend each candidate's secondary name. Order and count are preserved;
/// candidates whose page cannot be loaded or read keep their base title.
///
/// The tab focused on entry serves the first candidate of every batch and is
/// focused again on return. Every tab opened here is closed here.
pub async fn enrich_titles(
    browser: &mut dyn Browser,
    mut candidates: Vec<Candidate>,
    chain: &SelectorChain,
    opts: &EnrichOptions,
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return candidates;
    }
    let original = match browser.current_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            warn!(error = %e, "no focused tab, skipping enrichment");
            return candidates;
        }
    };

    let batches = candidates.len().div_ceil(opts.batch_size.max(1));
    let mut enriched = 0;
    for (idx, batch) in candidates.chunks_mut(opts.batch_size.max(1)).enumerate() {
        debug!(batch = idx + 1, of = batches, "enriching batch");
        enriched += enrich_batch(browser, &original, batch, chain, opts.settle).await;

        if idx + 1 < batches {
            sleep(opts.batch_pause).await;
        }
    }

    info!(total = candidates.len(), enriched, "detail enrichment finished");
    candidates
}

async fn enrich_batch(
    browser: &mut dyn Browser,
    original: &TabHandle,
    batch: &mut [Candidate],
    chain: &SelectorChain,
    settle: Duration,
) -> usize {
    let mut opened: Vec<TabHandle> = Vec::new();
    let mut slots: Vec<Option<TabHandle>> = Vec::with_capacity(batch.len());

    for (i, candidate) in batch.iter().enumerate() {
        let tab = if i == 0 {
            browser.switch_to(original).await.map(|_| original.clone())
        } else {
            browser.open_tab().await.map(|tab| {
                opened.push(tab.clone());
                tab
            })
        };
        let loaded = match tab {
            Ok(tab) => browser.goto(&candidate.detail_url).await.map(|_| tab),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(tab) => slots.push(Some(tab)),
            Err(e) => {
                warn!(url = %candidate.detail_url, error = %e, "detail page failed to open");
                slots.push(None);
            }
        }
    }

    sleep(settle).await;

    let mut enriched = 0;
    for (candidate, slot) in batch.iter_mut().zip(&slots) {
        let Some(tab) = slot else { continue };
        match read_tab(browser, tab).await {
            Ok(html) => {
                let secondary = secondary_name(&html, chain);
                if secondary.is_some() {
                    enriched += 1;
                }
                candidate.title = compose_title(secondary.as_deref(), &candidate.title);
            }
            Err(e) => warn!(url = %candidate.detail_url, error = %e, "detail page unreadable"),
        }
    }

    for tab in &opened {
        if let Err(e) = browser.close_tab(tab).await {
            warn!(%tab, error = %e, "failed to close tab");
        }
    }
    if let Err(e) = browser.switch_to(original).await {
        warn!(tab = %original, error = %e, "failed to refocus original tab");
    }
    enriched
}

async fn read_tab(browser: &mut dyn Browser, tab: &TabHandle) -> Result<String> {
    browser.switch_to(tab).await?;
    browser.source().await
}
