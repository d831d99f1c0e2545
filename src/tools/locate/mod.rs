//! Element Locator
//!
//! Sites reshuffle their listing markup often, so containers and fields are
//! found through priority-ordered selector chains: the first selector with at
//! least one match wins.

mod tests;

use crate::error::Result;
use crate::tools::session::Browser;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Priority-ordered CSS selectors.
#[derive(Debug)]
pub struct SelectorChain {
    entries: Vec<(&'static str, Selector)>,
}

impl SelectorChain {
    /// Compile `css` in order. Selectors that fail to parse are skipped.
    pub fn new(css: &[&'static str]) -> Self {
        let entries = css
            .iter()
            .filter_map(|&s| match Selector::parse(s) {
                Ok(sel) => Some((s, sel)),
                Err(e) => {
                    warn!(selector = s, error = %e, "skipping invalid selector");
                    None
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Selector)> {
        self.entries.iter().map(|(css, sel)| (*css, sel))
    }
}

/// Elements matched by the winning selector of a chain.
#[derive(Debug)]
pub struct Located<'a> {
    pub selector: &'static str,
    pub elements: Vec<ElementRef<'a>>,
}

/// Evaluate `chain` against the whole document.
pub fn locate<'a>(doc: &'a Html, chain: &SelectorChain) -> Option<Located<'a>> {
    chain.iter().find_map(|(css, sel)| {
        let elements: Vec<_> = doc.select(sel).collect();
        (!elements.is_empty()).then_some(Located {
            selector: css,
            elements,
        })
    })
}

/// Winning selector for `html`, if any.
pub fn matching_selector(html: &str, chain: &SelectorChain) -> Option<&'static str> {
    let doc = Html::parse_document(html);
    locate(&doc, chain).map(|found| found.selector)
}

/// Poll the focused tab until some selector in `chain` matches or `wait`
/// runs out. Returns the page source that matched.
pub async fn wait_for_listings(
    browser: &mut dyn Browser,
    chain: &SelectorChain,
    wait: Duration,
    poll: Duration,
) -> Result<Option<String>> {
    let deadline = Instant::now() + wait;
    loop {
        let html = browser.source().await?;
        if let Some(selector) = matching_selector(&html, chain) {
            debug!(selector, "listings located");
            return Ok(Some(html));
        }
        if Instant::now() >= deadline {
            debug!(waited_ms = wait.as_millis() as u64, "no listing selector matched");
            return Ok(None);
        }
        sleep(poll).await;
    }
}
