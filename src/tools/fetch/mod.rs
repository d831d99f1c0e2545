//! Page Fetcher
//!
//! Drives the browser session to a search page and hands back its rendered
//! source, retrying failed loads with a randomised backoff.

mod retry;
pub mod types;

pub use retry::{Pause, RetryPolicy};
pub use types::*;

use crate::error::{Result, ShopError};
use crate::tools::locate::wait_for_listings;
use crate::tools::session::Browser;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Expand a search URL template. `{kw}` becomes the percent-encoded keyword
/// and `{page}` the 1-based page index.
///
/// ```
/// use shopcmp::tools::fetch::search_url;
///
/// let url = search_url("https://shop.test/s?q={kw}&p={page}", "iphone 15", 2);
/// assert_eq!(url, "https://shop.test/s?q=iphone%2015&p=2");
/// ```
pub fn search_url(template: &str, keyword: &str, page: u32) -> String {
    template
        .replace("{kw}", &urlencoding::encode(keyword))
        .replace("{page}", &page.to_string())
}

/// Load `url` in the focused tab and return its source once `ready` holds.
///
/// Every attempt navigates afresh. Returns the last failure after the retry
/// policy is exhausted.
pub async fn fetch_page(
    browser: &mut dyn Browser,
    url: &str,
    ready: Ready<'_>,
    opts: &FetchOptions,
) -> Result<FetchResult> {
    let start = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let outcome = load_once(browser, url, ready, opts).await;

        let err = match outcome {
            Ok(html) => {
                debug!(url, attempt, "page fetched");
                return Ok(FetchResult {
                    html,
                    attempts: attempt,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => e,
        };

        if !opts.retry.should_retry(attempt) {
            warn!(url, attempts = attempt, error = %err, "giving up on page");
            return Err(err);
        }

        let delay = opts.retry.backoff_delay();
        warn!(
            url,
            attempt,
            error = %err,
            backoff_ms = delay.as_millis() as u64,
            "page load failed, retrying"
        );
        sleep(delay).await;
    }
}

async fn load_once(
    browser: &mut dyn Browser,
    url: &str,
    ready: Ready<'_>,
    opts: &FetchOptions,
) -> Result<String> {
    browser.goto(url).await?;
    sleep(opts.settle).await;

    match ready {
        Ready::Loaded => browser.source().await,
        Ready::Listings { chain, wait, poll } => wait_for_listings(browser, chain, wait, poll)
            .await?
            .ok_or_else(|| ShopError::FetchError(format!("no listings located on {url}"))),
    }
}
