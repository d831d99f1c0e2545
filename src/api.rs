use crate::config::Settings;
use crate::error::Result;
use crate::log::ActivityLogger;
use crate::sites::Extractor;
use crate::tools::session::{Browser, WebDriverSession};
use crate::types::*;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::warn;

// Activity logging never breaks the operation it records
fn log_info(platform: Option<Platform>, event: &str, details: &str) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.info(platform, event, Some(details));
    }
}

fn log_error(platform: Option<Platform>, event: &str, details: &str) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.error(platform, event, Some(details));
    }
}

async fn close_session(mut session: WebDriverSession) {
    if let Err(e) = session.quit().await {
        warn!(error = %e, "browser session did not shut down cleanly");
    }
}

/* ------------ extraction entrypoints ------------ */

/// Extract up to `target` products for `keyword` in a fresh browser session.
///
/// Fails only when the session cannot be started. The session is closed
/// before returning.
pub async fn extract(
    platform: Platform,
    keyword: &str,
    target: usize,
    settings: &Settings,
) -> Result<Vec<ExtractedProduct>> {
    let start_time = Instant::now();
    let mut session = match WebDriverSession::open(&settings.browser).await {
        Ok(session) => session,
        Err(e) => {
            let details = format!("keyword={keyword} session failed in {}ms: {e}", start_time.elapsed().as_millis());
            log_error(Some(platform), "extract", &details);
            return Err(e);
        }
    };

    let products = extract_with(&mut session, platform, keyword, target, settings).await;
    close_session(session).await;

    let details = format!(
        "keyword={keyword} {}/{target} products in {}ms",
        products.len(),
        start_time.elapsed().as_millis()
    );
    log_info(Some(platform), "extract", &details);
    Ok(products)
}

/// Extract using a session the caller owns.
pub async fn extract_with(
    browser: &mut dyn Browser,
    platform: Platform,
    keyword: &str,
    target: usize,
    settings: &Settings,
) -> Vec<ExtractedProduct> {
    Extractor::new(platform, settings)
        .extract(browser, keyword, target)
        .await
}

/* ------------ availability checks ------------ */

/// Whether `keyword` has at least `target` results on `platform`. Failures,
/// including a session that cannot start, are reported inside the result.
pub async fn check_count(
    platform: Platform,
    keyword: &str,
    target: u64,
    settings: &Settings,
) -> ProductCount {
    let start_time = Instant::now();
    let count = match WebDriverSession::open(&settings.browser).await {
        Ok(mut session) => {
            let count = Extractor::new(platform, settings)
                .count(&mut session, keyword, target)
                .await;
            close_session(session).await;
            count
        }
        Err(e) => ProductCount::failed(platform, keyword, e),
    };

    let details = format!(
        "keyword={keyword} count={} target={target} in {}ms",
        count.actual_count,
        start_time.elapsed().as_millis()
    );
    match &count.error {
        None => log_info(Some(platform), "check", &details),
        Some(err) => log_error(Some(platform), "check", &format!("{details}: {err}")),
    }
    count
}

/// Check both platforms one after the other.
pub async fn check_both(keyword: &str, target: u64, settings: &Settings) -> CountCheck {
    let momo = check_count(Platform::Momo, keyword, target, settings).await;
    let pchome = check_count(Platform::Pchome, keyword, target, settings).await;
    CountCheck::new(keyword, target, momo, pchome)
}

/* ------------ export ------------ */

/// Label every product with the keyword it was searched under.
pub fn attach_query(products: &mut [ExtractedProduct], query: &str) {
    for product in products {
        product.query = Some(query.to_string());
    }
}

/// Write `products` as a pretty-printed UTF-8 JSON array, replacing any
/// existing file. With `query`, each product is labelled first.
pub fn export_products(path: &Path, products: &[ExtractedProduct], query: Option<&str>) -> Result<()> {
    let mut products = products.to_vec();
    if let Some(query) = query {
        attach_query(&mut products, query);
    }
    let json = serde_json::to_string_pretty(&products)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, json)?;
    Ok(())
}

/// Read back a file written by [`export_products`].
pub fn load_products(path: &Path) -> Result<Vec<ExtractedProduct>> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Activity log lines, most recent first.
pub fn read_activity(platform: Option<Platform>, errors_only: bool) -> Result<Vec<String>> {
    ActivityLogger::new()?.read_logs(platform, errors_only)
}
