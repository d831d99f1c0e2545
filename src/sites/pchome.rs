//! PChome search API: JSON rendered as plain text, plus detail pages for
//! the full product name.

use crate::config::Settings;
use crate::error::{Result, ShopError};
use crate::selectors::{BODY_SELECTOR, PRE_SELECTOR};
use crate::tools::enrich::{enrich_titles, EnrichOptions};
use crate::tools::extract::{clean_text, Candidate, ExtractionIncomplete, ImageRules, RawCandidate};
use crate::tools::fetch::{fetch_page, search_url, FetchOptions, Pause, Ready};
use crate::tools::locate::SelectorChain;
use crate::tools::paginate::{paginate, ListingSource, PageOutcome};
use crate::tools::session::Browser;
use crate::types::{Platform, ProductCount};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

pub const SEARCH_URL: &str =
    "https://ecshweb.pchome.com.tw/search/v3.3/all/results?q={kw}&page={page}&sort=sale/dc";
pub const PRODUCT_URL: &str = "https://24h.pchome.com.tw/prod/";

const IMAGES: ImageRules = ImageRules {
    root: "https://cs.ecimg.tw",
    bare_prefix: "https://cs.ecimg.tw/",
    host_marker: None,
};

pub static SECONDARY_NAME: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "span.o-prodMainName__colorSecondary.o-prodMainName__colorSecondary--1700[aria-hidden='true']",
        "span.o-prodMainName__colorSecondary",
    ])
});

/// One page of search results. Records stay raw until [`page_outcome`] so
/// one malformed entry only costs itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "totalRows", default)]
    pub total_rows: Value,
    #[serde(default)]
    pub prods: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(rename = "picB", default)]
    pub pic_b: Option<String>,
}

impl SearchPayload {
    pub fn total(&self) -> u64 {
        as_count(&self.total_rows).unwrap_or(0)
    }
}

impl Record {
    pub fn decode(value: Value) -> std::result::Result<Candidate, ExtractionIncomplete> {
        let record: Record = serde_json::from_value(value).map_err(|e| {
            debug!(error = %e, "record did not decode");
            ExtractionIncomplete::Undecodable
        })?;
        record.into_candidate()
    }

    pub fn into_candidate(self) -> std::result::Result<Candidate, ExtractionIncomplete> {
        let id = self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
        RawCandidate {
            title: self.name.map(|n| clean_text(&n)),
            price: as_count(&self.price),
            detail_url: id.as_ref().map(|id| format!("{PRODUCT_URL}{id}")),
            image_url: self.pic_b.and_then(|p| IMAGES.normalize(&p)),
            sku: id.unwrap_or_default(),
        }
        .admit()
    }
}

/// Non-negative integer from a JSON number or numeric string.
fn as_count(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// JSON text of a page: the `<pre>` Chrome wraps plain-text responses in,
/// else the body text, else the raw source.
pub fn payload_text(html: &str) -> String {
    if html.trim_start().starts_with(['{', '[']) {
        return html.to_string();
    }
    let doc = Html::parse_document(html);
    let text_of = |sel: &Selector| {
        doc.select(sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .filter(|t| !t.trim().is_empty())
    };
    text_of(&PRE_SELECTOR)
        .or_else(|| text_of(&BODY_SELECTOR))
        .unwrap_or_else(|| html.to_string())
}

pub fn parse_payload(html: &str) -> Result<SearchPayload> {
    serde_json::from_str(payload_text(html).trim())
        .map_err(|e| ShopError::ParseError(format!("search response is not valid JSON: {e}")))
}

pub fn page_outcome(payload: SearchPayload) -> PageOutcome {
    let records = payload.prods.unwrap_or_default();
    let raw_listings = records.len();
    let mut candidates = Vec::with_capacity(raw_listings);
    for value in records {
        match Record::decode(value) {
            Ok(candidate) => candidates.push(candidate),
            Err(why) => debug!(%why, "record dropped"),
        }
    }
    PageOutcome {
        raw_listings,
        candidates,
    }
}

/// [`ListingSource`] over the search API.
pub struct PchomeListings<'a> {
    browser: &'a mut dyn Browser,
    settings: &'a Settings,
}

impl<'a> PchomeListings<'a> {
    pub fn new(browser: &'a mut dyn Browser, settings: &'a Settings) -> Self {
        Self { browser, settings }
    }
}

fn fetch_options(settings: &Settings) -> FetchOptions {
    FetchOptions {
        retry: settings.retry,
        settle: Duration::from_millis(settings.pchome.settle_ms),
    }
}

#[async_trait]
impl ListingSource for PchomeListings<'_> {
    fn platform(&self) -> Platform {
        Platform::Pchome
    }

    async fn fetch_page(&mut self, keyword: &str, page: u32) -> Result<PageOutcome> {
        let url = search_url(SEARCH_URL, keyword, page);
        let opts = fetch_options(self.settings);
        let html = fetch_page(&mut *self.browser, &url, Ready::Loaded, &opts)
            .await?
            .into_html();
        Ok(page_outcome(parse_payload(&html)?))
    }

    fn pause(&self) -> Pause {
        self.settings.pchome.page_pause
    }
}

/// Up to `target` candidates for `keyword`, titles completed from the
/// detail pages.
pub async fn collect(
    browser: &mut dyn Browser,
    keyword: &str,
    target: usize,
    settings: &Settings,
) -> Vec<Candidate> {
    let paginated = {
        let mut source = PchomeListings::new(&mut *browser, settings);
        paginate(&mut source, keyword, target, settings.full_page_listings).await
    };

    if !settings.pchome.enrich.enabled {
        return paginated.candidates;
    }
    let opts = EnrichOptions::from(&settings.pchome.enrich);
    enrich_titles(browser, paginated.candidates, &SECONDARY_NAME, &opts).await
}

/// Result total reported by the first page.
pub async fn count(
    browser: &mut dyn Browser,
    keyword: &str,
    target: u64,
    settings: &Settings,
) -> ProductCount {
    match first_page_total(browser, keyword, settings).await {
        Ok(total) => {
            info!(platform = "pchome", keyword, total, "result count");
            ProductCount::found(Platform::Pchome, keyword, total, target)
        }
        Err(e) => ProductCount::failed(Platform::Pchome, keyword, e),
    }
}

async fn first_page_total(browser: &mut dyn Browser, keyword: &str, settings: &Settings) -> Result<u64> {
    let url = search_url(SEARCH_URL, keyword, 1);
    let html = fetch_page(browser, &url, Ready::Loaded, &fetch_options(settings))
        .await?
        .into_html();
    Ok(parse_payload(&html)?.total())
}
