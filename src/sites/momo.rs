//! momo search pages: rendered DOM, one `<li>` per listing.

use crate::config::Settings;
use crate::error::Result;
use crate::tools::extract::{
    extract_image, extract_link, extract_price, extract_title, sku_from_url, Candidate,
    ExtractionIncomplete, FieldChain, ImageRules, RawCandidate, Read,
};
use crate::tools::fetch::{fetch_page, search_url, FetchOptions, Pause, Ready};
use crate::tools::locate::{locate, SelectorChain};
use crate::tools::paginate::{paginate, ListingSource, PageOutcome};
use crate::tools::session::Browser;
use crate::types::{Platform, ProductCount};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const SEARCH_URL: &str = "https://www.momoshop.com.tw/search/searchShop.jsp?keyword={kw}&searchType=1&cateLevel=0&ent=k&sortType=1&curPage={page}";
pub const ORIGIN: &str = "https://www.momoshop.com.tw";
pub const IMAGE_CDN: &str = "https://cdn3.momoshop.com.tw/momoshop/upload/media/";

/// A first page this full usually means at least three pages of results.
const FULL_FIRST_PAGE: u64 = 30;
const ESTIMATE_FACTOR: u64 = 3;

const IMAGES: ImageRules = ImageRules {
    root: ORIGIN,
    bare_prefix: IMAGE_CDN,
    host_marker: Some("momoshop"),
};

const IMAGE_ATTRS: &[&str] = &["src", "data-original", "data-src"];

static ORIGIN_URL: Lazy<Url> = Lazy::new(|| Url::parse(ORIGIN).expect("valid origin"));

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

pub static LISTINGS: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "li.listAreaLi",
        ".listAreaUl li.listAreaLi",
        "li.goodsItemLi",
        ".prdListArea .goodsItemLi",
        ".searchPrdListArea li",
        "li[data-gtm]",
        ".goodsItemLi",
        ".searchPrdList li",
    ])
});

static TITLE: Lazy<FieldChain> = Lazy::new(|| {
    FieldChain::new(&[
        ("h3.prdName", Read::Text),
        (".prdNameTitle h3.prdName", Read::Text),
        (".prdName", Read::Text),
        ("h3", Read::Text),
        ("a[title]", Read::Attr("title")),
        ("img[alt]", Read::Attr("alt")),
        (".goodsName", Read::Text),
        (".goodsInfo h3", Read::Text),
        ("a", Read::Text),
    ])
});

static PRICE: Lazy<FieldChain> = Lazy::new(|| {
    FieldChain::reading(
        &[
            ".money .price b",
            ".price b",
            ".money b",
            ".price",
            ".money",
            ".cost",
            "b",
            "strong",
            ".goodsPrice",
            ".priceInfo",
        ],
        Read::Text,
    )
});

static LINK: Lazy<FieldChain> = Lazy::new(|| {
    FieldChain::reading(
        &["a.goods-img-url", "a[href*='/goods/']", "a[href]"],
        Read::Attr("href"),
    )
});

static IMAGE: Lazy<FieldChain> =
    Lazy::new(|| FieldChain::reading(&["img.prdImg", "img"], Read::FirstAttr(IMAGE_ATTRS)));

static TOTAL_COUNT: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        ".searchListArea .searchTotal",
        ".searchTotal",
        "span.totalNum",
        ".totalResults",
        "div[class*='total']",
    ])
});

/// Pull one listing's fields and run the admission gate.
pub fn extract_listing(el: ElementRef<'_>) -> std::result::Result<Candidate, ExtractionIncomplete> {
    let detail_url = extract_link(el, &LINK, &ORIGIN_URL);
    let sku = detail_url.as_deref().map(sku_from_url).unwrap_or_default();
    RawCandidate {
        title: extract_title(el, &TITLE),
        price: extract_price(el, &PRICE),
        detail_url,
        image_url: extract_image(el, &IMAGE, &IMAGES),
        sku,
    }
    .admit()
}

/// Locate listings on a rendered search page and extract each one.
pub fn parse_listing_page(html: &str) -> PageOutcome {
    let doc = Html::parse_document(html);
    let Some(found) = locate(&doc, &LISTINGS) else {
        debug!("no listing selector matched");
        return PageOutcome::default();
    };

    let raw_listings = found.elements.len();
    let mut candidates = Vec::with_capacity(raw_listings);
    for el in found.elements {
        match extract_listing(el) {
            Ok(candidate) => candidates.push(candidate),
            Err(why) => debug!(%why, "listing dropped"),
        }
    }
    debug!(
        selector = found.selector,
        raw = raw_listings,
        admitted = candidates.len(),
        "listings extracted"
    );
    PageOutcome {
        raw_listings,
        candidates,
    }
}

/// Result total shown on the page, if any counter element carries digits.
pub fn parse_total_count(html: &str) -> Option<u64> {
    let doc = Html::parse_document(html);
    TOTAL_COUNT.iter().find_map(|(css, sel)| {
        let el = doc.select(sel).next()?;
        let text = el.text().collect::<String>().replace(',', "");
        let total = DIGITS_REGEX.find(&text)?.as_str().parse::<u64>().ok()?;
        debug!(selector = css, total, "result counter found");
        (total > 0).then_some(total)
    })
}

/// Rough total from the listings on the first page.
pub fn estimate_total(html: &str) -> u64 {
    let doc = Html::parse_document(html);
    let listed = locate(&doc, &LISTINGS).map_or(0, |found| found.elements.len()) as u64;
    if listed >= FULL_FIRST_PAGE {
        listed * ESTIMATE_FACTOR
    } else {
        listed
    }
}

/// [`ListingSource`] over momo search pages.
pub struct MomoListings<'a> {
    browser: &'a mut dyn Browser,
    settings: &'a Settings,
}

impl<'a> MomoListings<'a> {
    pub fn new(browser: &'a mut dyn Browser, settings: &'a Settings) -> Self {
        Self { browser, settings }
    }
}

#[async_trait]
impl ListingSource for MomoListings<'_> {
    fn platform(&self) -> Platform {
        Platform::Momo
    }

    async fn fetch_page(&mut self, keyword: &str, page: u32) -> Result<PageOutcome> {
        let cfg = &self.settings.momo;
        let url = search_url(SEARCH_URL, keyword, page);
        let ready = Ready::Listings {
            chain: &LISTINGS,
            wait: Duration::from_millis(cfg.locate_wait_ms),
            poll: Duration::from_millis(cfg.locate_poll_ms),
        };
        let opts = FetchOptions {
            retry: self.settings.retry,
            settle: Duration::from_millis(cfg.settle_ms),
        };
        let html = fetch_page(&mut *self.browser, &url, ready, &opts)
            .await?
            .into_html();
        Ok(parse_listing_page(&html))
    }

    fn pause(&self) -> Pause {
        self.settings.momo.page_pause
    }
}

/// Up to `target` admitted candidates for `keyword`, in result order.
pub async fn collect(
    browser: &mut dyn Browser,
    keyword: &str,
    target: usize,
    settings: &Settings,
) -> Vec<Candidate> {
    let mut source = MomoListings::new(browser, settings);
    paginate(&mut source, keyword, target, settings.full_page_listings)
        .await
        .candidates
}

/// How many results `keyword` has, judged from the first page.
pub async fn count(
    browser: &mut dyn Browser,
    keyword: &str,
    target: u64,
    settings: &Settings,
) -> ProductCount {
    match first_page_total(browser, keyword, settings).await {
        Ok(total) => {
            info!(platform = "momo", keyword, total, "result count");
            ProductCount::found(Platform::Momo, keyword, total, target)
        }
        Err(e) => ProductCount::failed(Platform::Momo, keyword, e),
    }
}

async fn first_page_total(browser: &mut dyn Browser, keyword: &str, settings: &Settings) -> Result<u64> {
    let url = search_url(SEARCH_URL, keyword, 1);
    let opts = FetchOptions {
        retry: settings.retry,
        settle: Duration::from_millis(settings.momo.settle_ms),
    };
    let html = fetch_page(browser, &url, Ready::Loaded, &opts).await?.into_html();
    Ok(parse_total_count(&html).unwrap_or_else(|| estimate_total(&html)))
}
