/// Private helpers for field normalisation
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use url::Url;

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));
static ITEM_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"i_code=(\d+)").expect("valid regex"));

/// Prices at or below this are discount percentages, counts and the like.
pub(crate) const PRICE_FLOOR: u64 = 10;

/// Decode entities, NFC-normalise, drop invisible characters and collapse
/// whitespace.
pub fn clean_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let visible: String = decoded
        .nfc()
        .filter(|c| !matches!(*c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE_REGEX.replace_all(&visible, " ").trim().to_string()
}

/// Largest digit run above [`PRICE_FLOOR`], thousands separators ignored.
///
/// `"75% OFF NT$1,299"` gives 1299.
pub fn parse_price(text: &str) -> Option<u64> {
    let stripped = text.replace(',', "");
    DIGITS_REGEX
        .find_iter(&stripped)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .filter(|n| *n > PRICE_FLOOR)
        .max()
}

/// Resolve `href` against `origin`. Only http(s) results are kept.
pub fn absolutize(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let joined = origin.join(href).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

/// Item code from a detail URL: the `i_code` parameter when present,
/// otherwise the last path segment without query or extension.
pub fn sku_from_url(url: &str) -> String {
    if let Some(caps) = ITEM_CODE_REGEX.captures(url) {
        return caps[1].to_string();
    }
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => segment.to_string(),
    }
}

/// How a site's image references become absolute URLs.
#[derive(Debug, Clone, Copy)]
pub struct ImageRules {
    /// Prefix for root-relative paths (`/x`).
    pub root: &'static str,
    /// Prefix for bare relative paths (`x`).
    pub bare_prefix: &'static str,
    /// Bare values containing this are host-qualified and only lack a scheme.
    pub host_marker: Option<&'static str>,
}

impl ImageRules {
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() || value.starts_with("data:") {
            return None;
        }
        let url = if value.starts_with("//") {
            format!("https:{value}")
        } else if value.starts_with("http://") || value.starts_with("https://") {
            value.to_string()
        } else if value.starts_with('/') {
            format!("{}{value}", self.root)
        } else if self.host_marker.is_some_and(|m| value.contains(m)) {
            format!("https://{value}")
        } else {
            format!("{}{value}", self.bare_prefix)
        };
        Some(url)
    }
}
