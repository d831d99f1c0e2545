//! Field Extractor
//!
//! Each field is read through a chain of `(selector, Read)` probes tried in
//! priority order inside one listing element. The first value the field's
//! validator accepts wins.

mod tests;
pub mod types;
mod utils;

pub use types::*;
pub use utils::{absolutize, clean_text, parse_price, sku_from_url, ImageRules};

use scraper::{ElementRef, Selector};
use tracing::warn;
use url::Url;

/// Titles must be longer than this many characters.
pub const MIN_TITLE_CHARS: usize = 5;

/// Priority-ordered field probes.
#[derive(Debug)]
pub struct FieldChain {
    probes: Vec<(&'static str, Selector, Read)>,
}

impl FieldChain {
    /// Compile `probes` in order. Selectors that fail to parse are skipped.
    pub fn new(probes: &[(&'static str, Read)]) -> Self {
        let probes = probes
            .iter()
            .filter_map(|&(css, read)| match Selector::parse(css) {
                Ok(sel) => Some((css, sel, read)),
                Err(e) => {
                    warn!(selector = css, error = %e, "skipping invalid field selector");
                    None
                }
            })
            .collect();
        Self { probes }
    }

    /// Shorthand for a chain that reads the same part of every match.
    pub fn reading(css: &[&'static str], read: Read) -> Self {
        let probes: Vec<_> = css.iter().map(|&c| (c, read)).collect();
        Self::new(&probes)
    }
}

/// First value in `chain` order that `accept` maps to `Some`.
pub fn first_valid<T>(
    el: ElementRef<'_>,
    chain: &FieldChain,
    mut accept: impl FnMut(&str) -> Option<T>,
) -> Option<T> {
    chain.probes.iter().find_map(|(_, sel, read)| {
        el.select(sel)
            .find_map(|found| read_values(found, *read).find_map(|v| accept(&v)))
    })
}

/// Candidate values of one element, in preference order.
fn read_values(el: ElementRef<'_>, read: Read) -> Box<dyn Iterator<Item = String> + '_> {
    match read {
        Read::Text => Box::new(std::iter::once(el.text().collect::<String>())),
        Read::Attr(name) => Box::new(el.value().attr(name).map(str::to_string).into_iter()),
        Read::FirstAttr(names) => Box::new(
            names
                .iter()
                .filter_map(move |n| el.value().attr(n))
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
        ),
    }
}

/// Cleaned title longer than [`MIN_TITLE_CHARS`].
pub fn extract_title(el: ElementRef<'_>, chain: &FieldChain) -> Option<String> {
    first_valid(el, chain, accept_title)
}

pub fn accept_title(raw: &str) -> Option<String> {
    let title = clean_text(raw);
    (title.chars().count() > MIN_TITLE_CHARS).then_some(title)
}

pub fn extract_price(el: ElementRef<'_>, chain: &FieldChain) -> Option<u64> {
    first_valid(el, chain, parse_price)
}

/// Absolute http(s) detail URL resolved against `origin`.
pub fn extract_link(el: ElementRef<'_>, chain: &FieldChain, origin: &Url) -> Option<String> {
    first_valid(el, chain, |href| absolutize(origin, href))
}

pub fn extract_image(el: ElementRef<'_>, chain: &FieldChain, rules: &ImageRules) -> Option<String> {
    first_valid(el, chain, |src| rules.normalize(src))
}
