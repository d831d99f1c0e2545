//! Shared Selectors

use once_cell::sync::Lazy;
use scraper::Selector;

/// Selector for the `<pre>` wrapper browsers put around plain-text responses.
pub static PRE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("pre").expect("valid pre selector"));

/// Selector for `<body>` elements.
pub static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("valid body selector"));
