//! Browser Session
//!
//! Every component that touches a live page goes through [`Browser`]. The
//! session is passed as `&mut dyn Browser`, so only one extraction can drive
//! it at a time, and tab focus is explicit state the caller owns.

mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use webdriver::WebDriverSession;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Opaque handle to one browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabHandle(pub String);

impl fmt::Display for TabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait Browser: Send {
    /// Navigate the focused tab. Fails with `FetchTimeout` when the
    /// page-load bound is hit, `FetchError` otherwise.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Rendered DOM of the focused tab.
    async fn source(&mut self) -> Result<String>;

    async fn current_tab(&mut self) -> Result<TabHandle>;

    /// Open a blank tab and focus it.
    async fn open_tab(&mut self) -> Result<TabHandle>;

    async fn switch_to(&mut self, tab: &TabHandle) -> Result<()>;

    /// Close `tab`. Focus is undefined afterwards until the next `switch_to`.
    async fn close_tab(&mut self, tab: &TabHandle) -> Result<()>;

    /// End the session. Calls after this fail.
    async fn quit(&mut self) -> Result<()>;
}
