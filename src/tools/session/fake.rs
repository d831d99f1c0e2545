//! In-memory browser for tests: fixture pages keyed by URL, scripted
//! failures, and a record of every navigation and tab operation.

use super::{Browser, TabHandle};
use crate::error::{Result, ShopError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    Timeout,
    Error,
}

#[derive(Debug, Clone)]
struct Tab {
    handle: TabHandle,
    url: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeBrowser {
    pages: HashMap<String, String>,
    failures: HashMap<String, VecDeque<Failure>>,
    tabs: Vec<Tab>,
    focused: Option<TabHandle>,
    next_tab: u32,
    pub visits: Vec<String>,
    pub opened: Vec<TabHandle>,
    pub closed: Vec<TabHandle>,
    pub quit_called: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        let main = TabHandle("tab-0".into());
        Self {
            tabs: vec![Tab {
                handle: main.clone(),
                url: None,
            }],
            focused: Some(main),
            next_tab: 1,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Fail the next `times` navigations to `url`.
    pub fn failing(mut self, url: impl Into<String>, failure: Failure, times: usize) -> Self {
        self.failures
            .entry(url.into())
            .or_default()
            .extend(std::iter::repeat(failure).take(times));
        self
    }

    pub fn open_tabs(&self) -> Vec<TabHandle> {
        self.tabs.iter().map(|t| t.handle.clone()).collect()
    }

    pub fn focused(&self) -> Option<&TabHandle> {
        self.focused.as_ref()
    }

    pub fn visits_to(&self, url: &str) -> usize {
        self.visits.iter().filter(|v| v.as_str() == url).count()
    }

    fn focused_tab(&mut self) -> Result<&mut Tab> {
        let focused = self
            .focused
            .clone()
            .ok_or_else(|| ShopError::FetchError("no focused tab".into()))?;
        self.tabs
            .iter_mut()
            .find(|t| t.handle == focused)
            .ok_or_else(|| ShopError::FetchError(format!("no such window: {focused}")))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.visits.push(url.to_string());
        if let Some(failure) = self.failures.get_mut(url).and_then(|q| q.pop_front()) {
            return Err(match failure {
                Failure::Timeout => ShopError::FetchTimeout(format!("timeout loading {url}")),
                Failure::Error => ShopError::FetchError(format!("net::ERR_CONNECTION_RESET {url}")),
            });
        }
        self.focused_tab()?.url = Some(url.to_string());
        Ok(())
    }

    async fn source(&mut self) -> Result<String> {
        let url = self.focused_tab()?.url.clone();
        Ok(url
            .and_then(|u| self.pages.get(&u).cloned())
            .unwrap_or_else(|| "<html><head></head><body></body></html>".to_string()))
    }

    async fn current_tab(&mut self) -> Result<TabHandle> {
        Ok(self.focused_tab()?.handle.clone())
    }

    async fn open_tab(&mut self) -> Result<TabHandle> {
        let handle = TabHandle(format!("tab-{}", self.next_tab));
        self.next_tab += 1;
        self.tabs.push(Tab {
            handle: handle.clone(),
            url: None,
        });
        self.opened.push(handle.clone());
        self.focused = Some(handle.clone());
        Ok(handle)
    }

    async fn switch_to(&mut self, tab: &TabHandle) -> Result<()> {
        if !self.tabs.iter().any(|t| &t.handle == tab) {
            return Err(ShopError::FetchError(format!("no such window: {tab}")));
        }
        self.focused = Some(tab.clone());
        Ok(())
    }

    async fn close_tab(&mut self, tab: &TabHandle) -> Result<()> {
        let before = self.tabs.len();
        self.tabs.retain(|t| &t.handle != tab);
        if self.tabs.len() == before {
            return Err(ShopError::FetchError(format!("no such window: {tab}")));
        }
        self.closed.push(tab.clone());
        self.focused = None;
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.quit_called = true;
        self.tabs.clear();
        self.focused = None;
        Ok(())
    }
}
