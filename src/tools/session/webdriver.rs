use super::{Browser, TabHandle};
use crate::config::BrowserSettings;
use crate::error::{Result, ShopError};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::error::WebDriverErrorInner;
use thirtyfour::prelude::*;
use thirtyfour::WindowHandle;
use tracing::{debug, info};

/// Chrome driven over the WebDriver protocol (chromedriver by default).
pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    /// Start a Chrome session. This is the only failure an extraction run
    /// reports as fatal.
    pub async fn open(cfg: &BrowserSettings) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in chrome_args(cfg) {
            caps.add_arg(&arg).map_err(start_failed)?;
        }

        let driver = WebDriver::new(cfg.webdriver_url.as_str(), caps)
            .await
            .map_err(start_failed)?;
        driver
            .set_page_load_timeout(Duration::from_millis(cfg.page_load_timeout_ms))
            .await
            .map_err(start_failed)?;

        info!(webdriver = %cfg.webdriver_url, headless = cfg.headless, "browser session started");
        Ok(Self {
            driver: Some(driver),
        })
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| ShopError::Other("browser session already closed".into()))
    }
}

pub(crate) fn chrome_args(cfg: &BrowserSettings) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        format!("--window-size={}", cfg.window_size),
    ];
    if !cfg.user_agent.is_empty() {
        args.push(format!("--user-agent={}", cfg.user_agent));
    }
    if cfg.headless {
        args.push("--headless=new".to_string());
    }
    args
}

fn start_failed(e: WebDriverError) -> ShopError {
    ShopError::SessionStart(e.to_string())
}

/// Typed timeouts first; the message check covers drivers that report a
/// timeout as a generic error.
fn driver_failed(e: WebDriverError) -> ShopError {
    match e.as_inner() {
        WebDriverErrorInner::Timeout(..)
        | WebDriverErrorInner::WebDriverTimeout(..)
        | WebDriverErrorInner::ScriptTimeout(..) => ShopError::FetchTimeout(e.to_string()),
        _ => ShopError::from_driver(e.to_string()),
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        self.driver()?.goto(url).await.map_err(driver_failed)
    }

    async fn source(&mut self) -> Result<String> {
        self.driver()?.source().await.map_err(driver_failed)
    }

    async fn current_tab(&mut self) -> Result<TabHandle> {
        let handle = self.driver()?.window().await.map_err(driver_failed)?;
        Ok(TabHandle(handle.to_string()))
    }

    async fn open_tab(&mut self) -> Result<TabHandle> {
        let driver = self.driver()?;
        let handle = driver.new_tab().await.map_err(driver_failed)?;
        let tab = TabHandle(handle.to_string());
        driver.switch_to_window(handle).await.map_err(driver_failed)?;
        Ok(tab)
    }

    async fn switch_to(&mut self, tab: &TabHandle) -> Result<()> {
        self.driver()?
            .switch_to_window(WindowHandle::from(tab.0.clone()))
            .await
            .map_err(driver_failed)
    }

    async fn close_tab(&mut self, tab: &TabHandle) -> Result<()> {
        self.switch_to(tab).await?;
        self.driver()?.close_window().await.map_err(driver_failed)
    }

    async fn quit(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => driver.quit().await.map_err(driver_failed),
            None => Ok(()),
        }
    }
}
