//! Page fetching sessions used by the scrape pipeline.
//!
//! A [`BrowserLauncher`] hands out one [`PageFetcher`] session per scrape. The
//! session is driven to a URL with `visit`, waits a fixed settle delay for
//! client-side content, and then exposes the rendered markup through `html`.

pub mod chromium;
pub mod http;

use crate::config::{BrowserConfig, BrowserEngine};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A single browser session, used exclusively by one scrape.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Navigate to `url` and wait for the page to settle.
    async fn visit(&mut self, url: &str) -> Result<()>;
    /// Markup of the page last visited.
    async fn html(&self) -> Result<String>;
    /// End the session and release the browser.
    async fn quit(self: Box<Self>) -> Result<()>;
}

/// Starts fresh page-fetching sessions; sessions are never pooled.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>>;
}

/// Picks the launcher for the configured engine.
pub fn launcher_for(config: &BrowserConfig) -> Arc<dyn BrowserLauncher> {
    match config.engine {
        BrowserEngine::Chromium => Arc::new(chromium::ChromiumLauncher::new(config.clone())),
        BrowserEngine::Http => Arc::new(http::HttpLauncher::new(config.clone())),
    }
}
