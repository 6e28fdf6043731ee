//! Chromium-backed sessions using chromiumoxide.

use super::{BrowserLauncher, PageFetcher};
use crate::config::BrowserConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Resolve the Chromium executable: configured path first, then PATH.
pub fn find_chromium(config: &BrowserConfig) -> Option<PathBuf> {
    if let Some(path) = &config.chrome_path {
        return Some(path.clone());
    }

    ["google-chrome", "chromium", "chromium-browser", "chrome"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromiumLauncher {
    config: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn chrome_config(&self) -> Result<ChromeConfig> {
        let chrome_path = find_chromium(&self.config).ok_or_else(|| {
            AppError::Browser(
                "Chromium not found. Set browser.chrome_path or CHROME_PATH".to_string(),
            )
        })?;

        let mut builder = ChromeConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(self.config.navigation_timeout())
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if !self.config.headless {
            builder = builder.with_head();
        }

        builder
            .build()
            .map_err(|e| AppError::Browser(format!("failed to build browser config: {e}")))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>> {
        let (browser, mut handler) = Browser::launch(self.chrome_config()?)
            .await
            .map_err(|e| AppError::Browser(format!("failed to launch Chromium: {e}")))?;

        // The CDP handler must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Chromium handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(browser, handler_task).await;
                return Err(AppError::Browser(format!("failed to open page: {e}")));
            }
        };

        info!(headless = self.config.headless, "Launched Chromium session");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            config: self.config.clone(),
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    config: BrowserConfig,
}

#[async_trait]
impl PageFetcher for ChromiumSession {
    async fn visit(&mut self, url: &str) -> Result<()> {
        let timeout = self.config.navigation_timeout();
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(AppError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(AppError::Fetch {
                    url: url.to_string(),
                    message: format!("navigation timed out after {}ms", timeout.as_millis()),
                })
            }
        }

        // Fixed wait for client-side rendering, not a readiness signal
        tokio::time::sleep(self.config.settle_delay()).await;
        debug!("Visited {}", url);
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| AppError::Browser(format!("failed to read page HTML: {e}")))?;

        result
            .into_value::<String>()
            .map_err(|e| AppError::Browser(format!("failed to convert HTML result: {e:?}")))
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            browser,
            handler_task,
            ..
        } = *self;
        shutdown(browser, handler_task).await;
        Ok(())
    }
}

/// Close the browser process and stop polling its CDP handler.
async fn shutdown(mut browser: Browser, handler_task: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warn!("Chromium close failed: {}", e);
    }
    if let Err(e) = browser.wait().await {
        warn!("Waiting for Chromium to exit failed: {}", e);
    }
    stop_handler(handler_task).await;
}

async fn stop_handler(handler_task: JoinHandle<()>) {
    handler_task.abort();
    if let Err(e) = handler_task.await {
        if !e.is_cancelled() {
            warn!("Chromium handler task failed: {}", e);
        }
    }
}
