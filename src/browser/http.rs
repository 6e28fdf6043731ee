use super::{BrowserLauncher, PageFetcher};
use crate::config::BrowserConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use tracing::debug;

/// Launches script-less sessions that fetch markup with plain GET requests.
pub struct HttpLauncher {
    config: BrowserConfig,
}

impl HttpLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>> {
        let client = reqwest::Client::builder()
            .timeout(self.config.navigation_timeout())
            .user_agent(concat!("mars_climate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Box::new(HttpSession {
            client,
            config: self.config.clone(),
            current: None,
        }))
    }
}

pub struct HttpSession {
    client: reqwest::Client,
    config: BrowserConfig,
    current: Option<String>,
}

#[async_trait]
impl PageFetcher for HttpSession {
    async fn visit(&mut self, url: &str) -> Result<()> {
        let fetch_err = |e: reqwest::Error| AppError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().await.map_err(fetch_err)?;
        let body = resp
            .error_for_status()
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;
        debug!("Fetched {} ({} bytes)", url, body.len());

        self.current = Some(body);
        tokio::time::sleep(self.config.settle_delay()).await;
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.current
            .clone()
            .ok_or_else(|| AppError::Browser("no page has been visited".to_string()))
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
