pub mod extract;

use crate::browser::{BrowserLauncher, PageFetcher};
use crate::config::SourcesConfig;
use crate::error::Result;
use crate::storage::RecordStore;
use crate::types::{HemisphereImage, ScrapedRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Drives one browser session across the Mars source pages.
pub struct MarsScraper {
    launcher: Arc<dyn BrowserLauncher>,
    sources: SourcesConfig,
}

impl MarsScraper {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, sources: SourcesConfig) -> Self {
        Self { launcher, sources }
    }

    /// Scrape every source page into a complete record.
    ///
    /// The session is always quit, including when a page fails.
    #[instrument(skip(self))]
    pub async fn scrape_all(&self) -> Result<ScrapedRecord> {
        let mut session = self.launcher.launch().await?;
        let result = self.scrape_with(session.as_mut()).await;

        if let Err(e) = session.quit().await {
            warn!("Failed to quit browser session: {}", e);
        }
        result
    }

    async fn scrape_with(&self, session: &mut dyn PageFetcher) -> Result<ScrapedRecord> {
        let sources = &self.sources;

        let news_html = load(session, &sources.news_url).await?;
        let (news_title, news_paragraph) = extract::extract_news(&news_html)?;
        debug!("Latest headline: {}", news_title);

        let jpl_html = load(session, &sources.jpl_url).await?;
        let image_href = extract::extract_featured_image(&jpl_html)?;
        let featured_image_url = extract::featured_image_url(&sources.jpl_base_url, &image_href);
        let featured_full_size_url =
            extract::full_size_image_url(&sources.jpl_base_url, &image_href)?;

        let facts_html = load(session, &sources.facts_url).await?;
        let mars_facts = extract::extract_facts_table(&facts_html)?;

        let hemisphere_image = self.scrape_hemispheres(session).await?;

        Ok(ScrapedRecord {
            news_title,
            news_paragraph,
            featured_image_url,
            featured_full_size_url,
            mars_facts,
            hemisphere_image,
        })
    }

    /// One listing page plus one detail page per hemisphere, visited in order.
    async fn scrape_hemispheres(
        &self,
        session: &mut dyn PageFetcher,
    ) -> Result<Vec<HemisphereImage>> {
        let base = &self.sources.astrogeology_base_url;
        let listing_html = load(session, &self.sources.hemispheres_url).await?;
        let items = extract::extract_hemisphere_items(&listing_html)?;
        info!("Found {} hemisphere items", items.len());

        let mut images = Vec::with_capacity(items.len());
        for item in items {
            let detail_html = load(session, &format!("{base}{}", item.href)).await?;
            let src = extract::extract_wide_image(&detail_html)?;
            images.push(HemisphereImage {
                title: item.title,
                img_url: format!("{base}{src}"),
            });
        }
        Ok(images)
    }
}

async fn load(session: &mut dyn PageFetcher, url: &str) -> Result<String> {
    session.visit(url).await?;
    session.html().await
}

/// Fetch, extract, then store; nothing is written unless every step succeeds.
pub struct ScrapePipeline {
    scraper: MarsScraper,
    store: Arc<dyn RecordStore>,
}

impl ScrapePipeline {
    pub fn new(scraper: MarsScraper, store: Arc<dyn RecordStore>) -> Self {
        Self { scraper, store }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ScrapedRecord> {
        let start = Instant::now();
        let record = self.scraper.scrape_all().await?;
        self.store.replace(&record).await?;
        info!(
            hemispheres = record.hemisphere_image.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scrape stored"
        );
        Ok(record)
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}
