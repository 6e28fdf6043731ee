#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use mars_climate::browser::{BrowserLauncher, PageFetcher};
use mars_climate::config::SourcesConfig;
use mars_climate::error::{AppError, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const NEWS_URL: &str = "https://fixtures.test/news/";
pub const JPL_URL: &str = "https://fixtures.test/spaceimages/?category=Mars";
pub const JPL_BASE: &str = "https://www.jpl.test";
pub const FACTS_URL: &str = "https://fixtures.test/mars-facts/";
pub const HEMISPHERES_URL: &str = "https://fixtures.test/search/results";
pub const ASTRO_BASE: &str = "https://astro.test";

pub fn fixture_sources() -> SourcesConfig {
    SourcesConfig {
        news_url: NEWS_URL.to_string(),
        jpl_url: JPL_URL.to_string(),
        jpl_base_url: JPL_BASE.to_string(),
        facts_url: FACTS_URL.to_string(),
        hemispheres_url: HEMISPHERES_URL.to_string(),
        astrogeology_base_url: ASTRO_BASE.to_string(),
    }
}

pub fn news_page(headline: &str) -> String {
    format!(
        r#"<html><body>
        <div class="content_title">News</div>
        <ul class="item_list">
          <li class="slide">
            <div class="content_title"><a href="/news/8000/">{headline}</a></div>
            <div class="article_teaser_body">Dust storms season is here.</div>
          </li>
        </ul>
        </body></html>"#
    )
}

pub const JPL_PAGE: &str = r#"<html><body>
    <article class="carousel_item">
      <a class="button fancybox" data-fancybox-href="/spaceimages/images/mediumsize/PIA19113_ip.jpg">FULL IMAGE</a>
    </article>
    </body></html>"#;

pub const FACTS_PAGE: &str = r#"<html><body>
    <table id="tablepress-p-mars">
      <tbody>
        <tr><td class="column-1">Equatorial Diameter:</td><td class="column-2">6,792 km</td></tr>
        <tr><td class="column-1">Moons:</td><td class="column-2">2 (Phobos &amp; Deimos)</td></tr>
      </tbody>
    </table>
    </body></html>"#;

pub const HEMISPHERES_PAGE: &str = r#"<html><body>
    <div class="collapsible results">
      <div class="item">
        <a href="/search/map/Mars/Viking/cerberus_enhanced" class="itemLink product-item"><img class="thumb"></a>
        <div class="description"><h3>Cerberus Hemisphere Enhanced</h3></div>
      </div>
      <div class="item">
        <a href="/search/map/Mars/Viking/valles_marineris_enhanced" class="itemLink product-item"><img class="thumb"></a>
        <div class="description"><h3>Valles Marineris Hemisphere Enhanced</h3></div>
      </div>
    </div>
    </body></html>"#;

pub fn detail_page(name: &str) -> String {
    format!(
        r#"<html><body><img class="wide-image" src="/cache/images/{name}_full.jpg"></body></html>"#
    )
}

/// Every page a full scrape visits, keyed by URL
pub fn fixture_pages(headline: &str) -> HashMap<String, String> {
    let mut pages = HashMap::new();
    pages.insert(NEWS_URL.to_string(), news_page(headline));
    pages.insert(JPL_URL.to_string(), JPL_PAGE.to_string());
    pages.insert(FACTS_URL.to_string(), FACTS_PAGE.to_string());
    pages.insert(HEMISPHERES_URL.to_string(), HEMISPHERES_PAGE.to_string());
    pages.insert(
        format!("{ASTRO_BASE}/search/map/Mars/Viking/cerberus_enhanced"),
        detail_page("cerberus"),
    );
    pages.insert(
        format!("{ASTRO_BASE}/search/map/Mars/Viking/valles_marineris_enhanced"),
        detail_page("valles_marineris"),
    );
    pages
}

/// Serves canned markup instead of driving a browser
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub pages: Arc<Mutex<HashMap<String, String>>>,
    pub visits: Arc<Mutex<Vec<String>>>,
    pub launches: Arc<AtomicUsize>,
    pub quits: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn with_pages(pages: HashMap<String, String>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages)),
            ..Self::default()
        }
    }

    pub fn set_page(&self, url: &str, html: String) {
        self.pages.lock().unwrap().insert(url.to_string(), html);
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }

    pub fn visited(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn quit_count(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            launcher: self.clone(),
            current: None,
        }))
    }
}

pub struct FakeSession {
    launcher: FakeLauncher,
    current: Option<String>,
}

#[async_trait]
impl PageFetcher for FakeSession {
    async fn visit(&mut self, url: &str) -> Result<()> {
        self.launcher.visits.lock().unwrap().push(url.to_string());
        let page = self.launcher.pages.lock().unwrap().get(url).cloned();
        match page {
            Some(html) => {
                self.current = Some(html);
                Ok(())
            }
            None => Err(AppError::Fetch {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }

    async fn html(&self) -> Result<String> {
        self.current
            .clone()
            .ok_or_else(|| AppError::Browser("no page has been visited".to_string()))
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        self.launcher.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub const STATION_A: &str = "USC00519281";
pub const STATION_B: &str = "USC00513117";
pub const STATION_IDLE: &str = "USC00518838";

/// Create a Hawaii-style dataset file with the given measurement rows
pub fn create_dataset(path: &Path, rows: &[(&str, String, Option<f64>, f64)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE station (
            id INTEGER NOT NULL PRIMARY KEY,
            station TEXT, name TEXT,
            latitude FLOAT, longitude FLOAT, elevation FLOAT
        );
        CREATE TABLE measurement (
            id INTEGER NOT NULL PRIMARY KEY,
            station TEXT, date TEXT,
            prcp FLOAT, tobs FLOAT
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO station VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![7, STATION_A, "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO station VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![3, STATION_B, "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO station VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![9, STATION_IDLE, "UPPER WAHIAWA 874.3, HI US", 21.4992, -158.0111, 306.6],
    )
    .unwrap();

    let tx = conn.unchecked_transaction().unwrap();
    for (station, date, prcp, tobs) in rows {
        tx.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            params![station, date, prcp, tobs],
        )
        .unwrap();
    }
    tx.commit().unwrap();
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// `count` consecutive days ending at `last`, newest first
pub fn days_back(last: &str, count: i64) -> Vec<String> {
    let last = date(last);
    (0..count)
        .map(|i| (last - Duration::days(i)).format("%Y-%m-%d").to_string())
        .collect()
}
