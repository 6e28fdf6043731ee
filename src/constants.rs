/// Source pages scraped for the Mars site
pub const NEWS_URL: &str = "https://mars.nasa.gov/news/";
pub const JPL_URL: &str = "https://jpl.nasa.gov/spaceimages/?search=&category=Mars";
pub const JPL_BASE_URL: &str = "https://www.jpl.nasa.gov";
pub const FACTS_URL: &str = "https://space-facts.com/mars/";
pub const HEMISPHERES_URL: &str =
    "https://astrogeology.usgs.gov/search/results?q=hemisphere+enhanced&k1=target&v1=Mars";
pub const ASTROGEOLOGY_BASE_URL: &str = "https://astrogeology.usgs.gov";

// Element signatures on the source pages
pub const NEWS_TITLE_SELECTOR: &str = "div.content_title";
pub const NEWS_TEASER_SELECTOR: &str = "div.article_teaser_body";
pub const FEATURED_IMAGE_SELECTOR: &str = "a.button.fancybox";
pub const FEATURED_IMAGE_ATTR: &str = "data-fancybox-href";
pub const FACTS_TABLE_SELECTOR: &str = "table";
pub const HEMISPHERE_ITEM_SELECTOR: &str = "div.item";
pub const HEMISPHERE_TITLE_SELECTOR: &str = "h3";
pub const HEMISPHERE_LINK_SELECTOR: &str = "a.itemLink.product-item";
pub const WIDE_IMAGE_SELECTOR: &str = "img.wide-image";

/// Suffix of the JPL wallpaper rendition of a featured image
pub const FULL_SIZE_SUFFIX: &str = "-1920x1200.jpg";

pub const SCRAPE_SUCCESS_MESSAGE: &str = "Scraping Successful! Hit Back Button Now to view data";

// Climate API routes
pub const PRECIPITATION_ROUTE: &str = "/api/v1.0/precipitation";
pub const STATIONS_ROUTE: &str = "/api/v1.0/stations";
pub const TOBS_ROUTE: &str = "/api/v1.0/tobs";
pub const START_ROUTE: &str = "/api/v1.0/start/:start";
pub const START_END_ROUTE: &str = "/api/v1.0/start/:start/end/:end";

/// Route listing served from the climate API root
pub fn available_routes() -> Vec<&'static str> {
    vec![
        PRECIPITATION_ROUTE,
        STATIONS_ROUTE,
        TOBS_ROUTE,
        "/api/v1.0/start/<start>",
        "/api/v1.0/start/<start>/end/<end>",
    ]
}

pub const DEFAULT_MARS_PORT: u16 = 5000;
pub const DEFAULT_CLIMATE_PORT: u16 = 5001;
pub const DEFAULT_MARS_DB_PATH: &str = "data/mars.db";
pub const DEFAULT_CLIMATE_DB_PATH: &str = "Resources/hawaii.sqlite";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 5_000;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE_PREFIX: &str = "mars_climate.log";
pub const DEFAULT_LOG_FILTER: &str = "mars_climate=debug,info";
