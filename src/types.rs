use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything one scrape run extracts from the Mars source pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub news_title: String,
    pub news_paragraph: String,
    pub featured_image_url: String,
    pub featured_full_size_url: String,
    /// Rendered `<table>` markup
    pub mars_facts: String,
    pub hemisphere_image: Vec<HemisphereImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemisphereImage {
    pub title: String,
    pub img_url: String,
}

/// Weather station reference row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Trailing-12-months window, snapshotted when the dataset is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemperatureAggregate {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// Response body of the trip endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub trip_start: String,
    pub trip_end: String,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_temp: Option<f64>,
}

impl TripSummary {
    pub fn new(start: NaiveDate, end: NaiveDate, aggregate: TemperatureAggregate) -> Self {
        Self {
            trip_start: start.to_string(),
            trip_end: end.to_string(),
            min_temp: aggregate.min,
            max_temp: aggregate.max,
            avg_temp: aggregate.avg,
        }
    }
}
