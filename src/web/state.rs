use crate::climate::Dataset;
use crate::error::Result;
use crate::scrape::ScrapePipeline;
use crate::types::DateWindow;
use std::sync::Arc;
use tracing::info;

/// Application context for the Mars site
#[derive(Clone)]
pub struct MarsState {
    pub pipeline: Arc<ScrapePipeline>,
}

/// Application context for the climate API.
///
/// `window` is computed once when the state is built and is not refreshed if
/// the dataset changes underneath a running process. Build a new state to
/// pick up new data.
#[derive(Clone)]
pub struct ClimateState {
    pub dataset: Arc<Dataset>,
    pub window: DateWindow,
}

impl ClimateState {
    pub fn new(dataset: Dataset) -> Result<Self> {
        let window = dataset.window()?;
        info!(start = %window.start, latest = %window.latest, "Trailing 12-month window");
        Ok(Self {
            dataset: Arc::new(dataset),
            window,
        })
    }
}
