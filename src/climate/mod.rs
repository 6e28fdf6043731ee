//! Hawaii weather station dataset and its date-windowed queries.

pub mod dataset;
pub mod dates;

pub use dataset::Dataset;
pub use dates::{one_year_before, parse_iso_date};
