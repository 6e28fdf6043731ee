pub mod browser;
pub mod climate;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod scrape;
pub mod storage;
pub mod templates;
pub mod types;
pub mod web;
