use askama::Template;

use crate::types::ScrapedRecord;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub mars: Option<ScrapedRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub parameter: String,
    pub value: String,
}

/// Two-column facts table, laid out like a data-frame export without an index.
#[derive(Template)]
#[template(path = "facts_table.html")]
pub struct FactsTableTemplate {
    pub rows: Vec<FactRow>,
}
