//! Field extraction from the Mars source pages.
//!
//! Every lookup is by a fixed tag/class signature. A missing element is a hard
//! [`AppError::Extraction`] naming the selector, so a layout change on a
//! source site fails the scrape instead of producing a partial record.

use crate::constants::{
    FACTS_TABLE_SELECTOR, FEATURED_IMAGE_ATTR, FEATURED_IMAGE_SELECTOR, FULL_SIZE_SUFFIX,
    HEMISPHERE_ITEM_SELECTOR, HEMISPHERE_LINK_SELECTOR, HEMISPHERE_TITLE_SELECTOR,
    NEWS_TEASER_SELECTOR, NEWS_TITLE_SELECTOR, WIDE_IMAGE_SELECTOR,
};
use crate::error::{AppError, Result};
use crate::templates::{FactRow, FactsTableTemplate};
use askama::Template;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A hemisphere listing entry before its detail page is visited
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereItem {
    pub title: String,
    pub href: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Extraction {
        selector: format!("{css} (invalid selector: {e})"),
    })
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn required_attr(element: &ElementRef, css: &str, attr: &str) -> Result<String> {
    element
        .value()
        .attr(attr)
        .map(|v| v.to_string())
        .ok_or_else(|| AppError::missing(&format!("{css}[{attr}]")))
}

/// Latest headline and teaser from the news listing.
///
/// The headline is the second `content_title` on the page; the first one
/// belongs to the listing header.
pub fn extract_news(html: &str) -> Result<(String, String)> {
    let document = Html::parse_document(html);

    let title_sel = selector(NEWS_TITLE_SELECTOR)?;
    let title = document
        .select(&title_sel)
        .nth(1)
        .map(|el| element_text(&el))
        .ok_or_else(|| AppError::missing(NEWS_TITLE_SELECTOR))?;

    let teaser_sel = selector(NEWS_TEASER_SELECTOR)?;
    let paragraph = document
        .select(&teaser_sel)
        .next()
        .map(|el| element_text(&el))
        .ok_or_else(|| AppError::missing(NEWS_TEASER_SELECTOR))?;

    Ok((title, paragraph))
}

/// Site-relative path of the featured image on the JPL page
pub fn extract_featured_image(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let sel = selector(FEATURED_IMAGE_SELECTOR)?;
    let button = document
        .select(&sel)
        .next()
        .ok_or_else(|| AppError::missing(FEATURED_IMAGE_SELECTOR))?;
    required_attr(&button, FEATURED_IMAGE_SELECTOR, FEATURED_IMAGE_ATTR)
}

pub fn featured_image_url(base: &str, href: &str) -> String {
    format!("{base}{href}")
}

/// Wallpaper rendition of a featured image.
///
/// `/s1/s2/<any>/<NAME>_<suffix>.jpg` becomes
/// `<base>/s1/s2/wallpaper/<NAME>-1920x1200.jpg`. This follows the JPL site's
/// file naming and is not a general URL transform.
pub fn full_size_image_url(base: &str, href: &str) -> Result<String> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 5 {
        return Err(AppError::Extraction {
            selector: format!("{FEATURED_IMAGE_SELECTOR}[{FEATURED_IMAGE_ATTR}] path '{href}'"),
        });
    }

    let image_name = segments[4];
    let stem = image_name.split('_').next().unwrap_or(image_name);
    Ok(format!(
        "{base}/{}/{}/wallpaper/{stem}{FULL_SIZE_SUFFIX}",
        segments[1], segments[2]
    ))
}

fn is_header_row(row: &ElementRef, cells: &[ElementRef]) -> bool {
    let in_thead = row
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "thead");
    in_thead || cells.iter().all(|c| c.value().name() == "th")
}

/// First table on the facts page, re-rendered as a Parameter/Values table.
///
/// The source header row is replaced by the fixed Parameter/Values header,
/// so `thead` rows and rows made only of `th` cells are dropped. A row with a
/// single cell keeps an empty value.
pub fn extract_facts_table(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let table_sel = selector(FACTS_TABLE_SELECTOR)?;
    let row_sel = selector("tr")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| AppError::missing(FACTS_TABLE_SELECTOR))?;

    let rows: Vec<FactRow> = table
        .select(&row_sel)
        // rows of a nested table belong to that table
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "table")
                .map_or(false, |owner| owner.id() == table.id())
        })
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "th" | "td"))
                .collect();
            if cells.is_empty() || is_header_row(&row, &cells) {
                return None;
            }
            let mut text = cells.iter().map(element_text);
            Some(FactRow {
                parameter: text.next().unwrap_or_default(),
                value: text.next().unwrap_or_default(),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(AppError::missing(&format!("{FACTS_TABLE_SELECTOR} tr")));
    }
    debug!("Extracted {} fact rows", rows.len());

    Ok(FactsTableTemplate { rows }.render()?)
}

/// Every hemisphere entry on the search results page, in listing order
pub fn extract_hemisphere_items(html: &str) -> Result<Vec<HemisphereItem>> {
    let document = Html::parse_document(html);
    let item_sel = selector(HEMISPHERE_ITEM_SELECTOR)?;
    let title_sel = selector(HEMISPHERE_TITLE_SELECTOR)?;
    let link_sel = selector(HEMISPHERE_LINK_SELECTOR)?;

    document
        .select(&item_sel)
        .map(|item| {
            let title = item
                .select(&title_sel)
                .next()
                .map(|el| element_text(&el))
                .ok_or_else(|| AppError::missing(HEMISPHERE_TITLE_SELECTOR))?;
            let link = item
                .select(&link_sel)
                .next()
                .ok_or_else(|| AppError::missing(HEMISPHERE_LINK_SELECTOR))?;
            let href = required_attr(&link, HEMISPHERE_LINK_SELECTOR, "href")?;
            Ok(HemisphereItem { title, href })
        })
        .collect()
}

/// Full-resolution image source on a hemisphere detail page
pub fn extract_wide_image(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let sel = selector(WIDE_IMAGE_SELECTOR)?;
    let img = document
        .select(&sel)
        .next()
        .ok_or_else(|| AppError::missing(WIDE_IMAGE_SELECTOR))?;
    required_attr(&img, WIDE_IMAGE_SELECTOR, "src")
}
