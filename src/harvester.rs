use crate::merger::merge_entry;
use crate::model::{Category, Features, ProductDatabase, ProductEntry, RawCatalogItem};
use crate::normalizer::{is_panel_candidate, normalize_item};
use crate::parser::LayoutParser;
use crate::scraper::ControlPanelSource;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct HarvestOptions {
    /// Pause after every control panel request.
    pub panel_delay: Duration,
    pub firmware_version: Option<String>,
}

/// Flattens the catalog document into items tagged with their category.
///
/// Accepted shapes: `{"data": {"earphones": [..], ..}}`, `{"data": [..]}`,
/// `{"earphones": [..], ..}` and a bare list.
pub fn flatten_catalog(raw: &Value) -> Vec<RawCatalogItem> {
    let data = match raw {
        Value::Object(map) => map.get("data").unwrap_or(raw),
        _ => raw,
    };

    match data {
        Value::Object(sections) => Category::SECTIONS
            .iter()
            .filter_map(|category| {
                let items = sections.get(category.key())?.as_array()?;
                Some(items.iter().map(move |record| RawCatalogItem {
                    record: record.clone(),
                    category: *category,
                }))
            })
            .flatten()
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|record| RawCatalogItem {
                record: record.clone(),
                category: Category::Unknown,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Builds the product database from a raw catalog document.
///
/// With `panels` set to `None` no control panels are requested and no entry
/// gets features.
pub async fn build_product_database(
    raw: &Value,
    panels: Option<&dyn ControlPanelSource>,
    parser: &dyn LayoutParser,
    options: &HarvestOptions,
) -> ProductDatabase {
    let items = flatten_catalog(raw);
    info!("Found {} products total", items.len());

    let mut products = ProductDatabase::new();
    for item in &items {
        let Some(mut entry) = normalize_item(item) else {
            continue;
        };

        if let Some(panels) = panels {
            if is_panel_candidate(&entry) {
                entry.features = fetch_features(panels, parser, &entry, options).await;
                sleep(options.panel_delay).await;
            }
        }

        merge_entry(&mut products, entry);
    }

    info!("Merged into {} unique products", products.len());
    products
}

async fn fetch_features(
    panels: &dyn ControlPanelSource,
    parser: &dyn LayoutParser,
    entry: &ProductEntry,
    options: &HarvestOptions,
) -> Option<Features> {
    let panel = match panels
        .fetch_control_panel(&entry.vendor_id, options.firmware_version.as_deref())
        .await
    {
        Ok(panel) => panel,
        Err(e) => {
            warn!("Failed to fetch control panel for vendorId={}: {}", entry.vendor_id, e);
            return None;
        }
    };

    let layouts = panel.get("layouts").and_then(Value::as_array)?;
    if layouts.is_empty() {
        return None;
    }
    Some(parser.extract(layouts))
}
