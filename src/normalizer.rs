use crate::model::{Identifier, ProductEntry, RawCatalogItem};
use crate::utils::{first_present, string_or};

const VENDOR_ID_KEYS: [&str; 2] = ["vendorID", "vendorId"];
const MODEL_ID_KEYS: [&str; 3] = ["modelId", "flageID", "id"];
const UNKNOWN_TITLE: &str = "Unknown";

/// Turns a raw catalog item into a product entry without features.
/// Items without a vendor id are not products and yield `None`.
pub fn normalize_item(item: &RawCatalogItem) -> Option<ProductEntry> {
    let record = &item.record;
    let vendor_id = first_present(record, &VENDOR_ID_KEYS, Identifier::from_value)?;
    let model_id = first_present(record, &MODEL_ID_KEYS, Identifier::from_value)
        .filter(|id| !id.is_blank());

    Some(ProductEntry {
        vendor_id,
        title: string_or(record, "title", UNKNOWN_TITLE),
        sub_title: string_or(record, "subTitle", ""),
        category: item.category,
        model_id,
        features: None,
        aliases: None,
    })
}

/// Whether the control panel should be requested for this entry.
/// A blank vendor id (`0`, `""`) is kept in the database but never probed.
pub fn is_panel_candidate(entry: &ProductEntry) -> bool {
    entry.category.has_control_panel() && !entry.vendor_id.is_blank()
}
