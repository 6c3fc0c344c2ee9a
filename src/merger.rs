use crate::model::{ProductDatabase, ProductEntry};
use std::collections::btree_map::Entry;

/// Adds one entry to the database.
///
/// The first entry seen for a vendor id is kept as-is. Later entries with the
/// same id only contribute their title to `aliases`.
pub fn merge_entry(products: &mut ProductDatabase, entry: ProductEntry) {
    match products.entry(entry.vendor_id.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(mut slot) => {
            slot.get_mut()
                .aliases
                .get_or_insert_with(Vec::new)
                .push(entry.title);
        }
    }
}
