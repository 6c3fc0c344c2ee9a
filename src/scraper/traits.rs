use crate::model::{Identifier, ScraperError};
use serde_json::Value;

/// Supplies the raw catalog document, from the network or from disk.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Value, ScraperError>;

    /// Whether the document came from the remote API and is worth keeping as a raw dump.
    fn is_remote(&self) -> bool {
        true
    }
}

/// Supplies the `controlPanel` record of one product.
#[async_trait::async_trait]
pub trait ControlPanelSource: Send + Sync {
    async fn fetch_control_panel(
        &self,
        vendor_id: &Identifier,
        firmware_version: Option<&str>,
    ) -> Result<Value, ScraperError>;
}
