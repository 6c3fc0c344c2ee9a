use crate::model::ScraperError;
use crate::scraper::traits::CatalogSource;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Catalog document read from disk, e.g. one bundled with the vendor's app.
pub struct LocalCatalog {
    path: PathBuf,
}

impl LocalCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for LocalCatalog {
    async fn fetch_catalog(&self) -> Result<Value, ScraperError> {
        let content = tokio::fs::read(&self.path).await?;
        let catalog = serde_json::from_slice(&content)?;
        info!("Loaded {}", self.path.display());
        Ok(catalog)
    }

    fn is_remote(&self) -> bool {
        false
    }
}
