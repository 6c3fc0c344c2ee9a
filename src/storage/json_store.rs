use crate::model::{ProductDatabase, StorageError};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const PRODUCTS_FILE: &str = "products.json";
pub const RAW_FILE: &str = "products_raw.json";

pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    /// Opens the output directory, creating it when needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Writes the merged product database.
    pub fn save_products(&self, products: &ProductDatabase) -> Result<PathBuf, StorageError> {
        self.write_pretty(PRODUCTS_FILE, products)
    }

    /// Writes the catalog document exactly as fetched.
    pub fn save_raw(&self, raw: &Value) -> Result<PathBuf, StorageError> {
        self.write_pretty(RAW_FILE, raw)
    }

    fn write_pretty<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StorageError> {
        let path = self.dir.join(name);
        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');
        fs::write(&path, content)?;
        Ok(path)
    }
}
