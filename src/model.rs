// Core structs: ProductEntry, Features, Category, errors
use crate::utils::as_integral;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Vendor id -> merged product entry. Sorted keys keep the dump stable.
pub type ProductDatabase = BTreeMap<String, ProductEntry>;

/// A vendor or model identifier, kept in whatever shape the API sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl Identifier {
    /// Builds an identifier from a raw JSON value. Integral floats count as
    /// numbers; fractional numbers, booleans and records are not identifiers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => as_integral(value).map(Identifier::Number),
            Value::String(s) => Some(Identifier::Text(s.clone())),
            _ => None,
        }
    }

    /// `0` and `""`: kept as a key, but not usable as a lookup id.
    pub fn is_blank(&self) -> bool {
        match self {
            Identifier::Number(n) => *n == 0,
            Identifier::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

/// Catalog section an item was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "earphones")]
    Earphones,
    // upstream spelling
    #[serde(rename = "wactchInfos")]
    Watches,
    #[serde(rename = "accessory")]
    Accessory,
    #[serde(rename = "speaker")]
    Speaker,
    #[serde(rename = "product")]
    Product,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Category {
    /// Category lists in the order they are read from the catalog document.
    pub const SECTIONS: [Category; 5] = [
        Category::Earphones,
        Category::Watches,
        Category::Accessory,
        Category::Speaker,
        Category::Product,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Earphones => "earphones",
            Category::Watches => "wactchInfos",
            Category::Accessory => "accessory",
            Category::Speaker => "speaker",
            Category::Product => "product",
            Category::Unknown => "unknown",
        }
    }

    /// Only earphone-class devices expose a control panel.
    pub fn has_control_panel(&self) -> bool {
        matches!(self, Category::Earphones | Category::Unknown)
    }
}

/// One untyped catalog record plus the category it was found under.
#[derive(Debug, Clone)]
pub struct RawCatalogItem {
    pub record: Value,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub vendor_id: Identifier,
    pub title: String,
    pub sub_title: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_id: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub features: Option<Features>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aliases: Option<Vec<String>>,
}

/// Normalized capabilities of one product, at most one entry per layout type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub eq: Option<EqFeature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub find_earphone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub settings: Option<Vec<SettingItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel_balance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub anc: Option<AncFeature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_function: Option<KeyFunctionFeature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub device_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_off_timer: Option<AutoOffTimer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqFeature {
    pub bands: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mindb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maxdb: Option<i64>,
    pub freq: String,
    pub characteristic: String,
    pub presets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cmdid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cmd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncFeature {
    pub modes: Vec<AncMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncMode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub startcmdid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endcmdid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub defaultcmd: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub viewtype: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Vec<AncItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub startcmdid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endcmdid: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFunctionFeature {
    pub events: Vec<KeyEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub name: String,
    pub functions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoOffTimer {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cmdid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeat: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    BadStatus(u16),
    #[error("api returned code {0:?}")]
    ApiCode(Option<i64>),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
