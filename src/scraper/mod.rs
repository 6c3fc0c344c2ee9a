pub mod fetcher;
pub mod local;
pub mod traits;

pub use fetcher::QcyClient;
pub use local::LocalCatalog;
pub use traits::{CatalogSource, ControlPanelSource};
