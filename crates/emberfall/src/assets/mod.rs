pub mod catalog;

pub use catalog::{AssetCatalog, AssetId};
