pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod lookup;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use db::{IndexStore, IngestReport};
pub use error::{Error, Result};
pub use fetch::{HttpSource, VendorListSource};
pub use ingest::IngestSummary;
pub use lookup::{LookupResult, Resolver};

// Re-export types from oui-proto
pub use oui_proto::{OuiRecord, SourceFormat};
