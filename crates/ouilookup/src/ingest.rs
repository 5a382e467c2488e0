use oui_proto::{SourceFormat, VendorListParser};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::db::{IndexStore, IngestReport};
use crate::error::{Error, Result};
use crate::fetch::VendorListSource;

/// Result of feeding one vendor list into the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub report: IngestReport,
    /// Malformed lines that were skipped
    pub skipped: usize,
}

/// Parse `reader` and bulk insert its records.
///
/// Malformed lines are logged and skipped. A read failure aborts the pass and
/// nothing from it is kept.
pub async fn ingest_reader<R: BufRead>(
    store: &IndexStore,
    reader: R,
    format: SourceFormat,
    origin: &Path,
) -> Result<IngestSummary> {
    let mut skipped = 0usize;

    let records = VendorListParser::new(reader, format).filter_map(|item| match item {
        Ok(record) => Some(Ok(record)),
        Err(err) => match Error::from_parse(err, origin) {
            Error::MalformedRecord { line, reason } => {
                debug!("Skipping {} line {}: {}", origin.display(), line, reason);
                skipped += 1;
                None
            }
            other => Some(Err(other)),
        },
    });

    let report = store.try_bulk_insert(records).await?;

    if skipped > 0 {
        info!("Skipped {} malformed lines in {}", skipped, origin.display());
    }

    Ok(IngestSummary { report, skipped })
}

/// Ingest a vendor list file
pub async fn ingest_file(
    store: &IndexStore,
    path: &Path,
    format: SourceFormat,
) -> Result<IngestSummary> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    info!("Ingesting {} vendor list from {}", format, path.display());
    ingest_reader(store, BufReader::new(file), format, path).await
}

/// Ingest the list at `list_path`, fetching it first when missing or when
/// `force_fetch` is set.
///
/// Prefixes already in the index keep their vendor.
pub async fn refresh(
    store: &IndexStore,
    source: &dyn VendorListSource,
    list_path: &Path,
    format: SourceFormat,
    force_fetch: bool,
) -> Result<IngestSummary> {
    if force_fetch || !list_path.exists() {
        if !force_fetch {
            info!("Vendor list {} not found", list_path.display());
        }
        source.fetch_to(list_path).await?;
    } else {
        info!("Reusing local vendor list {}", list_path.display());
    }

    ingest_file(store, list_path, format).await
}

/// Build the index on first use.
///
/// A store that already holds rows is trusted as-is, even if stale, and
/// `None` is returned.
pub async fn ensure_populated(
    store: &IndexStore,
    source: &dyn VendorListSource,
    list_path: &Path,
    format: SourceFormat,
) -> Result<Option<IngestSummary>> {
    if store.is_populated().await? {
        debug!("Index already populated");
        return Ok(None);
    }

    info!("Index is empty, building it from {}", source.describe());
    refresh(store, source, list_path, format, false).await.map(Some)
}
