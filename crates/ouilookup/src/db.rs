use oui_proto::OuiRecord;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Records handed to the store
    pub processed: u64,
    /// Records that created a new row; the rest hit an existing prefix
    pub inserted: u64,
    pub elapsed: Duration,
}

impl IngestReport {
    pub fn ignored(&self) -> u64 {
        self.processed - self.inserted
    }
}

/// Persistent OUI prefix to vendor name index
pub struct IndexStore {
    pool: SqlitePool,
}

impl IndexStore {
    /// Open a store from a connection URL (e.g. `sqlite::memory:`)
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| Error::storage("open", e))?
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    /// Open the store file at `path`, creating it if missing
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        // A single connection: one exclusive handle per process
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| Error::storage("open", e))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the prefix table and its index if absent
    pub async fn ensure_schema(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| Error::storage("schema", e))
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert every record in one transaction, ignoring prefixes already present
    pub async fn bulk_insert<I>(&self, records: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = OuiRecord>,
    {
        self.try_bulk_insert(records.into_iter().map(Ok)).await
    }

    /// Like [`bulk_insert`](Self::bulk_insert), for a fallible record source.
    ///
    /// The first error from `records` or from SQLite rolls back the whole batch.
    pub async fn try_bulk_insert<I>(&self, records: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = Result<OuiRecord>>,
    {
        let start = Instant::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::storage("begin", e))?;

        let (processed, inserted) = match Self::insert_all(&mut tx, records).await {
            Ok(counts) => counts,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback after failed ingestion also failed: {}", rollback);
                }
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| Error::storage("commit", e))?;

        let report = IngestReport {
            processed,
            inserted,
            elapsed: start.elapsed(),
        };
        info!(
            "Took {:.3} sec to insert {} rows ({} new, {} already present)",
            report.elapsed.as_secs_f64(),
            report.processed,
            report.inserted,
            report.ignored()
        );
        Ok(report)
    }

    async fn insert_all<I>(tx: &mut Transaction<'_, Sqlite>, records: I) -> Result<(u64, u64)>
    where
        I: IntoIterator<Item = Result<OuiRecord>>,
    {
        let mut processed = 0u64;
        let mut inserted = 0u64;

        for record in records {
            let record = record?;
            let result =
                sqlx::query("INSERT OR IGNORE INTO oui (mac_prefix, vendor_name) VALUES (?, ?)")
                    .bind(&record.prefix)
                    .bind(&record.vendor_name)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| Error::storage(format!("insert of {}", record.prefix), e))?;

            processed += 1;
            inserted += result.rows_affected();
        }

        Ok((processed, inserted))
    }

    /// Vendor stored for `prefix`, compared case-insensitively
    pub async fn lookup(&self, prefix: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT vendor_name FROM oui WHERE mac_prefix = ? COLLATE NOCASE")
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::storage(format!("lookup of {}", prefix), e))?;

        debug!("Lookup {} -> {}", prefix, if row.is_some() { "hit" } else { "miss" });
        Ok(row.map(|r| r.get("vendor_name")))
    }

    /// Number of stored prefixes
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM oui")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("count", e))
    }

    pub async fn is_populated(&self) -> Result<bool> {
        Ok(self.count().await? > 0)
    }

    /// Release the connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = memory_store().await;
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!store.is_populated().await.unwrap());
    }

    #[tokio::test]
    async fn test_bulk_insert_and_lookup() {
        let store = memory_store().await;
        let report = store.bulk_insert(sample_records()).await.unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.inserted, 3);

        assert_eq!(
            store.lookup("00:00:0C").await.unwrap(),
            Some("Cisco Systems, Inc".to_string())
        );
        assert_eq!(store.lookup("FF:FF:FF").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bulk_insert_twice_is_idempotent() {
        let store = memory_store().await;
        store.bulk_insert(sample_records()).await.unwrap();
        let before = store.count().await.unwrap();

        let report = store.bulk_insert(sample_records()).await.unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.ignored(), 3);
        assert_eq!(store.count().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_first_writer_wins() {
        let store = memory_store().await;
        store
            .bulk_insert(vec![
                OuiRecord::new("AA:BB:CC", "Vendor1"),
                OuiRecord::new("AA:BB:CC", "Vendor2"),
            ])
            .await
            .unwrap();
        store
            .bulk_insert(vec![OuiRecord::new("AA:BB:CC", "Vendor3")])
            .await
            .unwrap();

        assert_eq!(
            store.lookup("AA:BB:CC").await.unwrap(),
            Some("Vendor1".to_string())
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prefix_comparison_ignores_case() {
        let store = memory_store().await;
        store
            .bulk_insert(vec![
                OuiRecord::new("aa:bb:cc", "Lower"),
                OuiRecord::new("AA:BB:CC", "Upper"),
            ])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.lookup("AA:BB:CC").await.unwrap(), Some("Lower".to_string()));
        assert_eq!(store.lookup("aA:Bb:cC").await.unwrap(), Some("Lower".to_string()));
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let store = memory_store().await;
        store
            .bulk_insert(vec![OuiRecord::new("00:00:01", "Xerox")])
            .await
            .unwrap();

        let records: Vec<Result<OuiRecord>> = vec![
            Ok(OuiRecord::new("00:00:02", "Kept?")),
            Ok(OuiRecord::new("00:00:03", "Kept?")),
            Err(Error::SourceUnavailable("stream cut".to_string())),
            Ok(OuiRecord::new("00:00:04", "Never reached")),
        ];
        let err = store.try_bulk_insert(records).await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.lookup("00:00:02").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_file_is_created_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oui.db");
        assert!(!path.exists());

        let store = IndexStore::open(&path).await.unwrap();
        assert!(path.exists());
        store.bulk_insert(sample_records()).await.unwrap();
        store.close().await;

        let reopened = IndexStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 3);
        assert_eq!(
            reopened.lookup("08:00:27").await.unwrap(),
            Some("PCS Systemtechnik GmbH".to_string())
        );
    }
}
