#[cfg(test)]
use crate::db::IndexStore;
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::fetch::VendorListSource;
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use oui_proto::OuiRecord;
#[cfg(test)]
use std::path::Path;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wireshark-style list: 4 records, 1 malformed line
#[cfg(test)]
pub const LONG_FORM_SAMPLE: &str = "\
# This file was generated by TShark
#
00:00:0C\tCisco\tCisco Systems, Inc
00:00:0D\tFibronic\tFibronics Ltd.
08:00:27\tPcsSyste\tPCS Systemtechnik GmbH
this line has no tabs
00:1B:C5:00:00:00/36\tConverging\tConverging Systems Inc.
";

/// nmap-style list: 3 records
#[cfg(test)]
pub const SHORT_FORM_SAMPLE: &str = "\
000000 Xerox
00000C Cisco Systems
005056 VMware
";

#[cfg(test)]
pub async fn memory_store() -> IndexStore {
    IndexStore::new("sqlite::memory:").await.unwrap()
}

#[cfg(test)]
pub fn sample_records() -> Vec<OuiRecord> {
    vec![
        OuiRecord::new("00:00:0C", "Cisco Systems, Inc"),
        OuiRecord::new("08:00:27", "PCS Systemtechnik GmbH"),
        OuiRecord::new("AA:BB:CC", "Acme"),
    ]
}

/// In-memory store holding [`sample_records`]
#[cfg(test)]
pub async fn seeded_store() -> IndexStore {
    let store = memory_store().await;
    store.bulk_insert(sample_records()).await.unwrap();
    store
}

/// Source that writes a fixed body and counts its calls
#[cfg(test)]
pub struct StubSource {
    body: String,
    calls: AtomicUsize,
}

#[cfg(test)]
impl StubSource {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl VendorListSource for StubSource {
    async fn fetch_to(&self, dest: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest, &self.body).map_err(|e| Error::io(dest, e))?;
        Ok(self.body.len() as u64)
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

/// Source that is never reachable
#[cfg(test)]
pub struct FailingSource;

#[cfg(test)]
#[async_trait]
impl VendorListSource for FailingSource {
    async fn fetch_to(&self, _dest: &Path) -> Result<u64> {
        Err(Error::SourceUnavailable("offline".to_string()))
    }

    fn describe(&self) -> String {
        "offline".to_string()
    }
}
