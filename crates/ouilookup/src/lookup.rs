use oui_proto::{normalize, CanonicalMac, MacAddress};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use crate::db::IndexStore;
use crate::error::{Error, Result};

/// Outcome of resolving one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    /// The address as supplied
    pub input: String,
    /// OUI prefix that was queried
    pub queried_prefix: String,
    /// `None` when the prefix is not in the index
    pub vendor_name: Option<String>,
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        self.vendor_name.is_some()
    }

    /// The vendor, or [`Error::NotFound`]
    pub fn require_vendor(self) -> Result<String> {
        self.vendor_name
            .ok_or(Error::NotFound(self.queried_prefix))
    }
}

/// Resolves MAC addresses to vendors against an [`IndexStore`]
pub struct Resolver<'a> {
    store: &'a IndexStore,
    strict: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a IndexStore) -> Self {
        Self {
            store,
            strict: false,
        }
    }

    /// Validate addresses before querying instead of normalizing leniently
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Look up the vendor of a single address.
    ///
    /// An unknown prefix is a normal outcome (`vendor_name: None`). Errors come
    /// only from the store or, in strict mode, from validation.
    pub async fn resolve(&self, raw: &str) -> Result<LookupResult> {
        let mac = if self.strict {
            let address: MacAddress = raw.parse()?;
            if address.is_locally_administered() {
                warn!(
                    "{} is locally administered, its prefix is not vendor assigned",
                    address
                );
            }
            CanonicalMac::from(address)
        } else {
            normalize(raw)
        };

        let prefix = mac.oui_prefix();
        let vendor_name = self.store.lookup(prefix).await?;

        Ok(LookupResult {
            input: raw.to_string(),
            queried_prefix: prefix.to_string(),
            vendor_name,
        })
    }

    /// Resolve one address per line, one result per line.
    ///
    /// Blank lines at the end of the input are dropped; an interior blank
    /// line is resolved like any other and comes back not found. A line that
    /// fails is reported as not found and the batch carries on.
    pub async fn resolve_batch<I, S>(&self, lines: I) -> Vec<LookupResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<S> = lines.into_iter().collect();
        while lines.last().is_some_and(|l| l.as_ref().trim().is_empty()) {
            lines.pop();
        }

        let mut results = Vec::with_capacity(lines.len());

        for line in &lines {
            let line = line.as_ref().trim();

            match self.resolve(line).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to resolve {}: {}", line, e);
                    results.push(LookupResult {
                        input: line.to_string(),
                        queried_prefix: normalize(line).oui_prefix().to_string(),
                        vendor_name: None,
                    });
                }
            }
        }

        results
    }

    /// Resolve every address in a newline-separated file
    pub async fn resolve_file(&self, path: &Path) -> Result<Vec<LookupResult>> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        Ok(self.resolve_batch(contents.lines()).await)
    }
}
