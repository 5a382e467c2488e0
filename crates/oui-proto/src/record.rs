/// A single (prefix, vendor) entry from a vendor list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuiRecord {
    /// Canonical colon-hex prefix, e.g. `AA:BB:CC`
    pub prefix: String,
    /// Vendor name, never empty
    pub vendor_name: String,
}

impl OuiRecord {
    pub fn new(prefix: impl Into<String>, vendor_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            vendor_name: vendor_name.into(),
        }
    }
}
