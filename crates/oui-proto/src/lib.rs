//! MAC address normalization and vendor-list parsing
//!
//! This library turns user-supplied MAC address strings into a canonical,
//! comparable form and reads manufacturer-prefix lists into (prefix, vendor)
//! records. It has no storage or network dependencies and can back any OUI
//! lookup tool.

pub mod format;
pub mod mac;
pub mod parser;
pub mod record;

pub use format::SourceFormat;
pub use mac::{create_mac_address, normalize, normalize_strict, CanonicalMac, MacAddress, MacParseError};
pub use parser::{parse_str, ParseError, VendorListParser};
pub use record::OuiRecord;
