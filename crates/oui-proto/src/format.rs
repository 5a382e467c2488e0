use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout of an upstream vendor-list file, chosen once per ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SourceFormat {
    /// Wireshark `manuf`: `{prefix}\t{short}[\t{full name}]`, `#` comments
    #[default]
    LongForm,
    /// nmap `mac-prefixes`: `{hexprefix} {vendor words...}`
    ShortForm,
}

impl SourceFormat {
    /// Where the list is published upstream
    pub fn default_url(&self) -> &'static str {
        match self {
            Self::LongForm => "https://www.wireshark.org/download/automated/data/manuf",
            Self::ShortForm => "https://linuxnet.ca/ieee/oui/nmap-mac-prefixes",
        }
    }

    /// Local file the downloaded list is kept in
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::LongForm => "w_manuf.txt",
            Self::ShortForm => "nmap-oui.txt",
        }
    }

    /// Each format gets its own index so vendor names are never mixed
    pub fn default_database(&self) -> &'static str {
        match self {
            Self::LongForm => "oui.db",
            Self::ShortForm => "oui_light.db",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongForm => f.write_str("long-form"),
            Self::ShortForm => f.write_str("short-form"),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long-form" | "long" | "wireshark" | "manuf" => Ok(Self::LongForm),
            "short-form" | "short" | "nmap" => Ok(Self::ShortForm),
            other => Err(format!(
                "unknown source format '{}' (expected long-form or short-form)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("long-form".parse::<SourceFormat>(), Ok(SourceFormat::LongForm));
        assert_eq!("NMAP".parse::<SourceFormat>(), Ok(SourceFormat::ShortForm));
        assert!("csv".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [SourceFormat::LongForm, SourceFormat::ShortForm] {
            assert_eq!(format.to_string().parse::<SourceFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_formats_use_separate_files() {
        assert_ne!(
            SourceFormat::LongForm.default_database(),
            SourceFormat::ShortForm.default_database()
        );
        assert_ne!(
            SourceFormat::LongForm.default_file_name(),
            SourceFormat::ShortForm.default_file_name()
        );
    }
}
