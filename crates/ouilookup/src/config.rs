use oui_proto::SourceFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration structure loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Index database file path; defaults to a per-format name in `data_dir`
    #[serde(default)]
    pub database_path: Option<String>,

    /// Directory holding the database and the downloaded vendor list
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Vendor list source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Lookup behaviour
    #[serde(default)]
    pub lookup: LookupConfig,
}

fn default_data_dir() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Layout of the vendor list
    #[serde(default)]
    pub format: SourceFormat,

    /// Download URL, defaults to the format's upstream
    #[serde(default)]
    pub url: Option<String>,

    /// Local copy of the list; reused instead of downloading when present
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Reject addresses that are not exactly 6 hex octets
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.data_dir).join(self.source.format.default_database()),
        }
    }

    pub fn source_path(&self) -> PathBuf {
        match &self.source.path {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.data_dir).join(self.source.format.default_file_name()),
        }
    }

    pub fn source_url(&self) -> &str {
        self.source
            .url
            .as_deref()
            .unwrap_or_else(|| self.source.format.default_url())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            data_dir: default_data_dir(),
            source: SourceConfig::default(),
            lookup: LookupConfig::default(),
        }
    }
}
