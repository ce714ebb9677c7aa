use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_REPORT_FILE: &str = "report.json";
pub const DEFAULT_CONFIG_FILE: &str = "netdiag.yml";

/// Optional defaults read from a YAML file. Anything left out falls back to
/// the built-in defaults; command line flags and environment win over it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Per-probe timeout in seconds.
    pub timeout_seconds: Option<u64>,

    /// Number of whole-pipeline attempts per target.
    pub retries: Option<u32>,

    /// Nameserver IPs for the DNS probe. Empty means the system resolver.
    pub dns_hosts: Vec<String>,

    /// Where the JSON report is written.
    pub report_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}
