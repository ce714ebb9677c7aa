use std::net::AddrParseError;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures inside a single probe. These never leave the probe: they are
/// rendered to a string and stored in the probe's result record.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tls(#[from] native_tls::Error),

    #[error("peer did not present a certificate")]
    MissingCertificate,

    #[error("invalid certificate: {0}")]
    Certificate(String),

    #[error("certificate expiry timestamp out of range: {0}")]
    ExpiryOutOfRange(i64),
}

/// Errors from the pipeline glue between probes. Only these trigger a retry.
#[derive(Error, Debug)]
pub enum DiagnoseError {
    #[error("resolved address {address:?} is not an IP address: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("attempt panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid DNS host {host:?}: {source}")]
    InvalidDnsHost {
        host: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to set up DNS resolver: {0}")]
    Resolver(#[from] trust_dns_resolver::error::ResolveError),

    #[error("failed to set up TLS connector: {0}")]
    Tls(#[from] native_tls::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
