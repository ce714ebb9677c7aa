use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::ReportError;
use crate::probe::prelude::*;

const INDENT: &[u8] = b"    ";

/// Render the results as a JSON array indented by four spaces.
pub fn to_json(results: &[DiagnosticResult]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    results.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the report, replacing any previous file at `path`.
pub fn write_report(path: &Path, results: &[DiagnosticResult]) -> Result<(), ReportError> {
    let json = to_json(results)?;
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}
