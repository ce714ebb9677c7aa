use std::sync::Arc;

use crate::probe::prelude::*;

use super::pipeline::{DiagnoseOptions, diagnose};

/// Diagnose every target concurrently, one task per URL with no cap, and
/// return the results in the order the URLs were given.
///
/// A target whose task dies is reported with a top-level error; the other
/// targets are unaffected.
pub async fn diagnose_all<P>(
    prober: Arc<P>,
    urls: &[String],
    opts: DiagnoseOptions,
) -> Vec<DiagnosticResult>
where
    P: Prober + 'static,
{
    let mut handles = Vec::with_capacity(urls.len());

    for url in urls {
        let prober = prober.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            diagnose(prober.as_ref(), &url, opts).await
        }));
    }

    let mut results = Vec::with_capacity(urls.len());
    for (url, handle) in urls.iter().zip(handles) {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Diagnostics task for {url} failed: {e}");
                results.push(DiagnosticResult::aborted(url.as_str(), e.to_string()));
            }
        }
    }

    results
}
