use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "netdiag")]
#[command(about = "Network Diagnostic Tool: DNS, ping, TCP 80/443, HTTP and TLS expiry per URL")]
#[command(version)]
pub struct Cli {
    /// Enter one or more URLs
    #[arg(long = "url", required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Timeout in seconds [default: 5]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retry attempts [default: 2]
    #[arg(long = "retry")]
    pub retries: Option<u32>,

    /// Report file [default: report.json]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// YAML file with default settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}
