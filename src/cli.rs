use std::path::PathBuf;

use clap::Parser;

/// timeBOMB: tasks that don't wait
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON settings file
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Expiry scan interval in milliseconds (overrides settings)
    #[arg(long)]
    pub scan_interval_ms: Option<u64>,

    /// Completion prompt interval in milliseconds (overrides settings)
    #[arg(long)]
    pub dispatch_interval_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "timebomb",
            "--settings",
            "/tmp/tb.json",
            "--scan-interval-ms",
            "250",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/tb.json")));
        assert_eq!(cli.scan_interval_ms, Some(250));
        assert_eq!(cli.dispatch_interval_ms, None);
        assert!(cli.verbose);
    }
}
