use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use smartbin_core::config::{DEFAULT_ENDPOINT, MonitorConfig};
use tracing::Level;

use crate::app::Route;

const LOG_FILE_NAME: &str = "smartbin-tui.log";

#[derive(Debug, Parser)]
#[command(name = "smartbin-tui", version)]
#[command(about = "Live fill levels of smart waste bins in the terminal")]
pub(crate) struct Args {
    /// Bin-status endpoint of the backend
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Time between two polls, e.g. `5s` or `1500ms`
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// View to open on start
    #[arg(long, value_enum, default_value_t = Route::Dashboard)]
    pub route: Route,

    /// File receiving log output [default: smartbin-tui.log in the temp dir]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset
    #[arg(long, default_value = "info", value_parser = clap::value_parser!(Level))]
    pub log_level: Level,
}

impl Args {
    pub(crate) fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            endpoint: self.endpoint.clone(),
            poll_interval: self.interval,
        }
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_compiled_in_config() {
        let args = Args::try_parse_from(["smartbin-tui"]).expect("defaults parse");
        assert_eq!(args.monitor_config(), MonitorConfig::default());
        assert_eq!(args.route, Route::Dashboard);
        assert_eq!(args.log_level, Level::INFO);
        assert!(args.log_path().ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::try_parse_from([
            "smartbin-tui",
            "--endpoint",
            "http://10.0.0.2:5000/api/iot/bins/all-status",
            "--interval",
            "1500ms",
            "--route",
            "live-bins",
            "--log-file",
            "/tmp/bins.log",
            "--log-level",
            "debug",
        ])
        .expect("overrides parse");

        let config = args.monitor_config();
        assert_eq!(config.endpoint, "http://10.0.0.2:5000/api/iot/bins/all-status");
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(args.route, Route::LiveBins);
        assert_eq!(args.log_path(), PathBuf::from("/tmp/bins.log"));
        assert_eq!(args.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_unparseable_interval() {
        assert!(Args::try_parse_from(["smartbin-tui", "--interval", "soon"]).is_err());
    }
}
