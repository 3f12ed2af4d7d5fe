use clap::Parser;

/// Reel-Control: D-pad driven media browser for the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "reel-control")]
#[command(version)]
#[command(about = "D-pad driven media browse and request UI", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "REEL_LOG", default_value = "info")]
    pub log_level: String,

    /// Grid columns, overriding the config file
    #[arg(long, value_name = "N")]
    pub columns: Option<usize>,

    /// Use this config directory instead of the platform default
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<std::path::PathBuf>,

    /// Disable the config file watcher
    #[arg(long, default_value_t = false)]
    pub no_watch_config: bool,

    /// Write default config files and exit
    #[arg(long, default_value_t = false)]
    pub write_config: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["reel-control"]);
        assert_eq!(cli.log_level, "info");
        assert!(cli.columns.is_none());
        assert!(cli.config_dir.is_none());
        assert!(!cli.no_watch_config);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_columns_flag() {
        let cli = Cli::parse_from(["reel-control", "--columns", "8"]);
        assert_eq!(cli.columns, Some(8));
    }

    #[test]
    fn test_no_watch_config_flag() {
        let cli = Cli::parse_from(["reel-control", "--no-watch-config"]);
        assert!(cli.no_watch_config);
    }
}
