use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Args;
use reqwest::Url;

pub const DEFAULT_TICK_SECONDS: u64 = 5;
pub const DEFAULT_PORT: u16 = 17645;

/// Options shared by every way of starting the daemon.
#[derive(Args, Debug, Clone)]
pub struct DaemonOptions {
    #[arg(
        long,
        value_parser = absolute_dir,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = DEFAULT_TICK_SECONDS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Seconds between accounting ticks"
    )]
    pub interval: u64,
    #[arg(long = "sink-url", help = "Endpoint receiving weekly summaries as json POST requests")]
    pub sink_url: Option<Url>,
    #[arg(long, default_value_t = DEFAULT_PORT, help = "Local port for requests and browser events")]
    pub port: u16,
}

impl Default for DaemonOptions {
    fn default() -> Self {
        Self {
            dir: None,
            interval: DEFAULT_TICK_SECONDS,
            sink_url: None,
            port: DEFAULT_PORT,
        }
    }
}

/// The daemon changes its working directory once detached, relative paths have to be resolved
/// against the directory it was started from.
fn absolute_dir(raw: &str) -> Result<PathBuf, String> {
    std::path::absolute(raw).map_err(|e| format!("can't resolve {raw}: {e}"))
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub state_dir: PathBuf,
    pub tick_interval: Duration,
    pub sink_url: Option<Url>,
    pub listen: SocketAddr,
}

impl DaemonConfig {
    pub fn new(app_dir: PathBuf, options: &DaemonOptions) -> Self {
        Self {
            state_dir: app_dir.join("state"),
            tick_interval: Duration::from_secs(options.interval),
            sink_url: options.sink_url.clone(),
            listen: SocketAddr::from(([127, 0, 0, 1], options.port)),
        }
    }
}

/// Arguments to pass along when spawning a separate daemon process.
pub fn to_command_args(options: &DaemonOptions) -> Vec<String> {
    let mut args = vec![
        "--interval".to_owned(),
        options.interval.to_string(),
        "--port".to_owned(),
        options.port.to_string(),
    ];
    if let Some(dir) = &options.dir {
        args.push("--dir".to_owned());
        args.push(dir.to_string_lossy().into_owned());
    }
    if let Some(url) = &options.sink_url {
        args.push("--sink-url".to_owned());
        args.push(url.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use clap::Parser;

    use super::{to_command_args, DaemonConfig, DaemonOptions};

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        options: DaemonOptions,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::parse_from(["test"]);
        let config = DaemonConfig::new(PathBuf::from("/tmp/app"), &args.options);
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/app/state"));
        assert_eq!(config.listen.to_string(), "127.0.0.1:17645");
        assert!(config.sink_url.is_none());
    }

    #[test]
    fn test_relative_dir_is_made_absolute() -> anyhow::Result<()> {
        let args = TestArgs::parse_from(["test", "--dir", "relative/app"]);
        let dir = args.options.dir.clone().unwrap();
        assert!(dir.is_absolute());
        assert_eq!(dir, std::env::current_dir()?.join("relative/app"));
        assert!(to_command_args(&args.options).contains(&dir.to_string_lossy().into_owned()));
        Ok(())
    }

    #[test]
    fn test_rejects_zero_interval_and_bad_urls() {
        assert!(TestArgs::try_parse_from(["test", "--interval", "0"]).is_err());
        assert!(TestArgs::try_parse_from(["test", "--sink-url", "not a url"]).is_err());
    }

    #[test]
    fn test_command_args_round_trip() {
        let args = TestArgs::parse_from([
            "test",
            "--interval",
            "10",
            "--sink-url",
            "https://example.com/sync",
            "--dir",
            "/tmp/app",
        ]);
        let mut forwarded = vec!["test".to_owned()];
        forwarded.extend(to_command_args(&args.options));
        let reparsed = TestArgs::parse_from(forwarded);
        assert_eq!(reparsed.options.interval, 10);
        assert_eq!(reparsed.options.dir, Some(PathBuf::from("/tmp/app")));
        assert_eq!(
            reparsed.options.sink_url.map(|v| v.to_string()),
            Some("https://example.com/sync".to_owned())
        );
    }
}
