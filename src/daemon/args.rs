use clap::Parser;
use tracing::level_filters::LevelFilter;

use super::config::DaemonOptions;


#[derive(Parser)]
pub struct DaemonArgs {
  /// Stay in the foreground instead of detaching.
  #[arg(long)]
  pub force: bool,
  #[command(flatten)]
  pub options: DaemonOptions,
  /// This option is for debugging purposes only.
  #[arg(long = "log-console")]
  pub log_console : bool,
  #[arg(long = "log-filter")]
  pub log: Option<LevelFilter>
}
