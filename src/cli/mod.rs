pub mod client;
pub mod daemon_path;
pub mod output;
pub mod process;

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::DaemonClient;
use process::{restart_server, stop_servers};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{
        config::{DaemonOptions, DEFAULT_PORT},
        protocol::Message,
        start_daemon,
    },
    tracking::{categories::CategoryList, ledger::DayUsage, weekly::WeeklySummary},
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Tabtally", version, long_about = None)]
#[command(about = "Tracks how much focused time goes into each web domain", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(long, default_value_t = DEFAULT_PORT, help = "Port of a running daemon")]
    port: u16,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts a daemon for the application")]
    Init {
        #[command(flatten)]
        options: DaemonOptions,
    },
    #[command(
        about = "Run a daemon directly in current console. Used for debugging and for supervisors that expect a foreground process"
    )]
    Serve {
        #[command(flatten)]
        options: DaemonOptions,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Time per domain recorded today")]
    Today {
        #[arg(long, help = "Print raw json")]
        json: bool,
    },
    #[command(about = "Productive, unproductive and neutral time over the last 7 days")]
    Weekly {
        #[arg(long, help = "Print raw json")]
        json: bool,
    },
    #[command(about = "Show domain suffixes used for classification")]
    Categories {
        #[arg(long, help = "Print raw json")]
        json: bool,
    },
    #[command(about = "Replace both category lists. Past time is reclassified right away")]
    SetCategories {
        #[arg(long, value_delimiter = ',', help = "Comma separated productive suffixes")]
        productive: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Comma separated unproductive suffixes")]
        unproductive: Vec<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let app_dir = create_application_default_path()?;

    match args.commands {
        Commands::Init { options } => {
            enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;
            restart_server(&options)
        }
        Commands::Stop {} => stop_servers(),
        Commands::Serve { options } => {
            let app_dir = options.dir.clone().unwrap_or(app_dir);
            enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, true)?;
            start_daemon(app_dir, &options).await
        }
        Commands::Today { json } => {
            let TodayReply { usage } = query(args.port, Message::GetToday).await?;
            print_reply(json, &usage, || output::render_today(&usage))
        }
        Commands::Weekly { json } => {
            let summary: WeeklySummary = query(args.port, Message::GetWeekly).await?;
            print_reply(json, &summary, || output::render_weekly(&summary))
        }
        Commands::Categories { json } => {
            let categories: CategoryList = query(args.port, Message::GetCategories).await?;
            print_reply(json, &categories, || output::render_categories(&categories))
        }
        Commands::SetCategories {
            productive,
            unproductive,
        } => {
            let category_list = CategoryList {
                productive: clean_patterns(productive),
                unproductive: clean_patterns(unproductive),
            };
            let _: serde_json::Value =
                query(args.port, Message::SetCategories { category_list }).await?;
            println!("Categories updated");
            Ok(())
        }
    }
}

#[derive(serde::Deserialize)]
struct TodayReply {
    usage: DayUsage,
}

async fn query<T: serde::de::DeserializeOwned>(port: u16, message: Message) -> Result<T> {
    let mut client = DaemonClient::connect(SocketAddr::from(([127, 0, 0, 1], port))).await?;
    client.request(&message).await
}

fn print_reply<T: serde::Serialize>(
    json: bool,
    value: &T,
    render: impl FnOnce() -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render());
    }
    Ok(())
}

/// Drops blanks left over by trailing commas.
fn clean_patterns(patterns: Vec<String>) -> Vec<String> {
    patterns
        .into_iter()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{clean_patterns, Args, Commands};

    #[test]
    fn test_set_categories_parsing() {
        let args = Args::parse_from([
            "tabtally",
            "set-categories",
            "--productive",
            "github.com, docs.rs,",
            "--unproductive",
            "reddit.com",
        ]);
        let Commands::SetCategories {
            productive,
            unproductive,
        } = args.commands
        else {
            panic!("wrong command parsed");
        };
        assert_eq!(clean_patterns(productive), vec!["github.com", "docs.rs"]);
        assert_eq!(clean_patterns(unproductive), vec!["reddit.com"]);
    }

    #[test]
    fn test_port_precedes_query() {
        let args = Args::parse_from(["tabtally", "--port", "9000", "weekly"]);
        assert_eq!(args.port, 9000);
    }
}
