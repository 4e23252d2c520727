pub mod commands;
pub mod feed;
pub mod logging;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use minishop_core::config::{AppConfig, ConfigOverrides, RankingMode};
use minishop_core::{DomainError, PopularityRank, RoundingPolicy};

use crate::commands::{CommandResult, FeedOptions};

#[derive(Debug, Parser)]
#[command(
    name = "minishop",
    about = "Storefront purchase insights CLI",
    long_about = "Compute vendor purchase frequency and discount savings from a storefront JSON feed.",
    after_help = "Examples:\n  minishop vendors --feed feed.json\n  minishop savings --feed feed.json --json\n  minishop report --feed feed.json --seed 7\n  minishop config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a minishop.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Use reproducible popularity ranks derived from this seed")]
    seed: Option<u64>,
    #[arg(
        long,
        global = true,
        conflicts_with = "seed",
        help = "Give every vendor this popularity rank (1-100)"
    )]
    fixed_rank: Option<u8>,
    #[arg(long, global = true, help = "ISO 4217 currency code used for text output")]
    currency: Option<String>,
    #[arg(long, global = true, value_parser = parse_rounding, help = "half_away_from_zero or half_even")]
    rounding: Option<RoundingPolicy>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Group feed products by vendor and count them")]
    Vendors {
        #[arg(long, help = "Path to the JSON feed file")]
        feed: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Summarize units bought and money saved across feed orders")]
    Savings {
        #[arg(long, help = "Path to the JSON feed file")]
        feed: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run vendor statistics and purchase summary together")]
    Report {
        #[arg(long, help = "Path to the JSON feed file")]
        feed: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn parse_rounding(value: &str) -> Result<RoundingPolicy, String> {
    value.parse::<RoundingPolicy>().map_err(|error| error.to_string())
}

impl Cli {
    fn overrides(&self) -> Result<ConfigOverrides, DomainError> {
        let fixed_rank = self.fixed_rank.map(PopularityRank::new).transpose()?;
        let ranking_mode = match (fixed_rank, self.seed) {
            (Some(_), _) => Some(RankingMode::Fixed),
            (None, Some(_)) => Some(RankingMode::Seeded),
            (None, None) => None,
        };

        Ok(ConfigOverrides {
            currency_code: self.currency.clone(),
            rounding: self.rounding,
            ranking_mode,
            ranking_seed: self.seed,
            ranking_fixed_value: fixed_rank.map(u8::from),
            ..ConfigOverrides::default()
        })
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Vendors { .. } => "vendors",
            Self::Savings { .. } => "savings",
            Self::Report { .. } => "report",
            Self::Config => "config",
        }
    }
}

type FeedCommand = fn(&AppConfig, &FeedOptions) -> CommandResult;

pub fn run(cli: Cli) -> CommandResult {
    let command_name = cli.command.name();
    let overrides = match cli.overrides() {
        Ok(overrides) => overrides,
        Err(error) => return commands::invalid_argument(command_name, error),
    };

    let (options, handler): (FeedOptions, FeedCommand) = match &cli.command {
        Command::Config => return commands::config::run(cli.config, overrides),
        Command::Vendors { feed, json } => {
            (feed_options(feed, *json), commands::vendors::run as FeedCommand)
        }
        Command::Savings { feed, json } => {
            (feed_options(feed, *json), commands::savings::run as FeedCommand)
        }
        Command::Report { feed, json } => {
            (feed_options(feed, *json), commands::report::run as FeedCommand)
        }
    };

    let config = match commands::load_config(command_name, cli.config.clone(), overrides) {
        Ok(config) => config,
        Err(result) => return result,
    };
    logging::init_logging(&config);

    handler(&config, &options)
}

fn feed_options(feed: &Path, json: bool) -> FeedOptions {
    FeedOptions { feed_path: feed.to_path_buf(), json }
}
