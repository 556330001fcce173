use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use steamcharts_pull::cli::{collect, enrich, pipeline, probe};
use steamcharts_pull::config::PipelineConfig;
use steamcharts_pull::model::AppId;
use steamcharts_pull::tracing::init_tracing;
use steamcharts_pull::util::env;

#[derive(Parser, Debug)]
#[command(
    name = "chartpull",
    version,
    about = "Collect the most played Steam games with store and critic data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Scrape the SteamCharts leaderboard and fetch Steam store details for each game
    Collect {
        /// Number of leaderboard games to collect
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
        /// Skip the leaderboard and collect these app ids instead
        #[arg(long, value_delimiter = ',')]
        app_ids: Option<Vec<AppId>>,
        /// Output CSV path (default: OUTPUT_PATH or data/most_popular_steam_games.csv)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pause between store requests in milliseconds (default: STEAM_FETCH_DELAY_MS or 1700)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Attach OpenCritic review data to a previously collected CSV
    Enrich {
        /// CSV produced by `collect`
        #[arg(long)]
        input: PathBuf,
        /// Output CSV path (default: overwrite the input)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Only enrich the first N rows
        #[arg(long)]
        limit: Option<usize>,
        /// File holding the RapidAPI key (default: OPENCRITIC_KEY_FILE or key.txt)
        #[arg(long)]
        key_file: Option<PathBuf>,
    },
    /// Collect, enrich and save in one go
    Run {
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
        /// Only enrich the first N rows (default: all collected rows)
        #[arg(long)]
        limit: Option<usize>,
        /// Do not call OpenCritic
        #[arg(long, default_value_t = false)]
        skip_reviews: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the leaderboard entries without calling the store API
    Chart {
        #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Fetch and print the normalized store record for one app
    App {
        #[arg(long)]
        app_id: AppId,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env::init_env();
    init_tracing("info")?;

    let cli = Cli::parse();
    let config = PipelineConfig::from_env();

    match cli.command {
        Commands::Collect {
            count,
            app_ids,
            out,
            delay_ms,
        } => {
            let cfg = collect::CollectCommandConfig {
                count: count as usize,
                app_ids,
                out_path: out,
                delay_ms,
            };
            collect::run(config, cfg).await?;
        }
        Commands::Enrich {
            input,
            out,
            limit,
            key_file,
        } => {
            let cfg = enrich::EnrichCommandConfig {
                input,
                out_path: out,
                limit,
                key_file,
            };
            enrich::run(config, cfg).await?;
        }
        Commands::Run {
            count,
            limit,
            skip_reviews,
            out,
        } => {
            let cfg = pipeline::RunCommandConfig {
                count: count as usize,
                review_limit: limit,
                skip_reviews: skip_reviews || env::env_flag("SKIP_REVIEWS", false),
                out_path: out,
            };
            pipeline::run(config, cfg).await?;
        }
        Commands::Chart { count } => probe::chart(config, count as usize).await?,
        Commands::App { app_id } => probe::app(config, app_id).await?,
    }
    Ok(())
}
