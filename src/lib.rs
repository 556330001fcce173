//! Most-played Steam games, collected in two stages: the SteamCharts leaderboard
//! for rank and player counts, then the Steam Store API for prices, release
//! dates and review counts. OpenCritic aggregates can be attached afterwards.
pub mod cli;
pub mod config;
pub mod enricher;
pub mod error;
pub mod export;
pub mod extractor;
pub mod http;
pub mod model;
pub mod normalization;
pub mod orchestrator;
pub mod providers;
pub mod tracing;

pub mod util {
    pub mod env;
}

pub use config::PipelineConfig;
pub use enricher::{EnrichReport, ReviewEnricher};
pub use error::ConfigError;
pub use extractor::LeaderboardExtractor;
pub use model::{AppId, DetailRecord, EnrichedRow, LeaderboardEntry, MergedRow, ReviewFields};
pub use orchestrator::{CollectReport, Collector};
