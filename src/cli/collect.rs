use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::export::write_csv;
use crate::http::build_client;
use crate::model::{AppId, EnrichedRow};
use crate::orchestrator::{CollectReport, Collector};
use crate::providers::steam::SteamProvider;
use crate::providers::steamcharts::SteamChartsProvider;

#[derive(Debug, Clone, Default)]
pub struct CollectCommandConfig {
    /// How many leaderboard apps to collect.
    pub count: usize,
    /// Collect these ids instead of reading the leaderboard.
    pub app_ids: Option<Vec<AppId>>,
    pub out_path: Option<PathBuf>,
    pub delay_ms: Option<u64>,
}

/// Leaderboard (or explicit ids) + store details against the live endpoints.
pub async fn collect_rows(
    cfg: &PipelineConfig,
    count: usize,
    app_ids: Option<&[AppId]>,
) -> Result<CollectReport> {
    cfg.validate().context("invalid pipeline configuration")?;
    let http = build_client(cfg)?;
    let charts = SteamChartsProvider::with_client(http.clone(), cfg);
    let steam = SteamProvider::with_client(http, cfg);
    let collector = Collector::new(&charts, &steam, cfg.page_size, cfg.fetch_delay);

    let report = match app_ids {
        Some(ids) => collector.collect_ids(ids).await,
        None => collector.collect(count).await,
    };
    if report.rows.len() < report.requested {
        warn!(
            requested = report.requested,
            collected = report.rows.len(),
            dropped = ?report.dropped,
            "collected fewer games than requested"
        );
    }
    Ok(report)
}

pub async fn run(mut pipeline: PipelineConfig, cmd: CollectCommandConfig) -> Result<()> {
    if let Some(ms) = cmd.delay_ms {
        pipeline = pipeline.with_fetch_delay(Duration::from_millis(ms));
    }
    let out_path = cmd.out_path.unwrap_or_else(|| pipeline.output_path.clone());

    let report = collect_rows(&pipeline, cmd.count, cmd.app_ids.as_deref()).await?;
    let rows: Vec<EnrichedRow> = report.rows.into_iter().map(EnrichedRow::from).collect();
    write_csv(&out_path, &rows)?;
    info!(rows = rows.len(), path = %out_path.display(), "collect: done");
    Ok(())
}
