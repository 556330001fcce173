use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::PipelineConfig;
use crate::enricher::{EnrichReport, ReviewEnricher};
use crate::export::{read_csv, write_csv};
use crate::model::EnrichedRow;
use crate::providers::opencritic::{load_api_key, OpenCriticProvider};

#[derive(Debug, Clone, Default)]
pub struct EnrichCommandConfig {
    pub input: PathBuf,
    /// Defaults to overwriting the input table.
    pub out_path: Option<PathBuf>,
    pub limit: Option<usize>,
    pub key_file: Option<PathBuf>,
}

/// OpenCritic enrichment against the live API. The key is loaded before any
/// request so a missing credential fails fast.
pub async fn enrich_rows(
    cfg: &PipelineConfig,
    rows: &mut [EnrichedRow],
    limit: Option<usize>,
) -> Result<EnrichReport> {
    let api_key = load_api_key(&cfg.key_file)?;
    let provider = OpenCriticProvider::new(cfg, api_key)?;
    Ok(ReviewEnricher::new(&provider, cfg.review_delay)
        .enrich(rows, limit)
        .await)
}

pub async fn run(mut pipeline: PipelineConfig, cmd: EnrichCommandConfig) -> Result<()> {
    if let Some(key_file) = cmd.key_file {
        pipeline.key_file = key_file;
    }
    let mut rows = read_csv(&cmd.input)
        .with_context(|| format!("reading collected table {}", cmd.input.display()))?;
    let report = enrich_rows(&pipeline, &mut rows, cmd.limit).await?;
    let out_path = cmd.out_path.unwrap_or(cmd.input);
    write_csv(&out_path, &rows)?;
    info!(
        rows = rows.len(),
        scored = report.scored,
        path = %out_path.display(),
        "enrich: done"
    );
    Ok(())
}
