use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::cli::collect::collect_rows;
use crate::cli::enrich::enrich_rows;
use crate::config::PipelineConfig;
use crate::export::write_csv;
use crate::model::EnrichedRow;
use crate::providers::opencritic::load_api_key;

#[derive(Debug, Clone, Default)]
pub struct RunCommandConfig {
    pub count: usize,
    /// Rows to enrich; defaults to `count`.
    pub review_limit: Option<usize>,
    pub skip_reviews: bool,
    pub out_path: Option<PathBuf>,
}

/// Collect, enrich and save in one pass.
pub async fn run(pipeline: PipelineConfig, cmd: RunCommandConfig) -> Result<()> {
    // Check the credential up front so a long collection is not wasted.
    if !cmd.skip_reviews {
        load_api_key(&pipeline.key_file)?;
    }

    let report = collect_rows(&pipeline, cmd.count, None).await?;
    let mut rows: Vec<EnrichedRow> = report.rows.into_iter().map(EnrichedRow::from).collect();

    if cmd.skip_reviews {
        info!("review enrichment skipped");
    } else {
        let limit = cmd.review_limit.unwrap_or(cmd.count);
        enrich_rows(&pipeline, &mut rows, Some(limit)).await?;
        info!("the table now has information from OpenCritic");
    }

    let out_path = cmd.out_path.unwrap_or_else(|| pipeline.output_path.clone());
    write_csv(&out_path, &rows)
}
