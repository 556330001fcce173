use anyhow::{Context, Result};
use serde_json::json;

use crate::config::PipelineConfig;
use crate::extractor::LeaderboardExtractor;
use crate::model::AppId;
use crate::providers::steam::SteamProvider;
use crate::providers::steamcharts::SteamChartsProvider;
use crate::providers::DetailSource;

/// Print the leaderboard entries that a collection run would use.
pub async fn chart(pipeline: PipelineConfig, count: usize) -> Result<()> {
    pipeline.validate().context("invalid pipeline configuration")?;
    let charts = SteamChartsProvider::new(&pipeline)?;
    let entries = LeaderboardExtractor::new(&charts, pipeline.page_size)
        .extract(count)
        .await;
    for (rank, e) in entries.iter().enumerate() {
        println!(
            "{:>4}. {:<10} {:<48} current={} peak={}",
            rank + 1,
            e.app_id,
            e.name,
            e.current_players.map_or_else(|| "-".into(), |n| n.to_string()),
            e.peak_players.map_or_else(|| "-".into(), |n| n.to_string()),
        );
    }
    Ok(())
}

/// Print one normalized store record as JSON.
pub async fn app(pipeline: PipelineConfig, app_id: AppId) -> Result<()> {
    pipeline.validate().context("invalid pipeline configuration")?;
    let steam = SteamProvider::new(&pipeline)?;
    let out = match steam.fetch_details(app_id).await {
        Some(rec) => serde_json::to_value(&rec)?,
        None => json!({ "app_id": app_id, "found": false }),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
