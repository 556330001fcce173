use std::time::Duration;

use indexmap::{IndexMap, IndexSet};
use tracing::info;

use crate::extractor::LeaderboardExtractor;
use crate::model::{AppId, DetailRecord, LeaderboardEntry, MergedRow};
use crate::providers::{DetailSource, PageSource};

/// Outcome of one collection pass.
#[derive(Debug, Clone, Default)]
pub struct CollectReport {
    pub requested: usize,
    /// Distinct ids handed to the detail fetcher.
    pub extracted: usize,
    /// Ids whose detail lookup came back empty, in processing order.
    pub dropped: Vec<AppId>,
    pub rows: Vec<MergedRow>,
}

/// Fixed pause between outbound calls.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Drives leaderboard extraction and per-app detail lookups, joining the two
/// by app id.
pub struct Collector<'a> {
    pages: &'a dyn PageSource,
    details: &'a dyn DetailSource,
    page_size: usize,
    pacer: Pacer,
}

impl<'a> Collector<'a> {
    pub fn new(
        pages: &'a dyn PageSource,
        details: &'a dyn DetailSource,
        page_size: usize,
        fetch_delay: Duration,
    ) -> Self {
        Self {
            pages,
            details,
            page_size,
            pacer: Pacer::new(fetch_delay),
        }
    }

    /// Top `target` leaderboard apps joined with their store details.
    pub async fn collect(&self, target: usize) -> CollectReport {
        let entries = LeaderboardExtractor::new(self.pages, self.page_size)
            .extract(target)
            .await;
        let chart: IndexMap<AppId, LeaderboardEntry> =
            entries.into_iter().map(|e| (e.app_id, e)).collect();
        let ids: Vec<AppId> = chart.keys().copied().collect();
        let mut report = self.fetch_all(&ids).await;
        report.requested = target;
        for row in &mut report.rows {
            row.chart = chart.get(&row.app_id).cloned();
        }
        report
    }

    /// Store details for explicit ids, without leaderboard metrics. Repeated ids
    /// are looked up once.
    pub async fn collect_ids(&self, ids: &[AppId]) -> CollectReport {
        let unique: IndexSet<AppId> = ids.iter().copied().collect();
        let unique: Vec<AppId> = unique.into_iter().collect();
        let mut report = self.fetch_all(&unique).await;
        report.requested = ids.len();
        report
    }

    async fn fetch_all(&self, ids: &[AppId]) -> CollectReport {
        let total = ids.len();
        let mut details: IndexMap<AppId, DetailRecord> = IndexMap::with_capacity(total);
        let mut dropped = Vec::new();

        for (i, &app_id) in ids.iter().enumerate() {
            info!("[{}/{}] retrieving appid={}", i + 1, total, app_id);
            match self.details.fetch_details(app_id).await {
                Some(rec) => {
                    details.insert(app_id, rec);
                }
                None => {
                    info!(appid = %app_id, "no store details; skipping");
                    dropped.push(app_id);
                }
            }
            if i + 1 < total {
                self.pacer.pause().await;
            }
        }

        let rows: Vec<MergedRow> = ids
            .iter()
            .filter_map(|id| {
                details.swap_remove(id).map(|detail| MergedRow {
                    app_id: *id,
                    chart: None,
                    detail,
                })
            })
            .collect();

        info!(
            extracted = total,
            collected = rows.len(),
            dropped = dropped.len(),
            "collection finished"
        );
        CollectReport {
            requested: total,
            extracted: total,
            dropped,
            rows,
        }
    }
}
