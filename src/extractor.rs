use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::model::{AppId, LeaderboardEntry};
use crate::providers::steamcharts::parse_chart_page;
use crate::providers::PageSource;

/// Walks leaderboard pages until enough distinct apps are found.
pub struct LeaderboardExtractor<'a, S: PageSource + ?Sized> {
    source: &'a S,
    page_size: usize,
}

impl<'a, S: PageSource + ?Sized> LeaderboardExtractor<'a, S> {
    pub fn new(source: &'a S, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
        }
    }

    /// Pages needed to cover `target` entries at the configured page size.
    pub fn pages_for(&self, target: usize) -> u32 {
        u32::try_from(target.div_ceil(self.page_size)).unwrap_or(u32::MAX)
    }

    /// Up to `target` distinct entries in rank order (page order, then row order).
    ///
    /// A page that cannot be fetched ends paging with whatever was collected so
    /// far, as does a page that adds nothing new.
    pub async fn extract(&self, target: usize) -> Vec<LeaderboardEntry> {
        let mut seen: HashSet<AppId> = HashSet::new();
        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(target);
        let pages = self.pages_for(target);

        'pages: for page in 1..=pages {
            let Some(html) = self.source.fetch_page(page).await else {
                warn!(
                    page,
                    collected = entries.len(),
                    "leaderboard page unavailable; stopping early"
                );
                break;
            };

            let mut added = 0usize;
            for entry in parse_chart_page(&html) {
                if !seen.insert(entry.app_id) {
                    debug!(page, appid = %entry.app_id, "duplicate leaderboard entry skipped");
                    continue;
                }
                entries.push(entry);
                added += 1;
                if entries.len() >= target {
                    break 'pages;
                }
            }

            info!(page, added, total = entries.len(), "leaderboard page parsed");
            if added == 0 {
                info!(page, "leaderboard exhausted");
                break;
            }
        }

        if entries.len() < target {
            warn!(
                requested = target,
                found = entries.len(),
                "leaderboard returned fewer apps than requested"
            );
        }
        entries
    }
}
