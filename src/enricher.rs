use std::time::Duration;

use tracing::{info, warn};

use crate::model::EnrichedRow;
use crate::orchestrator::Pacer;
use crate::providers::ReviewSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Rows looked at (bounded by the limit).
    pub processed: usize,
    /// Rows whose name search returned at least one hit.
    pub matched: usize,
    /// Rows that received aggregate scores.
    pub scored: usize,
    /// Lookups that failed at the transport level.
    pub failed: usize,
}

/// Attaches OpenCritic aggregates to already collected rows.
///
/// Matching is by name and the first search hit wins; there is no
/// disambiguation between similarly named titles.
pub struct ReviewEnricher<'a> {
    source: &'a dyn ReviewSource,
    pacer: Pacer,
}

impl<'a> ReviewEnricher<'a> {
    pub fn new(source: &'a dyn ReviewSource, delay: Duration) -> Self {
        Self {
            source,
            pacer: Pacer::new(delay),
        }
    }

    /// Fill review fields on the first `limit` rows (all rows when `None`).
    /// Row count and order never change.
    pub async fn enrich(&self, rows: &mut [EnrichedRow], limit: Option<usize>) -> EnrichReport {
        let take = limit.map_or(rows.len(), |n| n.min(rows.len()));
        let mut report = EnrichReport::default();

        for (i, row) in rows.iter_mut().take(take).enumerate() {
            report.processed += 1;
            let Some(name) = row.row.search_name().map(str::to_string) else {
                info!(appid = %row.row.app_id, "no name to search for; skipping");
                continue;
            };
            info!("processing row {}/{}... searching for {}", i + 1, take, name);
            self.enrich_one(row, &name, &mut report).await;
            if i + 1 < take {
                self.pacer.pause().await;
            }
        }

        info!(
            processed = report.processed,
            matched = report.matched,
            scored = report.scored,
            failed = report.failed,
            "review enrichment finished"
        );
        report
    }

    async fn enrich_one(&self, row: &mut EnrichedRow, name: &str, report: &mut EnrichReport) {
        let hits = match self.source.search(name).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(game = name, error = %e, "review search failed");
                report.failed += 1;
                return;
            }
        };
        let Some(first) = hits.into_iter().next() else {
            info!(game = name, "no review results");
            return;
        };
        report.matched += 1;
        row.reviews.review_id = first.id;
        row.reviews.review_name = first.name;

        let Some(review_id) = first.id else {
            info!(game = name, "review match has no id; moving on");
            return;
        };

        match self.source.aggregate(review_id).await {
            Ok(Some(agg)) => {
                row.reviews.top_critic_score = agg.top_critic_score;
                row.reviews.median_score = agg.median_score;
                row.reviews.percent_recommended = agg.percent_recommended;
                row.reviews.num_reviews = agg.num_reviews;
                row.reviews.tier = agg.tier;
                report.scored += 1;
            }
            Ok(None) => info!(review_id, "no review aggregate; moving on"),
            Err(e) => {
                warn!(review_id, error = %e, "review aggregate fetch failed");
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppId, DetailRecord, MergedRow};
    use crate::providers::{ReviewAggregate, ReviewHit};
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Search {
        Hits(Vec<ReviewHit>),
        Fail,
    }

    #[derive(Default)]
    struct FakeReviews {
        searches: HashMap<&'static str, Search>,
        aggregates: HashMap<i64, Option<ReviewAggregate>>,
        failing_aggregates: Vec<i64>,
        searched: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ReviewSource for FakeReviews {
        async fn search(&self, name: &str) -> anyhow::Result<Vec<ReviewHit>> {
            self.searched.lock().unwrap().push(name.to_string());
            match self.searches.get(name) {
                Some(Search::Hits(h)) => Ok(h.clone()),
                Some(Search::Fail) => Err(anyhow::anyhow!("connection reset")),
                None => Ok(Vec::new()),
            }
        }

        async fn aggregate(&self, id: i64) -> anyhow::Result<Option<ReviewAggregate>> {
            if self.failing_aggregates.contains(&id) {
                anyhow::bail!("timeout");
            }
            Ok(self.aggregates.get(&id).cloned().flatten())
        }
    }

    fn row(id: u64, name: &str) -> EnrichedRow {
        let app_id = AppId::new(id).unwrap();
        EnrichedRow::from(MergedRow {
            app_id,
            chart: None,
            detail: DetailRecord {
                name: Some(name.to_string()),
                ..DetailRecord::new(app_id)
            },
        })
    }

    fn hit(id: Option<i64>, name: &str) -> ReviewHit {
        ReviewHit {
            id,
            name: Some(name.to_string()),
        }
    }

    fn mighty() -> ReviewAggregate {
        ReviewAggregate {
            top_critic_score: Some(90.5),
            median_score: Some(91.0),
            percent_recommended: Some(96.0),
            num_reviews: Some(150),
            tier: Some("Mighty".into()),
        }
    }

    #[tokio::test]
    async fn first_hit_wins_and_scores_are_attached() {
        let mut fake = FakeReviews::default();
        fake.searches.insert(
            "Hades",
            Search::Hits(vec![hit(Some(9), "Hades"), hit(Some(99), "Hades II")]),
        );
        fake.aggregates.insert(9, Some(mighty()));

        let mut rows = vec![row(1, "Hades")];
        let report = ReviewEnricher::new(&fake, Duration::ZERO)
            .enrich(&mut rows, None)
            .await;

        let r = &rows[0].reviews;
        assert_eq!(r.review_id, Some(9));
        assert_eq!(r.review_name.as_deref(), Some("Hades"));
        assert_eq!(r.top_critic_score, Some(90.5));
        assert_eq!(r.tier.as_deref(), Some("Mighty"));
        assert_eq!(report.scored, 1);
    }

    #[tokio::test]
    async fn failures_never_abort_the_pass_or_reorder_rows() {
        let mut fake = FakeReviews::default();
        fake.searches.insert("Broken", Search::Fail);
        fake.searches
            .insert("NoId", Search::Hits(vec![hit(None, "NoId Match")]));
        fake.searches
            .insert("SlowAgg", Search::Hits(vec![hit(Some(3), "SlowAgg")]));
        fake.searches
            .insert("Empty", Search::Hits(vec![hit(Some(4), "Empty")]));
        fake.searches
            .insert("Good", Search::Hits(vec![hit(Some(5), "Good")]));
        fake.failing_aggregates.push(3);
        fake.aggregates.insert(4, None);
        fake.aggregates.insert(5, Some(mighty()));

        let mut rows = vec![
            row(1, "Broken"),
            row(2, "Missing"),
            row(3, "NoId"),
            row(4, "SlowAgg"),
            row(5, "Empty"),
            row(6, "Good"),
        ];
        let report = ReviewEnricher::new(&fake, Duration::ZERO)
            .enrich(&mut rows, None)
            .await;

        let ids: Vec<u64> = rows.iter().map(|r| r.row.app_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(rows[0].reviews, Default::default());
        assert_eq!(rows[1].reviews, Default::default());
        assert_eq!(rows[2].reviews.review_id, None);
        assert_eq!(rows[2].reviews.review_name.as_deref(), Some("NoId Match"));
        assert!(!rows[2].reviews.has_scores());
        assert_eq!(rows[3].reviews.review_id, Some(3));
        assert!(!rows[3].reviews.has_scores());
        assert_eq!(rows[4].reviews.review_id, Some(4));
        assert!(!rows[4].reviews.has_scores());
        assert!(rows[5].reviews.has_scores());
        assert_eq!(
            report,
            EnrichReport {
                processed: 6,
                matched: 4,
                scored: 1,
                failed: 2,
            }
        );
    }

    #[tokio::test]
    async fn limit_bounds_the_rows_processed() {
        let mut fake = FakeReviews::default();
        fake.searches.insert("A", Search::Hits(vec![hit(Some(1), "A")]));
        fake.searches.insert("B", Search::Hits(vec![hit(Some(2), "B")]));
        fake.aggregates.insert(1, Some(mighty()));
        fake.aggregates.insert(2, Some(mighty()));

        let mut rows = vec![row(1, "A"), row(2, "B")];
        let report = ReviewEnricher::new(&fake, Duration::ZERO)
            .enrich(&mut rows, Some(1))
            .await;

        assert_eq!(report.processed, 1);
        assert!(rows[0].reviews.has_scores());
        assert!(!rows[1].reviews.has_scores());
        assert_eq!(*fake.searched.lock().unwrap(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn rows_without_any_name_are_skipped() {
        let fake = FakeReviews::default();
        let mut rows = vec![row(1, "  ")];
        let report = ReviewEnricher::new(&fake, Duration::ZERO)
            .enrich(&mut rows, Some(10))
            .await;
        assert_eq!(report.processed, 1);
        assert!(fake.searched.lock().unwrap().is_empty());
    }
}
