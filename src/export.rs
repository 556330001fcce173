use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{AppId, DetailRecord, EnrichedRow, LeaderboardEntry, MergedRow, ReviewFields};

/// One flat line of the output table. Absent values are empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    pub app_id: AppId,
    pub chart_name: Option<String>,
    pub current_players: Option<i64>,
    pub peak_players: Option<i64>,
    pub name: Option<String>,
    pub is_free: bool,
    pub base_price: Option<f64>,
    pub current_price: Option<f64>,
    pub discount_percent: Option<i64>,
    pub on_sale: bool,
    pub release_date: Option<String>,
    pub metacritic_score: Option<i64>,
    pub recommendations: Option<i64>,
    pub review_id: Option<i64>,
    pub review_name: Option<String>,
    pub top_critic_score: Option<f64>,
    pub median_score: Option<f64>,
    pub percent_recommended: Option<f64>,
    pub num_reviews: Option<i64>,
    pub tier: Option<String>,
}

impl From<&EnrichedRow> for CsvRow {
    fn from(r: &EnrichedRow) -> Self {
        let chart = r.row.chart.as_ref();
        let d = &r.row.detail;
        let rv = &r.reviews;
        Self {
            app_id: r.row.app_id,
            chart_name: chart.map(|c| c.name.clone()),
            current_players: chart.and_then(|c| c.current_players),
            peak_players: chart.and_then(|c| c.peak_players),
            name: d.name.clone(),
            is_free: d.is_free,
            base_price: d.base_price,
            current_price: d.current_price,
            discount_percent: d.discount_percent,
            on_sale: d.on_sale,
            release_date: d.release_date.clone(),
            metacritic_score: d.metacritic_score,
            recommendations: d.recommendations,
            review_id: rv.review_id,
            review_name: rv.review_name.clone(),
            top_critic_score: rv.top_critic_score,
            median_score: rv.median_score,
            percent_recommended: rv.percent_recommended,
            num_reviews: rv.num_reviews,
            tier: rv.tier.clone(),
        }
    }
}

impl From<CsvRow> for EnrichedRow {
    fn from(c: CsvRow) -> Self {
        // A row collected from explicit ids has no chart columns at all. A blank
        // chart name reads back as None, so the player counts also count.
        let has_chart = c.chart_name.is_some()
            || c.current_players.is_some()
            || c.peak_players.is_some();
        let chart = has_chart.then(|| LeaderboardEntry {
            app_id: c.app_id,
            name: c.chart_name.unwrap_or_default(),
            current_players: c.current_players,
            peak_players: c.peak_players,
        });
        EnrichedRow {
            row: MergedRow {
                app_id: c.app_id,
                chart,
                detail: DetailRecord {
                    app_id: c.app_id,
                    name: c.name,
                    is_free: c.is_free,
                    base_price: c.base_price,
                    current_price: c.current_price,
                    discount_percent: c.discount_percent,
                    on_sale: c.on_sale,
                    release_date: c.release_date,
                    metacritic_score: c.metacritic_score,
                    recommendations: c.recommendations,
                },
            },
            reviews: ReviewFields {
                review_id: c.review_id,
                review_name: c.review_name,
                top_critic_score: c.top_critic_score,
                median_score: c.median_score,
                percent_recommended: c.percent_recommended,
                num_reviews: c.num_reviews,
                tier: c.tier,
            },
        }
    }
}

/// Write the table with a header row, creating parent directories as needed.
pub fn write_csv(path: &Path, rows: &[EnrichedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("opening {} for writing", path.display()))?;
    if rows.is_empty() {
        // serde only emits headers alongside the first record.
        wtr.write_record(HEADER)?;
    }
    for r in rows {
        wtr.serialize(CsvRow::from(r))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    info!("saved {} games to {}", rows.len(), path.display());
    Ok(())
}

/// Read a table previously produced by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<EnrichedRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = rec.with_context(|| format!("{} line {}", path.display(), i + 2))?;
        out.push(EnrichedRow::from(row));
    }
    Ok(out)
}

pub const HEADER: [&str; 20] = [
    "app_id",
    "chart_name",
    "current_players",
    "peak_players",
    "name",
    "is_free",
    "base_price",
    "current_price",
    "discount_percent",
    "on_sale",
    "release_date",
    "metacritic_score",
    "recommendations",
    "review_id",
    "review_name",
    "top_critic_score",
    "median_score",
    "percent_recommended",
    "num_reviews",
    "tier",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EnrichedRow> {
        let a = AppId::new(730).unwrap();
        let b = AppId::new(570).unwrap();
        let mut first = EnrichedRow::from(MergedRow {
            app_id: a,
            chart: Some(LeaderboardEntry {
                app_id: a,
                name: "Counter-Strike 2".into(),
                current_players: Some(1_200_000),
                peak_players: None,
            }),
            detail: DetailRecord {
                name: Some("Counter-Strike 2".into()),
                is_free: true,
                base_price: Some(0.0),
                current_price: Some(0.0),
                release_date: Some("21 Aug, 2012".into()),
                ..DetailRecord::new(a)
            },
        });
        first.reviews.tier = Some("Strong".into());
        first.reviews.top_critic_score = Some(83.25);
        let second = EnrichedRow::from(MergedRow {
            app_id: b,
            chart: None,
            detail: DetailRecord {
                name: Some("Dota 2, \"Reborn\"".into()),
                base_price: Some(19.99),
                discount_percent: Some(25),
                on_sale: true,
                ..DetailRecord::new(b)
            },
        });
        vec![first, second]
    }

    #[test]
    fn header_matches_serialized_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, HEADER.join(","));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn creates_parent_directories_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/games.csv");
        let rows = sample();
        write_csv(&path, &rows).unwrap();
        let back = read_csv(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn absent_values_are_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.csv");
        write_csv(&path, &sample()[1..]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert!(line.starts_with("570,,,,\"Dota 2, \"\"Reborn\"\"\",false,19.99,,25,true,"));
        assert!(line.ends_with(",,,,,,,"));
    }

    #[test]
    fn blank_chart_name_keeps_player_counts() {
        let id = AppId::new(42).unwrap();
        let rows = vec![EnrichedRow::from(MergedRow {
            app_id: id,
            chart: Some(LeaderboardEntry {
                app_id: id,
                name: String::new(),
                current_players: Some(5000),
                peak_players: Some(9000),
            }),
            detail: DetailRecord::new(id),
        })];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.csv");
        write_csv(&path, &rows).unwrap();
        let back = read_csv(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), HEADER.join(","));
        assert!(read_csv(&path).unwrap().is_empty());
    }
}
