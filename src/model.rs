use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Steam application id. Always positive; only ever parsed from leaderboard
/// links, CLI input or a previously written table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AppId(u64);

impl AppId {
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid app id {s:?}"))?;
        AppId::new(raw).ok_or_else(|| format!("app id must be positive, got {raw}"))
    }
}

impl TryFrom<u64> for AppId {
    type Error = String;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        AppId::new(raw).ok_or_else(|| format!("app id must be positive, got {raw}"))
    }
}

impl From<AppId> for u64 {
    fn from(id: AppId) -> u64 {
        id.0
    }
}

/// One usable row of the leaderboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub app_id: AppId,
    pub name: String,
    pub current_players: Option<i64>,
    pub peak_players: Option<i64>,
}

/// Normalized store details for a single app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub app_id: AppId,
    pub name: Option<String>,
    pub is_free: bool,
    /// Major currency units (dollars, not cents).
    pub base_price: Option<f64>,
    pub current_price: Option<f64>,
    pub discount_percent: Option<i64>,
    pub on_sale: bool,
    pub release_date: Option<String>,
    pub metacritic_score: Option<i64>,
    pub recommendations: Option<i64>,
}

impl DetailRecord {
    /// Empty record: paid, not on sale, every optional field absent.
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            name: None,
            is_free: false,
            base_price: None,
            current_price: None,
            discount_percent: None,
            on_sale: false,
            release_date: None,
            metacritic_score: None,
            recommendations: None,
        }
    }
}

/// Leaderboard metrics joined with the store details of the same app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub app_id: AppId,
    /// Absent when the run was seeded from explicit ids.
    pub chart: Option<LeaderboardEntry>,
    pub detail: DetailRecord,
}

impl MergedRow {
    /// Name used to look the app up elsewhere: store name first, chart name second.
    pub fn search_name(&self) -> Option<&str> {
        let store = self
            .detail
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        store.or_else(|| {
            self.chart
                .as_ref()
                .map(|c| c.name.trim())
                .filter(|s| !s.is_empty())
        })
    }
}

/// Critic-review aggregates attached by the enrichment stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewFields {
    pub review_id: Option<i64>,
    pub review_name: Option<String>,
    pub top_critic_score: Option<f64>,
    pub median_score: Option<f64>,
    pub percent_recommended: Option<f64>,
    pub num_reviews: Option<i64>,
    pub tier: Option<String>,
}

impl ReviewFields {
    pub fn has_scores(&self) -> bool {
        self.top_critic_score.is_some()
            || self.median_score.is_some()
            || self.percent_recommended.is_some()
            || self.num_reviews.is_some()
            || self.tier.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub row: MergedRow,
    pub reviews: ReviewFields,
}

impl From<MergedRow> for EnrichedRow {
    fn from(row: MergedRow) -> Self {
        Self {
            row,
            reviews: ReviewFields::default(),
        }
    }
}
