//! External data sources behind small async seams.
//!
//! The pipeline stages only see these traits, so tests swap in in-memory fakes
//! and the HTTP clients stay thin.
pub mod opencritic;
pub mod steam;
pub mod steamcharts;

use crate::model::{AppId, DetailRecord};

/// Paginated leaderboard HTML.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Raw HTML of the 1-based `page`, or `None` when the page could not be fetched.
    async fn fetch_page(&self, page: u32) -> Option<String>;
}

/// Per-app store details.
#[async_trait::async_trait]
pub trait DetailSource: Send + Sync {
    /// Normalized details, or `None` for any failure or unusable payload.
    async fn fetch_details(&self, app_id: AppId) -> Option<DetailRecord>;
}

/// First-pass match returned by a review-site name search.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewHit {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Aggregate critic data for one review-site entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewAggregate {
    pub top_critic_score: Option<f64>,
    pub median_score: Option<f64>,
    pub percent_recommended: Option<f64>,
    pub num_reviews: Option<i64>,
    pub tier: Option<String>,
}

/// Critic-review lookups. `Err` means transport failure; an empty or absent
/// answer is `Ok`.
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    async fn search(&self, name: &str) -> anyhow::Result<Vec<ReviewHit>>;
    async fn aggregate(&self, id: i64) -> anyhow::Result<Option<ReviewAggregate>>;
}
