use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::http::{build_client, get_json};
use crate::normalization::JsonPathExt;
use crate::providers::{ReviewAggregate, ReviewHit, ReviewSource};

/// OpenCritic through RapidAPI.
///
/// Key endpoints:
/// - GET /meta/search?criteria=... - name search, best match first
/// - GET /game/{id} - aggregate critic scores for one game
#[derive(Debug, Clone)]
pub struct OpenCriticProvider {
    base_url: String,
    host: String,
    http: Client,
    api_key: String,
}

impl OpenCriticProvider {
    pub fn new(cfg: &PipelineConfig, api_key: String) -> Result<Self, ConfigError> {
        Ok(Self::with_client(build_client(cfg)?, cfg, api_key))
    }

    pub fn with_client(http: Client, cfg: &PipelineConfig, api_key: String) -> Self {
        Self {
            base_url: cfg.opencritic_base_url.trim_end_matches('/').to_string(),
            host: cfg.opencritic_host.clone(),
            http,
            api_key,
        }
    }

    fn add_auth_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
    }
}

#[async_trait::async_trait]
impl ReviewSource for OpenCriticProvider {
    async fn search(&self, name: &str) -> anyhow::Result<Vec<ReviewHit>> {
        let url = format!("{}/meta/search", self.base_url);
        let req = self
            .add_auth_headers(self.http.get(&url))
            .query(&[("criteria", name)]);
        Ok(get_json(req, "opencritic search")
            .await?
            .map(|body| parse_search_hits(&body))
            .unwrap_or_default())
    }

    async fn aggregate(&self, id: i64) -> anyhow::Result<Option<ReviewAggregate>> {
        let url = format!("{}/game/{}", self.base_url, id);
        let req = self.add_auth_headers(self.http.get(&url));
        Ok(get_json(req, "opencritic game")
            .await?
            .and_then(|body| parse_aggregate(&body)))
    }
}

/// Search results in provider order. Non-array bodies count as no results.
pub fn parse_search_hits(body: &Value) -> Vec<ReviewHit> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| ReviewHit {
            id: item.int_at(&["id"]),
            name: item.str_at(&["name"]).map(str::to_string),
        })
        .collect()
}

/// Score fields of a `/game/{id}` body; `None` unless the body is a non-empty object.
pub fn parse_aggregate(body: &Value) -> Option<ReviewAggregate> {
    if !body.as_object().is_some_and(|m| !m.is_empty()) {
        return None;
    }
    Some(ReviewAggregate {
        top_critic_score: body.f64_at(&["topCriticScore"]),
        median_score: body.f64_at(&["medianScore"]),
        percent_recommended: body.f64_at(&["percentRecommended"]),
        num_reviews: body.int_at(&["numReviews"]),
        tier: body.str_at(&["tier"]).map(str::to_string),
    })
}
