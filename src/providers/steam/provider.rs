use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::http::{build_client, get_json};
use crate::model::{AppId, DetailRecord};
use crate::normalization::numbers::{is_on_sale, minor_to_major, settle_prices};
use crate::normalization::JsonPathExt;
use crate::providers::DetailSource;

/// Steam Store `appdetails` lookups. No API key needed.
#[derive(Debug, Clone)]
pub struct SteamProvider {
    http: Client,
    details_url: String,
    region: String,
    language: String,
}

impl SteamProvider {
    pub fn new(cfg: &PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_client(build_client(cfg)?, cfg))
    }

    pub fn with_client(http: Client, cfg: &PipelineConfig) -> Self {
        Self {
            http,
            details_url: cfg.details_url.clone(),
            region: cfg.region.clone(),
            language: cfg.language.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DetailSource for SteamProvider {
    async fn fetch_details(&self, app_id: AppId) -> Option<DetailRecord> {
        let id = app_id.to_string();
        let req = self.http.get(&self.details_url).query(&[
            ("appids", id.as_str()),
            ("cc", self.region.as_str()),
            ("l", self.language.as_str()),
        ]);
        match get_json(req, "steam appdetails").await {
            Ok(Some(body)) => parse_app_details(app_id, &body),
            Ok(None) => None,
            Err(e) => {
                warn!(appid = %app_id, error = %e, "steam appdetails request failed");
                None
            }
        }
    }
}

/// Normalize an `appdetails` response body for `app_id`.
///
/// The body is keyed by the id as a string: `{"730": {"success": true, "data": {..}}}`.
/// Anything other than `success: true` with a non-empty `data` object is `None`.
pub fn parse_app_details(app_id: AppId, body: &Value) -> Option<DetailRecord> {
    let key = app_id.to_string();
    let Some(entry) = body.at(&[key.as_str()]) else {
        debug!(appid = %app_id, "appdetails body has no entry for app");
        return None;
    };
    if entry.bool_at(&["success"]) != Some(true) {
        debug!(appid = %app_id, "appdetails reported failure");
        return None;
    }
    let Some(data) = entry.object_at(&["data"]) else {
        debug!(appid = %app_id, "appdetails succeeded without data");
        return None;
    };

    let is_free = data.bool_at(&["is_free"]).unwrap_or(false);
    let base = data
        .int_at(&["price_overview", "initial"])
        .map(minor_to_major);
    let current = data
        .int_at(&["price_overview", "final"])
        .map(minor_to_major);
    let (base_price, current_price) = settle_prices(is_free, base, current);
    let discount_percent = data.int_at(&["price_overview", "discount_percent"]);

    Some(DetailRecord {
        app_id,
        name: data.str_at(&["name"]).map(str::to_string),
        is_free,
        base_price,
        current_price,
        discount_percent,
        on_sale: is_on_sale(discount_percent),
        release_date: data.str_at(&["release_date", "date"]).map(str::to_string),
        metacritic_score: data.int_at(&["metacritic", "score"]),
        recommendations: data.int_at(&["recommendations", "total"]),
    })
}
