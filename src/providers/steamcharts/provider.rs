use reqwest::Client;
use tracing::info;

use crate::config::{fill_page, PipelineConfig};
use crate::error::ConfigError;
use crate::http::{build_client, get_text};
use crate::providers::PageSource;

/// SteamCharts `top` listing over HTTP.
#[derive(Debug, Clone)]
pub struct SteamChartsProvider {
    http: Client,
    url_template: String,
}

impl SteamChartsProvider {
    pub fn new(cfg: &PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_client(build_client(cfg)?, cfg))
    }

    pub fn with_client(http: Client, cfg: &PipelineConfig) -> Self {
        Self {
            http,
            url_template: cfg.charts_url_template.clone(),
        }
    }

    fn page_url(&self, page: u32) -> String {
        fill_page(&self.url_template, page)
    }
}

#[async_trait::async_trait]
impl PageSource for SteamChartsProvider {
    async fn fetch_page(&self, page: u32) -> Option<String> {
        let url = self.page_url(page);
        info!(page, %url, "fetching leaderboard page");
        get_text(self.http.get(&url), "leaderboard page").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_urls_follow_template() {
        let cfg = PipelineConfig {
            charts_url_template: "http://127.0.0.1:9/top/p.{page}".into(),
            ..PipelineConfig::default()
        };
        let provider = SteamChartsProvider::new(&cfg).unwrap();
        assert_eq!(provider.page_url(2), "http://127.0.0.1:9/top/p.2");
        assert_eq!(provider.page_url(7), cfg.chart_page_url(7));
    }
}
