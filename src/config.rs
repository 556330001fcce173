use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::util::env::{env_opt, env_parse, log_snapshot};

pub const DEFAULT_CHARTS_URL_TEMPLATE: &str = "https://steamcharts.com/top/p.{page}";
pub const DEFAULT_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";
pub const DEFAULT_OPENCRITIC_BASE_URL: &str = "https://opencritic-api.p.rapidapi.com";
pub const DEFAULT_OPENCRITIC_HOST: &str = "opencritic-api.p.rapidapi.com";
pub const DEFAULT_OUTPUT_PATH: &str = "data/most_popular_steam_games.csv";
pub const DEFAULT_KEY_FILE: &str = "key.txt";

/// Entries SteamCharts renders per `top` page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Steam's appdetails window tolerates roughly 200 requests per 5 minutes,
/// so one call every 1.7s keeps long runs under the limit.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1700);
pub const DEFAULT_REVIEW_DELAY: Duration = Duration::from_millis(250);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_KEYS: &[&str] = &[
    "CHARTS_URL_TEMPLATE",
    "CHARTS_PAGE_SIZE",
    "STEAM_DETAILS_URL",
    "STEAM_REGION",
    "STEAM_LANGUAGE",
    "STEAM_FETCH_DELAY_MS",
    "OPENCRITIC_BASE_URL",
    "OPENCRITIC_HOST",
    "OPENCRITIC_DELAY_MS",
    "OPENCRITIC_KEY_FILE",
    "HTTP_TIMEOUT_SECS",
    "OUTPUT_PATH",
];

/// Everything the pipeline would otherwise hard-code. Built once and handed to
/// each stage so tests can point it at local endpoints with zero pacing.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Leaderboard page URL with a `{page}` placeholder (1-based).
    pub charts_url_template: String,
    pub page_size: usize,
    pub details_url: String,
    /// Store region (`cc`) used for prices.
    pub region: String,
    /// Store language (`l`).
    pub language: String,
    pub opencritic_base_url: String,
    pub opencritic_host: String,
    pub fetch_delay: Duration,
    pub review_delay: Duration,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub output_path: PathBuf,
    pub key_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            charts_url_template: DEFAULT_CHARTS_URL_TEMPLATE.into(),
            page_size: DEFAULT_PAGE_SIZE,
            details_url: DEFAULT_DETAILS_URL.into(),
            region: "us".into(),
            language: "en".into(),
            opencritic_base_url: DEFAULT_OPENCRITIC_BASE_URL.into(),
            opencritic_host: DEFAULT_OPENCRITIC_HOST.into(),
            fetch_delay: DEFAULT_FETCH_DELAY,
            review_delay: DEFAULT_REVIEW_DELAY,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: "Mozilla/5.0".into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by environment variables (and `.env`).
    pub fn from_env() -> Self {
        let d = Self::default();
        let timeout_secs = env_parse("HTTP_TIMEOUT_SECS", d.http_timeout.as_secs());
        log_snapshot("pipeline", ENV_KEYS);
        Self {
            charts_url_template: env_opt("CHARTS_URL_TEMPLATE").unwrap_or(d.charts_url_template),
            page_size: env_parse("CHARTS_PAGE_SIZE", d.page_size),
            details_url: env_opt("STEAM_DETAILS_URL").unwrap_or(d.details_url),
            region: env_opt("STEAM_REGION").unwrap_or(d.region),
            language: env_opt("STEAM_LANGUAGE").unwrap_or(d.language),
            opencritic_base_url: env_opt("OPENCRITIC_BASE_URL").unwrap_or(d.opencritic_base_url),
            opencritic_host: env_opt("OPENCRITIC_HOST").unwrap_or(d.opencritic_host),
            fetch_delay: env_millis("STEAM_FETCH_DELAY_MS", d.fetch_delay),
            review_delay: env_millis("OPENCRITIC_DELAY_MS", d.review_delay),
            http_timeout: Duration::from_secs(timeout_secs),
            user_agent: d.user_agent,
            output_path: env_opt("OUTPUT_PATH").map(PathBuf::from).unwrap_or(d.output_path),
            key_file: env_opt("OPENCRITIC_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or(d.key_file),
        }
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if !self.charts_url_template.contains("{page}") {
            return Err(ConfigError::MissingPagePlaceholder(
                self.charts_url_template.clone(),
            ));
        }
        check_url(&self.chart_page_url(1))?;
        check_url(&self.details_url)?;
        check_url(&self.opencritic_base_url)?;
        Ok(())
    }

    pub fn chart_page_url(&self, page: u32) -> String {
        fill_page(&self.charts_url_template, page)
    }

    /// Builder-style override used by the CLI and tests.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_review_delay(mut self, delay: Duration) -> Self {
        self.review_delay = delay;
        self
    }
}

/// Substitute `{page}` in a leaderboard url template.
pub fn fill_page(template: &str, page: u32) -> String {
    template.replace("{page}", &page.to_string())
}

fn env_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_parse(key, default.as_millis() as u64))
}

fn check_url(raw: &str) -> Result<(), ConfigError> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })
}
