use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::error::ConfigError;

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// One client per run: bounded timeout, shared user agent.
pub fn build_client(cfg: &PipelineConfig) -> Result<Client, ConfigError> {
    Ok(Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .timeout(cfg.http_timeout)
        .build()?)
}

/// Send and keep only successful responses. Transport errors propagate; a
/// non-success status is logged and reported as `None`.
pub async fn send_ok(req: RequestBuilder, what: &str) -> anyhow::Result<Option<Response>> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let url = resp.url().to_string();
        let body = truncate_for_log(resp.text().await.unwrap_or_default(), 300);
        warn!(%status, %url, body = %body, "{what}: non-success status");
        return Ok(None);
    }
    Ok(Some(resp))
}

/// GET returning the body text, `None` on any failure.
pub async fn get_text(req: RequestBuilder, what: &str) -> Option<String> {
    match send_ok(req, what).await {
        Ok(Some(resp)) => match resp.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(error = %e, "{what}: failed reading body");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "{what}: request failed");
            None
        }
    }
}

/// GET returning parsed JSON. Transport errors propagate so callers can count
/// them; bad statuses and unparseable bodies are `None`.
pub async fn get_json(req: RequestBuilder, what: &str) -> anyhow::Result<Option<Value>> {
    let Some(resp) = send_ok(req.header("Accept", "application/json"), what).await? else {
        return Ok(None);
    };
    let body = resp.text().await?;
    match serde_json::from_str::<Value>(&body) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!(error = %e, body = %truncate_for_log(body, 300), "{what}: unparseable json");
            Ok(None)
        }
    }
}
