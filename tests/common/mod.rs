#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use steamcharts_pull::PipelineConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub type Handler = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

/// Minimal HTTP/1.1 responder: one request per connection, canned replies
/// picked by request target.
pub struct TestServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub async fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();
        let log = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let handler = handler.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 4096];
                    loop {
                        let n = sock.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let head = String::from_utf8_lossy(&buf).to_string();
                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    log.lock().unwrap().push(head);
                    let (status, body) = handler(&target);
                    let resp = format!(
                        "HTTP/1.1 {status} Canned\r\nContent-Length: {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        Self {
            base: format!("http://{addr}"),
            requests,
        }
    }

    /// Raw request heads received so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Request targets (path + query) received so far.
    pub fn targets(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|h| h.split_whitespace().nth(1).unwrap_or_default().to_string())
            .collect()
    }

    /// Pipeline config pointing every endpoint at this server, with no pacing.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            charts_url_template: format!("{}/top/p.{{page}}", self.base),
            details_url: format!("{}/api/appdetails", self.base),
            opencritic_base_url: format!("{}/oc", self.base),
            http_timeout: Duration::from_secs(5),
            ..PipelineConfig::default()
        }
        .with_fetch_delay(Duration::ZERO)
        .with_review_delay(Duration::ZERO)
    }
}

/// Leaderboard page with one six-column row per id.
pub fn chart_page(ids: &[u64]) -> String {
    let rows: String = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            format!(
                "<tr><td>{}.</td><td class=\"game-name left\"><a href=\"/app/{id}\">Game {id}</a></td>\
                 <td class=\"num\">{},{:03}</td><td class=\"num period-col\">1,000.5</td>\
                 <td class=\"num\">{}</td><td class=\"num period-col\">12,345</td></tr>",
                i + 1,
                id,
                i,
                id * 2
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html><html><head><title>Top games</title></head><body>\
         <table class=\"common-table\" id=\"top-games\"><thead><tr><th>#</th><th>Name</th>\
         <th>Current Players</th><th>Last 30 Days</th><th>Peak Players</th><th>Hours Played</th>\
         </tr></thead><tbody>{rows}</tbody></table></body></html>"
    )
}

/// Successful `appdetails` body for one id.
pub fn app_details(id: u64, name: &str, initial: i64, discount: i64) -> String {
    let final_price = initial - initial * discount / 100;
    format!(
        r#"{{"{id}":{{"success":true,"data":{{"type":"game","name":"{name}","steam_appid":{id},"is_free":false,"price_overview":{{"currency":"USD","initial":{initial},"final":{final_price},"discount_percent":{discount}}},"metacritic":{{"score":80}},"recommendations":{{"total":1234}},"release_date":{{"coming_soon":false,"date":"1 Jan, 2020"}}}}}}}}"#
    )
}

/// Value of `key` in a request target's query string.
pub fn query_param(target: &str, key: &str) -> Option<String> {
    let query = target.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}
