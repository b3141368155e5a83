// News search service (Serper / Google News).

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct SerperNewsResponse {
    #[serde(default)]
    news: Vec<NewsResult>,
}

/// One news hit. Serper omits fields freely, so everything defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsResult {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    /// Publication date as Serper reports it (ISO or relative text).
    #[serde(default)]
    pub date: String,
    /// Publication name, e.g. "Reuters".
    #[serde(default)]
    pub source: String,
}

pub struct NewsSearcher {
    api_key: String,
    client: reqwest::Client,
}

impl NewsSearcher {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Run a news search. `tbs` is Google's time filter (`qdr:d` = past
    /// day, `qdr:w` = past week).
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        tbs: Option<&str>,
    ) -> Result<Vec<NewsResult>> {
        info!(query, max_results, "news search: querying serper");

        let mut body = serde_json::json!({
            "q": query,
            "num": max_results,
        });
        if let Some(tbs) = tbs {
            body["tbs"] = serde_json::json!(tbs);
        }

        let resp = self
            .client
            .post("https://google.serper.dev/news")
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Serper API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Serper API error (status {status}): {text}");
        }

        let data: SerperNewsResponse = resp
            .json()
            .await
            .context("Failed to parse Serper response")?;

        info!(query, count = data.news.len(), "news search: complete");
        Ok(data.news)
    }
}

/// Map a lookback window to Serper's time filter.
pub fn tbs_for_lookback(hours: u64) -> &'static str {
    if hours <= 24 {
        "qdr:d"
    } else if hours <= 24 * 7 {
        "qdr:w"
    } else {
        "qdr:m"
    }
}
