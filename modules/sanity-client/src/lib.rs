pub mod error;

pub use error::{Result, SanityError};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const API_VERSION: &str = "2021-06-07";

/// One entry in a mutation batch. Only `create` is needed here; Sanity
/// rejects a `create` whose `_id` already exists, which is the behavior
/// the publisher relies on.
#[derive(Debug, Clone, Serialize)]
pub enum Mutation {
    #[serde(rename = "create")]
    Create(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MutateResult {
    pub id: String,
    #[serde(default)]
    pub operation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MutateResponse {
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

pub struct SanityClient {
    client: reqwest::Client,
    project_id: String,
    dataset: String,
    token: String,
}

impl SanityClient {
    pub fn new(project_id: String, dataset: String, token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            project_id,
            dataset,
            token,
        }
    }

    fn base_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}",
            self.project_id, API_VERSION
        )
    }

    /// Run a GROQ query. `params` become `$name` bindings; each value is
    /// passed as its JSON encoding per the Sanity HTTP API.
    pub async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T> {
        let url = format!("{}/data/query/{}", self.base_url(), self.dataset);

        let mut query_pairs: Vec<(String, String)> = vec![("query".into(), groq.to_string())];
        for (name, value) in params {
            query_pairs.push((format!("${name}"), serde_json::to_string(value)?));
        }

        debug!(dataset = %self.dataset, "Sanity query");

        let mut request = self.client.get(&url).query(&query_pairs);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SanityError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: QueryResponse<T> = resp.json().await?;
        Ok(parsed.result)
    }

    /// Apply a mutation batch in one transaction. Returns the ids of the
    /// affected documents.
    pub async fn mutate(&self, mutations: Vec<Mutation>) -> Result<MutateResponse> {
        let url = format!(
            "{}/data/mutate/{}?returnIds=true",
            self.base_url(),
            self.dataset
        );

        let count = mutations.len();
        let body = serde_json::json!({ "mutations": mutations });

        info!(dataset = %self.dataset, count, "Sanity mutate");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SanityError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Create a single document and return its id.
    pub async fn create(&self, doc: serde_json::Value) -> Result<String> {
        let response = self.mutate(vec![Mutation::Create(doc)]).await?;
        response
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| SanityError::Parse("mutation returned no document id".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mutation_serializes_with_create_key() {
        let m = Mutation::Create(serde_json::json!({"_type": "obituary"}));
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["create"]["_type"], serde_json::json!("obituary"));
    }

    #[test]
    fn base_url_includes_project_and_version() {
        let client = SanityClient::new("abc123".into(), "production".into(), "tok".into());
        assert_eq!(
            client.base_url(),
            "https://abc123.api.sanity.io/v2021-06-07"
        );
    }
}
