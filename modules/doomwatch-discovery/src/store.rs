use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use doomwatch_common::{Config, ObituaryDraft};
use sanity_client::SanityClient;

use crate::traits::ObituaryStore;

const OBITUARY_TYPE: &str = "obituary";

/// Content store backed by Sanity. Unconfigured credentials disable
/// persistence: dedup sees an empty store and writes fail per item, so a
/// run still completes with a diagnosable report.
pub struct SanityStore {
    client: Option<SanityClient>,
}

impl SanityStore {
    pub fn new(config: &Config) -> Self {
        let client = if config.persistence_configured() {
            Some(SanityClient::new(
                config.sanity_project_id.clone(),
                config.sanity_dataset.clone(),
                config.sanity_api_token.clone(),
            ))
        } else {
            warn!("SANITY_PROJECT_ID/SANITY_API_TOKEN not set, persistence disabled");
            None
        };
        Self { client }
    }
}

/// Build the Sanity document for a draft: the draft's own shape plus the
/// `drafts.` id prefix that keeps it out of the published dataset until a
/// human promotes it.
fn draft_document(draft: &ObituaryDraft) -> Result<serde_json::Value> {
    let mut doc = serde_json::to_value(draft)?;
    doc["_id"] = json!(format!("drafts.{}", Uuid::new_v4()));
    doc["_type"] = json!(OBITUARY_TYPE);
    Ok(doc)
}

#[async_trait]
impl ObituaryStore for SanityStore {
    async fn existing_source_urls(&self, urls: &[String]) -> Result<HashSet<String>> {
        let Some(client) = &self.client else {
            return Ok(HashSet::new());
        };

        let existing: Vec<String> = client
            .query(
                "*[_type == $type && sourceUrl in $urls].sourceUrl",
                &[("type", json!(OBITUARY_TYPE)), ("urls", json!(urls))],
            )
            .await?;

        Ok(existing.into_iter().collect())
    }

    async fn create_draft(&self, draft: &ObituaryDraft) -> Result<String> {
        let Some(client) = &self.client else {
            anyhow::bail!("persistence capability not configured");
        };

        let doc = draft_document(draft)?;
        Ok(client.create(doc).await?)
    }
}
