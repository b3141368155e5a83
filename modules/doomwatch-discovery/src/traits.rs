// Trait abstractions for the pipeline's external dependencies.
//
// CandidateFetcher — the two discovery sources behind one seam. Expected
//   upstream failures (missing credentials, API errors) are absorbed by the
//   implementation and surface as empty lists; an Err from these methods is
//   an unexpected fault and fails the whole run.
// ClaimClassifier — one LLM classification per candidate.
// ObituaryStore — content-store reads for dedup plus draft writes.
//
// These enable deterministic testing with MockFetcher, MockClassifier and
// MockStore: no network, no store, no LLM. `cargo test` in seconds.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use doomwatch_common::{ClassificationResult, DiscoveryCandidate, ObituaryDraft};

#[async_trait]
pub trait CandidateFetcher: Send + Sync {
    /// Search short-form social posts published since `since`.
    async fn tweets_since(&self, since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>>;

    /// Search whitelisted news publications for articles since `since`.
    async fn news_since(&self, since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>>;
}

#[async_trait]
pub trait ClaimClassifier: Send + Sync {
    /// Classify one candidate. A failure here is per-item: the caller drops
    /// the candidate and records the error without aborting the batch.
    async fn classify(&self, candidate: &DiscoveryCandidate) -> Result<ClassificationResult>;
}

#[async_trait]
pub trait ObituaryStore: Send + Sync {
    /// Return the subset of `urls` already present in the store.
    async fn existing_source_urls(&self, urls: &[String]) -> Result<HashSet<String>>;

    /// Persist one draft. Returns the created document id.
    async fn create_draft(&self, draft: &ObituaryDraft) -> Result<String>;
}
