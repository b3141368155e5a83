use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use doomwatch_common::{DiscoveryRunResult, ObituaryDraft, RunError};

use crate::classifier;
use crate::collector::Collector;
use crate::enricher;
use crate::publisher;
use crate::quality;
use crate::traits::{CandidateFetcher, ClaimClassifier, ObituaryStore};

/// The discovery pipeline with its three external seams injected once at
/// construction. Each run is stateless; nothing carries over between
/// invocations.
pub struct DiscoveryPipeline {
    fetcher: Arc<dyn CandidateFetcher>,
    classifier: Arc<dyn ClaimClassifier>,
    store: Arc<dyn ObituaryStore>,
}

impl DiscoveryPipeline {
    pub fn new(
        fetcher: Arc<dyn CandidateFetcher>,
        classifier: Arc<dyn ClaimClassifier>,
        store: Arc<dyn ObituaryStore>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            store,
        }
    }

    /// Run one full discovery cycle over content published since `since`.
    ///
    /// Per-item failures are absorbed into the report's `errors`; an Err
    /// from this method is a systemic fault (unexpected collector failure,
    /// store infrastructure down) and no partial report is produced.
    /// Counts are monotonically non-increasing stage over stage.
    pub async fn run(&self, since: DateTime<Utc>) -> Result<DiscoveryRunResult> {
        let mut errors: Vec<RunError> = Vec::new();

        // 1. Collect. Expected upstream failures already degraded to empty
        // lists inside the fetcher; anything escaping here fails the run.
        let collector = Collector::new(self.fetcher.clone());
        let candidates = collector.collect(since).await?;
        let discovered = candidates.len() as u32;

        if candidates.is_empty() {
            info!("No candidates discovered, short-circuiting");
            return Ok(self.report(discovered, 0, 0, Vec::new(), errors));
        }

        // 2. Quality gate — cheap and deterministic, before any LLM spend.
        let surviving = quality::filter_candidates(&candidates);
        let filtered = surviving.len() as u32;

        if surviving.is_empty() {
            info!(discovered, "No candidates survived the quality gate");
            return Ok(self.report(discovered, 0, 0, Vec::new(), errors));
        }

        // 3. Classify and keep approvals only.
        let classified =
            classifier::classify_candidates(&self.classifier, surviving, &mut errors).await;
        let approved = classifier::filter_approved(classified);
        let classified_count = approved.len() as u32;

        if approved.is_empty() {
            info!(discovered, filtered, "No candidates approved by the classifier");
            return Ok(self.report(discovered, filtered, 0, Vec::new(), errors));
        }

        // 4. Enrich, dedup against the store, publish.
        let drafts: Vec<ObituaryDraft> = approved.iter().map(enricher::enrich).collect();
        let mut fresh = publisher::filter_new_drafts(&self.store, drafts).await?;
        let outcome = publisher::create_obituary_drafts(&self.store, &mut fresh).await;

        for idx in &outcome.failed_indices {
            let url = fresh
                .get(*idx)
                .map(|d| d.source_url.clone())
                .unwrap_or_default();
            warn!(url = url.as_str(), "Draft not persisted");
            errors.push(RunError {
                stage: "publish".into(),
                url,
                message: "draft write failed".into(),
            });
        }

        let result = self.report(
            discovered,
            filtered,
            classified_count,
            outcome.created_ids,
            errors,
        );
        info!("{result}");
        Ok(result)
    }

    fn report(
        &self,
        discovered: u32,
        filtered: u32,
        classified: u32,
        created_ids: Vec<String>,
        errors: Vec<RunError>,
    ) -> DiscoveryRunResult {
        DiscoveryRunResult {
            discovered,
            filtered,
            classified,
            created: created_ids.len() as u32,
            created_ids,
            errors,
            timestamp: Utc::now(),
        }
    }
}
