use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use doomwatch_common::ObituaryDraft;

use crate::traits::ObituaryStore;

/// What a publish batch produced. `failed_indices` index into the input
/// batch; `created` counts only successes.
#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub created_ids: Vec<String>,
    pub failed_indices: Vec<usize>,
}

/// Drop drafts whose sourceUrl already exists in the store. This is the
/// pipeline's idempotency boundary: re-running discovery over an
/// overlapping window cannot create duplicates because anything already
/// persisted is excluded here. A store query failure is a systemic fault
/// and propagates.
pub async fn filter_new_drafts(
    store: &Arc<dyn ObituaryStore>,
    drafts: Vec<ObituaryDraft>,
) -> Result<Vec<ObituaryDraft>> {
    if drafts.is_empty() {
        return Ok(drafts);
    }

    let urls: Vec<String> = drafts.iter().map(|d| d.source_url.clone()).collect();
    let existing = store.existing_source_urls(&urls).await?;

    let before = drafts.len();
    let fresh: Vec<ObituaryDraft> = drafts
        .into_iter()
        .filter(|d| !existing.contains(&d.source_url))
        .collect();

    let skipped = before - fresh.len();
    if skipped > 0 {
        info!(skipped, "Dedup against store by sourceUrl");
    }
    Ok(fresh)
}

/// Persist each draft, isolated per item: one write failure records its
/// index and the rest of the batch continues. Slugs are de-collided
/// within the batch first so the store-level uniqueness invariant holds
/// at write time.
pub async fn create_obituary_drafts(
    store: &Arc<dyn ObituaryStore>,
    drafts: &mut [ObituaryDraft],
) -> PublishOutcome {
    ensure_unique_slugs(drafts);

    let mut outcome = PublishOutcome::default();
    for (idx, draft) in drafts.iter().enumerate() {
        match store.create_draft(draft).await {
            Ok(id) => {
                info!(slug = draft.slug.as_str(), id = id.as_str(), "Draft created");
                outcome.created_ids.push(id);
            }
            Err(e) => {
                warn!(
                    url = draft.source_url.as_str(),
                    error = %e,
                    "Draft write failed, continuing with the rest of the batch"
                );
                outcome.failed_indices.push(idx);
            }
        }
    }
    outcome
}

/// Suffix repeated slugs within a batch (`-2`, `-3`, …).
fn ensure_unique_slugs(drafts: &mut [ObituaryDraft]) {
    let mut seen: HashMap<String, u32> = HashMap::new();
    for draft in drafts.iter_mut() {
        let base = draft.slug.clone();
        let next = seen.get(&base).copied().unwrap_or(0) + 1;
        seen.insert(base.clone(), next);
        if next > 1 {
            let mut n = next;
            let mut candidate = format!("{base}-{n}");
            while seen.contains_key(&candidate) {
                n += 1;
                candidate = format!("{base}-{n}");
            }
            seen.insert(candidate.clone(), 1);
            draft.slug = candidate;
        }
    }
}
