//! Turns an approved classification into a publishable draft: historical
//! capability context, a deduplicated slug, and discovery provenance.
//! Pure transformation; anything malformed degrades to a best-effort
//! draft rather than aborting the batch.

use chrono::Utc;

use doomwatch_common::{ClassifiedCandidate, DiscoveryMetadata, ObituaryDraft, SourceType};

use crate::{context, slug, sources};

pub fn enrich(classified: &ClassifiedCandidate) -> ObituaryDraft {
    let candidate = &classified.candidate;
    let classification = &classified.classification;

    // The extracted claim is preferred; an empty extraction falls back to
    // the candidate's own title so the draft is still usable.
    let claim = {
        let extracted = classification.extracted_claim.trim();
        if extracted.is_empty() {
            candidate.title.clone()
        } else {
            extracted.to_string()
        }
    };

    let source = match candidate.source_type {
        SourceType::Tweet => candidate
            .author
            .as_ref()
            .map(|a| match &a.handle {
                Some(handle) => format!("@{handle}"),
                None => a.name.clone(),
            })
            .unwrap_or_else(|| "unknown".to_string()),
        SourceType::News => {
            let domain = sources::extract_domain(&candidate.url);
            if domain.is_empty() {
                "unknown".to_string()
            } else {
                domain
            }
        }
    };

    let category = classification.suggested_category.trim().to_lowercase();
    let categories = if category.is_empty() {
        vec!["hype".to_string()]
    } else {
        vec![category]
    };

    ObituaryDraft {
        source,
        source_url: candidate.url.clone(),
        date: candidate.published_date,
        categories,
        context: context::context_at_date(candidate.published_date),
        slug: slug::generate_slug(&claim, Some(candidate.published_date)),
        discovery_metadata: DiscoveryMetadata {
            discovered_at: Utc::now(),
            confidence: classification.claim_confidence,
            notability_reason: classification.notability_reason.clone(),
            source_type: candidate.source_type,
        },
        claim,
    }
}
