//! The cheap, deterministic pre-filter applied before LLM classification.
//! No network, no randomness; dropped candidates are not logged beyond
//! their URL.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use doomwatch_common::{AuthorMetadata, DiscoveryCandidate, SourceType};

use crate::sources;

/// Followers needed alongside verification or a relevant bio.
const MODERATE_FOLLOWERS: u64 = 10_000;

/// Followers that make an author notable on reach alone.
const HIGH_FOLLOWERS: u64 = 100_000;

/// Shortest body (or title fallback) worth classifying.
const MIN_CONTENT_LEN: usize = 40;

static SPAM_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(click here|subscribe now|buy now|limited time|act now|sign up today|link in bio|promo code|giveaway|airdrop|dm me|earn \$)",
    )
    .expect("spam pattern regex is valid")
});

/// Keep the candidates worth spending classification on: trusted or
/// notable origin, and body text that is not junk. Always a subset of the
/// input with relative order preserved.
pub fn filter_candidates(candidates: &[DiscoveryCandidate]) -> Vec<DiscoveryCandidate> {
    candidates
        .iter()
        .filter(|c| {
            let keep = (is_whitelisted(c) || has_notable_author(c)) && passes_content_quality(c);
            if !keep {
                debug!(url = c.url.as_str(), "Candidate dropped by quality gate");
            }
            keep
        })
        .cloned()
        .collect()
}

/// Source trust: news by publication whitelist, tweets by tracked handle.
fn is_whitelisted(candidate: &DiscoveryCandidate) -> bool {
    match candidate.source_type {
        SourceType::News => sources::news_domain_trust(&candidate.url).is_some(),
        SourceType::Tweet => candidate
            .author
            .as_ref()
            .and_then(|a| a.handle.as_deref())
            .is_some_and(sources::is_tracked_handle),
    }
}

/// Notability heuristic for tweet authors outside the whitelist: enough
/// reach, or verified/domain-relevant with moderate reach.
fn has_notable_author(candidate: &DiscoveryCandidate) -> bool {
    if candidate.source_type != SourceType::Tweet {
        return false;
    }
    let Some(author) = &candidate.author else {
        return false;
    };
    is_notable_author(author)
}

fn is_notable_author(author: &AuthorMetadata) -> bool {
    let followers = author.followers.unwrap_or(0);
    let verified = author.verified.unwrap_or(false);

    if verified && followers >= MODERATE_FOLLOWERS {
        return true;
    }
    if followers >= HIGH_FOLLOWERS {
        return true;
    }
    let relevant_bio = author
        .bio
        .as_deref()
        .is_some_and(sources::bio_is_ai_relevant);
    relevant_bio && followers >= MODERATE_FOLLOWERS
}

/// Body (title when the body is empty) must be long enough to mean
/// something and free of spam/clickbait tells.
fn passes_content_quality(candidate: &DiscoveryCandidate) -> bool {
    let body = if candidate.text.trim().is_empty() {
        candidate.title.trim()
    } else {
        candidate.text.trim()
    };

    body.chars().count() > MIN_CONTENT_LEN && !SPAM_PATTERNS.is_match(body)
}
