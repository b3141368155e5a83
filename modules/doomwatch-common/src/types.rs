use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Tweet,
    News,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Tweet => write!(f, "tweet"),
            SourceType::News => write!(f, "news"),
        }
    }
}

/// Author info attached to tweet-sourced candidates. Used only by the
/// quality gate's notability heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorMetadata {
    pub name: String,
    pub handle: Option<String>,
    pub bio: Option<String>,
    pub followers: Option<u64>,
    pub verified: Option<bool>,
}

/// Raw discovered content, not yet judged to be a genuine claim.
/// Created by the collector; immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryCandidate {
    pub url: String,
    pub title: String,
    pub text: String,
    pub published_date: DateTime<Utc>,
    pub author: Option<AuthorMetadata>,
    pub source_type: SourceType,
    /// Engagement score where the source provides one (likes for tweets).
    pub score: Option<f64>,
}

/// Classifier verdict on whether to auto-publish a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approve,
    Review,
    Reject,
}

/// LLM classification of exactly one candidate.
/// `claim_confidence` is always within [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_ai_doom_claim: bool,
    pub claim_confidence: f64,
    pub is_notable: bool,
    pub notability_reason: String,
    pub extracted_claim: String,
    pub suggested_category: String,
    pub recommendation: Recommendation,
}

/// A candidate paired with its classification. Produced by the classifier,
/// consumed by the enricher.
#[derive(Debug, Clone)]
pub struct ClassifiedCandidate {
    pub candidate: DiscoveryCandidate,
    pub classification: ClassificationResult,
}

/// Historical AI-capability snapshot at a claim's date. Computed from the
/// curated timeline, never measured live. Fields are None when data
/// coverage does not reach that date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMetadata {
    pub current_model: Option<String>,
    pub benchmark_name: Option<String>,
    pub benchmark_score: Option<f64>,
    pub nvda_price: Option<f64>,
    pub msft_price: Option<f64>,
    pub goog_price: Option<f64>,
    pub milestone: Option<String>,
    pub note: Option<String>,
}

/// Provenance recorded on every published draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryMetadata {
    pub discovered_at: DateTime<Utc>,
    pub confidence: f64,
    pub notability_reason: String,
    pub source_type: SourceType,
}

/// The unit of persistence: a pipeline-produced, not-yet-human-reviewed
/// obituary record. `slug` is URL-safe, non-empty, and unique within the
/// store at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObituaryDraft {
    pub claim: String,
    pub source: String,
    pub source_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<String>,
    pub context: ContextMetadata,
    pub slug: String,
    pub discovery_metadata: DiscoveryMetadata,
}

/// One recovered per-item failure from a run. Carries enough to diagnose
/// (stage, url, upstream message) but never candidate body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    pub stage: String,
    pub url: String,
    pub message: String,
}

/// Final report for one pipeline invocation. Returned to the caller,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRunResult {
    pub discovered: u32,
    pub filtered: u32,
    pub classified: u32,
    pub created: u32,
    pub created_ids: Vec<String>,
    pub errors: Vec<RunError>,
    pub timestamp: DateTime<Utc>,
}

impl std::fmt::Display for DiscoveryRunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Discovery Run Complete ===")?;
        writeln!(f, "Discovered:  {}", self.discovered)?;
        writeln!(f, "Filtered:    {}", self.filtered)?;
        writeln!(f, "Classified:  {}", self.classified)?;
        writeln!(f, "Created:     {}", self.created)?;
        if !self.errors.is_empty() {
            writeln!(f, "Errors:      {}", self.errors.len())?;
            for e in &self.errors {
                writeln!(f, "  [{}] {}: {}", e.stage, e.url, e.message)?;
            }
        }
        Ok(())
    }
}
