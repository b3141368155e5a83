use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ai_client::Claude;
use doomwatch_common::{
    ClassificationResult, ClassifiedCandidate, DiscoveryCandidate, Recommendation, RunError,
};

use crate::retry::{self, MAX_ATTEMPTS, RETRY_BASE};
use crate::traits::ClaimClassifier;

const CLASSIFIER_MODEL: &str = "claude-haiku-4-5-20251001";

/// Max in-flight classification calls. Keeps the pipeline inside external
/// rate limits while still overlapping latency.
const MAX_CLASSIFY_CONCURRENCY: usize = 4;

/// Truncate candidate text before prompting.
const MAX_CONTENT_CHARS: usize = 8_000;

/// What the LLM returns for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedClassification {
    /// Whether the text asserts that AI is dead, failing, a bubble, or
    /// fundamentally overhyped
    pub is_ai_doom_claim: bool,
    /// Confidence in that judgment, 0.0 to 1.0
    pub claim_confidence: f64,
    /// Whether the author is notable enough for the claim to be worth tracking
    pub is_notable: bool,
    /// One sentence on why the author is or is not notable
    pub notability_reason: String,
    /// The claim, extracted and normalized to a single quotable sentence
    pub extracted_claim: String,
    /// Category slug: "bubble", "hype", "winter", "plateau", "jobs", or "agi"
    pub suggested_category: String,
    /// "approve", "review", or "reject"
    pub recommendation: String,
}

const CLASSIFICATION_SYSTEM_PROMPT: &str = r#"You are a claim curator for an archive of public predictions that AI is dead, doomed, or overhyped.

Your job: given one piece of discovered content, decide whether it genuinely asserts AI failure, death, bubble, winter, or fundamental overhype — and whether it belongs in the archive.

## What counts as a doom claim
- "AI is dead / over / finished"
- "The AI bubble is bursting" / "this is tulip mania"
- "An AI winter is coming" / "funding will collapse"
- "LLMs have hit a wall" / "scaling is over" / "progress has plateaued"
- "AGI is never happening"
- "AI will destroy jobs/society" framed as the technology failing its promises

## What does NOT count
- Criticism of a single product or company ("this chatbot is bad")
- Safety concerns that assume AI keeps getting stronger
- Sarcasm or quote-tweets mocking a doom claim
- Neutral reporting that merely quotes someone else's claim without asserting it

## Fields
- claim_confidence: how confident you are the text asserts a genuine doom claim, 0.0-1.0
- is_notable: judge from the author block — a named public figure, a credentialed researcher or economist, a major publication byline, or very large reach
- extracted_claim: rewrite the core claim as one clean, quotable sentence in the author's voice. No hashtags, no URLs, no emoji.
- suggested_category: one of "bubble", "hype", "winter", "plateau", "jobs", "agi"

## Recommendation rules
- approve: clear doom claim (confidence >= 0.7) from a notable author or publication
- review: plausible claim but uncertain confidence, ambiguous sarcasm, or borderline notability
- reject: not a doom claim, spam, or a nobody shouting into the void"#;

/// Classifier backed by Claude. Unconfigured (empty key) instances fail
/// each call with a non-transient error; the batch runner records those
/// per candidate without aborting.
pub struct ClaudeClassifier {
    claude: Option<Claude>,
}

impl ClaudeClassifier {
    pub fn new(anthropic_api_key: &str) -> Self {
        let claude = if anthropic_api_key.is_empty() {
            warn!("ANTHROPIC_API_KEY not set, classification disabled");
            None
        } else {
            Some(Claude::new(anthropic_api_key, CLASSIFIER_MODEL))
        };
        Self { claude }
    }
}

#[async_trait]
impl ClaimClassifier for ClaudeClassifier {
    async fn classify(&self, candidate: &DiscoveryCandidate) -> Result<ClassificationResult> {
        let Some(claude) = &self.claude else {
            bail!("classification capability not configured");
        };

        let user_prompt = build_user_prompt(candidate);
        let extracted: ExtractedClassification = claude
            .extract(CLASSIFICATION_SYSTEM_PROMPT, user_prompt)
            .await?;

        Ok(into_result(extracted))
    }
}

fn build_user_prompt(candidate: &DiscoveryCandidate) -> String {
    let mut prompt = format!(
        "Source type: {}\nURL: {}\nPublished: {}\n",
        candidate.source_type,
        candidate.url,
        candidate.published_date.format("%Y-%m-%d"),
    );

    if let Some(author) = &candidate.author {
        prompt.push_str("\n## Author\n");
        prompt.push_str(&format!("Name: {}\n", author.name));
        if let Some(handle) = &author.handle {
            prompt.push_str(&format!("Handle: @{handle}\n"));
        }
        if let Some(followers) = author.followers {
            prompt.push_str(&format!("Followers: {followers}\n"));
        }
        if let Some(verified) = author.verified {
            prompt.push_str(&format!("Verified: {verified}\n"));
        }
        if let Some(bio) = &author.bio {
            prompt.push_str(&format!("Bio: {bio}\n"));
        }
    }

    prompt.push_str("\n## Content\n");
    if !candidate.title.is_empty() && candidate.title != candidate.text {
        prompt.push_str(&format!("Title: {}\n\n", candidate.title));
    }
    prompt.push_str(truncate_chars(&candidate.text, MAX_CONTENT_CHARS));
    prompt
}

/// Map the raw LLM output into the pipeline's type, clamping confidence
/// into [0, 1] and defaulting an unparseable recommendation to review
/// rather than auto-publishing.
fn into_result(extracted: ExtractedClassification) -> ClassificationResult {
    let recommendation = match extracted.recommendation.trim().to_lowercase().as_str() {
        "approve" => Recommendation::Approve,
        "reject" => Recommendation::Reject,
        _ => Recommendation::Review,
    };

    ClassificationResult {
        is_ai_doom_claim: extracted.is_ai_doom_claim,
        claim_confidence: extracted.claim_confidence.clamp(0.0, 1.0),
        is_notable: extracted.is_notable,
        notability_reason: extracted.notability_reason,
        extracted_claim: extracted.extracted_claim,
        suggested_category: extracted.suggested_category,
        recommendation,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Classify a batch with bounded concurrency. A failed call drops its
/// candidate and appends a descriptor to `errors`; the rest continue.
/// Output order matches input order.
pub async fn classify_candidates(
    classifier: &Arc<dyn ClaimClassifier>,
    candidates: Vec<DiscoveryCandidate>,
    errors: &mut Vec<RunError>,
) -> Vec<ClassifiedCandidate> {
    let mut results: Vec<_> = stream::iter(candidates.into_iter().enumerate().map(
        |(idx, candidate)| {
            let classifier = classifier.clone();
            async move {
                let outcome =
                    retry::with_retries("classify", MAX_ATTEMPTS, RETRY_BASE, || async {
                        classifier.classify(&candidate).await
                    })
                    .await;
                (idx, candidate, outcome)
            }
        },
    ))
    .buffer_unordered(MAX_CLASSIFY_CONCURRENCY)
    .collect()
    .await;

    results.sort_by_key(|(idx, _, _)| *idx);

    let mut classified = Vec::new();
    for (_, candidate, outcome) in results {
        match outcome {
            Ok(classification) => classified.push(ClassifiedCandidate {
                candidate,
                classification,
            }),
            Err(e) => {
                warn!(url = candidate.url.as_str(), error = %e, "Classification failed, skipping candidate");
                errors.push(RunError {
                    stage: "classify".into(),
                    url: candidate.url,
                    message: e.to_string(),
                });
            }
        }
    }
    classified
}

/// Keep only candidates the classifier recommends publishing. Claims
/// needing human judgment or rejected leave the automated pipeline here.
pub fn filter_approved(classified: Vec<ClassifiedCandidate>) -> Vec<ClassifiedCandidate> {
    classified
        .into_iter()
        .filter(|c| c.classification.recommendation == Recommendation::Approve)
        .collect()
}
