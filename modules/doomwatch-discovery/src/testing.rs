// Test mocks for the discovery pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockFetcher (CandidateFetcher) — preset candidate lists, with optional
//   injected failure for the systemic-fault path
// - MockClassifier (ClaimClassifier) — URL→result map with a call counter
//   and per-URL failure injection
// - MockStore (ObituaryStore) — stateful in-memory store keyed by
//   sourceUrl, assigning doc-N ids
//
// Plus helpers for building candidates, classifications and drafts.
// No network, no store, no LLM.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use doomwatch_common::{
    AuthorMetadata, ClassificationResult, ContextMetadata, DiscoveryCandidate, DiscoveryMetadata,
    ObituaryDraft, Recommendation, SourceType,
};

use crate::slug::generate_slug;
use crate::traits::{CandidateFetcher, ClaimClassifier, ObituaryStore};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Fetcher returning preset candidates. `failing` injects an Err from the
/// social side, modeling an unexpected fault escaping the collector.
#[derive(Default)]
pub struct MockFetcher {
    tweets: Vec<DiscoveryCandidate>,
    news: Vec<DiscoveryCandidate>,
    fail: Option<String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tweets(mut self, tweets: Vec<DiscoveryCandidate>) -> Self {
        self.tweets = tweets;
        self
    }

    pub fn with_news(mut self, news: Vec<DiscoveryCandidate>) -> Self {
        self.news = news;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }
}

#[async_trait]
impl CandidateFetcher for MockFetcher {
    async fn tweets_since(&self, _since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>> {
        if let Some(message) = &self.fail {
            bail!("{message}");
        }
        Ok(self.tweets.clone())
    }

    async fn news_since(&self, _since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>> {
        Ok(self.news.clone())
    }
}

// ---------------------------------------------------------------------------
// MockClassifier
// ---------------------------------------------------------------------------

/// URL→classification map. Unregistered URLs are an error, so a test that
/// forgets a registration fails loudly. `calls()` exposes how many times
/// the classifier ran, for the short-circuit assertions.
#[derive(Default)]
pub struct MockClassifier {
    by_url: HashMap<String, ClassificationResult>,
    fail_urls: HashSet<String>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_url(mut self, url: &str, result: ClassificationResult) -> Self {
        self.by_url.insert(url.to_string(), result);
        self
    }

    pub fn fail_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimClassifier for MockClassifier {
    async fn classify(&self, candidate: &DiscoveryCandidate) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_urls.contains(&candidate.url) {
            bail!("classification call failed");
        }
        self.by_url
            .get(&candidate.url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no classification registered for {}", candidate.url))
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Stateful in-memory store keyed by sourceUrl. Ids are assigned
/// `doc-123`, `doc-124`, … in creation order.
pub struct MockStore {
    docs: Mutex<HashMap<String, ObituaryDraft>>,
    fail_urls: HashSet<String>,
    fail_queries: bool,
    next_id: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            fail_urls: HashSet::new(),
            fail_queries: false,
            next_id: AtomicUsize::new(123),
        }
    }

    /// Inject a write failure for one sourceUrl.
    pub fn fail_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }

    /// Make dedup queries fail, modeling store infrastructure being down.
    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn created_count(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn stored_urls(&self) -> HashSet<String> {
        self.docs.lock().unwrap().keys().cloned().collect()
    }

    pub fn stored_slugs(&self) -> Vec<String> {
        self.docs
            .lock()
            .unwrap()
            .values()
            .map(|d| d.slug.clone())
            .collect()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObituaryStore for MockStore {
    async fn existing_source_urls(&self, urls: &[String]) -> Result<HashSet<String>> {
        if self.fail_queries {
            bail!("store query failed");
        }
        let docs = self.docs.lock().unwrap();
        Ok(urls
            .iter()
            .filter(|u| docs.contains_key(*u))
            .cloned()
            .collect())
    }

    async fn create_draft(&self, draft: &ObituaryDraft) -> Result<String> {
        if self.fail_urls.contains(&draft.source_url) {
            bail!("draft validation failed");
        }
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.docs
            .lock()
            .unwrap()
            .insert(draft.source_url.clone(), draft.clone());
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn test_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Tweet candidate with the handle taken from the URL path
/// (`https://x.com/<handle>/status/<id>`).
pub fn tweet_candidate(
    url: &str,
    text: &str,
    followers: u64,
    verified: bool,
) -> DiscoveryCandidate {
    let handle = url.split('/').nth(3).unwrap_or("author").to_string();
    DiscoveryCandidate {
        url: url.to_string(),
        title: text.chars().take(100).collect(),
        text: text.to_string(),
        published_date: test_date(),
        author: Some(AuthorMetadata {
            name: handle.clone(),
            handle: Some(handle),
            bio: None,
            followers: Some(followers),
            verified: Some(verified),
        }),
        source_type: SourceType::Tweet,
        score: Some(10.0),
    }
}

pub fn news_candidate(url: &str, title: &str, snippet: &str) -> DiscoveryCandidate {
    DiscoveryCandidate {
        url: url.to_string(),
        title: title.to_string(),
        text: snippet.to_string(),
        published_date: test_date(),
        author: None,
        source_type: SourceType::News,
        score: None,
    }
}

pub fn approve_classification(confidence: f64) -> ClassificationResult {
    ClassificationResult {
        is_ai_doom_claim: true,
        claim_confidence: confidence,
        is_notable: true,
        notability_reason: "prominent critic with large reach".into(),
        extracted_claim: "AI is dead.".into(),
        suggested_category: "hype".into(),
        recommendation: Recommendation::Approve,
    }
}

pub fn draft_for(url: &str) -> ObituaryDraft {
    ObituaryDraft {
        claim: "AI is dead.".into(),
        source: "@skeptic".into(),
        source_url: url.to_string(),
        date: test_date(),
        categories: vec!["hype".into()],
        context: ContextMetadata::default(),
        slug: generate_slug(url, None),
        discovery_metadata: DiscoveryMetadata {
            discovered_at: test_date(),
            confidence: 0.9,
            notability_reason: "prominent critic".into(),
            source_type: SourceType::Tweet,
        },
    }
}
