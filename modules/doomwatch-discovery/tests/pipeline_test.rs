//! Scenario-driven pipeline tests over the trait mocks: short circuits,
//! fault isolation, idempotency. No network, no LLM, no store.
//!
//! Run with: cargo test -p doomwatch-discovery --test pipeline_test

use std::sync::Arc;

use chrono::Utc;

use doomwatch_common::Recommendation;
use doomwatch_discovery::pipeline::DiscoveryPipeline;
use doomwatch_discovery::testing::{
    approve_classification, news_candidate, tweet_candidate, MockClassifier, MockFetcher,
    MockStore,
};
use doomwatch_discovery::traits::{CandidateFetcher, ClaimClassifier, ObituaryStore};

const CLAIM: &str = "Generative AI has completely stalled out and the industry refuses to admit it.";

fn build(
    fetcher: MockFetcher,
    classifier: MockClassifier,
    store: MockStore,
) -> (DiscoveryPipeline, Arc<MockClassifier>, Arc<MockStore>) {
    let classifier = Arc::new(classifier);
    let store = Arc::new(store);
    let pipeline = DiscoveryPipeline::new(
        Arc::new(fetcher) as Arc<dyn CandidateFetcher>,
        classifier.clone() as Arc<dyn ClaimClassifier>,
        store.clone() as Arc<dyn ObituaryStore>,
    );
    (pipeline, classifier, store)
}

// ---------------------------------------------------------------------------
// Scenario A: one approved candidate flows through to a created draft
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approved_candidate_becomes_a_draft() {
    let url = "https://x.com/skeptic/status/1";
    let fetcher =
        MockFetcher::new().with_tweets(vec![tweet_candidate(url, CLAIM, 150_000, true)]);
    let classifier = MockClassifier::new().on_url(url, approve_classification(0.9));
    let (pipeline, _, store) = build(fetcher, classifier, MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.discovered, 1);
    assert_eq!(result.filtered, 1);
    assert_eq!(result.classified, 1);
    assert_eq!(result.created, 1);
    assert_eq!(result.created_ids, vec!["doc-123".to_string()]);
    assert!(result.errors.is_empty());
    assert!(store.stored_urls().contains(url));
}

// ---------------------------------------------------------------------------
// Scenario B: zero candidates short-circuits before the gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_collection_short_circuits() {
    let (pipeline, classifier, store) =
        build(MockFetcher::new(), MockClassifier::new(), MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.discovered, 0);
    assert_eq!(result.filtered, 0);
    assert_eq!(result.classified, 0);
    assert_eq!(result.created, 0);
    assert_eq!(classifier.calls(), 0);
    assert_eq!(store.created_count(), 0);
}

// ---------------------------------------------------------------------------
// Scenario C: gate rejection means the classifier is never invoked
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gate_rejection_skips_classification() {
    // anonymous account with no reach: fails the notability heuristic
    let fetcher = MockFetcher::new().with_tweets(vec![tweet_candidate(
        "https://x.com/nobody/status/1",
        CLAIM,
        12,
        false,
    )]);
    let (pipeline, classifier, store) = build(fetcher, MockClassifier::new(), MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.discovered, 1);
    assert_eq!(result.filtered, 0);
    assert_eq!(result.classified, 0);
    assert_eq!(result.created, 0);
    assert_eq!(classifier.calls(), 0);
    assert_eq!(store.created_count(), 0);
}

// ---------------------------------------------------------------------------
// Scenario E: an unexpected collector fault fails the whole run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unexpected_collector_fault_is_terminal() {
    let fetcher = MockFetcher::new().failing("connection pool poisoned");
    let (pipeline, classifier, store) = build(fetcher, MockClassifier::new(), MockStore::new());

    let err = pipeline.run(Utc::now()).await.unwrap_err();

    assert!(err.to_string().contains("connection pool poisoned"));
    assert_eq!(classifier.calls(), 0);
    assert_eq!(store.created_count(), 0);
}

// ---------------------------------------------------------------------------
// Idempotency: overlapping runs never duplicate drafts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overlapping_runs_do_not_duplicate_drafts() {
    let first_url = "https://x.com/skeptic/status/1";
    let second_url = "https://www.reuters.com/tech/ai-over";

    let store = Arc::new(MockStore::new());

    // First run discovers only the tweet.
    let fetcher =
        MockFetcher::new().with_tweets(vec![tweet_candidate(first_url, CLAIM, 150_000, true)]);
    let classifier = MockClassifier::new().on_url(first_url, approve_classification(0.9));
    let pipeline = DiscoveryPipeline::new(
        Arc::new(fetcher),
        Arc::new(classifier),
        store.clone() as Arc<dyn ObituaryStore>,
    );
    let first = pipeline.run(Utc::now()).await.unwrap();
    assert_eq!(first.created, 1);

    // Second run re-discovers the tweet plus one new article.
    let fetcher = MockFetcher::new()
        .with_tweets(vec![tweet_candidate(first_url, CLAIM, 150_000, true)])
        .with_news(vec![news_candidate(second_url, "AI is over", CLAIM)]);
    let classifier = MockClassifier::new()
        .on_url(first_url, approve_classification(0.9))
        .on_url(second_url, approve_classification(0.8));
    let pipeline = DiscoveryPipeline::new(
        Arc::new(fetcher),
        Arc::new(classifier),
        store.clone() as Arc<dyn ObituaryStore>,
    );
    let second = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(second.discovered, 2);
    assert_eq!(second.classified, 2);
    assert_eq!(second.created, 1, "already-stored URL must not be re-created");
    assert_eq!(store.created_count(), 2);
}

// ---------------------------------------------------------------------------
// Fault isolation inside a run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn classification_failure_drops_one_candidate_not_the_batch() {
    let good = "https://x.com/skeptic/status/1";
    let bad = "https://x.com/skeptic/status/2";

    let fetcher = MockFetcher::new().with_tweets(vec![
        tweet_candidate(good, CLAIM, 150_000, true),
        tweet_candidate(bad, CLAIM, 150_000, true),
    ]);
    let classifier = MockClassifier::new()
        .on_url(good, approve_classification(0.9))
        .fail_on(bad);
    let (pipeline, _, store) = build(fetcher, classifier, MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.discovered, 2);
    assert_eq!(result.filtered, 2);
    assert_eq!(result.classified, 1);
    assert_eq!(result.created, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].stage, "classify");
    assert_eq!(result.errors[0].url, bad);
    assert!(store.stored_urls().contains(good));
}

#[tokio::test]
async fn write_failure_is_isolated_and_reported() {
    let ok_url = "https://x.com/skeptic/status/1";
    let failing_url = "https://x.com/skeptic/status/2";

    let fetcher = MockFetcher::new().with_tweets(vec![
        tweet_candidate(ok_url, CLAIM, 150_000, true),
        tweet_candidate(failing_url, CLAIM, 150_000, true),
    ]);
    let classifier = MockClassifier::new()
        .on_url(ok_url, approve_classification(0.9))
        .on_url(failing_url, approve_classification(0.9));
    let store = MockStore::new().fail_on(failing_url);
    let (pipeline, _, store) = build(fetcher, classifier, store);

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.classified, 2);
    assert_eq!(result.created, 1, "created reflects successes only");
    assert!(result
        .errors
        .iter()
        .any(|e| e.stage == "publish" && e.url == failing_url));
    assert_eq!(store.created_count(), 1);
}

#[tokio::test]
async fn store_outage_during_dedup_is_terminal() {
    let url = "https://x.com/skeptic/status/1";
    let fetcher =
        MockFetcher::new().with_tweets(vec![tweet_candidate(url, CLAIM, 150_000, true)]);
    let classifier = MockClassifier::new().on_url(url, approve_classification(0.9));
    let store = MockStore::new().failing_queries();
    let (pipeline, _, _) = build(fetcher, classifier, store);

    assert!(pipeline.run(Utc::now()).await.is_err());
}

// ---------------------------------------------------------------------------
// Cross-stage invariants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_and_reject_recommendations_never_publish() {
    let approve_url = "https://x.com/skeptic/status/1";
    let review_url = "https://x.com/skeptic/status/2";
    let reject_url = "https://x.com/skeptic/status/3";

    let fetcher = MockFetcher::new().with_tweets(vec![
        tweet_candidate(approve_url, CLAIM, 150_000, true),
        tweet_candidate(review_url, CLAIM, 150_000, true),
        tweet_candidate(reject_url, CLAIM, 150_000, true),
    ]);

    let mut review = approve_classification(0.5);
    review.recommendation = Recommendation::Review;
    let mut reject = approve_classification(0.2);
    reject.recommendation = Recommendation::Reject;

    let classifier = MockClassifier::new()
        .on_url(approve_url, approve_classification(0.9))
        .on_url(review_url, review)
        .on_url(reject_url, reject);
    let (pipeline, _, store) = build(fetcher, classifier, MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert_eq!(result.discovered, 3);
    assert_eq!(result.filtered, 3);
    assert_eq!(result.classified, 1);
    assert_eq!(result.created, 1);
    assert_eq!(store.stored_urls().len(), 1);
    assert!(store.stored_urls().contains(approve_url));
}

#[tokio::test]
async fn counts_never_increase_stage_over_stage() {
    let urls = [
        "https://x.com/skeptic/status/1",
        "https://x.com/skeptic/status/2",
        "https://www.reuters.com/tech/ai-over",
    ];
    let fetcher = MockFetcher::new()
        .with_tweets(vec![
            tweet_candidate(urls[0], CLAIM, 150_000, true),
            tweet_candidate(urls[1], "too short", 150_000, true),
        ])
        .with_news(vec![news_candidate(urls[2], "AI is over", CLAIM)]);
    let classifier = MockClassifier::new()
        .on_url(urls[0], approve_classification(0.9))
        .on_url(urls[2], approve_classification(0.8));
    let (pipeline, _, _) = build(fetcher, classifier, MockStore::new());

    let result = pipeline.run(Utc::now()).await.unwrap();

    assert!(result.discovered >= result.filtered);
    assert!(result.filtered >= result.classified);
    assert!(result.classified >= result.created);
}
