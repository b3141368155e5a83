use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use apify_client::{ApifyClient, Tweet};
use doomwatch_common::{AuthorMetadata, Config, DiscoveryCandidate, SourceType};

use crate::retry::{self, MAX_ATTEMPTS, RETRY_BASE};
use crate::search::{self, NewsResult, NewsSearcher};
use crate::sources;
use crate::traits::CandidateFetcher;

/// Max tweets fetched per search run.
const TWEET_LIMIT: u32 = 100;

/// Max articles fetched per news query.
const NEWS_RESULTS_PER_QUERY: usize = 10;

/// Production fetcher: X keyword search via Apify plus Google News via
/// Serper. Either credential may be absent; the corresponding source then
/// contributes nothing. Upstream errors are absorbed per source once
/// retries are exhausted, so neither method returns Err for expected
/// failure modes.
pub struct LiveFetcher {
    apify: Option<ApifyClient>,
    news: Option<NewsSearcher>,
}

impl LiveFetcher {
    pub fn new(config: &Config) -> Self {
        let apify = if config.apify_token.is_empty() {
            warn!("APIFY_TOKEN not set, social discovery disabled");
            None
        } else {
            Some(ApifyClient::new(config.apify_token.clone()))
        };
        let news = if config.serper_api_key.is_empty() {
            warn!("SERPER_API_KEY not set, news discovery disabled");
            None
        } else {
            Some(NewsSearcher::new(&config.serper_api_key))
        };
        Self { apify, news }
    }
}

#[async_trait]
impl CandidateFetcher for LiveFetcher {
    async fn tweets_since(&self, since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>> {
        let Some(apify) = &self.apify else {
            return Ok(Vec::new());
        };

        let terms: Vec<String> = sources::DOOM_SEARCH_TERMS
            .iter()
            .map(|s| s.to_string())
            .collect();

        let result = retry::with_retries("tweet_search", MAX_ATTEMPTS, RETRY_BASE, || async {
            apify
                .search_tweets(&terms, since, TWEET_LIMIT)
                .await
                .map_err(anyhow::Error::from)
        })
        .await;

        let tweets = match result {
            Ok(tweets) => tweets,
            Err(e) => {
                warn!(error = %e, "Tweet search failed, contributing no social candidates");
                return Ok(Vec::new());
            }
        };

        Ok(tweets
            .into_iter()
            .filter_map(|t| tweet_to_candidate(t, since))
            .collect())
    }

    async fn news_since(&self, since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>> {
        let Some(news) = &self.news else {
            return Ok(Vec::new());
        };

        let hours = (Utc::now() - since).num_hours().max(1) as u64;
        let tbs = search::tbs_for_lookback(hours);

        let mut candidates = Vec::new();
        for query in sources::NEWS_QUERIES {
            let result = retry::with_retries("news_search", MAX_ATTEMPTS, RETRY_BASE, || async {
                news.search(query, NEWS_RESULTS_PER_QUERY, Some(tbs)).await
            })
            .await;

            match result {
                Ok(results) => {
                    candidates.extend(
                        results
                            .into_iter()
                            .filter_map(|r| news_to_candidate(r, since)),
                    );
                }
                Err(e) => {
                    warn!(query, error = %e, "News query failed, continuing");
                }
            }
        }

        Ok(candidates)
    }
}

/// Gathers candidates from both sources concurrently and merges them,
/// deduplicating by URL with first occurrence winning. Expected upstream
/// failures never surface here; an Err from the fetcher is an unexpected
/// fault and fails the whole run.
pub struct Collector {
    fetcher: Arc<dyn CandidateFetcher>,
}

impl Collector {
    pub fn new(fetcher: Arc<dyn CandidateFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn collect(&self, since: DateTime<Utc>) -> Result<Vec<DiscoveryCandidate>> {
        let (tweets, news) = tokio::join!(
            self.fetcher.tweets_since(since),
            self.fetcher.news_since(since)
        );
        let tweets = tweets?;
        let news = news?;

        info!(
            tweets = tweets.len(),
            news = news.len(),
            "Collected candidates"
        );

        let mut all = tweets;
        all.extend(news);

        let mut seen = HashSet::new();
        all.retain(|c| seen.insert(c.url.clone()));

        Ok(all)
    }
}

fn tweet_to_candidate(tweet: Tweet, fallback_date: DateTime<Utc>) -> Option<DiscoveryCandidate> {
    let url = tweet.url.clone()?;
    let text = tweet.content()?.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let published_date = tweet
        .created_at
        .as_deref()
        .and_then(parse_tweet_date)
        .unwrap_or(fallback_date);

    let author = tweet.author.as_ref().map(|a| AuthorMetadata {
        name: a
            .name
            .clone()
            .or_else(|| a.user_name.clone())
            .unwrap_or_default(),
        handle: a.user_name.clone(),
        bio: a.description.clone(),
        followers: a.followers,
        verified: Some(a.verified()),
    });

    Some(DiscoveryCandidate {
        title: truncate_title(&text),
        url,
        text,
        published_date,
        author,
        source_type: SourceType::Tweet,
        score: tweet.like_count.map(|n| n as f64),
    })
}

fn news_to_candidate(result: NewsResult, fallback_date: DateTime<Utc>) -> Option<DiscoveryCandidate> {
    if result.link.is_empty() {
        return None;
    }

    let published_date = parse_news_date(&result.date).unwrap_or(fallback_date);

    Some(DiscoveryCandidate {
        url: result.link,
        title: result.title,
        text: result.snippet,
        published_date,
        author: None,
        source_type: SourceType::News,
        score: None,
    })
}

/// Tweets carry the classic Twitter timestamp format; some actors emit
/// ISO 8601 instead. Anything else falls back to the run window.
fn parse_tweet_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_news_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Tweet candidates take their first non-empty line, capped, as a title.
fn truncate_title(text: &str) -> String {
    let line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or(text)
        .trim();
    line.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apify_client::types::TweetAuthor;

    fn tweet(url: &str, text: &str) -> Tweet {
        Tweet {
            id: Some("1".into()),
            text: Some(text.into()),
            full_text: None,
            url: Some(url.into()),
            created_at: Some("Tue Jun 04 09:15:00 +0000 2024".into()),
            author: Some(TweetAuthor {
                user_name: Some("skeptic".into()),
                name: Some("A Skeptic".into()),
                description: Some("AI researcher".into()),
                followers: Some(150_000),
                is_verified: Some(false),
                is_blue_verified: Some(true),
            }),
            like_count: Some(42),
            retweet_count: None,
            reply_count: None,
        }
    }

    #[test]
    fn tweet_maps_to_candidate_with_author() {
        let since = Utc::now();
        let c = tweet_to_candidate(tweet("https://x.com/skeptic/status/1", "AI is dead."), since)
            .unwrap();
        assert_eq!(c.source_type, SourceType::Tweet);
        assert_eq!(c.title, "AI is dead.");
        assert_eq!(c.score, Some(42.0));

        let author = c.author.unwrap();
        assert_eq!(author.handle.as_deref(), Some("skeptic"));
        assert_eq!(author.followers, Some(150_000));
        assert_eq!(author.verified, Some(true));
        // classic Twitter timestamp parsed, not the fallback
        assert_eq!(c.published_date.format("%Y-%m-%d").to_string(), "2024-06-04");
    }

    #[test]
    fn tweets_without_url_or_text_are_skipped() {
        let since = Utc::now();

        let mut no_url = tweet("https://x.com/s/1", "text");
        no_url.url = None;
        assert!(tweet_to_candidate(no_url, since).is_none());

        let mut no_text = tweet("https://x.com/s/1", "text");
        no_text.text = None;
        no_text.full_text = None;
        assert!(tweet_to_candidate(no_text, since).is_none());

        let blank = tweet("https://x.com/s/1", "   ");
        assert!(tweet_to_candidate(blank, since).is_none());
    }

    #[test]
    fn news_without_link_is_skipped_and_date_falls_back() {
        let since = Utc::now();

        let missing_link = NewsResult::default();
        assert!(news_to_candidate(missing_link, since).is_none());

        let relative_date = NewsResult {
            link: "https://reuters.com/a".into(),
            title: "AI winter".into(),
            snippet: "It is over".into(),
            date: "2 hours ago".into(),
            source: "Reuters".into(),
        };
        let c = news_to_candidate(relative_date, since).unwrap();
        assert_eq!(c.published_date, since);
        assert_eq!(c.source_type, SourceType::News);
        assert!(c.author.is_none());
    }

    #[test]
    fn long_tweets_get_a_capped_title() {
        let text = "x".repeat(300);
        assert_eq!(truncate_title(&text).chars().count(), 100);
    }

    #[tokio::test]
    async fn collect_merges_and_dedups_preserving_first() {
        use crate::testing::{news_candidate, tweet_candidate, MockFetcher};

        let shared = "https://example.com/same";
        let fetcher = MockFetcher::new()
            .with_tweets(vec![
                tweet_candidate("https://x.com/a/1", "AI is dead", 1_000, false),
                tweet_candidate(shared, "dupe from tweets", 1_000, false),
            ])
            .with_news(vec![
                news_candidate(shared, "dupe from news", "snippet"),
                news_candidate("https://reuters.com/b", "AI winter", "snippet"),
            ]);

        let collector = Collector::new(Arc::new(fetcher));
        let candidates = collector.collect(Utc::now()).await.unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[1].url, shared);
        assert_eq!(candidates[1].text, "dupe from tweets");
    }

    #[tokio::test]
    async fn collect_propagates_unexpected_fetcher_failure() {
        use crate::testing::MockFetcher;

        let fetcher = MockFetcher::new().failing("fetcher exploded");
        let collector = Collector::new(Arc::new(fetcher));
        let err = collector.collect(Utc::now()).await.unwrap_err();
        assert!(err.to_string().contains("fetcher exploded"));
    }
}
