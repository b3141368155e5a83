//! Curated source configuration: publication whitelist tiers, tracked
//! author handles, and the search terms both discovery sources run.

/// Tiered publication whitelist. News candidates pass the quality gate only
/// when their domain resolves to one of these entries; the tier feeds the
/// candidate's trust score. Matching is case-, `www.`- and
/// subdomain-insensitive.
pub const NEWS_DOMAINS: &[(&str, f32)] = &[
    // Wire services and financial press
    ("reuters.com", 0.95),
    ("apnews.com", 0.95),
    ("bloomberg.com", 0.95),
    ("wsj.com", 0.95),
    ("ft.com", 0.95),
    ("economist.com", 0.95),
    // General press
    ("nytimes.com", 0.9),
    ("washingtonpost.com", 0.9),
    ("theguardian.com", 0.9),
    ("bbc.com", 0.9),
    ("newyorker.com", 0.9),
    ("theatlantic.com", 0.9),
    // Business
    ("cnbc.com", 0.85),
    ("fortune.com", 0.8),
    ("businessinsider.com", 0.75),
    ("forbes.com", 0.7),
    ("axios.com", 0.85),
    ("semafor.com", 0.8),
    ("theinformation.com", 0.9),
    ("marketwatch.com", 0.8),
    // Tech press
    ("technologyreview.com", 0.9),
    ("spectrum.ieee.org", 0.85),
    ("wired.com", 0.85),
    ("theverge.com", 0.85),
    ("arstechnica.com", 0.85),
    ("techcrunch.com", 0.8),
    ("theregister.com", 0.75),
    ("vox.com", 0.75),
    ("futurism.com", 0.65),
    ("gizmodo.com", 0.65),
];

/// Author handles whose claims pass source trust without the notability
/// heuristic. Prominent, frequently-cited AI skeptics and commentators.
pub const TRACKED_HANDLES: &[&str] = &[
    "GaryMarcus",
    "edzitron",
    "emilymbender",
    "ylecun",
    "fchollet",
    "erikbryn",
    "tegmark",
    "ESYudkowsky",
    "timnitGebru",
    "mmitchell_ai",
    "AndrewYNg",
    "sama",
    "random_walker",
    "pmddomingos",
];

/// Bio tokens that mark an author as working in or around the AI domain.
/// Short tokens are matched against whole words; phrases as substrings.
pub const AI_BIO_KEYWORDS: &[&str] = &[
    "ai",
    "ml",
    "llm",
    "agi",
    "nlp",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural",
    "researcher",
    "professor",
    "scientist",
    "economist",
    "journalist",
    "analyst",
    "founder",
    "investor",
];

/// Keyword searches the social source runs each cycle.
pub const DOOM_SEARCH_TERMS: &[&str] = &[
    "\"AI is dead\"",
    "\"AI is over\"",
    "\"AI bubble\" burst",
    "\"AI winter\"",
    "\"AI is overhyped\"",
    "\"LLMs have hit a wall\"",
    "\"deep learning is hitting a wall\"",
    "\"AGI is not coming\"",
    "\"generative AI\" flop",
];

/// Queries the news source runs each cycle. Broader phrasing than the
/// tweet terms; news search matches across headline and body.
pub const NEWS_QUERIES: &[&str] = &[
    "AI bubble about to burst",
    "AI hype collapse",
    "AI winter coming",
    "generative AI disappointment failure",
    "large language models hit a wall",
    "AI overhyped dead end",
];

/// Lowercased host with any `www.` prefix stripped. Returns an empty
/// string for unparseable URLs.
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Trust tier for a news URL, if its domain (or a parent domain) is
/// whitelisted.
pub fn news_domain_trust(url: &str) -> Option<f32> {
    let domain = extract_domain(url);
    if domain.is_empty() {
        return None;
    }
    NEWS_DOMAINS.iter().find_map(|(whitelisted, trust)| {
        if domain == *whitelisted || domain.ends_with(&format!(".{whitelisted}")) {
            Some(*trust)
        } else {
            None
        }
    })
}

/// Whether a handle is on the tracked-author whitelist. Case- and
/// `@`-insensitive.
pub fn is_tracked_handle(handle: &str) -> bool {
    let normalized = handle.trim().trim_start_matches('@').to_lowercase();
    TRACKED_HANDLES
        .iter()
        .any(|h| h.to_lowercase() == normalized)
}

/// Whether a bio reads as AI-domain-relevant. Tokens of three chars or
/// fewer must match a whole word so "ai" does not light up inside
/// unrelated words.
pub fn bio_is_ai_relevant(bio: &str) -> bool {
    let lower = bio.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    AI_BIO_KEYWORDS.iter().any(|keyword| {
        if keyword.len() <= 3 {
            words.iter().any(|w| w == keyword)
        } else {
            lower.contains(keyword)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_extraction_strips_www_and_lowercases() {
        assert_eq!(
            extract_domain("https://WWW.Reuters.com/technology/ai-over"),
            "reuters.com"
        );
        assert_eq!(extract_domain("not a url"), "");
    }

    #[test]
    fn subdomains_inherit_the_parent_tier() {
        assert!(news_domain_trust("https://edition.bbc.com/news/tech").is_some());
        assert!(news_domain_trust("https://www.wsj.com/articles/x").is_some());
        assert!(news_domain_trust("https://myblog.example.com/ai").is_none());
    }

    #[test]
    fn lookalike_domains_do_not_match() {
        assert!(news_domain_trust("https://notreuters.com/story").is_none());
        assert!(news_domain_trust("https://reuters.com.evil.io/story").is_none());
    }

    #[test]
    fn handle_matching_ignores_case_and_at() {
        assert!(is_tracked_handle("@garymarcus"));
        assert!(is_tracked_handle("GARYMARCUS"));
        assert!(!is_tracked_handle("@some_rando"));
    }

    #[test]
    fn short_bio_tokens_need_word_boundaries() {
        assert!(bio_is_ai_relevant("AI researcher at a lab"));
        assert!(bio_is_ai_relevant("Working on ml infrastructure"));
        // "ai" inside a word must not count
        assert!(!bio_is_ai_relevant("painter and mountain guide"));
    }
}
