use std::env;

/// Application configuration loaded from environment variables.
///
/// Unlike a hard-required config, every credential here is optional: an
/// absent variable leaves its capability unconfigured and the pipeline
/// degrades to empty results for that capability instead of failing at
/// startup. The status endpoint reports which capabilities are present.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Shared secret for the discovery trigger. Empty = auth check skipped.
    pub discovery_secret: String,

    // Search capabilities
    pub apify_token: String,
    pub serper_api_key: String,

    // Classification
    pub anthropic_api_key: String,

    // Persistence (Sanity content store)
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    pub sanity_api_token: String,

    /// How far back a trigger run looks, in hours.
    pub lookback_hours: u64,

    // Web server
    pub api_host: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            discovery_secret: optional_env("DISCOVERY_SECRET"),
            apify_token: optional_env("APIFY_TOKEN"),
            serper_api_key: optional_env("SERPER_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            sanity_project_id: optional_env("SANITY_PROJECT_ID"),
            sanity_dataset: env::var("SANITY_DATASET")
                .unwrap_or_else(|_| "production".to_string()),
            sanity_api_token: optional_env("SANITY_API_TOKEN"),
            lookback_hours: env::var("DISCOVERY_LOOKBACK_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    pub fn auth_configured(&self) -> bool {
        !self.discovery_secret.is_empty()
    }

    pub fn social_search_configured(&self) -> bool {
        !self.apify_token.is_empty()
    }

    pub fn news_search_configured(&self) -> bool {
        !self.serper_api_key.is_empty()
    }

    /// True when at least one discovery source can run. The collector
    /// degrades per-source, so either credential is enough to search.
    pub fn search_configured(&self) -> bool {
        self.social_search_configured() || self.news_search_configured()
    }

    pub fn classification_configured(&self) -> bool {
        !self.anthropic_api_key.is_empty()
    }

    pub fn persistence_configured(&self) -> bool {
        !self.sanity_project_id.is_empty() && !self.sanity_api_token.is_empty()
    }
}

fn optional_env(key: &str) -> String {
    env::var(key).unwrap_or_default()
}
