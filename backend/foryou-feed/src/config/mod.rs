use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub appview: AppViewConfig,
    pub feed: FeedConfig,
    pub access: AccessConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct AppViewConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Knobs for the ranking pipeline.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Cap on how many follows are collected for the viewer.
    pub max_follows: usize,
    /// Author-feed page size fetched per follow.
    pub per_follow_feed_limit: u32,
    /// Likes page size fetched per follow.
    pub per_follow_likes_limit: u32,
    /// Maximum page size served to callers; handlers clamp `limit` to this.
    pub page_size: u32,
    /// Hard cap on URIs sent to the batch metadata lookup.
    pub metadata_batch_cap: usize,
    /// Safety labels to exclude. Matching is exact (case-insensitive), not
    /// substring, whatever the env var name may suggest.
    pub blocked_labels: Vec<String>,
    /// Target share of in-network posts per page.
    pub in_network_share: f64,
    /// Maximum feed slots one author may occupy.
    pub per_author_max: usize,
    /// Bound on concurrent per-follow upstream fetches.
    pub fetch_concurrency: usize,
    /// Overall pipeline deadline; on expiry the feed is built from whatever
    /// was gathered so far.
    pub request_deadline_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Allowed viewer DIDs or handles. Empty means open access.
    pub whitelist: Vec<String>,
    /// Always-allowed DID or handle.
    pub admin: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            app: AppConfig {
                port: env_parsed("PORT", 3000),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            appview: AppViewConfig {
                base_url: env::var("APPVIEW_BASE")
                    .unwrap_or_else(|_| "https://public.api.bsky.app".to_string()),
                request_timeout_secs: env_parsed("APPVIEW_TIMEOUT_SECS", 10),
            },
            feed: FeedConfig {
                max_follows: env_parsed("MAX_FOLLOWS", 150),
                per_follow_feed_limit: env_parsed("PER_FOLLOW_AUTHOR_FEED_LIMIT", 5),
                per_follow_likes_limit: env_parsed("PER_FOLLOW_LIKES_LIMIT", 10),
                page_size: env_parsed("PAGE_SIZE", 30),
                metadata_batch_cap: env_parsed("METADATA_BATCH_CAP", 500),
                blocked_labels: env_list(
                    "BLOCKED_LABELS",
                    "porn,sexual,nsfw,sexual-content",
                ),
                in_network_share: env_parsed("IN_NETWORK_SHARE", 0.5),
                per_author_max: env_parsed("PER_AUTHOR_MAX", 3),
                fetch_concurrency: env_parsed("FETCH_CONCURRENCY", 8),
                request_deadline_secs: env_parsed("REQUEST_DEADLINE_SECS", 20),
            },
            access: AccessConfig {
                whitelist: env_list("WHITELIST", ""),
                admin: env::var("ADMIN").unwrap_or_default().trim().to_string(),
            },
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_follows: 150,
            per_follow_feed_limit: 5,
            per_follow_likes_limit: 10,
            page_size: 30,
            metadata_batch_cap: 500,
            blocked_labels: split_list("porn,sexual,nsfw,sexual-content"),
            in_network_share: 0.5,
            per_author_max: 3,
            fetch_concurrency: 8,
            request_deadline_secs: 20,
        }
    }
}

impl FeedConfig {
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    split_list(&env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
