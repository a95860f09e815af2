use chrono::{DateTime, Utc};
use serde::Serialize;

/// An account the viewer follows, as reported by the graph collector.
#[derive(Debug, Clone)]
pub struct FollowedAccount {
    pub id: String,
    pub handle: Option<String>,
}

/// A post discovered during candidate sourcing, before enrichment.
///
/// `in_network` records which pass produced the signal: the author-feed pass
/// (true) or the likes pass (false). The first signal seen for a URI wins;
/// later signals for the same URI are no-ops.
#[derive(Debug, Clone)]
pub struct CandidateSignal {
    pub post_uri: String,
    pub in_network: bool,
    pub author_id: Option<String>,
    pub indexed_at: Option<DateTime<Utc>>,
    pub liked_by_follows: u32,
}

/// Engagement and safety metadata for one post, from the batch lookup.
#[derive(Debug, Clone, Default)]
pub struct PostMetadata {
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub indexed_at: Option<DateTime<Utc>>,
    pub author_id: Option<String>,
    pub labels: Vec<String>,
    pub is_reply: bool,
}

/// One fully-merged candidate: sourcing signal plus metadata, scored later.
///
/// Metadata fields default to zero/absent when the batch lookup did not
/// return the post; the pipeline keeps going either way.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub post_uri: String,
    pub in_network: bool,
    pub author_id: Option<String>,
    pub indexed_at: Option<DateTime<Utc>>,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub liked_by_follows: u32,
    /// Reserved scoring input. No sourcer populates it today, so the
    /// matching score term is always zero.
    pub reposted_by_follows: u32,
    pub is_reply: bool,
    pub labels: Vec<String>,
    pub score: f64,
}

impl FeatureRecord {
    pub fn new(signal: &CandidateSignal, metadata: Option<&PostMetadata>) -> Self {
        let meta = metadata.cloned().unwrap_or_default();
        Self {
            post_uri: signal.post_uri.clone(),
            in_network: signal.in_network,
            author_id: meta.author_id,
            indexed_at: meta.indexed_at,
            like_count: meta.like_count,
            repost_count: meta.repost_count,
            reply_count: meta.reply_count,
            liked_by_follows: signal.liked_by_follows,
            reposted_by_follows: 0,
            is_reply: meta.is_reply,
            labels: meta.labels,
            score: 0.0,
        }
    }
}

/// One page of the ranked feed: post URIs plus the continuation cursor.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub uris: Vec<String>,
    pub next_cursor: Option<String>,
}

/// Feed skeleton response shape expected by the AppView.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSkeleton {
    pub feed: Vec<SkeletonItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkeletonItem {
    pub post: String,
}

impl From<FeedPage> for FeedSkeleton {
    fn from(page: FeedPage) -> Self {
        Self {
            feed: page
                .uris
                .into_iter()
                .map(|uri| SkeletonItem { post: uri })
                .collect(),
            cursor: page.next_cursor,
            message: None,
        }
    }
}
