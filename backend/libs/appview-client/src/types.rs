//! Wire types for the AppView XRPC responses.
//!
//! Every field an upstream record might omit is an `Option` or defaulted, so
//! malformed records deserialize instead of failing the whole page; the
//! pipeline skips items that lack the fields it needs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of `app.bsky.graph.getFollows`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowsPage {
    #[serde(default)]
    pub follows: Vec<Actor>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub did: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

/// One page of `app.bsky.feed.getAuthorFeed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorFeedPage {
    #[serde(default)]
    pub feed: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub post: Option<PostView>,
}

/// A hydrated post view, shared by the author feed and the batch lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(default)]
    pub indexed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub repost_count: Option<u64>,
    #[serde(default)]
    pub reply_count: Option<u64>,
    #[serde(default)]
    pub labels: Vec<PostLabel>,
    #[serde(default)]
    pub record: Option<PostRecord>,
}

impl PostView {
    /// A post is a reply iff its record carries a reply ref.
    pub fn is_reply(&self) -> bool {
        self.record
            .as_ref()
            .map(|r| r.reply.is_some())
            .unwrap_or(false)
    }

    /// Indexing time, falling back to the record's creation time.
    pub fn indexed_or_created_at(&self) -> Option<DateTime<Utc>> {
        self.indexed_at
            .or_else(|| self.record.as_ref().and_then(|r| r.created_at))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Present iff the post is a reply; the contents are irrelevant here.
    #[serde(default)]
    pub reply: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostLabel {
    #[serde(default)]
    pub val: Option<String>,
}

/// One page of an actor's like records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikesPage {
    #[serde(default)]
    pub records: Vec<LikeRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeRecord {
    #[serde(default)]
    pub subject: Option<LikeSubject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeSubject {
    #[serde(default)]
    pub uri: Option<String>,
}

impl LikeRecord {
    /// URI of the liked post, if the record carries one.
    pub fn liked_post_uri(&self) -> Option<&str> {
        self.subject.as_ref().and_then(|s| s.uri.as_deref())
    }
}

/// Response of `app.bsky.feed.getPosts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsPage {
    #[serde(default)]
    pub posts: Vec<PostView>,
}
