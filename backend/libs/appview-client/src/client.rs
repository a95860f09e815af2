use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppViewError;
use crate::types::{AuthorFeedPage, FollowsPage, LikesPage, PostsPage};
use crate::Result;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The upstream graph/content operations the feed pipeline consumes.
///
/// Implemented over HTTP by [`AppViewClient`]; tests drive the pipeline with
/// an in-memory implementation instead.
#[async_trait]
pub trait AppView: Send + Sync {
    /// One page of accounts the actor follows.
    async fn get_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<FollowsPage>;

    /// Recent items from the actor's own feed.
    async fn get_author_feed(&self, actor: &str, limit: u32) -> Result<AuthorFeedPage>;

    /// Recent like records created by the actor.
    async fn get_actor_likes(&self, actor: &str, limit: u32) -> Result<LikesPage>;

    /// Batch-hydrate posts by URI. An empty input must return an empty page
    /// without touching the network.
    async fn get_posts(&self, uris: &[String]) -> Result<PostsPage>;
}

/// HTTP client for a Bluesky AppView instance.
pub struct AppViewClient {
    http: HttpClient,
    base_url: String,
}

impl AppViewClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn xrpc<T>(&self, method: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/xrpc/{}", self.base_url, method);
        debug!(method, params = params.len(), "AppView call");

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppViewError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AppView for AppViewClient {
    async fn get_follows(
        &self,
        actor: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<FollowsPage> {
        let limit = limit.to_string();
        let mut params = vec![("actor", actor), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        self.xrpc("app.bsky.graph.getFollows", &params).await
    }

    async fn get_author_feed(&self, actor: &str, limit: u32) -> Result<AuthorFeedPage> {
        let limit = limit.to_string();
        self.xrpc(
            "app.bsky.feed.getAuthorFeed",
            &[("actor", actor), ("limit", limit.as_str())],
        )
        .await
    }

    async fn get_actor_likes(&self, actor: &str, limit: u32) -> Result<LikesPage> {
        let limit = limit.to_string();
        self.xrpc(
            "app.bsky.feed.getActorLikes",
            &[("actor", actor), ("limit", limit.as_str())],
        )
        .await
    }

    async fn get_posts(&self, uris: &[String]) -> Result<PostsPage> {
        if uris.is_empty() {
            return Ok(PostsPage::default());
        }
        let params: Vec<(&str, &str)> = uris.iter().map(|u| ("uris", u.as_str())).collect();
        self.xrpc("app.bsky.feed.getPosts", &params).await
    }
}
