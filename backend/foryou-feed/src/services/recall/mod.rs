//! Candidate recall: the viewer's follow graph and the posts it surfaces.
//!
//! Two sourcing passes run per follow: the author-feed pass yields in-network
//! candidates (the follow's own top-level posts), the likes pass yields
//! out-of-network candidates (posts one or more follows liked). Every
//! upstream failure degrades to an empty page for that account only, so one
//! bad account never suppresses the rest of the graph.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use appview_client::AppView;

use crate::config::FeedConfig;
use crate::models::{CandidateSignal, FollowedAccount};

const FOLLOWS_PAGE_MAX: u32 = 100;

/// Everything the sourcing passes gathered for one request.
#[derive(Debug, Default)]
pub struct SourcedCandidates {
    pub in_network: Vec<CandidateSignal>,
    pub out_of_network: Vec<CandidateSignal>,
    /// post URI -> number of distinct follows who liked it.
    pub liked_by_follows: HashMap<String, u32>,
}

pub struct RecallLayer {
    client: Arc<dyn AppView>,
    config: FeedConfig,
}

impl RecallLayer {
    pub fn new(client: Arc<dyn AppView>, config: FeedConfig) -> Self {
        Self { client, config }
    }

    /// Run the full recall stage: follows, then both sourcing passes.
    ///
    /// `deadline` bounds the whole stage. The fan-out writes into shared
    /// accumulators, so hitting the deadline keeps whatever was already
    /// gathered instead of discarding the request.
    pub async fn recall(&self, viewer: &str, deadline: Instant) -> SourcedCandidates {
        let follows = self.collect_follows(viewer, deadline).await;
        debug!(viewer, follow_count = follows.len(), "follow graph collected");

        let in_network = self.source_in_network(&follows, deadline).await;
        let (out_of_network, liked_by_follows) =
            self.source_out_of_network(&follows, deadline).await;

        debug!(
            viewer,
            in_network = in_network.len(),
            out_of_network = out_of_network.len(),
            "candidate sourcing complete"
        );

        SourcedCandidates {
            in_network,
            out_of_network,
            liked_by_follows,
        }
    }

    /// Page through the viewer's follow list up to the configured cap.
    ///
    /// Stops on: cap reached, upstream reports no continuation cursor, an
    /// empty page, a page failure (treated as an empty page), or the
    /// deadline passing between pages. No retries.
    pub async fn collect_follows(&self, viewer: &str, deadline: Instant) -> Vec<FollowedAccount> {
        let mut follows: Vec<FollowedAccount> = Vec::new();
        let mut cursor: Option<String> = None;

        while follows.len() < self.config.max_follows {
            if Instant::now() >= deadline {
                warn!(viewer, "deadline hit while paging follows");
                break;
            }

            let remaining = (self.config.max_follows - follows.len()) as u32;
            let page_size = remaining.min(FOLLOWS_PAGE_MAX);

            let page = match self
                .client
                .get_follows(viewer, page_size, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(viewer, error = %e, "follows page fetch failed");
                    break;
                }
            };

            let items = page.follows;
            for actor in &items {
                // Records without a DID are malformed; skip them.
                if let Some(did) = &actor.did {
                    follows.push(FollowedAccount {
                        id: did.clone(),
                        handle: actor.handle.clone(),
                    });
                }
            }

            if page.cursor.is_none() || items.is_empty() {
                break;
            }
            cursor = page.cursor;
        }

        follows.truncate(self.config.max_follows);
        follows
    }

    /// Fetch each follow's recent authored posts, keeping only non-replies.
    pub async fn source_in_network(
        &self,
        follows: &[FollowedAccount],
        deadline: Instant,
    ) -> Vec<CandidateSignal> {
        let by_uri: Arc<DashMap<String, CandidateSignal>> = Arc::new(DashMap::new());

        let fan_out = stream::iter(follows.to_vec())
            .map(|account| {
                let client = Arc::clone(&self.client);
                let by_uri = Arc::clone(&by_uri);
                let limit = self.config.per_follow_feed_limit;
                async move {
                    let page = match client.get_author_feed(&account.id, limit).await {
                        Ok(page) => page,
                        Err(e) => {
                            warn!(account = %account.id, error = %e, "author feed fetch failed");
                            return;
                        }
                    };
                    for item in page.feed {
                        let Some(post) = item.post else { continue };
                        if post.is_reply() {
                            continue;
                        }
                        let Some(uri) = post.uri.clone() else { continue };
                        by_uri.entry(uri.clone()).or_insert(CandidateSignal {
                            post_uri: uri,
                            in_network: true,
                            author_id: post.author.as_ref().and_then(|a| a.did.clone()),
                            indexed_at: post.indexed_or_created_at(),
                            liked_by_follows: 0,
                        });
                    }
                }
            })
            .buffer_unordered(self.config.fetch_concurrency.max(1))
            .collect::<Vec<()>>();

        if timeout_at(deadline, fan_out).await.is_err() {
            warn!("deadline hit during in-network sourcing; keeping partial results");
        }

        Arc::try_unwrap(by_uri)
            .map(|map| map.into_iter().map(|(_, v)| v).collect())
            .unwrap_or_else(|map| map.iter().map(|e| e.value().clone()).collect())
    }

    /// Fetch each follow's recent likes and count distinct follows per URI.
    pub async fn source_out_of_network(
        &self,
        follows: &[FollowedAccount],
        deadline: Instant,
    ) -> (Vec<CandidateSignal>, HashMap<String, u32>) {
        let counts: Arc<DashMap<String, u32>> = Arc::new(DashMap::new());

        let fan_out = stream::iter(follows.to_vec())
            .map(|account| {
                let client = Arc::clone(&self.client);
                let counts = Arc::clone(&counts);
                let limit = self.config.per_follow_likes_limit;
                async move {
                    let page = match client.get_actor_likes(&account.id, limit).await {
                        Ok(page) => page,
                        Err(e) => {
                            warn!(account = %account.id, error = %e, "likes fetch failed");
                            return;
                        }
                    };
                    // One follow contributes at most one count per URI.
                    let mut liked_here: HashSet<String> = HashSet::new();
                    for record in &page.records {
                        if let Some(uri) = record.liked_post_uri() {
                            liked_here.insert(uri.to_string());
                        }
                    }
                    for uri in liked_here {
                        *counts.entry(uri).or_insert(0) += 1;
                    }
                }
            })
            .buffer_unordered(self.config.fetch_concurrency.max(1))
            .collect::<Vec<()>>();

        if timeout_at(deadline, fan_out).await.is_err() {
            warn!("deadline hit during likes sourcing; keeping partial results");
        }

        let liked_by: HashMap<String, u32> = counts
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();

        let signals = liked_by
            .iter()
            .map(|(uri, count)| CandidateSignal {
                post_uri: uri.clone(),
                in_network: false,
                author_id: None,
                indexed_at: None,
                liked_by_follows: *count,
            })
            .collect();

        (signals, liked_by)
    }
}
