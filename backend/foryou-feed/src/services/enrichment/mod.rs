//! Metadata enrichment: one batched post lookup for all candidates.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use appview_client::AppView;

use crate::models::{CandidateSignal, PostMetadata};

pub struct MetadataEnricher {
    client: Arc<dyn AppView>,
    batch_cap: usize,
}

impl MetadataEnricher {
    pub fn new(client: Arc<dyn AppView>, batch_cap: usize) -> Self {
        Self { client, batch_cap }
    }

    /// Union of candidate URIs for the batch lookup.
    ///
    /// In-network URIs come first, each side deduplicated, then the whole
    /// list is truncated to the cap. Listing in-network first means
    /// truncation preferentially drops out-of-network URIs.
    pub fn uri_union(
        &self,
        in_network: &[CandidateSignal],
        out_of_network: &[CandidateSignal],
    ) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut uris: Vec<String> = Vec::new();

        for signal in in_network.iter().chain(out_of_network.iter()) {
            if seen.insert(signal.post_uri.as_str()) {
                uris.push(signal.post_uri.clone());
            }
        }

        uris.truncate(self.batch_cap);
        uris
    }

    /// Batch-fetch metadata for the given URIs.
    ///
    /// A failed or deadline-expired batch yields an empty map; every
    /// candidate then scores on default metadata instead of aborting the
    /// request.
    pub async fn fetch_metadata(
        &self,
        uris: &[String],
        deadline: Instant,
    ) -> HashMap<String, PostMetadata> {
        if uris.is_empty() {
            return HashMap::new();
        }

        let page = match timeout_at(deadline, self.client.get_posts(uris)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!(uri_count = uris.len(), error = %e, "metadata batch fetch failed");
                return HashMap::new();
            }
            Err(_) => {
                warn!(uri_count = uris.len(), "deadline hit before metadata batch");
                return HashMap::new();
            }
        };

        let mut by_uri = HashMap::with_capacity(page.posts.len());
        for post in page.posts {
            let Some(uri) = post.uri.clone() else { continue };
            by_uri.insert(
                uri,
                PostMetadata {
                    like_count: post.like_count.unwrap_or(0),
                    repost_count: post.repost_count.unwrap_or(0),
                    reply_count: post.reply_count.unwrap_or(0),
                    indexed_at: post.indexed_or_created_at(),
                    author_id: post.author.as_ref().and_then(|a| a.did.clone()),
                    labels: post.labels.iter().filter_map(|l| l.val.clone()).collect(),
                    is_reply: post.is_reply(),
                },
            );
        }

        debug!(
            requested = uris.len(),
            hydrated = by_uri.len(),
            "metadata batch complete"
        );
        by_uri
    }
}
