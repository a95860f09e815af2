//! The full ranking pipeline, candidate recall through pagination.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, info};

use appview_client::AppView;

use crate::config::FeedConfig;
use crate::models::FeedPage;
use crate::services::diversity::DiversityLayer;
use crate::services::enrichment::MetadataEnricher;
use crate::services::features::{build_features, filter_safe};
use crate::services::mixing::mix;
use crate::services::pagination::{paginate, parse_cursor};
use crate::services::ranking::RankingLayer;
use crate::services::recall::RecallLayer;

/// Stateless per-request feed builder.
///
/// Nothing survives between calls: candidates, features, and ordering are
/// recomputed from live upstream state each time. Upstream failures degrade
/// to empty results at the smallest scope, so this never fails a request
/// short of a programming error.
pub struct FeedPipeline {
    recall: RecallLayer,
    enricher: MetadataEnricher,
    diversity: DiversityLayer,
    config: FeedConfig,
}

impl FeedPipeline {
    pub fn new(client: Arc<dyn AppView>, config: FeedConfig) -> Self {
        Self {
            recall: RecallLayer::new(Arc::clone(&client), config.clone()),
            enricher: MetadataEnricher::new(client, config.metadata_batch_cap),
            diversity: DiversityLayer::new(config.per_author_max),
            config,
        }
    }

    /// Build one page of the viewer's ranked feed.
    ///
    /// `limit` is assumed pre-clamped by the caller; it is not re-clamped
    /// here.
    pub async fn build_feed(
        &self,
        viewer: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> FeedPage {
        let started = Instant::now();
        let deadline = started + self.config.request_deadline();
        let offset = parse_cursor(cursor);

        let sourced = self.recall.recall(viewer, deadline).await;

        let uris = self
            .enricher
            .uri_union(&sourced.in_network, &sourced.out_of_network);
        let metadata = self.enricher.fetch_metadata(&uris, deadline).await;

        let records = build_features(
            &sourced.in_network,
            &sourced.out_of_network,
            &sourced.liked_by_follows,
            &metadata,
        );
        let candidate_count = records.len();
        let safe = filter_safe(records, &self.config.blocked_labels);
        let filtered_count = candidate_count - safe.len();

        let ranked = RankingLayer::rank(safe, Utc::now());

        // Enough items to cover the requested page plus any prior offset.
        let desired_total = (limit + offset).max(limit);
        let mixed = mix(&ranked, desired_total, self.config.in_network_share);
        let diverse = self.diversity.enforce(mixed);

        let page = paginate(&diverse, offset, limit);

        info!(
            viewer,
            candidates = candidate_count,
            label_filtered = filtered_count,
            page_len = page.uris.len(),
            offset,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "feed built"
        );
        debug!(viewer, next_cursor = ?page.next_cursor, "pagination state");

        page
    }
}
