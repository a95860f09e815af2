//! HTTP surface: the feed skeleton endpoint plus health and info routes.

use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::{FeedSkeleton, SkeletonItem};
use crate::security::is_allowed;
use crate::services::FeedPipeline;

pub struct FeedHandlerState {
    pub pipeline: Arc<FeedPipeline>,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
pub struct FeedSkeletonQuery {
    #[serde(default)]
    pub viewer: String,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Feed skeleton endpoint expected by the AppView.
#[get("/xrpc/app.bsky.feed.getFeedSkeleton")]
pub async fn get_feed_skeleton(
    state: web::Data<FeedHandlerState>,
    query: web::Query<FeedSkeletonQuery>,
) -> Result<HttpResponse> {
    let page_size = state.config.feed.page_size;
    let limit = query.limit.unwrap_or(page_size).clamp(1, page_size) as usize;

    if !is_allowed(&state.config.access, &query.viewer) {
        // Empty 200 rather than 403: feed clients retry aggressively on
        // error statuses.
        info!(viewer = %query.viewer, "viewer not whitelisted");
        return Ok(HttpResponse::Ok().json(FeedSkeleton {
            feed: Vec::<SkeletonItem>::new(),
            cursor: None,
            message: Some("viewer not whitelisted".to_string()),
        }));
    }

    let page = state
        .pipeline
        .build_feed(&query.viewer, limit, query.cursor.as_deref())
        .await;

    Ok(HttpResponse::Ok().json(FeedSkeleton::from(page)))
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

#[get("/")]
pub async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": "foryou-feed",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/xrpc/app.bsky.feed.getFeedSkeleton", "/health"],
    }))
}
