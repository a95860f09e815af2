//! Handler-level tests for the feed skeleton endpoint.

use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;

use appview_client::{AppView, AuthorFeedPage, FollowsPage, LikesPage, PostsPage};
use foryou_feed::config::Config;
use foryou_feed::handlers::{get_feed_skeleton, health, FeedHandlerState};
use foryou_feed::services::FeedPipeline;

/// Upstream with no data at all; every call succeeds with an empty page.
struct EmptyAppView;

#[async_trait]
impl AppView for EmptyAppView {
    async fn get_follows(
        &self,
        _actor: &str,
        _limit: u32,
        _cursor: Option<&str>,
    ) -> appview_client::Result<FollowsPage> {
        Ok(FollowsPage::default())
    }
    async fn get_author_feed(
        &self,
        _actor: &str,
        _limit: u32,
    ) -> appview_client::Result<AuthorFeedPage> {
        Ok(AuthorFeedPage::default())
    }
    async fn get_actor_likes(
        &self,
        _actor: &str,
        _limit: u32,
    ) -> appview_client::Result<LikesPage> {
        Ok(LikesPage::default())
    }
    async fn get_posts(&self, _uris: &[String]) -> appview_client::Result<PostsPage> {
        Ok(PostsPage::default())
    }
}

fn state_with(mut mutate: impl FnMut(&mut Config)) -> FeedHandlerState {
    let mut config = Config::from_env();
    config.access.whitelist.clear();
    config.access.admin.clear();
    mutate(&mut config);
    let config = Arc::new(config);
    let pipeline = Arc::new(FeedPipeline::new(
        Arc::new(EmptyAppView),
        config.feed.clone(),
    ));
    FeedHandlerState { pipeline, config }
}

#[actix_web::test]
async fn skeleton_endpoint_returns_empty_feed_for_unknown_viewer() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(|_| {})))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/xrpc/app.bsky.feed.getFeedSkeleton?viewer=did:plc:nobody&limit=5")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["feed"].as_array().unwrap().len(), 0);
    assert!(body.get("cursor").is_none());
}

#[actix_web::test]
async fn non_whitelisted_viewer_gets_empty_ok_with_message() {
    let state = state_with(|config| {
        config.access.whitelist = vec!["did:plc:allowed".to_string()];
    });
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/xrpc/app.bsky.feed.getFeedSkeleton?viewer=did:plc:stranger")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["feed"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "viewer not whitelisted");
}

#[actix_web::test]
async fn missing_viewer_param_is_denied() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(|_| {})))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/xrpc/app.bsky.feed.getFeedSkeleton")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "viewer not whitelisted");
}

#[actix_web::test]
async fn health_endpoint_reports_ok() {
    let app = test::init_service(App::new().service(health)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}
