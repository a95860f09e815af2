use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appview_client::AppViewClient;
use foryou_feed::config::Config;
use foryou_feed::handlers::{get_feed_skeleton, health, service_info, FeedHandlerState};
use foryou_feed::services::FeedPipeline;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Arc::new(Config::from_env());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Arc::new(AppViewClient::with_timeout(
        &config.appview.base_url,
        Duration::from_secs(config.appview.request_timeout_secs),
    ));
    let pipeline = Arc::new(FeedPipeline::new(client, config.feed.clone()));

    let port = config.app.port;
    info!(port, appview = %config.appview.base_url, "feed generator starting");

    let state_config = Arc::clone(&config);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(FeedHandlerState {
                pipeline: Arc::clone(&pipeline),
                config: Arc::clone(&state_config),
            }))
            .service(get_feed_skeleton)
            .service(health)
            .service(service_info)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
