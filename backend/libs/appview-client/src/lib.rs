//! Async client for the Bluesky AppView public API.
//!
//! Covers the four read-only operations the feed generator consumes:
//! follow-list pagination, per-author feeds, per-actor likes, and batched
//! post hydration. The [`AppView`] trait is the seam the ranking pipeline
//! is written against; [`AppViewClient`] is the HTTP implementation.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AppView, AppViewClient};
pub use error::AppViewError;
pub use types::{
    Actor, AuthorFeedPage, FeedItem, FollowsPage, LikeRecord, LikeSubject, LikesPage, PostLabel,
    PostRecord, PostView, PostsPage,
};

pub type Result<T> = std::result::Result<T, AppViewError>;
