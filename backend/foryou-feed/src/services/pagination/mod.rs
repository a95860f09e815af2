//! Offset-cursor pagination over the final ranked list.
//!
//! The cursor is the decimal string of an offset into the ranked list. The
//! whole candidate pool is recomputed from live upstream state on every
//! call, so the cursor is best-effort continuation, not a snapshot: items
//! can shift, repeat, or be skipped between pages fetched at different
//! times.

use crate::models::{FeatureRecord, FeedPage};

/// Offset encoded by the cursor; absent or non-numeric means the start.
pub fn parse_cursor(cursor: Option<&str>) -> usize {
    cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0)
}

/// Slice one page out of the ranked list and emit the continuation cursor.
///
/// `next_cursor` is `offset + limit` iff more items remain past the page.
pub fn paginate(items: &[FeatureRecord], offset: usize, limit: usize) -> FeedPage {
    let start = offset.min(items.len());
    let end = offset.saturating_add(limit).min(items.len());

    let uris = items[start..end]
        .iter()
        .map(|r| r.post_uri.clone())
        .collect();
    let next_cursor = if items.len() > offset.saturating_add(limit) {
        Some((offset + limit).to_string())
    } else {
        None
    };

    FeedPage { uris, next_cursor }
}
