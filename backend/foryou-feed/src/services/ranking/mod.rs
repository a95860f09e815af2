//! Hand-tuned relevance scoring.
//!
//! One scalar per candidate: a base of in-network bonus, social proof from
//! follows, and log-damped engagement, discounted by exponential recency
//! decay. Purely heuristic; there is no model behind it.

use chrono::{DateTime, Utc};

use crate::models::FeatureRecord;

/// Decay rate per hour of age; half-life is roughly 9.9 hours.
const DECAY_PER_HOUR: f64 = 0.07;
/// Age assigned to posts with no timestamp, pushing freshness to zero.
const UNDATED_AGE_HOURS: f64 = 1e6;
const IN_NETWORK_BONUS: f64 = 1.6;
const LIKED_BY_FOLLOWS_WEIGHT: f64 = 1.2;
const LIKED_BY_FOLLOWS_CAP: u32 = 3;
const REPOSTED_BY_FOLLOWS_WEIGHT: f64 = 1.0;
const REPOSTED_BY_FOLLOWS_CAP: u32 = 2;
const ENGAGEMENT_WEIGHT: f64 = 0.3;
const REPOST_COUNT_WEIGHT: f64 = 0.7;
const REPLY_COUNT_WEIGHT: f64 = 0.5;
const REPLY_PENALTY: f64 = 0.2;

/// Hours elapsed since `at`, clamped to zero for clock skew.
fn hours_since(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match at {
        Some(at) => {
            let millis = now.signed_duration_since(at).num_milliseconds() as f64;
            (millis / 3_600_000.0).max(0.0)
        }
        None => UNDATED_AGE_HOURS,
    }
}

/// Score one candidate against the given wall-clock time.
///
/// Always finite: age is clamped non-negative, the engagement term is
/// `ln(1 + x)` of non-negative counts, and all weights are constants.
/// `reposted_by_follows` is never populated by any sourcer today, so its
/// term is inert; it is kept for the day a reposts signal exists.
pub fn score_record(record: &FeatureRecord, now: DateTime<Utc>) -> f64 {
    let age_hours = hours_since(record.indexed_at, now);
    let freshness = (-DECAY_PER_HOUR * age_hours).exp();

    let social = f64::from(record.liked_by_follows.min(LIKED_BY_FOLLOWS_CAP))
        * LIKED_BY_FOLLOWS_WEIGHT
        + f64::from(record.reposted_by_follows.min(REPOSTED_BY_FOLLOWS_CAP))
            * REPOSTED_BY_FOLLOWS_WEIGHT;

    let engagement = (1.0
        + record.like_count as f64
        + record.repost_count as f64 * REPOST_COUNT_WEIGHT
        + record.reply_count as f64 * REPLY_COUNT_WEIGHT)
        .ln();

    let base = if record.in_network { IN_NETWORK_BONUS } else { 0.0 }
        + social
        + ENGAGEMENT_WEIGHT * engagement;
    let penalty = if record.is_reply { REPLY_PENALTY } else { 0.0 };

    (base - penalty) * freshness
}

pub struct RankingLayer;

impl RankingLayer {
    /// Score every record and sort by score, highest first.
    pub fn rank(mut records: Vec<FeatureRecord>, now: DateTime<Utc>) -> Vec<FeatureRecord> {
        for record in &mut records {
            record.score = score_record(record, now);
        }
        // NaN cannot occur (scores are finite); Equal is a safe fallback.
        records.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records
    }
}
