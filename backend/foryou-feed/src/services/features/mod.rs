//! Feature construction and safety filtering.
//!
//! Sourcing signals and batch metadata merge into one [`FeatureRecord`] per
//! unique post URI. Deduplication is an explicit URI-keyed map where the
//! first insertion wins: the in-network signals are inserted before the
//! out-of-network ones, so a post discovered in-network stays in-network
//! even when a follow also liked it.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::models::{CandidateSignal, FeatureRecord, PostMetadata};

/// Merge sourcing signals with metadata, one record per unique URI.
///
/// The liked-by-follows counter applies to every record, in-network
/// included: a followed author's post that other follows liked carries that
/// social proof too.
pub fn build_features(
    in_network: &[CandidateSignal],
    out_of_network: &[CandidateSignal],
    liked_by_follows: &HashMap<String, u32>,
    metadata: &HashMap<String, PostMetadata>,
) -> Vec<FeatureRecord> {
    let mut by_uri: HashMap<String, FeatureRecord> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for signal in in_network.iter().chain(out_of_network.iter()) {
        match by_uri.entry(signal.post_uri.clone()) {
            Entry::Occupied(_) => {} // first write wins
            Entry::Vacant(slot) => {
                let mut record = FeatureRecord::new(signal, metadata.get(&signal.post_uri));
                record.liked_by_follows = liked_by_follows
                    .get(&signal.post_uri)
                    .copied()
                    .unwrap_or(0);
                slot.insert(record);
                order.push(signal.post_uri.clone());
            }
        }
    }

    order
        .into_iter()
        .filter_map(|uri| by_uri.remove(&uri))
        .collect()
}

/// Drop records whose labels intersect the blocked set.
///
/// Matching is exact and case-insensitive: whole label values only, never
/// substrings, whatever the `BLOCKED_LABELS` naming may suggest.
pub fn filter_safe(records: Vec<FeatureRecord>, blocked_labels: &[String]) -> Vec<FeatureRecord> {
    let blocked: HashSet<String> = blocked_labels.iter().map(|l| l.to_lowercase()).collect();
    if blocked.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| {
            !record
                .labels
                .iter()
                .any(|label| blocked.contains(&label.to_lowercase()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(uri: &str, in_network: bool) -> CandidateSignal {
        CandidateSignal {
            post_uri: uri.to_string(),
            in_network,
            author_id: None,
            indexed_at: None,
            liked_by_follows: 0,
        }
    }

    fn record_with_labels(uri: &str, labels: &[&str]) -> FeatureRecord {
        let mut record = FeatureRecord::new(&signal(uri, true), None);
        record.labels = labels.iter().map(|l| l.to_string()).collect();
        record
    }

    #[test]
    fn dedup_is_first_write_wins() {
        let in_network = vec![signal("at://p/1", true)];
        let out_of_network = vec![signal("at://p/1", false), signal("at://p/2", false)];

        let records = build_features(
            &in_network,
            &out_of_network,
            &HashMap::new(),
            &HashMap::new(),
        );

        assert_eq!(records.len(), 2);
        let first = records.iter().find(|r| r.post_uri == "at://p/1").unwrap();
        assert!(first.in_network, "in-network pass must win the conflict");
    }

    #[test]
    fn every_record_has_a_unique_uri() {
        let in_network = vec![signal("at://p/1", true), signal("at://p/1", true)];
        let out_of_network = vec![signal("at://p/1", false), signal("at://p/2", false)];

        let records = build_features(
            &in_network,
            &out_of_network,
            &HashMap::new(),
            &HashMap::new(),
        );

        let uris: HashSet<_> = records.iter().map(|r| r.post_uri.as_str()).collect();
        assert_eq!(uris.len(), records.len());
    }

    #[test]
    fn liked_by_count_applies_to_in_network_records_too() {
        let in_network = vec![signal("at://p/1", true)];
        let liked_by = HashMap::from([("at://p/1".to_string(), 2u32)]);

        let records = build_features(&in_network, &[], &liked_by, &HashMap::new());
        assert_eq!(records[0].liked_by_follows, 2);
    }

    #[test]
    fn missing_metadata_defaults_to_zero() {
        let in_network = vec![signal("at://p/1", true)];
        let records = build_features(&in_network, &[], &HashMap::new(), &HashMap::new());

        let record = &records[0];
        assert_eq!(record.like_count, 0);
        assert!(record.indexed_at.is_none());
        assert!(record.author_id.is_none());
        assert!(!record.is_reply);
    }

    #[test]
    fn metadata_fields_are_merged_in() {
        let in_network = vec![signal("at://p/1", true)];
        let metadata = HashMap::from([(
            "at://p/1".to_string(),
            PostMetadata {
                like_count: 7,
                repost_count: 3,
                reply_count: 1,
                indexed_at: Some(chrono::Utc::now()),
                author_id: Some("did:plc:author".to_string()),
                labels: vec!["meme".to_string()],
                is_reply: true,
            },
        )]);

        let records = build_features(&in_network, &[], &HashMap::new(), &metadata);
        let record = &records[0];
        assert_eq!(record.like_count, 7);
        assert_eq!(record.author_id.as_deref(), Some("did:plc:author"));
        assert!(record.is_reply);
    }

    #[test]
    fn filter_safe_is_exact_case_insensitive_match() {
        let blocked = vec!["nsfw".to_string(), "Porn".to_string()];
        let records = vec![
            record_with_labels("at://p/1", &["meme"]),
            record_with_labels("at://p/2", &["NSFW"]),
            record_with_labels("at://p/3", &["porn", "art"]),
            record_with_labels("at://p/4", &["nsfw-adjacent"]),
            record_with_labels("at://p/5", &[]),
        ];

        let safe = filter_safe(records, &blocked);
        let uris: Vec<_> = safe.iter().map(|r| r.post_uri.as_str()).collect();

        // "meme" does not intersect, and "nsfw-adjacent" is not a substring
        // match for "nsfw".
        assert_eq!(uris, vec!["at://p/1", "at://p/4", "at://p/5"]);
    }

    #[test]
    fn empty_blocked_set_keeps_everything() {
        let records = vec![record_with_labels("at://p/1", &["porn"])];
        let safe = filter_safe(records, &[]);
        assert_eq!(safe.len(), 1);
    }
}
