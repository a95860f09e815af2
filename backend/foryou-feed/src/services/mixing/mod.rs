//! In/out-of-network mixing over the score-sorted candidate list.

use std::collections::HashSet;

use crate::models::FeatureRecord;

/// Interleave top in-network and out-of-network candidates at the target
/// share, then backfill shortfalls from the overall ranked list.
///
/// `sorted` must already be in score-descending order. The result is the
/// first `floor(desired_total * in_network_share)` in-network items followed
/// by the out-of-network quota; if either side runs short, the remaining
/// slots are filled by walking `sorted` in order and appending anything not
/// already present.
pub fn mix(
    sorted: &[FeatureRecord],
    desired_total: usize,
    in_network_share: f64,
) -> Vec<FeatureRecord> {
    let in_quota = (desired_total as f64 * in_network_share).floor() as usize;
    let out_quota = desired_total.saturating_sub(in_quota);

    let mut combined: Vec<FeatureRecord> = Vec::with_capacity(desired_total);
    combined.extend(
        sorted
            .iter()
            .filter(|r| r.in_network)
            .take(in_quota)
            .cloned(),
    );
    combined.extend(
        sorted
            .iter()
            .filter(|r| !r.in_network)
            .take(out_quota)
            .cloned(),
    );

    if combined.len() < desired_total {
        let mut present: HashSet<String> =
            combined.iter().map(|r| r.post_uri.clone()).collect();
        for record in sorted {
            if combined.len() >= desired_total {
                break;
            }
            if !present.insert(record.post_uri.clone()) {
                continue;
            }
            combined.push(record.clone());
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uri: &str, in_network: bool, score: f64) -> FeatureRecord {
        FeatureRecord {
            post_uri: uri.to_string(),
            in_network,
            author_id: None,
            indexed_at: None,
            like_count: 0,
            repost_count: 0,
            reply_count: 0,
            liked_by_follows: 0,
            reposted_by_follows: 0,
            is_reply: false,
            labels: Vec::new(),
            score,
        }
    }

    fn pool(in_count: usize, out_count: usize) -> Vec<FeatureRecord> {
        let mut items: Vec<FeatureRecord> = Vec::new();
        for i in 0..in_count {
            items.push(record(&format!("at://in/{i}"), true, 100.0 - i as f64));
        }
        for i in 0..out_count {
            items.push(record(&format!("at://out/{i}"), false, 50.0 - i as f64));
        }
        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        items
    }

    #[test]
    fn even_split_when_both_sides_have_enough() {
        let sorted = pool(20, 20);
        let mixed = mix(&sorted, 10, 0.5);

        assert_eq!(mixed.len(), 10);
        assert_eq!(mixed.iter().filter(|r| r.in_network).count(), 5);
        // In-network block comes first.
        assert!(mixed[..5].iter().all(|r| r.in_network));
    }

    #[test]
    fn backfills_when_in_network_runs_short() {
        let sorted = pool(3, 20);
        let mixed = mix(&sorted, 10, 0.5);

        assert_eq!(mixed.len(), 10);
        assert_eq!(mixed.iter().filter(|r| r.in_network).count(), 3);
        assert_eq!(mixed.iter().filter(|r| !r.in_network).count(), 7);
    }

    #[test]
    fn backfill_never_duplicates_uris() {
        let sorted = pool(2, 4);
        let mixed = mix(&sorted, 6, 0.5);

        let uris: HashSet<_> = mixed.iter().map(|r| r.post_uri.as_str()).collect();
        assert_eq!(uris.len(), mixed.len());
    }

    #[test]
    fn returns_everything_when_pool_is_too_small() {
        let sorted = pool(1, 2);
        let mixed = mix(&sorted, 10, 0.5);
        assert_eq!(mixed.len(), 3);
    }

    #[test]
    fn share_of_zero_yields_out_of_network_first() {
        let sorted = pool(5, 5);
        let mixed = mix(&sorted, 4, 0.0);
        assert!(mixed.iter().all(|r| !r.in_network));
    }
}
