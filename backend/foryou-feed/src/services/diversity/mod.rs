//! Author diversity: cap how many feed slots one author may occupy.

use std::collections::HashMap;

use crate::models::FeatureRecord;

const UNKNOWN_AUTHOR: &str = "unknown";

pub struct DiversityLayer {
    per_author_max: usize,
}

impl DiversityLayer {
    pub fn new(per_author_max: usize) -> Self {
        Self { per_author_max }
    }

    /// Single left-to-right pass preserving relative order.
    ///
    /// An item is kept iff its author's running count is below the cap;
    /// over-cap items are dropped outright, never deferred, so the output
    /// may be shorter than the input. Items without an author share one
    /// bucket.
    pub fn enforce(&self, items: Vec<FeatureRecord>) -> Vec<FeatureRecord> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut kept: Vec<FeatureRecord> = Vec::with_capacity(items.len());

        for item in items {
            let author = item
                .author_id
                .clone()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
            let count = counts.entry(author).or_insert(0);
            if *count >= self.per_author_max {
                continue;
            }
            *count += 1;
            kept.push(item);
        }

        kept
    }
}
