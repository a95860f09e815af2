pub mod diversity;
pub mod enrichment;
pub mod features;
pub mod mixing;
pub mod pagination;
pub mod pipeline;
pub mod ranking;
pub mod recall;

pub use diversity::DiversityLayer;
pub use enrichment::MetadataEnricher;
pub use pipeline::FeedPipeline;
pub use ranking::RankingLayer;
pub use recall::{RecallLayer, SourcedCandidates};
