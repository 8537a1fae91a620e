//! Resume information extraction
//!
//! Heuristic stages (patterns, entity tagging, classification, aggregation)
//! run synchronously over the raw text. An optional retrieval-augmented stage
//! adds candidates from an embedding index and a completion model.

pub mod aggregator;
pub mod chunker;
pub mod classifier;
pub mod enhancement;
pub mod entities;
pub mod parser;
pub mod patterns;
pub mod record;

pub use enhancement::{Completer, Embedder, EnhancementStatus, RagEnhancer};
pub use entities::{EntityLabel, EntityTagger, GazetteerTagger, TaggedSpan};
pub use parser::{ParseOutcome, ResumeParser};
pub use record::{ContactInfo, ResumeRecord};
