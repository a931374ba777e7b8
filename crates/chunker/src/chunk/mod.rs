//! Recursive chunking pipeline.
//!
//! One pass per rule level:
//! - Split the span into raw pieces (`splitter`)
//! - Estimate each piece's token count (`crate::estimate`)
//! - Merge pieces into budget-sized spans (`merging`)
//! - Emit spans that fit, recurse into the next level for those that do not
//! - Resolve emitted spans to offsets in the original text (`materialize`)

mod materialize;
mod merging;
mod pipeline;
mod splitter;

pub use materialize::{resolve_offsets, ChunkMaterializer};
pub use merging::{merge_boundary, merge_splits, prefix_sums, MergedSpans};
pub use pipeline::RecursiveChunker;
pub use splitter::LevelSplitter;
