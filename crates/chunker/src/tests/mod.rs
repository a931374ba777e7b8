//! Cross-module tests for the chunking pipeline.

mod end_to_end;
