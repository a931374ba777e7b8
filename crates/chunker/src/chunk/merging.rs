//! Size-driven merging of raw pieces.
//!
//! Pieces are grouped greedily: from the first unmerged piece, the group
//! extends to the farthest piece whose cumulative token count still fits
//! the budget. The boundary is found with a lower-bound search over prefix
//! sums.

use chonk_core::{ChunkError, ChunkResult};

/// Pieces joined into budget-sized groups, with their token counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedSpans {
    pub texts: Vec<String>,
    pub token_counts: Vec<usize>,
}

impl MergedSpans {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Prefix sums of `token_counts`, with a leading zero. When
/// `combine_whitespace` is set every piece also pays one token for the
/// space it will be joined with.
pub fn prefix_sums(token_counts: &[usize], combine_whitespace: bool) -> Vec<usize> {
    let join_cost = usize::from(combine_whitespace);
    let mut sums = Vec::with_capacity(token_counts.len() + 1);
    sums.push(0usize);
    let mut total = 0usize;
    for &count in token_counts {
        total = total.saturating_add(count).saturating_add(join_cost);
        sums.push(total);
    }
    sums
}

/// Exclusive end of the group starting at `current`.
///
/// `prefix` holds `n + 1` non-decreasing sums for `n` pieces. The result is
/// the largest index whose sum stays below `prefix[current] + budget`,
/// clamped to `n`, and always at least `current + 1` so an oversized piece
/// still forms a group of its own.
pub fn merge_boundary(prefix: &[usize], current: usize, budget: usize) -> usize {
    let pieces = prefix.len().saturating_sub(1);
    let target = prefix[current].saturating_add(budget);
    let lower_bound = current + prefix[current..].partition_point(|&sum| sum < target);
    let index = lower_bound.saturating_sub(1).min(pieces);

    if index <= current {
        current + 1
    } else {
        index
    }
}

/// Merge `splits` into groups of at most `chunk_size` tokens.
///
/// Groups are joined with a single space when `combine_whitespace` is set,
/// otherwise concatenated directly.
pub fn merge_splits(
    splits: Vec<String>,
    token_counts: Vec<usize>,
    chunk_size: usize,
    combine_whitespace: bool,
) -> ChunkResult<MergedSpans> {
    if splits.len() != token_counts.len() {
        return Err(ChunkError::MergeMismatch {
            splits: splits.len(),
            token_counts: token_counts.len(),
        });
    }

    if splits.is_empty() {
        return Ok(MergedSpans::default());
    }

    // Nothing can be combined
    if token_counts.iter().all(|&count| count > chunk_size) {
        return Ok(MergedSpans {
            texts: splits,
            token_counts,
        });
    }

    let prefix = prefix_sums(&token_counts, combine_whitespace);
    let separator = if combine_whitespace { " " } else { "" };

    let mut merged = MergedSpans::default();
    let mut current = 0;

    while current < splits.len() {
        let index = merge_boundary(&prefix, current, chunk_size);

        merged.texts.push(splits[current..index].join(separator));
        merged.token_counts.push(prefix[index] - prefix[current]);
        current = index;
    }

    tracing::trace!(
        "Merged {} pieces into {} spans (chunk_size: {})",
        splits.len(),
        merged.len(),
        chunk_size
    );

    Ok(merged)
}
