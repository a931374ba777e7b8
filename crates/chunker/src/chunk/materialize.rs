//! Turning merged spans into chunks with offsets into the original text.

use crate::types::RecursiveChunk;

/// Locate `text` in `full_text` at or after byte `search_from`.
///
/// Returns the `(start, end)` byte range, or `None` when the text does not
/// occur there (for example because delimiters were discarded).
pub fn resolve_offsets(text: &str, full_text: &str, search_from: usize) -> Option<(usize, usize)> {
    let start = search_from + full_text.get(search_from..)?.find(text)?;
    Some((start, start + text.len()))
}

/// Builds chunks for one top-level `chunk` call.
///
/// Keeps a cursor that only moves forward, so repeated text resolves to
/// successive occurrences instead of snapping to the first one.
pub struct ChunkMaterializer<'a> {
    full_text: &'a str,
    cursor: usize,
    unresolved: usize,
}

impl<'a> ChunkMaterializer<'a> {
    pub fn new(full_text: &'a str) -> Self {
        Self {
            full_text,
            cursor: 0,
            unresolved: 0,
        }
    }

    /// Create a chunk, falling back to `(0, 0)` offsets if `text` cannot be
    /// found past the cursor.
    pub fn materialize(
        &mut self,
        text: String,
        token_count: usize,
        level: usize,
    ) -> RecursiveChunk {
        let (start_index, end_index) = match resolve_offsets(&text, self.full_text, self.cursor) {
            Some((start, end)) => {
                self.cursor = end;
                (start, end)
            }
            None => {
                self.unresolved += 1;
                tracing::warn!(
                    level,
                    cursor = self.cursor,
                    "Could not locate chunk text {:?} in the original text; setting offsets to 0",
                    text
                );
                (0, 0)
            }
        };

        RecursiveChunk {
            text,
            start_index,
            end_index,
            token_count,
            level,
        }
    }

    /// Byte position the next search starts from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of chunks whose offsets could not be resolved.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }
}
