//! Rule and chunk type definitions.

use chonk_core::{ChunkError, ChunkResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a delimiter ends up after a split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeDelim {
    /// Keep the delimiter at the end of the preceding piece
    #[default]
    Prev,
    /// Keep the delimiter at the start of the following piece
    Next,
    /// Drop the delimiter
    None,
}

/// One stage of the recursive splitting pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLevel", into = "RawLevel")]
pub enum RecursiveLevel {
    /// Split on single spaces; pieces are rejoined with a space when merged
    Whitespace,

    /// Split on literal delimiters, applied in declaration order
    Delimiters {
        delimiters: Vec<String>,
        include_delim: IncludeDelim,
    },

    /// Slice raw tokenizer output into windows of `chunk_size` tokens
    TokenWindow,
}

impl RecursiveLevel {
    /// Build a validated delimiter level.
    pub fn delimiters<I, S>(delimiters: I, include_delim: IncludeDelim) -> ChunkResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let level = RecursiveLevel::Delimiters {
            delimiters: delimiters.into_iter().map(Into::into).collect(),
            include_delim,
        };
        level.validate()?;
        Ok(level)
    }

    /// Check the level's delimiters are usable.
    pub fn validate(&self) -> ChunkResult<()> {
        if let RecursiveLevel::Delimiters { delimiters, .. } = self {
            if delimiters.is_empty() {
                return Err(ChunkError::InvalidRule(
                    "delimiter level needs at least one delimiter".to_string(),
                ));
            }
            for delimiter in delimiters {
                if delimiter.is_empty() {
                    return Err(ChunkError::InvalidRule(
                        "delimiters cannot be empty strings".to_string(),
                    ));
                }
                if delimiter == " " {
                    return Err(ChunkError::InvalidRule(
                        "a single space delimiter is whitespace mode; use a whitespace level"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether this level bounds piece size regardless of input.
    pub fn is_bounding(&self) -> bool {
        matches!(self, RecursiveLevel::TokenWindow)
    }
}

impl fmt::Display for RecursiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecursiveLevel::Whitespace => write!(f, "whitespace"),
            RecursiveLevel::Delimiters {
                delimiters,
                include_delim,
            } => write!(f, "delimiters({:?}, include_delim={:?})", delimiters, include_delim),
            RecursiveLevel::TokenWindow => write!(f, "token-window"),
        }
    }
}

/// Serialized shape of a level: mode is implied by which fields are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delimiters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    whitespace: bool,
    #[serde(default)]
    include_delim: IncludeDelim,
}

impl TryFrom<RawLevel> for RecursiveLevel {
    type Error = ChunkError;

    fn try_from(raw: RawLevel) -> Result<Self, Self::Error> {
        match (raw.delimiters, raw.whitespace) {
            (Some(_), true) => Err(ChunkError::InvalidRule(
                "cannot use whitespace and delimiters on the same level".to_string(),
            )),
            (Some(delimiters), false) => RecursiveLevel::delimiters(delimiters, raw.include_delim),
            (None, true) => Ok(RecursiveLevel::Whitespace),
            (None, false) => Ok(RecursiveLevel::TokenWindow),
        }
    }
}

impl From<RecursiveLevel> for RawLevel {
    fn from(level: RecursiveLevel) -> Self {
        match level {
            RecursiveLevel::Whitespace => RawLevel {
                whitespace: true,
                ..Default::default()
            },
            RecursiveLevel::Delimiters {
                delimiters,
                include_delim,
            } => RawLevel {
                delimiters: Some(delimiters),
                whitespace: false,
                include_delim,
            },
            RecursiveLevel::TokenWindow => RawLevel::default(),
        }
    }
}

/// Ordered rule levels; index is the recursion level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RecursiveLevel>", into = "Vec<RecursiveLevel>")]
pub struct RecursiveRules {
    levels: Vec<RecursiveLevel>,
}

impl RecursiveRules {
    /// Build a rule set, validating every level.
    pub fn new(levels: Vec<RecursiveLevel>) -> ChunkResult<Self> {
        if levels.is_empty() {
            return Err(ChunkError::InvalidRule(
                "rule set needs at least one level".to_string(),
            ));
        }
        for (index, level) in levels.iter().enumerate() {
            level
                .validate()
                .map_err(|e| ChunkError::InvalidRule(format!("level {}: {}", index, e)))?;
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, level: usize) -> Option<&RecursiveLevel> {
        self.levels.get(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecursiveLevel> {
        self.levels.iter()
    }

    /// True when the last level always bounds chunk size, so recursion
    /// never falls through to the rules-exhausted path.
    pub fn is_bounded(&self) -> bool {
        self.levels.last().is_some_and(RecursiveLevel::is_bounding)
    }
}

impl Default for RecursiveRules {
    /// Paragraphs, sentences, pauses, words, then raw tokens.
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            levels: vec![
                RecursiveLevel::Delimiters {
                    delimiters: owned(&["\n\n", "\r\n", "\n", "\r"]),
                    include_delim: IncludeDelim::Prev,
                },
                RecursiveLevel::Delimiters {
                    delimiters: owned(&[". ", "! ", "? "]),
                    include_delim: IncludeDelim::Prev,
                },
                RecursiveLevel::Delimiters {
                    delimiters: owned(&[
                        "{", "}", "\"", "[", "]", "<", ">", "(", ")", ":", ";", ",", "—", "|",
                        "~", "-", "...", "`", "'",
                    ]),
                    include_delim: IncludeDelim::Prev,
                },
                RecursiveLevel::Whitespace,
                RecursiveLevel::TokenWindow,
            ],
        }
    }
}

impl TryFrom<Vec<RecursiveLevel>> for RecursiveRules {
    type Error = ChunkError;

    fn try_from(levels: Vec<RecursiveLevel>) -> Result<Self, Self::Error> {
        RecursiveRules::new(levels)
    }
}

impl From<RecursiveRules> for Vec<RecursiveLevel> {
    fn from(rules: RecursiveRules) -> Self {
        rules.levels
    }
}

/// A final chunk with its offsets into the original text.
///
/// `start_index`/`end_index` are UTF-8 byte offsets. Both are `0` when the
/// chunk text could not be located in the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveChunk {
    pub text: String,
    pub start_index: usize,
    pub end_index: usize,
    pub token_count: usize,
    pub level: usize,
}

impl RecursiveChunk {
    /// Length of the chunk text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the offsets point at this chunk's text.
    pub fn is_resolved(&self) -> bool {
        self.start_index.checked_add(self.text.len()) == Some(self.end_index)
            && (self.end_index > 0 || self.text.is_empty())
    }
}

impl fmt::Display for RecursiveChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecursiveChunk(text={:?}, start_index={}, end_index={}, token_count={}, level={})",
            self.text, self.start_index, self.end_index, self.token_count, self.level
        )
    }
}

/// Result shape of `RecursiveChunker::chunk`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    #[default]
    Chunks,
    Texts,
}

impl FromStr for ReturnType {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chunks" => Ok(ReturnType::Chunks),
            "texts" => Ok(ReturnType::Texts),
            other => Err(ChunkError::Config(format!(
                "return_type {} is invalid. Must be 'chunks' or 'texts'.",
                other
            ))),
        }
    }
}

/// Chunking output, either structured chunks or plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChunkOutput {
    Chunks(Vec<RecursiveChunk>),
    Texts(Vec<String>),
}

impl ChunkOutput {
    pub fn len(&self) -> usize {
        match self {
            ChunkOutput::Chunks(chunks) => chunks.len(),
            ChunkOutput::Texts(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop metadata and keep only the chunk texts.
    pub fn into_texts(self) -> Vec<String> {
        match self {
            ChunkOutput::Chunks(chunks) => chunks.into_iter().map(|c| c.text).collect(),
            ChunkOutput::Texts(texts) => texts,
        }
    }

    /// Structured chunks, if the output carries them.
    pub fn as_chunks(&self) -> Option<&[RecursiveChunk]> {
        match self {
            ChunkOutput::Chunks(chunks) => Some(chunks),
            ChunkOutput::Texts(_) => None,
        }
    }
}
