//! Memoized token-count estimation.
//!
//! A cheap characters-per-token heuristic screens out spans that are
//! obviously over budget; everything else is counted exactly by the
//! tokenizer. Results are kept in a bounded LRU cache because the same
//! spans are re-estimated as recursion descends.

use crate::tokenizer::TokenCounter;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Characters assumed per token by the overflow heuristic.
pub const CHARS_PER_TOKEN: usize = 6;

/// Default number of memoized estimates.
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Result of estimating a span's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEstimate {
    /// Exact count from the tokenizer
    Exact(usize),
    /// Heuristically larger than the budget; never counted exactly
    Overflow,
}

impl TokenEstimate {
    /// Whether the span is over `budget` tokens.
    pub fn exceeds(self, budget: usize) -> bool {
        match self {
            TokenEstimate::Exact(count) => count > budget,
            TokenEstimate::Overflow => true,
        }
    }

    /// Count used in merge arithmetic. Overflow maps to one past the
    /// budget, which can never be merged with a neighbour.
    pub fn bounded(self, budget: usize) -> usize {
        match self {
            TokenEstimate::Exact(count) => count,
            TokenEstimate::Overflow => budget.saturating_add(1),
        }
    }
}

/// Snapshot of cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Token estimator owning its memoization cache.
pub struct TokenEstimator {
    tokenizer: Arc<dyn TokenCounter>,
    chunk_size: usize,
    cache: Mutex<LruCache<String, TokenEstimate>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TokenEstimator {
    /// Create an estimator with an empty cache of `capacity` entries.
    pub fn new(
        tokenizer: Arc<dyn TokenCounter>,
        chunk_size: usize,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            tokenizer,
            chunk_size,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Estimate the token count of `text`.
    pub fn estimate(&self, text: &str) -> TokenEstimate {
        if let Some(&cached) = self.lock_cache().get(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let heuristic = (text.chars().count() / CHARS_PER_TOKEN).max(1);
        let estimate = if heuristic > self.chunk_size {
            TokenEstimate::Overflow
        } else {
            TokenEstimate::Exact(self.tokenizer.count_tokens(text))
        };

        self.lock_cache().put(text.to_string(), estimate);
        estimate
    }

    /// Exact token count, bypassing the heuristic and the cache.
    pub fn count_exact(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    pub fn tokenizer(&self) -> &Arc<dyn TokenCounter> {
        &self.tokenizer
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn stats(&self) -> CacheStats {
        let cache = self.lock_cache();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    /// Drop all memoized estimates and reset the counters.
    pub fn clear(&self) {
        self.lock_cache().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    // A panic while holding the lock cannot leave a memo in a bad state.
    fn lock_cache(&self) -> MutexGuard<'_, LruCache<String, TokenEstimate>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CharacterTokenizer;
    use std::sync::atomic::AtomicUsize;

    /// Counts how often the exact tokenizer is consulted.
    #[derive(Default)]
    struct CountingTokenizer {
        calls: AtomicUsize,
    }

    impl TokenCounter for CountingTokenizer {
        fn name(&self) -> &str {
            "counting"
        }

        fn count_tokens(&self, text: &str) -> usize {
            self.calls.fetch_add(1, Ordering::SeqCst);
            text.chars().count()
        }

        fn encode(&self, text: &str) -> chonk_core::ChunkResult<Vec<u32>> {
            CharacterTokenizer.encode(text)
        }

        fn decode_batch(&self, batch: &[Vec<u32>]) -> chonk_core::ChunkResult<Vec<String>> {
            CharacterTokenizer.decode_batch(batch)
        }
    }

    fn estimator(tokenizer: Arc<dyn TokenCounter>, chunk_size: usize) -> TokenEstimator {
        TokenEstimator::new(tokenizer, chunk_size, NonZeroUsize::new(4).unwrap())
    }

    #[test]
    fn test_estimate_is_cached() {
        let tokenizer = Arc::new(CountingTokenizer::default());
        let estimator = estimator(tokenizer.clone(), 100);

        assert_eq!(estimator.estimate("hello"), TokenEstimate::Exact(5));
        assert_eq!(estimator.estimate("hello"), TokenEstimate::Exact(5));

        assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 1);
        let stats = estimator.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
    }

    #[test]
    fn test_overflow_skips_tokenizer() {
        let tokenizer = Arc::new(CountingTokenizer::default());
        let estimator = estimator(tokenizer.clone(), 2);

        // 18 chars / 6 = 3 > 2
        let estimate = estimator.estimate(&"x".repeat(18));
        assert_eq!(estimate, TokenEstimate::Overflow);
        assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 0);
        assert!(estimate.exceeds(2));
        assert_eq!(estimate.bounded(2), 3);
    }

    #[test]
    fn test_heuristic_floor_is_one() {
        let estimator = estimator(Arc::new(CharacterTokenizer), 1);
        assert_eq!(estimator.estimate(""), TokenEstimate::Exact(0));
        assert_eq!(estimator.estimate("abcde"), TokenEstimate::Exact(5));
    }

    #[test]
    fn test_lru_eviction_and_clear() {
        let tokenizer = Arc::new(CountingTokenizer::default());
        let estimator = estimator(tokenizer.clone(), 100);

        for word in ["a", "b", "c", "d", "e"] {
            estimator.estimate(word);
        }
        assert_eq!(estimator.stats().len, 4);

        // "a" was evicted, so it is counted again
        estimator.estimate("a");
        assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 6);

        estimator.clear();
        assert_eq!(estimator.stats(), CacheStats { capacity: 4, ..Default::default() });
    }
}
