//! Bounded cache of generated matrices, keyed by `(kind, k, n)`. Capacity is
//! fixed at construction; insertions past capacity are dropped rather than
//! evicting an older entry under contention.

use super::Matrix;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The family of matrix a cache entry was generated with. For `n`, callers
/// pass the matrix's row count (`SystematicRs`'s `n` is `data_shards +
/// parity_shards`, matching `Vandermonde`'s convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Vandermonde,
    Cauchy,
    SystematicRs,
}

/// Process-wide cache backing `rs::encoder::encoding_matrix` and every
/// decoder k-subset candidate: both rebuild the same `(k, n)` systematic
/// matrix repeatedly (the decoder's retry loop does so once per candidate
/// subset), so a shared cache is what makes memoization actually pay off
/// rather than each call site keeping its own cold cache.
pub static DEFAULT_MATRIX_CACHE: Lazy<LruMatrixCache> = Lazy::new(LruMatrixCache::default);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: MatrixKind,
    k: usize,
    n: usize,
}

/// A source of generated matrices, possibly memoized. Implementations must
/// be safe to share across threads.
pub trait MatrixCache: Send + Sync {
    fn get_or_generate(&self, kind: MatrixKind, k: usize, n: usize) -> Arc<Matrix>;
}

/// Default cache: a concurrent hashmap bounded at `capacity` entries.
/// Insertion past capacity is a silent no-op (the generated matrix is still
/// returned to the caller, just not retained) rather than an eviction,
/// matching that contract exactly.
pub struct LruMatrixCache {
    capacity: usize,
    entries: DashMap<CacheKey, Arc<Matrix>>,
    inserted: AtomicU64,
}

impl LruMatrixCache {
    pub fn new(capacity: usize) -> Self {
        LruMatrixCache {
            capacity,
            entries: DashMap::new(),
            inserted: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LruMatrixCache {
    fn default() -> Self {
        LruMatrixCache::new(100)
    }
}

impl MatrixCache for LruMatrixCache {
    fn get_or_generate(&self, kind: MatrixKind, k: usize, n: usize) -> Arc<Matrix> {
        let key = CacheKey { kind, k, n };
        if let Some(existing) = self.entries.get(&key) {
            return Arc::clone(&existing);
        }

        let generated = Arc::new(generate(kind, k, n));
        if self.entries.len() < self.capacity {
            self.inserted.fetch_add(1, Ordering::Relaxed);
            self.entries.entry(key).or_insert_with(|| Arc::clone(&generated));
        }
        generated
    }
}

/// A cache that always regenerates: useful under memory pressure or for
/// deterministic benchmarking where cache warmth should not skew results
/// rather than evicting an older entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMatrixCache;

impl MatrixCache for NoopMatrixCache {
    fn get_or_generate(&self, kind: MatrixKind, k: usize, n: usize) -> Arc<Matrix> {
        Arc::new(generate(kind, k, n))
    }
}

fn generate(kind: MatrixKind, k: usize, n: usize) -> Matrix {
    match kind {
        MatrixKind::Vandermonde => Matrix::vandermonde(k, n),
        MatrixKind::Cauchy => {
            Matrix::cauchy(k, n).expect("caller validated k + n <= 256 before caching")
        }
        MatrixKind::SystematicRs => Matrix::systematic_rs(k, n - k),
    }
}
