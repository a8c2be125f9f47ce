use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

/// A thread-safe free list of byte arrays keyed by length.
///
/// Reads that are not byte-aligned need short-lived scratch arrays; the pool
/// amortizes those allocations. Buffers are tracked by pointer identity while
/// pooled so that recycling the same array twice cannot queue it twice and
/// later hand one allocation to two callers.
///
/// The pool is a per-peer value, not a process-wide singleton; wrap it in an
/// `Arc` to share it between a peer and its message buffers.
pub struct ByteArrayPool {
    inner: Mutex<PoolInner>,
}

#[derive(Default)]
struct PoolInner {
    /// Free stacks, one per buffer length.
    free: HashMap<usize, Vec<Vec<u8>>>,
    /// Pointer identities of buffers currently sitting in a free stack.
    recycled: HashSet<usize>,
}

impl ByteArrayPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self { inner: Mutex::new(PoolInner::default()) }
    }

    /// Returns a zeroed byte array of exactly `size` bytes, reusing a pooled
    /// one when available.
    pub fn get(&self, size: usize) -> Vec<u8> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stack) = inner.free.get_mut(&size) {
            if let Some(buffer) = stack.pop() {
                let identity = buffer.as_ptr() as usize;
                inner.recycled.remove(&identity);
                return buffer;
            }
        }
        vec![0u8; size]
    }

    /// Returns a byte array to the pool for reuse.
    ///
    /// Zero-length arrays are rejected. Recycling an array that is already
    /// pooled is a no-op.
    pub fn recycle(&self, buffer: Vec<u8>) {
        if buffer.is_empty() {
            tracing::debug!("rejecting zero-length buffer recycle");
            return;
        }
        let identity = buffer.as_ptr() as usize;
        let mut inner = self.inner.lock().unwrap();
        if !inner.recycled.insert(identity) {
            return;
        }
        inner.free.entry(buffer.len()).or_default().push(buffer);
    }

    /// Discards all pooled arrays and identity marks.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.free.clear();
        inner.recycled.clear();
    }

    /// Returns the number of buffers currently pooled for `size`.
    pub fn available(&self, size: usize) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.free.get(&size).map_or(0, Vec::len)
    }
}

impl Default for ByteArrayPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ByteArrayPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("ByteArrayPool")
            .field("sizes", &inner.free.len())
            .field("pooled", &inner.recycled.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_allocates_when_empty() {
        let pool = ByteArrayPool::new();
        let buffer = pool.get(16);
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&b| b == 0));
        assert_eq!(pool.available(16), 0);
    }

    #[test]
    fn test_recycle_then_get_reuses() {
        let pool = ByteArrayPool::new();
        let buffer = pool.get(8);
        let identity = buffer.as_ptr() as usize;

        pool.recycle(buffer);
        assert_eq!(pool.available(8), 1);

        let again = pool.get(8);
        assert_eq!(again.as_ptr() as usize, identity);
        assert_eq!(pool.available(8), 0);
    }

    #[test]
    fn test_double_recycle_is_ignored() {
        let pool = ByteArrayPool::new();
        let buffer = pool.get(4);
        pool.recycle(buffer);
        assert_eq!(pool.available(4), 1);

        // Pull the buffer back out while leaving its identity mark in place,
        // simulating a caller recycling a buffer it no longer owns.
        let stale = {
            let mut inner = pool.inner.lock().unwrap();
            inner.free.get_mut(&4).unwrap().pop().unwrap()
        };
        pool.recycle(stale);
        assert_eq!(pool.available(4), 0);

        // Two subsequent gets can never observe one allocation twice.
        let first = pool.get(4);
        let second = pool.get(4);
        assert_ne!(first.as_ptr(), second.as_ptr());
    }

    #[test]
    fn test_zero_length_rejected() {
        let pool = ByteArrayPool::new();
        pool.recycle(Vec::new());
        assert_eq!(pool.available(0), 0);
    }

    #[test]
    fn test_reset_discards_everything() {
        let pool = ByteArrayPool::new();
        for _ in 0..3 {
            let buffer = pool.get(32);
            pool.recycle(buffer);
        }
        pool.reset();
        assert_eq!(pool.available(32), 0);
    }

    #[test]
    fn test_sizes_are_independent() {
        let pool = ByteArrayPool::new();
        pool.recycle(vec![0u8; 4]);
        pool.recycle(vec![0u8; 8]);
        assert_eq!(pool.available(4), 1);
        assert_eq!(pool.available(8), 1);
        assert_eq!(pool.get(8).len(), 8);
        assert_eq!(pool.available(4), 1);
    }
}
