use std::ops::Deref;

/// Default minimum growth step, in elements.
pub const DEFAULT_CHUNK: usize = 1000;

/// Growable storage with explicit growth policy.
///
/// When full, the buffer grows by its current capacity or by `chunk`
/// elements, whichever is larger. [`clear`](Self::clear) keeps the backing
/// allocation so a rebuild after a repartitioning does not reallocate.
#[derive(Debug, Clone)]
pub struct GrowBuffer<T> {
    items: Vec<T>,
    chunk: usize,
}

impl<T> GrowBuffer<T> {
    pub fn new(chunk: usize) -> Self {
        Self {
            items: Vec::new(),
            chunk: chunk.max(1),
        }
    }

    #[inline]
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensures room for `additional` more elements under the growth policy.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.items.len() + additional;
        if needed > self.items.capacity() {
            let grown = self.items.capacity() + self.items.capacity().max(self.chunk);
            let target = grown.max(needed);
            self.items.reserve_exact(target - self.items.len());
        }
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.items.capacity() {
            self.reserve(1);
        }
        self.items.push(item);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> GrowBuffer<T> {
    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.reserve(items.len());
        self.items.extend_from_slice(items);
    }
}

impl<T> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK)
    }
}

impl<T> Deref for GrowBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}
