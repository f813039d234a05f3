use std::collections::VecDeque;

/// Fixed-capacity, newest-first log. Insertion at the front, eviction from
/// the tail once capacity is exceeded; both ends are O(1).
#[derive(Debug, Clone)]
pub struct RingLog<T> {
    buf: VecDeque<T>,
    cap: usize,
}

impl<T> RingLog<T> {
    pub fn new(cap: usize) -> Self {
        assert!(cap > 0, "ring capacity must be non-zero");
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, value: T) {
        self.buf.push_front(value);
        if self.buf.len() > self.cap {
            self.buf.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.buf.iter()
    }

    /// Oldest first.
    pub fn iter_chronological(&self) -> impl Iterator<Item = &T> {
        self.buf.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut log = RingLog::new(3);
        for n in 0..5 {
            log.push(n);
        }
        assert_eq!(log.len(), 3);
        let newest_first: Vec<i32> = log.iter().copied().collect();
        assert_eq!(newest_first, vec![4, 3, 2]);
    }

    #[test]
    fn chronological_reverses_storage_order() {
        let mut log = RingLog::new(4);
        for n in 1..=3 {
            log.push(n);
        }
        let chrono: Vec<i32> = log.iter_chronological().copied().collect();
        assert_eq!(chrono, vec![1, 2, 3]);
    }

    #[test]
    fn stays_exactly_at_capacity_under_load() {
        let mut log = RingLog::new(60);
        for n in 0..70 {
            log.push(n);
        }
        assert_eq!(log.len(), 60);
        assert_eq!(log.iter().next(), Some(&69));
        assert_eq!(log.iter_chronological().next(), Some(&10));
    }
}
