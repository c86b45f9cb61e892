use std::cell::{Cell, RefCell};

/// A memoized computed value.
///
/// The caller supplies a dependency key (typically a tuple of field
/// revisions) on every read. The value is recomputed only when the key
/// differs from the one it was last computed with, so any number of reads
/// within one mutation batch cost a single evaluation.
#[derive(Debug)]
pub struct Memo<K, T> {
    slot: RefCell<Option<(K, T)>>,
    recomputations: Cell<u64>,
}

impl<K, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }
}

impl<K: PartialEq, T: Clone> Memo<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: K, compute: impl FnOnce() -> T) -> T {
        if let Some((cached_key, value)) = self.slot.borrow().as_ref() {
            if *cached_key == key {
                return value.clone();
            }
        }

        // `compute` may read other memos, never this one; the borrow above is
        // released before it runs.
        let value = compute();
        self.recomputations.set(self.recomputations.get() + 1);
        *self.slot.borrow_mut() = Some((key, value.clone()));
        value
    }

    /// How many times the value has been evaluated.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }
}

#[cfg(test)]
mod tests {
    use super::Memo;

    #[test]
    fn recomputes_only_on_key_change() {
        let memo: Memo<u64, String> = Memo::new();
        assert_eq!(memo.get(1, || "a".to_string()), "a");
        assert_eq!(memo.get(1, || "b".to_string()), "a");
        assert_eq!(memo.recomputations(), 1);
        assert_eq!(memo.get(2, || "c".to_string()), "c");
        assert_eq!(memo.recomputations(), 2);
    }
}
