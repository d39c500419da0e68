use alloc::collections::BTreeMap;

use crate::memo::{Entry, MemoKey, MemoTable};


/// A [`MemoTable`](../trait.MemoTable.html) that is a `BTreeMap`, usable without
/// `std`.
#[derive(Debug)]
pub struct BTreeMemo<U>(BTreeMap<MemoKey, Entry<U>>);

impl<U> Default for BTreeMemo<U> {
    #[inline]
    fn default() -> Self {
        BTreeMemo(BTreeMap::new())
    }
}

impl<U> MemoTable<U> for BTreeMemo<U> {
    #[inline]
    fn lookup(&self, key: &MemoKey) -> Option<&Entry<U>> {
        self.0.get(key)
    }

    #[inline]
    fn store(&mut self, key: MemoKey, entry: Entry<U>) {
        let _ = self.0.insert(key, entry);
    }

    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}
