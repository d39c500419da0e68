use std::{
    collections::{HashMap, hash_map::RandomState},
    hash::BuildHasher,
};

use crate::memo::{Entry, MemoKey, MemoTable};


/// A [`MemoTable`] that is a `HashMap`.
///
/// The `S` type parameter allows choosing a different hashing algorithm, which
/// can matter since a parse of a large input can make many entries.
///
/// [`MemoTable`]: ../../kombi_core/memo/trait.MemoTable.html
#[derive(Debug)]
pub struct HashMapMemo<U, S = RandomState>
    where S: BuildHasher,
{
    /// The entries.  Evaluation manages this, but it is exposed for
    /// inspecting what a parse did.
    pub hashmap: HashMap<MemoKey, Entry<U>, S>,
}

impl<U, S> HashMapMemo<U, S>
    where S: BuildHasher,
{
    /// Given a `HashMap` of our type, make a new instance of `Self` that uses
    /// it for its `hashmap` field.
    ///
    /// This enables using a premade `HashMap`, possibly with a certain capacity
    /// and/or with a different hashing algorithm (as supported by `HashMap`).
    #[inline]
    pub fn new(hashmap: HashMap<MemoKey, Entry<U>, S>) -> Self {
        Self { hashmap }
    }
}

impl<U, S> Default for HashMapMemo<U, S>
    where S: BuildHasher + Default,
{
    /// Make a new instance of `Self` using the `HashMap::default()` of our
    /// type.
    #[inline]
    fn default() -> Self {
        Self::new(HashMap::default())
    }
}

impl<U, S> MemoTable<U> for HashMapMemo<U, S>
    where S: BuildHasher,
{
    #[inline]
    fn lookup(&self, key: &MemoKey) -> Option<&Entry<U>> {
        self.hashmap.get(key)
    }

    #[inline]
    fn store(&mut self, key: MemoKey, entry: Entry<U>) {
        let _ = self.hashmap.insert(key, entry);
    }

    #[inline]
    fn len(&self) -> usize {
        self.hashmap.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Endianness, memo::Success};

    #[test]
    fn basic() {
        let mut hmm = HashMapMemo::<()>::default();
        let key = MemoKey { parser: 0, pos: 16, endianness: Endianness::BIG };

        assert!(hmm.is_empty());
        assert_eq!(hmm.lookup(&key), None);

        hmm.store(key, Entry::InProgress);
        assert_eq!(hmm.lookup(&key), Some(&Entry::InProgress));

        hmm.store(key, Entry::Done(None));
        assert_eq!(hmm.lookup(&key), Some(&Entry::Done(None)));
        assert_eq!(hmm.len(), 1);

        let other = MemoKey { pos: 24, ..key };
        hmm.store(other, Entry::Done(Some(Success { value: None, end: 24 })));
        assert_eq!(hmm.len(), 2);
        assert_eq!(hmm.hashmap.get(&key), Some(&Entry::Done(None)));
    }
}
