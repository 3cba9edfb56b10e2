use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed index into a [RefVec].
pub trait Ref: Into<usize> + From<usize> + Copy + PartialEq + Debug {}

impl<X> Ref for X where X: Into<usize> + From<usize> + Copy + PartialEq + Debug {}

/// Declares a new index type, wrapping a `u32`, that can be used to address a [RefVec].
#[macro_export]
macro_rules! create_ref_type {
    ($type_name:ident) => {
        #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
        pub struct $type_name(u32);

        impl $type_name {
            pub const fn from_u32(u: u32) -> Self {
                $type_name(u)
            }
            pub const fn to_u32(self) -> u32 {
                self.0
            }
        }

        impl From<usize> for $type_name {
            fn from(u: usize) -> Self {
                debug_assert!(u <= u32::MAX as usize);
                $type_name(u as u32)
            }
        }
        impl From<$type_name> for usize {
            fn from(v: $type_name) -> Self {
                v.0 as usize
            }
        }
        impl From<u32> for $type_name {
            fn from(u: u32) -> Self {
                $type_name(u)
            }
        }
        impl From<$type_name> for u32 {
            fn from(v: $type_name) -> Self {
                v.0
            }
        }
    };
}

/// A vector indexed by a typed key `K`, where keys are handed out in insertion order.
#[derive(Clone)]
pub struct RefVec<K, V> {
    values: Vec<V>,
    phantom: PhantomData<K>,
}

impl<K, V> Default for RefVec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V: Debug> Debug for RefVec<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl<K, V> RefVec<K, V> {
    pub fn new() -> Self {
        RefVec {
            values: Vec::new(),
            phantom: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }
}

impl<K: Ref, V> RefVec<K, V> {
    /// Key that will be attributed to the next pushed value.
    pub fn next_key(&self) -> K {
        K::from(self.values.len())
    }

    pub fn push(&mut self, value: V) -> K {
        let key = self.next_key();
        self.values.push(value);
        key
    }

    pub fn contains(&self, k: K) -> bool {
        k.into() < self.len()
    }

    pub fn get(&self, k: K) -> Option<&V> {
        self.values.get(k.into())
    }

    pub fn get_mut(&mut self, k: K) -> Option<&mut V> {
        self.values.get_mut(k.into())
    }

    /// Extends the vector with the values generated by `gen` until `key` is a valid index.
    pub fn fill_with(&mut self, key: K, gen: impl Fn() -> V) {
        let index: usize = key.into();
        while self.values.len() <= index {
            self.values.push(gen());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = K> {
        (0..self.values.len()).map(K::from)
    }

    pub fn entries(&self) -> impl Iterator<Item = (K, &V)> {
        self.values.iter().enumerate().map(|(i, v)| (K::from(i), v))
    }
}

impl<K: Ref, V> Index<K> for RefVec<K, V> {
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        &self.values[index.into()]
    }
}

impl<K: Ref, V> IndexMut<K> for RefVec<K, V> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.values[index.into()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    create_ref_type!(Slot);

    #[test]
    fn keys_follow_insertion_order() {
        let mut vec: RefVec<Slot, &str> = RefVec::new();
        assert_eq!(vec.next_key(), Slot::from_u32(0));
        let a = vec.push("a");
        let b = vec.push("b");
        assert_eq!(a.to_u32(), 0);
        assert_eq!(b.to_u32(), 1);
        assert_eq!(vec[b], "b");
        vec[a] = "z";
        assert_eq!(vec.entries().collect::<Vec<_>>(), vec![(a, &"z"), (b, &"b")]);
        assert!(!vec.contains(Slot::from_u32(2)));
    }

    #[test]
    fn fill_up_to_key() {
        let mut vec: RefVec<Slot, Vec<u8>> = RefVec::new();
        vec.fill_with(Slot::from_u32(3), Vec::new);
        assert_eq!(vec.len(), 4);
        assert!(vec.get(Slot::from_u32(3)).is_some());
    }
}
