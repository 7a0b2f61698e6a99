use std::{cell::Cell, mem};

/// Information about each disjoint set and how to merge them together
pub trait SetInfo {
    /// Whether to allow weighted quick-union (for better performance) or to force unions to happen in the order specified by the arguments to `union`
    const ALLOW_WEIGHTED: bool = false;

    /// Merge the info for two sets, used on the `union` call
    fn merge(&mut self, new_child: Self);
}

impl SetInfo for () {
    const ALLOW_WEIGHTED: bool = true;

    fn merge(&mut self, _new_child: Self) {}
}

/// Tracks the smallest element of each set so that sets can be listed in a stable order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinElement(pub usize);

impl SetInfo for MinElement {
    const ALLOW_WEIGHTED: bool = true;

    fn merge(&mut self, new_child: Self) {
        self.0 = self.0.min(new_child.0);
    }
}

enum UnionFindEntry<S: SetInfo> {
    RootOfSet {
        // For weighted union-find
        weight: usize,
        set_meta: S,
    },
    OwnedBy {
        owned_by: Cell<usize>,
    },
}

/// A data structure allowing you track disjoint sets of numbers. Here it's used to find block systems of a permutation group but you can use it for anything.
///
/// This structure also keeps track of metadata for each set. If you do not need this, use `()` for the `S` parameter.
pub struct UnionFind<S: SetInfo> {
    sets: Box<[UnionFindEntry<S>]>,
}

/// Information about an element, returned by the `find` operation
pub struct FindResult<'a, S: SetInfo> {
    root_idx: usize,
    set_size: usize,
    set_meta: &'a S,
}

impl<S: SetInfo> FindResult<'_, S> {
    /// Returns the index of the element representing the root of the set
    #[must_use]
    pub fn root_idx(&self) -> usize {
        self.root_idx
    }

    /// The total size of the set
    #[must_use]
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// Metadata associated with the set the element is a member of
    #[must_use]
    pub fn set_meta(&self) -> &S {
        self.set_meta
    }
}

impl<S: SetInfo + Default> UnionFind<S> {
    pub fn new(item_count: usize) -> Self {
        UnionFind::new_with_initial_set_info((0..item_count).map(|_| S::default()).collect())
    }
}

impl UnionFind<MinElement> {
    /// A union-find where every element starts out as its own set, tracking the smallest element of each set
    #[must_use]
    pub fn with_min_elements(item_count: usize) -> Self {
        UnionFind::new_with_initial_set_info((0..item_count).map(MinElement).collect())
    }
}

impl<S: SetInfo> UnionFind<S> {
    /// Create a new `UnionFind` with one element per set info
    pub fn new_with_initial_set_info(set_infos: Vec<S>) -> Self {
        UnionFind {
            sets: set_infos
                .into_iter()
                .map(|set_meta| UnionFindEntry::RootOfSet {
                    weight: 1,
                    set_meta,
                })
                .collect(),
        }
    }

    /// Find an element in the `UnionFind` and return metadata about it.
    ///
    /// # Panics
    ///
    /// Panics if the item is outside the range of numbers in the union-find.
    #[must_use]
    pub fn find(&self, item: usize) -> FindResult<'_, S> {
        match &self.sets[item] {
            UnionFindEntry::RootOfSet { weight, set_meta } => FindResult {
                root_idx: item,
                set_size: *weight,
                set_meta,
            },
            UnionFindEntry::OwnedBy { owned_by } => {
                let ret = self.find(owned_by.get());
                // Path compression
                owned_by.set(ret.root_idx);
                ret
            }
        }
    }

    /// Union the sets that the two representatives given belong to, with `child` becoming a child of `parent`. Returns `false` if they were already in the same set.
    ///
    /// # Panics
    ///
    /// Panics if either `parent` or `child` are outside of the range of elements in the union-find.
    ///
    /// If `S::ALLOW_WEIGHTED` is `true`, then this will implement weighted quick union and `parent` and `child` may be swapped for performance.
    pub fn union(&mut self, parent: usize, child: usize) -> bool {
        let a_result = self.find(parent);
        let b_result = self.find(child);

        if a_result.root_idx == b_result.root_idx {
            return false;
        }

        let (mut a_idx, mut a_size) = (a_result.root_idx, a_result.set_size);
        let (mut b_idx, mut b_size) = (b_result.root_idx, b_result.set_size);

        if S::ALLOW_WEIGHTED && a_size < b_size {
            mem::swap(&mut a_idx, &mut b_idx);
            mem::swap(&mut a_size, &mut b_size);
        }

        let old_b_data = mem::replace(
            &mut self.sets[b_idx],
            UnionFindEntry::OwnedBy {
                owned_by: Cell::new(a_idx),
            },
        );

        let other_set_meta = match old_b_data {
            UnionFindEntry::RootOfSet {
                weight: _,
                set_meta,
            } => set_meta,
            UnionFindEntry::OwnedBy { owned_by: _ } => unreachable!(),
        };

        match &mut self.sets[a_idx] {
            UnionFindEntry::RootOfSet { weight, set_meta } => {
                *weight += b_size;

                set_meta.merge(other_set_meta);
            }
            UnionFindEntry::OwnedBy { owned_by: _ } => unreachable!(),
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::{MinElement, UnionFind};

    #[test]
    fn simple() {
        let mut union_find = UnionFind::<()>::new(6);

        assert!(union_find.union(0, 1));
        assert!(union_find.union(2, 3));
        assert!(union_find.union(1, 3));
        assert!(!union_find.union(0, 2));

        assert_eq!(union_find.find(0).set_size(), 4);
        assert_eq!(union_find.find(0).root_idx(), union_find.find(3).root_idx());
        assert_ne!(union_find.find(0).root_idx(), union_find.find(4).root_idx());
        assert_eq!(union_find.find(5).set_size(), 1);
    }

    #[test]
    fn min_elements() {
        let mut union_find = UnionFind::with_min_elements(5);

        union_find.union(4, 3);
        assert_eq!(union_find.find(4).set_meta(), &MinElement(3));

        union_find.union(3, 1);
        assert_eq!(union_find.find(4).set_meta(), &MinElement(1));
        assert_eq!(union_find.find(0).set_meta(), &MinElement(0));
        assert_eq!(union_find.sets.len(), 5);
    }
}
