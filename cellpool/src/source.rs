use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::IndexKey;

/// Read access to the logical item sequence a list renders.
///
/// Implementations must be side-effect free for a given index within one projection pass.
pub trait ItemSource {
    type Index: IndexKey;
    type Item<'a>
    where
        Self: 'a;

    /// Number of items currently available.
    fn count(&self) -> usize;

    /// Whether `index` addresses an item of the current sequence.
    fn contains(&self, index: &Self::Index) -> bool;

    fn get(&self, index: &Self::Index) -> Option<Self::Item<'_>>;
}

impl<T> ItemSource for [T] {
    type Index = usize;
    type Item<'a>
        = &'a T
    where
        Self: 'a;

    fn count(&self) -> usize {
        self.len()
    }

    fn contains(&self, index: &usize) -> bool {
        *index < self.len()
    }

    fn get(&self, index: &usize) -> Option<Self::Item<'_>> {
        <[T]>::get(self, *index)
    }
}

impl<T> ItemSource for Vec<T> {
    type Index = usize;
    type Item<'a>
        = &'a T
    where
        Self: 'a;

    fn count(&self) -> usize {
        self.len()
    }

    fn contains(&self, index: &usize) -> bool {
        *index < self.len()
    }

    fn get(&self, index: &usize) -> Option<Self::Item<'_>> {
        self.as_slice().get(*index)
    }
}

/// Items addressed by opaque, ordered keys rather than positions.
impl<K: IndexKey, T> ItemSource for BTreeMap<K, T> {
    type Index = K;
    type Item<'a>
        = &'a T
    where
        Self: 'a;

    fn count(&self) -> usize {
        self.len()
    }

    fn contains(&self, index: &K) -> bool {
        self.contains_key(index)
    }

    fn get(&self, index: &K) -> Option<Self::Item<'_>> {
        BTreeMap::get(self, index)
    }
}

/// A lazily evaluated, positional item provider.
///
/// The getter is only called for indexes below `count`.
pub struct PagedSource<T> {
    count: usize,
    get_item: Arc<dyn Fn(usize) -> Option<T> + Send + Sync>,
}

impl<T> PagedSource<T> {
    pub fn new(count: usize, get_item: impl Fn(usize) -> Option<T> + Send + Sync + 'static) -> Self {
        Self {
            count,
            get_item: Arc::new(get_item),
        }
    }

    /// Updates the advertised item count, e.g. after more pages were loaded.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

impl<T> Clone for PagedSource<T> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            get_item: Arc::clone(&self.get_item),
        }
    }
}

impl<T> fmt::Debug for PagedSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedSource")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<T> ItemSource for PagedSource<T> {
    type Index = usize;
    type Item<'a>
        = T
    where
        Self: 'a;

    fn count(&self) -> usize {
        self.count
    }

    fn contains(&self, index: &usize) -> bool {
        *index < self.count
    }

    fn get(&self, index: &usize) -> Option<Self::Item<'_>> {
        if *index >= self.count {
            return None;
        }
        (self.get_item)(*index)
    }
}

/// Either a plain list or a paged provider, behind one positional interface.
#[derive(Clone, Debug)]
pub enum Items<T> {
    List(Vec<T>),
    Paged(PagedSource<T>),
}

impl<T> Items<T> {
    pub fn is_paged(&self) -> bool {
        matches!(self, Self::Paged(_))
    }
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Self::List(items)
    }
}

impl<T> From<PagedSource<T>> for Items<T> {
    fn from(source: PagedSource<T>) -> Self {
        Self::Paged(source)
    }
}

impl<T: Clone> ItemSource for Items<T> {
    type Index = usize;
    type Item<'a>
        = Cow<'a, T>
    where
        Self: 'a;

    fn count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Paged(source) => source.count(),
        }
    }

    fn contains(&self, index: &usize) -> bool {
        *index < self.count()
    }

    fn get(&self, index: &usize) -> Option<Self::Item<'_>> {
        match self {
            Self::List(items) => items.as_slice().get(*index).map(Cow::Borrowed),
            Self::Paged(source) => source.get(index).map(Cow::Owned),
        }
    }
}
