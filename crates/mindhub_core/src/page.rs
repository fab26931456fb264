use std::num::NonZeroUsize;

use thiserror::Error;

/// Number of items a full page carries. Fixed for the lifetime of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Page size used by the upload and post queues.
    pub const DEFAULT: PageSize = match NonZeroUsize::new(20) {
        Some(size) => PageSize(size),
        None => panic!("page size must be non-zero"),
    };

    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One batch of items from a single fetch.
///
/// `fetched` is what the server returned and does not change when items are
/// removed client-side, so fetch indexing stays stable after a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    fetched: usize,
}

impl<T> Page<T> {
    fn placeholder() -> Self {
        Self {
            items: Vec::new(),
            fetched: 0,
        }
    }

    fn from_items(items: Vec<T>) -> Self {
        let fetched = items.len();
        Self { items, fetched }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn is_short(&self, page_size: PageSize) -> bool {
        self.fetched < page_size.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page {index} is not contiguous with {count} stored pages")]
pub struct PageGap {
    pub index: usize,
    pub count: usize,
}

/// Index-aligned pages of a list. Never empty: a fresh collection holds one
/// placeholder page that the first fetch replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCollection<T> {
    pages: Vec<Page<T>>,
    page_size: PageSize,
}

impl<T> PageCollection<T> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            pages: vec![Page::placeholder()],
            page_size,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    /// Number of stored pages, the placeholder included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of items currently held.
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| page.items.is_empty())
    }

    /// Items in page order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn last_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Index the next fetch should target: the last page again when it came
    /// back short, otherwise a new page after it.
    pub fn next_index(&self) -> usize {
        let last = self.last_index();
        if self.pages[last].is_short(self.page_size) {
            last
        } else {
            self.pages.len()
        }
    }

    /// Replaces the last page or appends a new one.
    pub(crate) fn store(&mut self, index: usize, items: Vec<T>) -> Result<(), PageGap> {
        let page = Page::from_items(items);
        let count = self.pages.len();
        if index == count {
            self.pages.push(page);
            Ok(())
        } else if index + 1 == count {
            self.pages[index] = page;
            Ok(())
        } else {
            Err(PageGap { index, count })
        }
    }

    /// Removes every item the predicate rejects. Page boundaries are kept.
    /// Returns the number of removed items.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.len();
        for page in &mut self.pages {
            page.items.retain(|item| keep(item));
        }
        before - self.len()
    }

    /// Overwrites every item matching the predicate with a clone of `item`.
    pub(crate) fn replace_where<F>(&mut self, mut matches: F, item: &T) -> usize
    where
        F: FnMut(&T) -> bool,
        T: Clone,
    {
        let mut replaced = 0;
        for slot in self.pages.iter_mut().flat_map(|page| page.items.iter_mut()) {
            if matches(slot) {
                *slot = item.clone();
                replaced += 1;
            }
        }
        replaced
    }

    pub(crate) fn clear(&mut self) {
        self.pages.clear();
        self.pages.push(Page::placeholder());
    }
}
