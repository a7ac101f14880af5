//! Abstractions for offset pagination.

use std::num::NonZeroU32;

/// Arguments selecting a [`Page`] of items.
///
/// Pages are numbered from `1`, so both numbers are non-zero by
/// construction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// Number of the requested [`Page`].
    page: NonZeroU32,

    /// Maximum number of items on a single [`Page`].
    per_page: NonZeroU32,
}

impl Arguments {
    /// Creates new [`Arguments`].
    ///
    /// [`None`] is returned if any of the provided numbers is zero.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Option<Self> {
        Some(Self {
            page: NonZeroU32::new(page)?,
            per_page: NonZeroU32::new(per_page)?,
        })
    }

    /// Returns number of the requested [`Page`] (starting from `1`).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page.get()
    }

    /// Returns maximum number of items on the requested [`Page`].
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page.get()
    }

    /// Returns number of items preceding the requested [`Page`].
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.per_page.get())
    }

    /// Returns maximum number of items on the requested [`Page`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.get())
    }
}

/// Page of items along with the total number of items matching the same
/// selection.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of items across all the pages.
    pub total: u64,

    /// [`Arguments`] this [`Page`] was selected with.
    pub arguments: Arguments,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] out of the provided `items`.
    #[must_use]
    pub fn new(
        arguments: Arguments,
        items: impl IntoIterator<Item = impl Into<I>>,
        total: u64,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total,
            arguments,
        }
    }

    /// Returns total number of pages, given the [`Arguments::per_page()`]
    /// this [`Page`] was selected with.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.arguments.limit())
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<T>(self, f: impl FnMut(I) -> T) -> Page<T> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            arguments: self.arguments,
        }
    }
}

/// Defines pagination types for a specific kind of items.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of list items."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter applied to the items before paginating them.
    pub filter: F,
}
