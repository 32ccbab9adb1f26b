use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::EngineError;

/// Fixed number of rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, EngineError> {
        NonZeroUsize::new(size).map(PageSize).ok_or(EngineError::ZeroPageSize)
    }

    /// Compile-time page size; a zero size fails const evaluation.
    pub const fn fixed(size: usize) -> Self {
        match NonZeroUsize::new(size) {
            Some(n) => PageSize(n),
            None => panic!("page size must be at least 1"),
        }
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, R> {
    pub items: &'a [R],
    /// 1-based index that was requested (not clamped).
    pub page: usize,
    /// Always at least 1.
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<R> Page<'_, R> {
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page >= 1 && self.page < self.total_pages
    }

    /// 1-based position of the first and last row shown, `(0, 0)` when empty.
    pub fn shown_range(&self) -> (usize, usize) {
        if self.items.is_empty() {
            return (0, 0);
        }
        let first = (self.page - 1) * self.page_size + 1;
        (first, first + self.items.len() - 1)
    }
}

/// `ceil(len / page_size)`, never less than 1.
pub fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Clamp a 1-based page index into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice page `page` (1-based) out of `records`.
///
/// The page index is not clamped: page 0 or a page past the end yields an
/// empty slice. Callers clamp with [`clamp_page`] first.
pub fn paginate<R>(records: &[R], page: usize, page_size: PageSize) -> Page<'_, R> {
    let size = page_size.get();
    let total_pages = total_pages(records.len(), page_size);
    let items = match page.checked_sub(1).and_then(|p| p.checked_mul(size)) {
        Some(start) if start < records.len() => {
            let end = start.saturating_add(size).min(records.len());
            &records[start..end]
        }
        _ => &records[..0],
    };
    Page {
        items,
        page,
        total_pages,
        total_items: records.len(),
        page_size: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn twenty_three_rows_by_ten() {
        let rows: Vec<u32> = (1..=23).collect();
        let p3 = paginate(&rows, 3, size(10));
        assert_eq!(p3.total_pages, 3);
        assert_eq!(p3.items, &[21, 22, 23]);
        assert_eq!(p3.shown_range(), (21, 23));
        assert!(p3.has_prev() && !p3.has_next());

        let p4 = paginate(&rows, 4, size(10));
        assert!(p4.items.is_empty());
        assert!(!p4.has_next());
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let rows: Vec<u32> = Vec::new();
        let p = paginate(&rows, 1, size(15));
        assert_eq!(p.total_pages, 1);
        assert!(p.items.is_empty());
        assert!(!p.has_prev() && !p.has_next());
        assert_eq!(p.shown_range(), (0, 0));
    }

    #[test]
    fn page_zero_is_empty_not_clamped() {
        let rows = [1, 2, 3];
        assert!(paginate(&rows, 0, size(2)).items.is_empty());
        assert!(paginate(&rows, usize::MAX, size(2)).items.is_empty());
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(PageSize::new(0), Err(EngineError::ZeroPageSize));
    }
}
