// src/listing/paginate.rs

/// One page of an already filtered and sorted list. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub page_count: usize,
    pub current_page: usize,
}

/// Never less than one page, so an empty list still has a page to render.
/// A zero page size is treated as one.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> PageSlice<'_, T> {
    let page_size = page_size.max(1);
    let page_count = page_count(items.len(), page_size);
    let current_page = clamp_page(page, page_count);
    let start = ((current_page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    PageSlice {
        items: &items[start..end],
        page_count,
        current_page,
    }
}
