use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped to `1..=total_pages`
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` into the requested page. Out-of-range pages are clamped and a
/// zero page size counts as one; an empty list is a single empty page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slices_requested_page() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!((page.page, page.total, page.total_pages), (3, 25, 3));
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&items, 0, 2).page, 1);
        let last = paginate(&items, 99, 2);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![5]);
    }

    #[test]
    fn zero_page_size_counts_as_one() {
        let page = paginate(&["a", "b"], 2, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec!["b"]);
    }

    #[test]
    fn empty_input_is_one_empty_page() {
        let page = paginate::<u8>(&[], 4, 10);
        assert_eq!(page.items, Vec::<u8>::new());
        assert_eq!((page.page, page.total, page.total_pages), (1, 0, 1));
    }
}
