//! Incrementally loaded item lists.

/// A list that grows page by page. `has_more` is the loader's promise that
/// another page exists; once it turns false the list is complete and
/// restoration waits on nothing further.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    loading: bool,
    has_more: bool,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            has_more: true,
        }
    }
}

impl<T> PagedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the source has reported the final page.
    pub fn is_complete(&self) -> bool {
        !self.has_more
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn extend_page(&mut self, page: Vec<T>, end_of_list: bool) {
        self.items.extend(page);
        self.loading = false;
        self.has_more = !end_of_list;
    }

    /// Next page index to request, or `None` when complete or in flight.
    pub fn next_page(&self, page_size: usize) -> Option<usize> {
        if self.loading || !self.has_more || page_size == 0 {
            return None;
        }
        Some(self.items.len() / page_size)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.loading = false;
        self.has_more = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pages_accumulate() {
        let mut list = PagedList::new();
        assert_eq!(list.next_page(4), Some(0));
        list.begin_load();
        assert_eq!(list.next_page(4), None);
        list.extend_page(vec![1, 2, 3, 4], false);
        assert_eq!(list.len(), 4);
        assert_eq!(list.next_page(4), Some(1));
    }

    #[test]
    fn test_end_of_list_stops_paging() {
        let mut list = PagedList::new();
        list.begin_load();
        list.extend_page(vec![1, 2], true);
        assert!(list.is_complete());
        assert_eq!(list.next_page(4), None);
    }

    #[test]
    fn test_clear_resets_completion() {
        let mut list = PagedList::new();
        list.extend_page(vec![1], true);
        list.clear();
        assert!(!list.is_complete());
        assert_eq!(list.next_page(4), Some(0));
    }
}
