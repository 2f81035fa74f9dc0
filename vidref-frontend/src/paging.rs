/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use vidref_api::unsync::PageMeta;

/// Pages of results accumulated for exactly one query
///
/// Responses for other queries or for unexpected pages are dropped, at most one page is in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct PagedResults<Q, T> {
    query: Q,
    items: Vec<T>,
    loaded_pages: u64,
    last_page: Option<u64>,
    total: Option<u64>,
    in_flight: Option<u64>,
}

impl<Q: PartialEq, T> PagedResults<Q, T> {
    pub fn new(query: Q) -> Self {
        PagedResults {
            query,
            items: Vec::new(),
            loaded_pages: 0,
            last_page: None,
            total: None,
            in_flight: None,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Nothing was loaded yet
    pub fn is_pristine(&self) -> bool {
        self.loaded_pages == 0
    }

    /// Drops everything if `query` differs from the current one
    ///
    /// Returns true if the results were reset.
    pub fn reset(&mut self, query: Q) -> bool {
        if self.query == query {
            return false;
        }
        *self = Self::new(query);
        true
    }

    pub fn has_more(&self) -> bool {
        self.last_page.is_none_or(|last| self.loaded_pages < last)
    }

    /// Claims the next page to fetch
    ///
    /// `None` while a page is in flight or when everything was loaded.
    pub fn next_page(&mut self) -> Option<u64> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        let page = self.loaded_pages + 1;
        self.in_flight = Some(page);
        Some(page)
    }

    /// Stores a fetched page, returns false if it was stale
    pub fn accept(&mut self, query: &Q, page: u64, meta: PageMeta, items: impl IntoIterator<Item = T>) -> bool {
        if *query != self.query || page != self.loaded_pages + 1 {
            return false;
        }
        self.items.extend(items);
        self.loaded_pages = page;
        self.last_page = Some(meta.last_page.max(page));
        self.total = Some(meta.total);
        if self.in_flight == Some(page) {
            self.in_flight = None;
        }
        true
    }

    /// Releases the in-flight claim after a failed fetch, so that it can be retried
    pub fn fail(&mut self, query: &Q, page: u64) {
        if *query == self.query && self.in_flight == Some(page) {
            self.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(current_page: u64, last_page: u64) -> PageMeta {
        PageMeta { current_page, last_page, per_page: 2, total: last_page * 2 }
    }

    #[test]
    fn pages_accumulate_until_exhausted() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("q");
        assert!(results.has_more());
        assert_eq!(results.next_page(), Some(1));
        assert!(results.accept(&"q", 1, meta(1, 2), [1, 2]));
        assert_eq!(results.next_page(), Some(2));
        assert!(results.accept(&"q", 2, meta(2, 2), [3, 4]));
        assert_eq!(results.items(), [1, 2, 3, 4]);
        assert!(!results.has_more());
        assert_eq!(results.next_page(), None);
        assert_eq!(results.total(), Some(4));
    }

    #[test]
    fn in_flight_page_blocks_further_requests() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("q");
        assert_eq!(results.next_page(), Some(1));
        assert_eq!(results.next_page(), None);
        assert!(results.is_loading());
        results.fail(&"q", 1);
        assert_eq!(results.next_page(), Some(1));
    }

    #[test]
    fn pages_for_an_old_query_are_dropped() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("old");
        results.next_page();
        assert!(results.reset("new"));
        assert!(!results.accept(&"old", 1, meta(1, 3), [9]));
        assert!(results.items().is_empty());
        assert_eq!(results.next_page(), Some(1));
        assert!(results.accept(&"new", 1, meta(1, 3), [1]));
        assert_eq!(results.items(), [1]);
    }

    #[test]
    fn reset_with_the_same_query_keeps_results() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("q");
        results.next_page();
        results.accept(&"q", 1, meta(1, 1), [1]);
        assert!(!results.reset("q"));
        assert_eq!(results.items(), [1]);
    }

    #[test]
    fn duplicate_and_out_of_order_pages_are_dropped() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("q");
        results.next_page();
        assert!(!results.accept(&"q", 2, meta(2, 3), [3]));
        assert!(results.accept(&"q", 1, meta(1, 3), [1]));
        assert!(!results.accept(&"q", 1, meta(1, 3), [1]));
        assert_eq!(results.items(), [1]);
    }

    #[test]
    fn empty_listing_is_exhausted_after_the_first_page() {
        let mut results: PagedResults<&str, u32> = PagedResults::new("q");
        results.next_page();
        results.accept(&"q", 1, PageMeta { current_page: 1, last_page: 0, per_page: 24, total: 0 }, []);
        assert!(!results.has_more());
        assert!(!results.is_pristine());
    }
}
