//! Property-based tests for pagination normalization and metadata
//!
//! Uses proptest to generate random inputs and verify invariants

use proptest::prelude::*;

use inkpost::envelope::{PageMeta, PageQuery, Pagination, MAX_PAGE_LIMIT};

proptest! {
    #[test]
    fn normalized_pagination_stays_in_bounds(
        page in proptest::option::of(0u32..10_000),
        limit in proptest::option::of(0u32..10_000),
    ) {
        let pagination = PageQuery { page, limit }.normalize(10);

        prop_assert!(pagination.page >= 1);
        prop_assert!(pagination.limit >= 1);
        prop_assert!(pagination.limit <= MAX_PAGE_LIMIT);
    }

    #[test]
    fn offset_never_overflows_for_sane_inputs(
        page in 1u32..100_000,
        limit in 1u32..=100,
    ) {
        let pagination = Pagination::new(page, limit);
        let offset = pagination.offset();

        prop_assert_eq!(offset, i64::from(pagination.page - 1) * i64::from(pagination.limit));
        prop_assert!(offset >= 0);
    }

    #[test]
    fn page_meta_is_consistent(
        page in 1u32..1_000,
        limit in 1u32..=100,
        total in 0i64..1_000_000,
    ) {
        let meta = PageMeta::new(Pagination::new(page, limit), total);

        // ceil division without ever losing a partial page
        prop_assert!(meta.total_pages * i64::from(meta.limit) >= total);
        prop_assert!((meta.total_pages - 1).max(0) * i64::from(meta.limit) < total || total == 0);

        prop_assert_eq!(meta.has_previous_page, meta.page > 1);
        prop_assert_eq!(meta.has_next_page, i64::from(meta.page) < meta.total_pages);
    }

    #[test]
    fn empty_result_set_has_no_pages(page in 1u32..1_000, limit in 1u32..=100) {
        let meta = PageMeta::new(Pagination::new(page, limit), 0);

        prop_assert_eq!(meta.total_pages, 0);
        prop_assert!(!meta.has_next_page);
    }
}
