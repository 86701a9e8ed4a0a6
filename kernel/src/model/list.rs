#[derive(Debug)]
pub struct PaginatedList<T> {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<T>,
}

/// Paging window shared by every list query.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
}

impl ListOptions {
    /// Converts a 1-based page number and page size into a limit/offset window.
    /// The offset saturates instead of overflowing for absurd page numbers.
    pub fn from_page(page: i64, count: i64) -> Self {
        let page = page.max(1);
        Self {
            limit: count,
            offset: (page - 1).saturating_mul(count.max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 0)]
    #[case(3, 10, 20)]
    #[case(0, 10, 0)]
    #[case(i64::MAX, 100, i64::MAX)]
    #[case(i64::MIN, 100, 0)]
    fn page_numbers_translate_to_offsets(
        #[case] page: i64,
        #[case] count: i64,
        #[case] expected_offset: i64,
    ) {
        let options = ListOptions::from_page(page, count);
        assert_eq!(options.limit, count);
        assert_eq!(options.offset, expected_offset);
    }
}
