use super::view::RosterView;

/// Page sizes offered to a front end.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [6, 9, 12, 24, 48];

pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page size must be a positive integer")]
    ZeroPageSize,
    #[error("page number must be 1 or greater")]
    ZeroPageNumber,
}

/// The `page_number`-th (1-based) slice of `page_size` rows.
///
/// A page past the end is empty, not an error.
pub fn page<'a>(
    view: &RosterView<'a>,
    page_size: usize,
    page_number: usize,
) -> Result<RosterView<'a>, PageError> {
    if page_size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    if page_number == 0 {
        return Err(PageError::ZeroPageNumber);
    }
    let all = view.indices();
    let start = (page_number - 1)
        .checked_mul(page_size)
        .map_or(all.len(), |s| s.min(all.len()));
    let end = start.saturating_add(page_size).min(all.len());
    Ok(RosterView::with_indices(view.roster(), all[start..end].to_vec()))
}

/// Number of pages needed for `total` rows; zero rows need zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}
