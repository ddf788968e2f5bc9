use std::ops::Range;

pub const PAGE_SIZE: usize = 10;

pub fn compute_page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Index range of the records shown on 1-based `page`, clipped to `total`.
pub fn page_window(page: usize, total: usize) -> Range<usize> {
    let start = PAGE_SIZE.saturating_mul(page.saturating_sub(1)).min(total);
    let end = PAGE_SIZE.saturating_mul(page).min(total);
    start..end
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub active: bool,
}

pub fn render_page_links(current: usize, count: usize) -> Vec<PageLink> {
    (1..=count)
        .map(|number| PageLink {
            number,
            active: number == current,
        })
        .collect()
}
