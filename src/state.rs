use chrono::NaiveDate;
use log::debug;

use crate::card::PlayerCard;
use crate::data::filter::{Bounds, Criteria, FilterError};
use crate::data::model::{Player, Roster};
use crate::data::pager::{self, PageError, DEFAULT_PAGE_SIZE};
use crate::data::sort;

/// Anything that stops the visible page from being computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowseError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Page(#[from] PageError),
}

// ---------------------------------------------------------------------------
// Browse state
// ---------------------------------------------------------------------------

/// The full browse session, independent of any front end.
///
/// Every setter records the new parameter and recomputes the visible page
/// from the immutable roster.
pub struct BrowseState {
    /// Loaded roster; never modified.
    pub roster: Roster,

    /// Active filters.
    pub criteria: Criteria,

    /// Column to sort by; names outside the sortable set leave source order.
    pub sort_column: String,
    pub ascending: bool,

    pub page_size: usize,
    /// 1-based.
    pub page_number: usize,

    /// Rows passing the filters, before paging.
    pub matched: usize,

    /// Row indices on the current page (cached).
    pub visible_indices: Vec<usize>,

    /// Validation message for the last refresh, if it failed.
    pub status_message: Option<String>,
}

impl BrowseState {
    pub fn new(roster: Roster) -> Self {
        let mut state = Self {
            roster,
            criteria: Criteria::default(),
            sort_column: "last_name".to_string(),
            ascending: true,
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
            matched: 0,
            visible_indices: Vec::new(),
            status_message: None,
        };
        let refreshed = state.refresh();
        debug_assert!(refreshed.is_ok(), "default parameters must be valid");
        state
    }

    /// Recompute `matched` and `visible_indices` from the current parameters.
    ///
    /// On failure the page is cleared and the message is kept in
    /// `status_message`, so "invalid input" never looks like "no results".
    pub fn refresh(&mut self) -> Result<(), BrowseError> {
        match self.compute() {
            Ok((matched, visible)) => {
                debug!(
                    "{matched} of {} players match; showing {} on page {}",
                    self.roster.len(),
                    visible.len(),
                    self.page_number
                );
                self.matched = matched;
                self.visible_indices = visible;
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                self.matched = 0;
                self.visible_indices.clear();
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn compute(&self) -> Result<(usize, Vec<usize>), BrowseError> {
        let filtered = self.roster.view().filter(&self.criteria)?;
        let sorted = sort::sort_by_column(&filtered, &self.sort_column, self.ascending);
        let page = sorted.page(self.page_size, self.page_number)?;
        Ok((filtered.len(), page.indices().to_vec()))
    }

    // -- Filters: each change returns to the first page --

    pub fn set_criteria(&mut self, criteria: Criteria) -> Result<(), BrowseError> {
        self.criteria = criteria;
        self.page_number = 1;
        self.refresh()
    }

    pub fn set_query(&mut self, query: &str) -> Result<(), BrowseError> {
        self.criteria.query = Some(query.to_string()).filter(|q| !q.is_empty());
        self.page_number = 1;
        self.refresh()
    }

    /// Toggle a single position in the position filter.
    pub fn toggle_position(&mut self, position: &str) -> Result<(), BrowseError> {
        toggle(&mut self.criteria.positions, position);
        self.page_number = 1;
        self.refresh()
    }

    /// Toggle a single country in the country filter.
    pub fn toggle_country(&mut self, country: &str) -> Result<(), BrowseError> {
        toggle(&mut self.criteria.countries, country);
        self.page_number = 1;
        self.refresh()
    }

    pub fn set_draft_years(&mut self, range: Option<Bounds<i64>>) -> Result<(), BrowseError> {
        self.criteria.draft_years = range;
        self.page_number = 1;
        self.refresh()
    }

    pub fn set_height(&mut self, range: Option<Bounds<u32>>) -> Result<(), BrowseError> {
        self.criteria.height = range;
        self.page_number = 1;
        self.refresh()
    }

    pub fn set_weight(&mut self, range: Option<Bounds<f64>>) -> Result<(), BrowseError> {
        self.criteria.weight = range;
        self.page_number = 1;
        self.refresh()
    }

    // -- Ordering and paging --

    pub fn set_sort(&mut self, column: &str, ascending: bool) -> Result<(), BrowseError> {
        self.sort_column = column.to_string();
        self.ascending = ascending;
        self.refresh()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), BrowseError> {
        self.page_size = page_size;
        self.page_number = 1;
        self.refresh()
    }

    pub fn set_page(&mut self, page_number: usize) -> Result<(), BrowseError> {
        self.page_number = page_number;
        self.refresh()
    }

    /// Number of pages for the current matches.
    pub fn page_count(&self) -> usize {
        pager::page_count(self.matched, self.page_size)
    }

    // -- Output --

    pub fn visible_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.visible_indices.iter().map(|&i| &self.roster.players[i])
    }

    pub fn cards(&self, today: NaiveDate) -> Vec<PlayerCard> {
        self.visible_players()
            .map(|p| PlayerCard::new(p, today))
            .collect()
    }

    /// e.g. `"Showing 12 of 480 players"`.
    pub fn summary(&self) -> String {
        format!("Showing {} of {} players", self.matched, self.roster.len())
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const CSV: &str = "\
playerid,first_name,last_name,position,country,height,weight
1,Kobe,Bryant,G,USA,6-6,212
2,LeBron,James,F,USA,6-9,250
3,Tony,Parker,G,France,6-2,185
4,Dirk,Nowitzki,F,Germany,7-0,245
5,Steve,Nash,G,Canada,6-3,178
";

    fn state() -> BrowseState {
        BrowseState::new(read_csv(CSV.as_bytes()).unwrap())
    }

    fn last_names(s: &BrowseState) -> Vec<&str> {
        s.visible_players().map(|p| p.last_name.as_str()).collect()
    }

    #[test]
    fn starts_sorted_by_last_name() {
        let s = state();
        assert_eq!(s.matched, 5);
        assert_eq!(last_names(&s), vec!["Bryant", "James", "Nash", "Nowitzki", "Parker"]);
        assert_eq!(s.summary(), "Showing 5 of 5 players");
    }

    #[test]
    fn filters_then_pages() {
        let mut s = state();
        s.toggle_position("G").unwrap();
        s.set_page_size(2).unwrap();
        assert_eq!(s.matched, 3);
        assert_eq!(s.page_count(), 2);
        assert_eq!(last_names(&s), vec!["Bryant", "Nash"]);
        s.set_page(2).unwrap();
        assert_eq!(last_names(&s), vec!["Parker"]);

        // Toggling again clears the position filter and returns to page 1.
        s.toggle_position("G").unwrap();
        assert_eq!(s.page_number, 1);
        assert_eq!(s.matched, 5);
    }

    #[test]
    fn descending_weight() {
        let mut s = state();
        s.set_sort("weight", false).unwrap();
        assert_eq!(last_names(&s), vec!["James", "Nowitzki", "Bryant", "Parker", "Nash"]);
    }

    #[test]
    fn invalid_range_sets_status_message() {
        let mut s = state();
        let err = s.set_height(Some(Bounds::new(85, 80))).unwrap_err();
        assert!(matches!(err, BrowseError::Filter(_)));
        assert!(s.visible_indices.is_empty());
        assert_eq!(
            s.status_message.as_deref(),
            Some("minimum height (85) cannot be greater than maximum height (80)")
        );

        s.set_height(Some(Bounds::new(74, 80))).unwrap();
        assert_eq!(s.status_message, None);
        assert_eq!(s.matched, 3);
    }

    #[test]
    fn zero_page_is_rejected() {
        let mut s = state();
        assert_eq!(s.set_page(0), Err(BrowseError::Page(PageError::ZeroPageNumber)));
    }
}
