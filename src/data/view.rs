use super::filter::{self, Criteria, FilterError};
use super::model::{Player, Roster};
use super::pager::{self, PageError};
use super::sort::{self, SortField};

/// An ordered selection of rows from a [`Roster`].
///
/// Views never own or mutate player data: each pipeline stage takes a view
/// and returns a new one holding a different list of row indices.
#[derive(Debug, Clone)]
pub struct RosterView<'a> {
    roster: &'a Roster,
    indices: Vec<usize>,
}

impl<'a> RosterView<'a> {
    /// Every row of `roster`, in source order.
    pub fn full(roster: &'a Roster) -> Self {
        Self {
            roster,
            indices: (0..roster.len()).collect(),
        }
    }

    pub(crate) fn with_indices(roster: &'a Roster, indices: Vec<usize>) -> Self {
        Self { roster, indices }
    }

    pub fn roster(&self) -> &'a Roster {
        self.roster
    }

    /// Row indices into [`Roster::players`], in view order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&'a Player> {
        self.indices.get(pos).map(|&i| &self.roster.players[i])
    }

    pub fn players(&self) -> impl Iterator<Item = &'a Player> + '_ {
        let roster = self.roster;
        self.indices.iter().map(move |&i| &roster.players[i])
    }

    pub fn filter(&self, criteria: &Criteria) -> Result<RosterView<'a>, FilterError> {
        filter::apply(self, criteria)
    }

    pub fn sorted(&self, field: SortField, ascending: bool) -> RosterView<'a> {
        sort::sort_view(self, field, ascending)
    }

    pub fn page(&self, page_size: usize, page_number: usize) -> Result<RosterView<'a>, PageError> {
        pager::page(self, page_size, page_number)
    }
}

impl PartialEq for RosterView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.roster, other.roster) && self.indices == other.indices
    }
}
