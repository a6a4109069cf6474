use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;

use super::model::{columns, Player};
use super::view::RosterView;

// ---------------------------------------------------------------------------
// Sortable fields
// ---------------------------------------------------------------------------

/// Columns a view may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    LastName,
    FirstName,
    Position,
    Country,
    DraftYear,
    Height,
    Weight,
    Birthday,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::LastName,
        SortField::FirstName,
        SortField::Position,
        SortField::Country,
        SortField::DraftYear,
        SortField::Height,
        SortField::Weight,
        SortField::Birthday,
    ];

    /// Canonical column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::LastName => columns::LAST_NAME,
            SortField::FirstName => columns::FIRST_NAME,
            SortField::Position => columns::POSITION,
            SortField::Country => columns::COUNTRY,
            SortField::DraftYear => columns::DRAFT_YEAR,
            SortField::Height => columns::HEIGHT,
            SortField::Weight => columns::WEIGHT,
            SortField::Birthday => columns::BIRTHDAY,
        }
    }

    fn key<'p>(&self, p: &'p Player) -> Option<SortKey<'p>> {
        match self {
            SortField::LastName => Some(SortKey::Text(&p.last_name)),
            SortField::FirstName => Some(SortKey::Text(&p.first_name)),
            SortField::Position => Some(SortKey::Text(&p.position)),
            SortField::Country => Some(SortKey::Text(&p.country)),
            SortField::DraftYear => p.draft_year.map(SortKey::Integer),
            // Raw composite string, so "6-11" orders before "6-2".
            SortField::Height => p.height.as_deref().map(SortKey::Text),
            SortField::Weight => p.weight.map(SortKey::Float),
            SortField::Birthday => p.birthday.as_deref().map(SortKey::Text),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot sort by '{0}'")]
pub struct UnknownSortField(pub String);

impl FromStr for SortField {
    type Err = UnknownSortField;

    /// Accepts the column name (`last_name`) and the legacy aliases
    /// (`lname`, `fname`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = super::model::canonical_column(s);
        SortField::ALL
            .into_iter()
            .find(|f| f.column() == name)
            .ok_or_else(|| UnknownSortField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum SortKey<'p> {
    Text(&'p str),
    Integer(i64),
    Float(f64),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }
}

// ---------------------------------------------------------------------------
// Sort stage
// ---------------------------------------------------------------------------

/// Stable sort of `view` by `field`.
///
/// Rows without a value for `field` go last in both directions. When the
/// roster has no such column the view is returned unchanged.
pub fn sort_view<'a>(view: &RosterView<'a>, field: SortField, ascending: bool) -> RosterView<'a> {
    let roster = view.roster();
    if !roster.has_column(field.column()) {
        debug!("sort by {field}: column absent, order unchanged");
        return view.clone();
    }

    let mut indices = view.indices().to_vec();
    indices.sort_by(|&a, &b| {
        let ka = field.key(&roster.players[a]);
        let kb = field.key(&roster.players[b]);
        match (ka, kb) {
            (Some(x), Some(y)) if ascending => x.compare(&y),
            (Some(x), Some(y)) => y.compare(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    RosterView::with_indices(roster, indices)
}

/// Sort by a column given by name; names outside [`SortField::ALL`] leave
/// the view unchanged.
pub fn sort_by_column<'a>(view: &RosterView<'a>, column: &str, ascending: bool) -> RosterView<'a> {
    match column.parse::<SortField>() {
        Ok(field) => sort_view(view, field, ascending),
        Err(e) => {
            warn!("{e}; order unchanged");
            view.clone()
        }
    }
}
