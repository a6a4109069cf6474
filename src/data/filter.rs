use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use super::model::{columns, Player, Roster};
use super::view::RosterView;

// ---------------------------------------------------------------------------
// Criteria: the active filter parameters
// ---------------------------------------------------------------------------

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Filter parameters for one pipeline run. The default value filters nothing.
///
/// * `query` – case-insensitive substring over name, position, country, school
/// * `positions` / `countries` – empty set means "any"
/// * ranges – `None` means inactive; bounds are inclusive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub query: Option<String>,
    pub positions: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub draft_years: Option<Bounds<i64>>,
    /// Inches.
    pub height: Option<Bounds<u32>>,
    /// Pounds.
    pub weight: Option<Bounds<f64>>,
}

impl Criteria {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_positions<I, S>(mut self, positions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.positions = positions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_draft_years(mut self, min: i64, max: i64) -> Self {
        self.draft_years = Some(Bounds::new(min, max));
        self
    }

    pub fn with_height(mut self, min: u32, max: u32) -> Self {
        self.height = Some(Bounds::new(min, max));
        self
    }

    pub fn with_weight(mut self, min: f64, max: f64) -> Self {
        self.weight = Some(Bounds::new(min, max));
        self
    }

    /// Whether no filter is active at all.
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, str::is_empty)
            && self.positions.is_empty()
            && self.countries.is_empty()
            && self.draft_years.is_none()
            && self.height.is_none()
            && self.weight.is_none()
    }

    /// Check every range in pipeline order and report the first reversed one.
    pub fn validate(&self) -> Result<(), FilterError> {
        check(RangeField::DraftYear, self.draft_years)?;
        check(RangeField::Height, self.height)?;
        check(RangeField::Weight, self.weight)
    }
}

fn check<T: PartialOrd + Copy + fmt::Display>(
    field: RangeField,
    bounds: Option<Bounds<T>>,
) -> Result<(), FilterError> {
    match bounds {
        Some(b) if !b.is_valid() => Err(FilterError::InvalidRange {
            field,
            min: b.min.to_string(),
            max: b.max.to_string(),
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The numeric filters, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    DraftYear,
    Height,
    Weight,
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeField::DraftYear => "draft year",
            RangeField::Height => "height",
            RangeField::Weight => "weight",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("minimum {field} ({min}) cannot be greater than maximum {field} ({max})")]
    InvalidRange {
        field: RangeField,
        min: String,
        max: String,
    },
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Narrow `view` to the rows matching `criteria`, keeping view order.
///
/// Steps run in a fixed order, each one narrowing the previous result:
/// text query, positions, countries, draft years, height, weight. A step
/// whose column is absent from the roster is skipped. Ranges are validated
/// before any row is examined.
pub fn apply<'a>(
    view: &RosterView<'a>,
    criteria: &Criteria,
) -> Result<RosterView<'a>, FilterError> {
    criteria.validate()?;

    let roster = view.roster();
    let steps = Steps::new(roster, criteria);

    let indices: Vec<usize> = view
        .indices()
        .iter()
        .copied()
        .filter(|&i| steps.matches(&roster.players[i]))
        .collect();

    debug!("filter kept {} of {} rows", indices.len(), view.len());
    Ok(RosterView::with_indices(roster, indices))
}

/// The active steps of one run, resolved against the roster's columns.
struct Steps<'c> {
    query: Option<String>,
    positions: Option<&'c BTreeSet<String>>,
    countries: Option<&'c BTreeSet<String>>,
    draft_years: Option<Bounds<i64>>,
    height: Option<Bounds<u32>>,
    weight: Option<Bounds<f64>>,
}

impl<'c> Steps<'c> {
    fn new(roster: &Roster, criteria: &'c Criteria) -> Self {
        let set = |values: &'c BTreeSet<String>, column: &str| {
            (!values.is_empty() && roster.has_column(column)).then_some(values)
        };
        Self {
            query: criteria
                .query
                .as_deref()
                .filter(|q| !q.is_empty())
                .map(str::to_lowercase),
            positions: set(&criteria.positions, columns::POSITION),
            countries: set(&criteria.countries, columns::COUNTRY),
            draft_years: criteria
                .draft_years
                .filter(|_| roster.has_column(columns::DRAFT_YEAR)),
            height: criteria.height.filter(|_| roster.has_column(columns::HEIGHT)),
            weight: criteria.weight.filter(|_| roster.has_column(columns::WEIGHT)),
        }
    }

    fn matches(&self, p: &Player) -> bool {
        if let Some(q) = &self.query {
            if !p.search_text().contains(q.as_str()) {
                return false;
            }
        }
        if let Some(set) = self.positions {
            if !set.contains(&p.position) {
                return false;
            }
        }
        if let Some(set) = self.countries {
            if !set.contains(&p.country) {
                return false;
            }
        }
        if let Some(b) = self.draft_years {
            // No draft year: outside any active range.
            if !p.draft_year.is_some_and(|y| b.contains(y)) {
                return false;
            }
        }
        if let Some(b) = self.height {
            let inches = p.height_inches();
            if inches == 0 || !b.contains(inches) {
                return false;
            }
        }
        if let Some(b) = self.weight {
            if !p.weight.is_some_and(|w| b.contains(w)) {
                return false;
            }
        }
        true
    }
}
