use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use log::warn;
use serde::Serialize;

use super::view::RosterView;
use crate::units::height_to_inches;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Canonical (normalized) column names of the roster source.
pub mod columns {
    pub const PLAYER_ID: &str = "playerid";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const POSITION: &str = "position";
    pub const COUNTRY: &str = "country";
    pub const SCHOOL: &str = "school";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const BIRTHDAY: &str = "birthday";
    pub const DRAFT_YEAR: &str = "draft_year";
    pub const DRAFT_ROUND: &str = "draft_round";
    pub const DRAFT_NUMBER: &str = "draft_number";
}

/// Normalize a source header: trim, lower-case, and fold the legacy
/// aliases (`fname`, `lname`, `player_id`) onto their canonical names.
pub fn canonical_column(header: &str) -> String {
    let name = header.trim().to_lowercase();
    match name.as_str() {
        "fname" => columns::FIRST_NAME.to_string(),
        "lname" => columns::LAST_NAME.to_string(),
        "player_id" => columns::PLAYER_ID.to_string(),
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from the source
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, before it is coerced into a [`Player`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The cell rendered as text; `None` for null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Integer value. Whole floats (`2003.0`) and numeric strings are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) => whole_float(*v),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_float))
            }
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

fn whole_float(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

// ---------------------------------------------------------------------------
// Player – one row of the roster
// ---------------------------------------------------------------------------

/// One athlete's record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    /// Kept verbatim; doubles as the image lookup key.
    pub player_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub country: String,
    pub school: String,
    /// Composite `"feet-inches"` height, raw as read.
    pub height: Option<String>,
    /// Pounds.
    pub weight: Option<f64>,
    /// ISO date string, raw as read.
    pub birthday: Option<String>,
    pub draft_year: Option<i64>,
    pub draft_round: Option<i64>,
    pub draft_number: Option<i64>,
}

impl Player {
    /// Build a player from a record keyed by canonical column names.
    /// `row` is only used for diagnostics.
    pub fn from_record(record: &BTreeMap<String, CellValue>, row: usize) -> Self {
        let text = |col: &str| {
            record
                .get(col)
                .and_then(CellValue::as_text)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let raw = |col: &str| {
            record
                .get(col)
                .and_then(CellValue::as_text)
                .filter(|s| !s.trim().is_empty())
        };
        let integer = |col: &str| {
            let cell = record.get(col)?;
            let value = cell.as_i64();
            if value.is_none() && !cell.is_null() {
                warn!("row {row}: ignoring non-integer {col} value '{cell}'");
            }
            value
        };

        let player_id = record
            .get(columns::PLAYER_ID)
            .and_then(CellValue::as_text)
            .unwrap_or_default();
        if player_id.is_empty() {
            warn!("row {row}: empty player id");
        }

        let weight = record.get(columns::WEIGHT).and_then(|cell| {
            let value = cell.as_f64();
            if value.is_none() && !cell.is_null() {
                warn!("row {row}: ignoring non-numeric weight '{cell}'");
            }
            value
        });

        Player {
            player_id,
            first_name: text(columns::FIRST_NAME),
            last_name: text(columns::LAST_NAME),
            position: text(columns::POSITION),
            country: text(columns::COUNTRY),
            school: text(columns::SCHOOL),
            height: raw(columns::HEIGHT),
            weight,
            birthday: raw(columns::BIRTHDAY),
            draft_year: integer(columns::DRAFT_YEAR),
            draft_round: integer(columns::DRAFT_ROUND),
            draft_number: integer(columns::DRAFT_NUMBER),
        }
    }

    /// `"First Last"`, trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Height in inches, `0` when absent or malformed.
    pub fn height_inches(&self) -> u32 {
        self.height.as_deref().map_or(0, height_to_inches)
    }

    /// Lower-cased text searched by the free-text query.
    pub fn search_text(&self) -> String {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.position.as_str(),
            self.country.as_str(),
            self.school.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Roster – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded roster. Immutable once built; every stage reads it through a
/// [`RosterView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    /// All players in source order.
    pub players: Vec<Player>,
    /// Canonical column names present in the source, in source order.
    pub column_names: Vec<String>,
}

impl Roster {
    /// Build the roster from normalized records.
    pub fn from_records(
        column_names: Vec<String>,
        records: &[BTreeMap<String, CellValue>],
    ) -> Self {
        let players: Vec<Player> = records
            .iter()
            .enumerate()
            .map(|(row, record)| Player::from_record(record, row))
            .collect();

        let mut seen = HashSet::new();
        for p in &players {
            if !p.player_id.is_empty() && !seen.insert(p.player_id.as_str()) {
                warn!("duplicate player id '{}'", p.player_id);
            }
        }

        Roster {
            players,
            column_names,
        }
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// A view over every row, in source order.
    pub fn view(&self) -> RosterView<'_> {
        RosterView::full(self)
    }

    /// Look up a player by id.
    pub fn find(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    // -- Facets --

    /// Sorted distinct non-empty positions.
    pub fn position_options(&self) -> Vec<String> {
        self.distinct(columns::POSITION, |p| &p.position)
    }

    /// Sorted distinct non-empty countries.
    pub fn country_options(&self) -> Vec<String> {
        self.distinct(columns::COUNTRY, |p| &p.country)
    }

    pub fn draft_year_bounds(&self) -> Option<(i64, i64)> {
        if !self.has_column(columns::DRAFT_YEAR) {
            return None;
        }
        min_max(self.players.iter().filter_map(|p| p.draft_year))
    }

    /// Shortest and tallest known heights in inches; unknown heights are skipped.
    pub fn height_bounds(&self) -> Option<(u32, u32)> {
        if !self.has_column(columns::HEIGHT) {
            return None;
        }
        min_max(self.players.iter().map(Player::height_inches).filter(|&h| h > 0))
    }

    pub fn weight_bounds(&self) -> Option<(f64, f64)> {
        if !self.has_column(columns::WEIGHT) {
            return None;
        }
        self.players
            .iter()
            .filter_map(|p| p.weight)
            .fold(None, |acc, w| match acc {
                None => Some((w, w)),
                Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
            })
    }

    fn distinct(&self, column: &str, field: impl Fn(&Player) -> &String) -> Vec<String> {
        if !self.has_column(column) {
            return Vec::new();
        }
        self.players
            .iter()
            .map(field)
            .filter(|v| !v.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn min_max<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> BTreeMap<String, CellValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn canonical_column_normalizes_and_folds_aliases() {
        assert_eq!(canonical_column("  First_Name "), "first_name");
        assert_eq!(canonical_column("FNAME"), "first_name");
        assert_eq!(canonical_column("lname"), "last_name");
        assert_eq!(canonical_column("Player_ID"), "playerid");
        assert_eq!(canonical_column("Draft_Year"), "draft_year");
    }

    #[test]
    fn cell_integer_accepts_whole_floats() {
        assert_eq!(s("2003").as_i64(), Some(2003));
        assert_eq!(s("2003.0").as_i64(), Some(2003));
        assert_eq!(CellValue::Float(2003.0).as_i64(), Some(2003));
        assert_eq!(CellValue::Float(2003.5).as_i64(), None);
        assert_eq!(s("n/a").as_i64(), None);
        assert_eq!(CellValue::Null.as_i64(), None);
    }

    #[test]
    fn player_from_record_normalizes_fields() {
        let rec = record(&[
            ("playerid", s("00123")),
            ("first_name", s("  LeBron ")),
            ("last_name", CellValue::Null),
            ("position", s("F")),
            ("height", s("6-9")),
            ("weight", s("250")),
            ("birthday", s("")),
            ("draft_year", s("2003.0")),
            ("draft_round", CellValue::Integer(1)),
        ]);
        let p = Player::from_record(&rec, 0);
        assert_eq!(p.player_id, "00123");
        assert_eq!(p.first_name, "LeBron");
        assert_eq!(p.last_name, "");
        assert_eq!(p.country, "");
        assert_eq!(p.height.as_deref(), Some("6-9"));
        assert_eq!(p.weight, Some(250.0));
        assert_eq!(p.birthday, None);
        assert_eq!(p.draft_year, Some(2003));
        assert_eq!(p.draft_round, Some(1));
        assert_eq!(p.draft_number, None);
        assert_eq!(p.full_name(), "LeBron");
        assert_eq!(p.height_inches(), 81);
    }

    #[test]
    fn search_text_joins_fields_in_order() {
        let rec = record(&[
            ("playerid", s("1")),
            ("first_name", s("Kyrie")),
            ("last_name", s("Irving")),
            ("position", s("G")),
            ("country", s("USA")),
            ("school", s("Duke")),
        ]);
        let p = Player::from_record(&rec, 0);
        assert_eq!(p.search_text(), "kyrie irving g usa duke");
    }

    #[test]
    fn facets_ignore_empty_and_unknown_values() {
        let rows = vec![
            record(&[
                ("playerid", s("1")),
                ("position", s("G")),
                ("height", s("6-2")),
                ("weight", s("190")),
            ]),
            record(&[
                ("playerid", s("2")),
                ("position", s("")),
                ("height", s("bad")),
                ("weight", CellValue::Null),
            ]),
            record(&[
                ("playerid", s("3")),
                ("position", s("C")),
                ("height", s("7-1")),
                ("weight", s("280.5")),
            ]),
            record(&[
                ("playerid", s("4")),
                ("position", s("G")),
                ("height", CellValue::Null),
                ("weight", s("175")),
            ]),
        ];
        let cols = ["playerid", "position", "height", "weight"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let roster = Roster::from_records(cols, &rows);
        assert_eq!(roster.position_options(), vec!["C", "G"]);
        assert!(roster.country_options().is_empty());
        assert_eq!(roster.height_bounds(), Some((74, 85)));
        assert_eq!(roster.weight_bounds(), Some((175.0, 280.5)));
        assert_eq!(roster.draft_year_bounds(), None);
        assert_eq!(roster.find("3").map(|p| p.position.as_str()), Some("C"));
    }
}
