//! Command-line definitions for the player directory.

use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{Bounds, Criteria};
use crate::data::loader::FileFormat;
use crate::data::model::Roster;
use crate::data::pager::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::units::parse_height;

/// Command-line arguments
#[derive(Clone, Parser, Debug)]
#[command(
    name = "player-directory",
    version,
    about = "Search, filter, sort and page through a player roster"
)]
pub struct Args {
    /// Roster file (.csv, .json, .parquet)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Read the file as this format instead of guessing from its extension
    #[arg(long, value_enum)]
    pub format: Option<FileFormat>,

    /// Case-insensitive text matched against name, position, country and school
    #[arg(short, long)]
    pub query: Option<String>,

    /// Keep only these positions (repeatable)
    #[arg(long = "position", value_name = "POSITION")]
    pub positions: Vec<String>,

    /// Keep only these countries (repeatable)
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<String>,

    /// Earliest draft year (inclusive)
    #[arg(long)]
    pub draft_year_min: Option<i64>,

    /// Latest draft year (inclusive)
    #[arg(long)]
    pub draft_year_max: Option<i64>,

    /// Minimum height, in inches (`80`) or feet-inches (`6-8`)
    #[arg(long, value_parser = parse_height_arg)]
    pub height_min: Option<u32>,

    /// Maximum height, in inches (`80`) or feet-inches (`6-8`)
    #[arg(long, value_parser = parse_height_arg)]
    pub height_max: Option<u32>,

    /// Minimum weight in pounds
    #[arg(long)]
    pub weight_min: Option<f64>,

    /// Maximum weight in pounds
    #[arg(long)]
    pub weight_max: Option<f64>,

    /// Column to sort by: last_name, first_name, position, country,
    /// draft_year, height, weight, birthday
    #[arg(long, default_value = "last_name")]
    pub sort: String,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Players per page: 6, 9, 12, 24 or 48
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Print the available positions, countries and ranges, then exit
    #[arg(long)]
    pub facets: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Build filter criteria. A range given on one side only takes its other
    /// side from the roster's own extent, widened to include the given bound.
    pub fn criteria(&self, roster: &Roster) -> Criteria {
        Criteria {
            query: self.query.clone().filter(|q| !q.is_empty()),
            positions: self.positions.iter().cloned().collect(),
            countries: self.countries.iter().cloned().collect(),
            draft_years: complete(
                self.draft_year_min,
                self.draft_year_max,
                roster.draft_year_bounds().unwrap_or((i64::MIN, i64::MAX)),
            ),
            height: complete(
                self.height_min,
                self.height_max,
                roster.height_bounds().unwrap_or((0, u32::MAX)),
            ),
            weight: complete(
                self.weight_min,
                self.weight_max,
                roster
                    .weight_bounds()
                    .unwrap_or((f64::NEG_INFINITY, f64::INFINITY)),
            ),
        }
    }
}

fn complete<T: PartialOrd + Copy>(
    min: Option<T>,
    max: Option<T>,
    extent: (T, T),
) -> Option<Bounds<T>> {
    let (lo, hi) = match (min, max) {
        (None, None) => return None,
        (Some(lo), Some(hi)) => (lo, hi),
        (Some(lo), None) => (lo, if extent.1 < lo { lo } else { extent.1 }),
        (None, Some(hi)) => (if extent.0 > hi { hi } else { extent.0 }, hi),
    };
    Some(Bounds::new(lo, hi))
}

/// Accept only the page sizes a front end offers.
pub fn parse_page_size(s: &str) -> Result<usize, String> {
    let size = s
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid page size '{s}': {e}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

/// Accept a height as plain inches or as a composite `F-I` string.
pub fn parse_height_arg(s: &str) -> Result<u32, String> {
    if s.contains('-') {
        parse_height(s)
            .map(|h| h.total_inches())
            .map_err(|e| e.to_string())
    } else {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid height '{s}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn roster() -> Roster {
        read_csv(
            "playerid,height,weight,draft_year\n1,6-2,180,1999\n2,7-1,290,2015\n".as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn height_arg_accepts_both_forms() {
        assert_eq!(parse_height_arg("80"), Ok(80));
        assert_eq!(parse_height_arg("6-8"), Ok(80));
        assert!(parse_height_arg("tall").is_err());
        assert!(parse_height_arg("6-8-1").is_err());
    }

    #[test]
    fn one_sided_ranges_use_roster_extent() {
        let args = Args::parse_from([
            "player-directory",
            "p.csv",
            "--height-min",
            "6-6",
            "--draft-year-max",
            "2005",
        ]);
        let c = args.criteria(&roster());
        assert_eq!(c.height, Some(Bounds::new(78, 85)));
        assert_eq!(c.draft_years, Some(Bounds::new(1999, 2005)));
        assert_eq!(c.weight, None);
    }

    #[test]
    fn one_sided_bound_outside_extent_matches_nothing() {
        let roster = roster();

        let args = Args::parse_from(["player-directory", "p.csv", "--weight-min", "300"]);
        let c = args.criteria(&roster);
        assert_eq!(c.weight, Some(Bounds::new(300.0, 300.0)));
        assert!(roster.view().filter(&c).unwrap().is_empty());

        let args = Args::parse_from(["player-directory", "p.csv", "--draft-year-max", "1990"]);
        let c = args.criteria(&roster);
        assert_eq!(c.draft_years, Some(Bounds::new(1990, 1990)));
        assert!(roster.view().filter(&c).unwrap().is_empty());

        let args = Args::parse_from(["player-directory", "p.csv", "--height-max", "5-0"]);
        assert!(roster.view().filter(&args.criteria(&roster)).unwrap().is_empty());
    }

    #[test]
    fn page_size_limited_to_offered_options() {
        assert_eq!(parse_page_size("24"), Ok(24));
        assert!(parse_page_size("10").is_err());
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("many").is_err());

        let args = Args::parse_from(["player-directory", "p.csv", "--page-size", "48"]);
        assert_eq!(args.page_size, 48);
        let rejected = Args::try_parse_from(["player-directory", "p.csv", "--page-size", "7"]);
        assert!(rejected.is_err());
    }

    #[test]
    fn repeatable_sets() {
        let args = Args::parse_from([
            "player-directory",
            "p.csv",
            "--position",
            "G",
            "--position",
            "F",
            "--country",
            "USA",
        ]);
        let c = args.criteria(&roster());
        assert_eq!(c.positions.len(), 2);
        assert!(c.countries.contains("USA"));
        assert_eq!(args.page_size, 12);
        assert_eq!(args.page, 1);
    }
}
