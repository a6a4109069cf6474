use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::info;

use player_directory::cli::Args;
use player_directory::data::loader::{load_file, load_file_as};
use player_directory::data::model::Roster;
use player_directory::state::BrowseState;
use player_directory::units::inches_to_height;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let roster = match args.format {
        Some(format) => load_file_as(&args.path, format),
        None => load_file(&args.path),
    }
    .with_context(|| format!("failed to load roster from {}", args.path.display()))?;

    if args.facets {
        print_facets(&roster);
        return Ok(());
    }

    let criteria = args.criteria(&roster);
    let mut state = BrowseState::new(roster);
    state.sort_column = args.sort.clone();
    state.ascending = !args.descending;
    state.page_size = args.page_size;
    state.criteria = criteria;
    state.page_number = args.page;
    state.refresh().context("invalid filter or page")?;
    info!("{}", state.summary());

    let cards = state.cards(Utc::now().date_naive());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    println!("{}", state.summary());
    println!();
    for card in &cards {
        println!("{}  [{}]", card.name, card.player_id);
        let details = card.detail_line();
        if !details.is_empty() {
            println!("  {details}");
        }
        if let Some(draft) = &card.draft {
            println!("  {draft}");
        }
        println!();
    }
    println!("Page {} of {}", state.page_number, state.page_count().max(1));
    Ok(())
}

fn print_facets(roster: &Roster) {
    println!("Players:   {}", roster.len());
    println!("Positions: {}", roster.position_options().join(", "));
    println!("Countries: {}", roster.country_options().join(", "));
    if let Some((lo, hi)) = roster.draft_year_bounds() {
        println!("Draft:     {lo} – {hi}");
    }
    if let Some((lo, hi)) = roster.height_bounds() {
        println!(
            "Height:    {lo} – {hi} in ({} to {})",
            inches_to_height(lo.into()),
            inches_to_height(hi.into())
        );
    }
    if let Some((lo, hi)) = roster.weight_bounds() {
        println!("Weight:    {lo} – {hi} lbs");
    }
}
