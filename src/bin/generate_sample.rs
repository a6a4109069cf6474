use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST: [&str; 12] = [
    "Marcus", "Jalen", "Luka", "Nikola", "Tyrese", "Andre", "Darius", "Kevin", "Pascal", "Rudy",
    "Devin", "Zion",
];
const LAST: [&str; 12] = [
    "Holloway", "Brooks", "Petrovic", "Okafor", "Lindqvist", "Moreau", "Adeyemi", "Tanaka",
    "Silva", "Kowalski", "Barnes", "Dubois",
];
const POSITIONS: [&str; 7] = ["G", "F", "C", "G-F", "F-G", "F-C", "C-F"];
const COUNTRIES: [&str; 6] = ["USA", "Canada", "France", "Serbia", "Nigeria", "Australia"];
const SCHOOLS: [&str; 7] = ["Duke", "Kentucky", "Gonzaga", "Duquesne", "Villanova", "", ""];

/// Minimal deterministic generator (64-bit LCG, high bits).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

struct SampleRow {
    player_id: String,
    first_name: String,
    last_name: String,
    position: String,
    country: String,
    school: String,
    height: Option<String>,
    weight: Option<f64>,
    birthday: Option<String>,
    draft_year: Option<i64>,
    draft_round: Option<i64>,
    draft_number: Option<i64>,
}

fn generate(n: usize) -> Vec<SampleRow> {
    let mut rng = Lcg(42);
    (0..n)
        .map(|i| {
            let inches = 72 + rng.below(17) as i64;
            let drafted = rng.below(5) != 0;
            let draft_year = 1996 + rng.below(30) as i64;
            SampleRow {
                // Leading zeros on purpose: ids must survive as strings.
                player_id: format!("{:06}", 1000 + i * 7),
                first_name: rng.pick(&FIRST).to_string(),
                last_name: rng.pick(&LAST).to_string(),
                position: rng.pick(&POSITIONS).to_string(),
                country: rng.pick(&COUNTRIES).to_string(),
                school: rng.pick(&SCHOOLS).to_string(),
                height: (rng.below(20) != 0).then(|| format!("{}-{}", inches / 12, inches % 12)),
                weight: (rng.below(20) != 0).then(|| 170.0 + rng.below(110) as f64),
                birthday: Some(format!(
                    "{}-{:02}-{:02}",
                    draft_year - 19 - rng.below(3) as i64,
                    1 + rng.below(12),
                    1 + rng.below(28)
                )),
                draft_year: drafted.then_some(draft_year),
                draft_round: drafted.then(|| 1 + rng.below(2) as i64),
                draft_number: drafted.then(|| 1 + rng.below(30) as i64),
            }
        })
        .collect()
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "playerid", "first_name", "last_name", "position", "country", "school", "height",
        "weight", "birthday", "draft_year", "draft_round", "draft_number",
    ])?;
    let opt = |v: Option<String>| v.unwrap_or_default();
    for r in rows {
        writer.write_record([
            r.player_id.clone(),
            r.first_name.clone(),
            r.last_name.clone(),
            r.position.clone(),
            r.country.clone(),
            r.school.clone(),
            opt(r.height.clone()),
            opt(r.weight.map(|w| w.to_string())),
            opt(r.birthday.clone()),
            opt(r.draft_year.map(|v| v.to_string())),
            opt(r.draft_round.map(|v| v.to_string())),
            opt(r.draft_number.map(|v| v.to_string())),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let opt_text = |f: fn(&SampleRow) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&SampleRow) -> Option<i64>| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("playerid", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, false),
        Field::new("last_name", DataType::Utf8, false),
        Field::new("position", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("school", DataType::Utf8, false),
        Field::new("height", DataType::Utf8, true),
        Field::new("weight", DataType::Float64, true),
        Field::new("birthday", DataType::Utf8, true),
        Field::new("draft_year", DataType::Int64, true),
        Field::new("draft_round", DataType::Int64, true),
        Field::new("draft_number", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.player_id.as_str()),
            text(|r| r.first_name.as_str()),
            text(|r| r.last_name.as_str()),
            text(|r| r.position.as_str()),
            text(|r| r.country.as_str()),
            text(|r| r.school.as_str()),
            opt_text(|r| r.height.as_deref()),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.weight).collect::<Vec<_>>(),
            )) as ArrayRef,
            opt_text(|r| r.birthday.as_deref()),
            int(|r| r.draft_year),
            int(|r| r.draft_round),
            int(|r| r.draft_number),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let rows = generate(120);
    write_csv(&rows, "sample_players.csv")?;
    write_parquet(&rows, "sample_players.parquet")?;
    println!(
        "Wrote {} players to sample_players.csv and sample_players.parquet",
        rows.len()
    );
    Ok(())
}
