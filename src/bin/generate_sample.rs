//! Writes a deterministic synthetic launch dataset as CSV and Parquet, so the
//! dashboard can be run without the real records.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const OUTPUT_STEM: &str = "spacex_launch_dash";

/// Booster eras: (category, flights, payload mean kg, payload spread kg, success probability)
const ERAS: [(&str, usize, f64, f64, f64); 5] = [
    ("v1.0", 5, 300.0, 250.0, 0.2),
    ("v1.1", 15, 2500.0, 1200.0, 0.3),
    ("FT", 24, 4500.0, 1800.0, 0.7),
    ("B4", 8, 5500.0, 2500.0, 0.6),
    ("B5", 4, 4000.0, 1500.0, 0.9),
];

/// Launch sites with relative weights.
const SITES: [(&str, f64); 4] = [
    ("CCAFS LC-40", 0.47),
    ("KSC LC-39A", 0.23),
    ("VAFB SLC-4E", 0.18),
    ("CCAFS SLC-40", 0.12),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick_weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(name, weight) in choices {
            if target < weight {
                return name;
            }
            target -= weight;
        }
        choices[choices.len() - 1].0
    }
}

fn booster_version(category: &str, flight: i64) -> String {
    match category {
        "v1.0" => format!("F9 v1.0  B{:04}", flight + 2),
        "v1.1" => format!("F9 v1.1  B{}", 1000 + flight),
        other => format!("F9 {other} B{}.1", 1000 + flight),
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut flight_numbers: Vec<i64> = Vec::new();
    let mut sites: Vec<&str> = Vec::new();
    let mut payloads: Vec<f64> = Vec::new();
    let mut versions: Vec<String> = Vec::new();
    let mut categories: Vec<&str> = Vec::new();
    let mut classes: Vec<i64> = Vec::new();

    let mut flight: i64 = 1;
    for &(category, count, mean, spread, p_success) in &ERAS {
        for _ in 0..count {
            // Rounded to whole kilograms, clamped to the slider's span.
            let payload = rng.gauss(mean, spread).clamp(0.0, 10000.0).round();

            flight_numbers.push(flight);
            sites.push(rng.pick_weighted(&SITES));
            payloads.push(payload);
            versions.push(booster_version(category, flight));
            categories.push(category);
            classes.push(i64::from(rng.next_f64() < p_success));
            flight += 1;
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(flight_numbers.clone())),
            Arc::new(StringArray::from(sites.clone())),
            Arc::new(Int64Array::from(classes.clone())),
            Arc::new(Float64Array::from(payloads.clone())),
            Arc::new(StringArray::from(
                versions.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(categories.clone())),
        ],
    )
    .context("building record batch")?;

    // Write CSV
    let csv_path = format!("{OUTPUT_STEM}.csv");
    let mut writer = csv::Writer::from_path(&csv_path).context("creating CSV file")?;
    writer.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;
    for i in 0..flight_numbers.len() {
        writer.write_record([
            flight_numbers[i].to_string(),
            sites[i].to_string(),
            classes[i].to_string(),
            format!("{:.1}", payloads[i]),
            versions[i].clone(),
            categories[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;

    // Write Parquet
    let parquet_path = format!("{OUTPUT_STEM}.parquet");
    let file = std::fs::File::create(&parquet_path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;

    let preview = pretty_format_batches(&[batch.slice(0, 5)])?;
    println!("{preview}");
    println!(
        "Wrote {} launches to {csv_path} and {parquet_path}",
        flight_numbers.len()
    );
    Ok(())
}
