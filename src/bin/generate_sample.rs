use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// One synthetic state-month row. `None` is written as an empty CSV field
/// and an Arrow null.
#[derive(Clone, serde::Serialize)]
struct Row {
    state: String,
    region: Option<String>,
    region_name: String,
    divis: String,
    divis_name: String,
    year: i64,
    monthno: i64,
    benperhh: f64,
    benperp: f64,
    pop_urban_2010: f64,
    pop_rural_2010: f64,
    totpop_2010: f64,
    pct_pop_urban_2010: f64,
    pct_pop_rural_2010: f64,
}

/// (state, region, region name, division, division name, urban pop, rural pop, base benefit per person)
const STATES: [(&str, &str, &str, &str, &str, f64, f64, f64); 6] = [
    ("AL", "3", "South", "6", "East South Central", 2_821_804.0, 1_957_932.0, 118.0),
    ("CA", "4", "West", "9", "Pacific", 35_373_606.0, 1_880_350.0, 142.0),
    ("GA", "3", "South", "5", "South Atlantic", 7_272_151.0, 2_415_502.0, 124.0),
    ("IL", "2", "Midwest", "3", "East North Central", 11_353_553.0, 1_477_079.0, 131.0),
    ("NY", "1", "Northeast", "2", "Middle Atlantic", 17_028_105.0, 2_350_997.0, 139.0),
    ("TX", "3", "South", "7", "West South Central", 21_298_039.0, 3_847_522.0, 121.0),
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

    /// Uniform noise in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for year in 2015..=2024 {
        for monthno in 1..=12 {
            let t = (year - 2015) as f64 + (monthno - 1) as f64 / 12.0;
            // Emergency allotments roughly doubled benefits from spring 2020
            // until early 2023.
            let emergency = (year, monthno) >= (2020, 4) && (year, monthno) < (2023, 3);

            for &(state, region, region_name, divis, divis_name, urban, rural, base) in &STATES {
                // Skip a few months for one state to exercise partial coverage.
                if state == "NY" && year == 2018 && monthno <= 3 {
                    continue;
                }
                let mut per_person = base * (1.0 + 0.02 * t) + rng.jitter(3.0);
                if emergency {
                    per_person *= 1.9;
                }
                let household_size = 1.9 + rng.jitter(0.1);
                let total = urban + rural;

                rows.push(Row {
                    state: state.to_string(),
                    region: Some(region.to_string()),
                    region_name: region_name.to_string(),
                    divis: divis.to_string(),
                    divis_name: divis_name.to_string(),
                    year,
                    monthno,
                    benperhh: round2(per_person * household_size),
                    benperp: round2(per_person),
                    pop_urban_2010: urban,
                    pop_rural_2010: rural,
                    totpop_2010: total,
                    pct_pop_urban_2010: round2(urban / total * 100.0),
                    pct_pop_rural_2010: round2(rural / total * 100.0),
                });
            }
        }
    }

    // Dirty rows the cleaner is expected to drop.
    if let Some(template) = rows.first() {
        let mut negative = template.clone();
        negative.benperhh = -5.0;
        let mut no_region = template.clone();
        no_region.region = None;
        let mut bad_month = template.clone();
        bad_month.monthno = 13;
        rows.extend([negative, no_region, bad_month]);
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> anyhow::Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let region: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(|r| r.region.as_deref()).collect::<Vec<_>>(),
    ));

    let utf8 = |name: &str| Field::new(name, DataType::Utf8, true);
    let i64f = |name: &str| Field::new(name, DataType::Int64, false);
    let f64f = |name: &str| Field::new(name, DataType::Float64, false);
    let schema = Arc::new(Schema::new(vec![
        utf8("state"),
        utf8("region"),
        utf8("region_name"),
        utf8("divis"),
        utf8("divis_name"),
        i64f("year"),
        i64f("monthno"),
        f64f("benperhh"),
        f64f("benperp"),
        f64f("pop_urban_2010"),
        f64f("pop_rural_2010"),
        f64f("totpop_2010"),
        f64f("pct_pop_urban_2010"),
        f64f("pct_pop_rural_2010"),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.state.as_str()),
            region,
            text(|r| r.region_name.as_str()),
            text(|r| r.divis.as_str()),
            text(|r| r.divis_name.as_str()),
            int(|r| r.year),
            int(|r| r.monthno),
            float(|r| r.benperhh),
            float(|r| r.benperp),
            float(|r| r.pop_urban_2010),
            float(|r| r.pop_rural_2010),
            float(|r| r.totpop_2010),
            float(|r| r.pct_pop_urban_2010),
            float(|r| r.pct_pop_rural_2010),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_snap.csv")?;
    write_parquet(&rows, "sample_snap.parquet")?;

    println!(
        "Wrote {} rows for {} states to sample_snap.csv and sample_snap.parquet",
        rows.len(),
        STATES.len()
    );
    Ok(())
}
