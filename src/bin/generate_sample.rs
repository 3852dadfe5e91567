use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::{Parser, Subcommand};
use parquet::arrow::ArrowWriter;

/// Write synthetic group or spectral point tables for the plotting tools.
#[derive(Parser)]
#[command(name = "generate-sample", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spectral bins grouped around the peaks of six summed sines
    Groups {
        /// Output table (.parquet, otherwise whitespace text)
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },
    /// Time-varying partials as (time, frequency, magnitude) points
    Spectral {
        /// Output table (.parquet, otherwise whitespace text)
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Signal model
// ---------------------------------------------------------------------------

/// Sines mixed into the group sample: (Hz, amplitude).
const SINES: [(f64, f64); 6] = [
    (440.0, 1.0),
    (550.0, 1.0),
    (660.0, 1.0),
    (880.0, 1.0),
    (350.0, 0.5),
    (1000.0, 0.5),
];

/// Bin spacing of the simulated one second window.
const BIN_HZ: f64 = 2.0;
/// Half width of a window main lobe.
const LOBE_HZ: f64 = 6.0;
const NOISE_FLOOR: f64 = 1e-4;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }
}

/// One analysis bin: bin frequency, reassigned frequency (both Hz) and
/// magnitude.
struct Bin {
    freq: f64,
    reassigned: f64,
    magnitude: f64,
}

fn spectrum(rng: &mut SimpleRng) -> Vec<Bin> {
    let n = (1200.0 / BIN_HZ) as usize;
    (1..n)
        .map(|k| {
            let freq = k as f64 * BIN_HZ;
            let magnitude = SINES
                .iter()
                .map(|&(f, a)| gaussian(freq, f, LOBE_HZ / 2.0, a / 2.0))
                .sum::<f64>()
                + NOISE_FLOOR * (1.0 + rng.next_f64());
            // Inside a main lobe the reassigned frequency snaps to the sine.
            let reassigned = SINES
                .iter()
                .map(|&(f, _)| f)
                .find(|f| (freq - f).abs() <= LOBE_HZ)
                .unwrap_or(freq + rng.gauss(0.0, BIN_HZ));
            Bin {
                freq,
                reassigned,
                magnitude,
            }
        })
        .collect()
}

/// Split the bins at local magnitude minima; each group keeps its left bin
/// and its peak bin. Rows are (freq rad, reassigned rad, magnitude, left,
/// center).
fn group_rows(bins: &[Bin]) -> Vec<[f64; 5]> {
    let mut bounds = vec![0];
    for i in 1..bins.len().saturating_sub(1) {
        let m = bins[i].magnitude;
        if m < bins[i - 1].magnitude && m <= bins[i + 1].magnitude {
            bounds.push(i);
        }
    }
    bounds.push(bins.len());

    let mut rows = Vec::with_capacity(bins.len());
    for window in bounds.windows(2) {
        let (left, right) = (window[0], window[1]);
        let center = (left..right)
            .max_by(|&a, &b| bins[a].magnitude.total_cmp(&bins[b].magnitude))
            .unwrap_or(left);
        for (i, bin) in bins.iter().enumerate().take(right).skip(left) {
            rows.push([
                bin.freq * TAU,
                bin.reassigned * TAU,
                bin.magnitude,
                f64::from(u8::from(i == left)),
                f64::from(u8::from(i == center)),
            ]);
        }
    }
    rows
}

/// A glide, a steady tone with vibrato and a fading harmonic, plus a
/// scattering of faint noise points.
fn spectral_rows(rng: &mut SimpleRng) -> Vec<[f64; 3]> {
    let frames = 200;
    let hop = 0.01;
    let mut rows = Vec::new();
    for i in 0..frames {
        let t = i as f64 * hop;
        let progress = i as f64 / frames as f64;

        let glide = 220.0 * 2f64.powf(progress);
        let vibrato = 660.0 + 8.0 * (TAU * 5.0 * t).sin();
        let harmonic = 2.0 * vibrato;
        for (hz, magnitude) in [
            (glide, 1.0),
            (vibrato, 0.6),
            (harmonic, 0.3 * (1.0 - progress)),
        ] {
            let time = t + rng.gauss(0.0, hop / 10.0);
            let freq = hz + rng.gauss(0.0, 1.0);
            rows.push([time, freq * TAU, magnitude]);
        }
        for _ in 0..4 {
            let freq = 50.0 + 1500.0 * rng.next_f64();
            rows.push([t, freq * TAU, 0.03 * rng.next_f64()]);
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"))
}

fn write_text<const N: usize>(path: &Path, rows: &[[f64; N]]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn write_parquet<const N: usize>(path: &Path, names: [&str; N], rows: &[[f64; N]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..N)
        .map(|j| Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r[j]))) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("Failed to create RecordBatch")?;

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn write_table<const N: usize>(path: &Path, names: [&str; N], rows: &[[f64; N]]) -> Result<()> {
    if is_parquet(path) {
        write_parquet(path, names, rows)
    } else {
        write_text(path, rows)
    }
}

fn main() -> Result<()> {
    spectral_plots::cli::init_logging(0);
    let cli = Cli::parse();
    let mut rng = SimpleRng::new(42);

    match cli.command {
        Commands::Groups { output } => {
            let rows = group_rows(&spectrum(&mut rng));
            write_table(
                &output,
                ["freq", "freq_reassigned", "magnitude", "left_bin", "center_bin"],
                &rows,
            )?;
            log::info!("Wrote {} group rows to {}", rows.len(), output.display());
        }
        Commands::Spectral { output } => {
            let rows = spectral_rows(&mut rng);
            write_table(&output, ["time", "freq", "magnitude"], &rows)?;
            log::info!("Wrote {} spectral points to {}", rows.len(), output.display());
        }
    }
    Ok(())
}
