use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use candle_matmul_latency::config::{DEFAULT_REPETITIONS, DEFAULT_SIZE};
use candle_matmul_latency::report::{self, Report};
use candle_matmul_latency::{bench, plot, Backend, BenchConfig, Mode, Precision};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The device family to run on.
    #[arg(long, value_enum, default_value_t = Backend::Cuda)]
    backend: Backend,

    /// Index of the device within its backend.
    #[arg(long, default_value_t = 0)]
    ordinal: usize,

    /// Side length of the square matrices.
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Number of timed multiplies after the warm-up.
    #[arg(long, default_value_t = DEFAULT_REPETITIONS)]
    reps: usize,

    #[arg(long, value_enum, default_value_t = Mode::PerSample)]
    mode: Mode,

    #[arg(long, value_enum, default_value_t = Precision::F32)]
    dtype: Precision,

    /// Seed for the matrix contents, random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON report to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the per-iteration latencies as CSV to this file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write an SVG latency plot to this file (per-sample mode only).
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Enable tracing (generates a trace-timestamp.json file).
    #[arg(long)]
    tracing: bool,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            backend: args.backend,
            ordinal: args.ordinal,
            size: args.size,
            repetitions: args.reps,
            mode: args.mode,
            precision: args.dtype,
            seed: args.seed,
            json: args.json,
            csv: args.csv,
            plot: args.plot,
        }
    }
}

fn main() -> Result<()> {
    use tracing_chrome::ChromeLayerBuilder;
    use tracing_subscriber::prelude::*;

    let args = Args::parse();
    let default_filter = if args.tracing {
        "candle_matmul_latency=trace"
    } else {
        "warn"
    };
    let (chrome_layer, _guard) = if args.tracing {
        let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
        (Some(chrome_layer), Some(guard))
    } else {
        (None, None)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(chrome_layer)
        .init();

    let config = BenchConfig::from(args);
    let bench::Outcome { device, result } = bench::run_benchmark(&config)?;
    println!("Using {device}");
    report::print_report(&result);

    if let Some(path) = &config.json {
        report::save_json(&Report::new(&device, &config, &result), path)?;
    }
    if let Some(path) = &config.csv {
        report::save_csv(&result, path)?;
    }
    if let (Some(path), Some(samples)) = (&config.plot, result.samples()) {
        let title = format!("MatMul latency per iteration - {device}");
        plot::save_svg(samples, &title, path)?;
    }
    Ok(())
}
