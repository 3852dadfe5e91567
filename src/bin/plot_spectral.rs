use anyhow::{anyhow, Context, Result};
use clap::Parser;

use spectral_plots::app::{self, Figure};
use spectral_plots::cli::{self, PlotArgs};
use spectral_plots::pipeline::{self, SpectralScatterPipeline};
use spectral_plots::RenderConfig;

fn main() -> Result<()> {
    let args = PlotArgs::parse();
    args.init_logging();

    let Ok(input) = args.input() else {
        println!("{}", cli::usage_line(&cli::program_name("plot-spectral")));
        return Ok(());
    };

    let config = RenderConfig::default();
    let out = pipeline::run(&SpectralScatterPipeline, input, &config)
        .with_context(|| format!("Failed to plot spectral points from {}", input.display()))?;

    if !args.no_show {
        let name = out.output.display().to_string();
        let figure = Figure::Raster {
            name,
            bytes: out.bytes.into(),
        };
        app::show("Spectral analysis", figure, config)
            .map_err(|e| anyhow!("viewer failed: {e}"))?;
    }
    Ok(())
}
