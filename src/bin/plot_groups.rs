use anyhow::{anyhow, Context, Result};
use clap::Parser;

use spectral_plots::app::{self, Figure};
use spectral_plots::cli::{self, PlotArgs};
use spectral_plots::pipeline::{self, GroupPlotPipeline};
use spectral_plots::RenderConfig;

fn main() -> Result<()> {
    let args = PlotArgs::parse();
    args.init_logging();

    let Ok(input) = args.input() else {
        println!("{}", cli::usage_line(&cli::program_name("plot-groups")));
        return Ok(());
    };

    let config = RenderConfig::default();
    let out = pipeline::run(&GroupPlotPipeline::new(), input, &config)
        .with_context(|| format!("Failed to plot groups from {}", input.display()))?;

    if !args.no_show {
        app::show("Groups", Figure::Groups(out.prepared), config)
            .map_err(|e| anyhow!("viewer failed: {e}"))?;
    }
    Ok(())
}
