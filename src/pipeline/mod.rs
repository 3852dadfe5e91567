//! Load → Transform → Render → Persist, shared by both plots.
//!
//! A concrete pipeline supplies its record type, its transform policy and its
//! render policy; [`run`] drives the stages and owns loading and persisting.

pub mod groups;
pub mod spectral;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RenderConfig;
use crate::data::loader::load_table;
use crate::data::model::TableRecord;
use crate::error::{PipelineError, Result};

pub use groups::GroupPlotPipeline;
pub use spectral::SpectralScatterPipeline;

// ---------------------------------------------------------------------------
// Pipeline strategy
// ---------------------------------------------------------------------------

pub trait TabularPipeline {
    /// One table row.
    type Record: TableRecord;
    /// Transformed data, consumed by the renderer and the viewer.
    type Prepared;

    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Filter and convert the loaded records. `input` is only used for error
    /// reporting.
    fn transform(
        &self,
        input: &Path,
        records: Vec<Self::Record>,
        config: &RenderConfig,
    ) -> Result<Self::Prepared>;

    /// Draw the prepared data and return the encoded image.
    fn render(&self, prepared: &Self::Prepared, config: &RenderConfig) -> Result<Vec<u8>>;

    /// Where the image for `input` is written.
    fn output_path(&self, input: &Path) -> PathBuf;
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunOutput<P> {
    pub prepared: P,
    /// Path the image was written to.
    pub output: PathBuf,
    /// The encoded image, as written.
    pub bytes: Vec<u8>,
}

/// Run every stage of `pipeline` on `input`.
///
/// The output file is only created once rendering has succeeded.
pub fn run<P: TabularPipeline>(
    pipeline: &P,
    input: &Path,
    config: &RenderConfig,
) -> Result<RunOutput<P::Prepared>> {
    log::info!("Reading from file: {}", input.display());
    let table = load_table(input, <P::Record as TableRecord>::COLUMNS)?;
    let records: Vec<P::Record> = table.records();

    log::info!("Plotting {} ({} rows)", pipeline.name(), records.len());
    let prepared = pipeline.transform(input, records, config)?;
    let bytes = pipeline.render(&prepared, config)?;

    let output = pipeline.output_path(input);
    persist(&output, &bytes)?;
    log::info!("Wrote {} ({} bytes)", output.display(), bytes.len());

    Ok(RunOutput {
        prepared,
        output,
        bytes,
    })
}

// ---------------------------------------------------------------------------
// Persist
// ---------------------------------------------------------------------------

/// Write `bytes` to `target` through a temp file in the same directory, then
/// rename it into place. On error no file appears at `target`.
///
/// The file gets the same umask-default mode a plain `File::create` would.
pub fn persist(target: &Path, bytes: &[u8]) -> Result<()> {
    let err = |source: std::io::Error| PipelineError::Persist {
        path: target.to_path_buf(),
        source,
    };

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".persist");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(err)?;
    tmp.write_all(bytes).map_err(err)?;
    tmp.as_file().sync_all().map_err(err)?;
    tmp.persist(target).map_err(|e| err(e.error))?;
    Ok(())
}
