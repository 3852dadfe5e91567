use std::path::{Path, PathBuf};

use super::TabularPipeline;
use crate::config::RenderConfig;
use crate::data::model::GroupRecord;
use crate::data::transform::groups_to_hz_db;
use crate::error::Result;
use crate::render::groups::render_groups_pdf;

/// File name of the group figure.
pub const GROUPS_FILE_NAME: &str = "groups.pdf";

/// Group table → `groups.pdf` (amplitude and frequency-map panels).
#[derive(Debug, Clone)]
pub struct GroupPlotPipeline {
    output_dir: PathBuf,
}

impl Default for GroupPlotPipeline {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

impl GroupPlotPipeline {
    /// Write `groups.pdf` into the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `groups.pdf` into `dir` instead.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
        }
    }
}

impl TabularPipeline for GroupPlotPipeline {
    type Record = GroupRecord;
    type Prepared = Vec<GroupRecord>;

    fn name(&self) -> &'static str {
        "groups"
    }

    fn transform(
        &self,
        input: &Path,
        mut records: Vec<GroupRecord>,
        _config: &RenderConfig,
    ) -> Result<Vec<GroupRecord>> {
        let non_finite = groups_to_hz_db(&mut records);
        if non_finite > 0 {
            log::warn!(
                "{non_finite} of {} rows in {} have a non-positive magnitude; their dB value is not finite and is left out of the curves",
                records.len(),
                input.display()
            );
        }
        Ok(records)
    }

    fn render(&self, prepared: &Vec<GroupRecord>, config: &RenderConfig) -> Result<Vec<u8>> {
        render_groups_pdf(prepared, config)
    }

    fn output_path(&self, _input: &Path) -> PathBuf {
        self.output_dir.join(GROUPS_FILE_NAME)
    }
}
