use crate::report::{DETAIL_FILE, QUALITY_FILE, STATISTICS_FILE, TIMING_FILE};
use std::path::{Path, PathBuf};

/// Files written under the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputPaths {
    pub detail: PathBuf,
    pub statistics: PathBuf,
    pub timing: PathBuf,
    pub quality: PathBuf,
}

impl OutputPaths {
    pub fn under(output_dir: &Path) -> Self {
        Self {
            detail: output_dir.join(DETAIL_FILE),
            statistics: output_dir.join(STATISTICS_FILE),
            timing: output_dir.join(TIMING_FILE),
            quality: output_dir.join(QUALITY_FILE),
        }
    }
}
