//! Batch driver: finds track files and runs each through reader and renderer

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::Result;
use crate::reader::TrackReader;
use crate::render::{RenderOutcome, Renderer};
use crate::tiles::TileSource;

/// Result of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Files that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
    /// Figures written more than once in the run, e.g. by `ride.csv` and `ride.CSV`
    pub overwritten: Vec<PathBuf>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lists the files in `dir` whose extension matches `extension` (case-insensitive), sorted by name
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

pub struct Driver<S: TileSource> {
    reader: TrackReader,
    renderer: Renderer<S>,
    extension: String,
}

impl<S: TileSource> Driver<S> {
    pub fn new(reader: TrackReader, renderer: Renderer<S>, extension: &str) -> Self {
        Self {
            reader,
            renderer,
            extension: extension.to_owned(),
        }
    }

    /// Processes every matching file in `dir`.
    ///
    /// A failing file is logged and recorded; the remaining files are still processed.
    pub fn run(&self, dir: &Path) -> Result<BatchReport> {
        let files = discover(dir, &self.extension)?;
        let mut report = BatchReport::default();

        if files.is_empty() {
            info!("No {} files found in {}", self.extension.to_uppercase(), dir.display());
            return Ok(report);
        }

        let mut written = HashSet::new();

        for path in files {
            info!("Plotting: {}", path.display());

            match self.process(&path) {
                Ok(RenderOutcome::Rendered(summary)) => {
                    if !written.insert(summary.output.clone()) {
                        warn!(
                            "{} overwrote {} from an earlier file",
                            path.display(),
                            summary.output.display()
                        );
                        report.overwritten.push(summary.output);
                    }
                    report.rendered.push(path);
                }
                Ok(RenderOutcome::Skipped(_)) => report.skipped.push(path),
                Err(e) => {
                    error!("Failed to plot {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        let stats = self.renderer.cache().stats();
        info!(
            "Done: {} rendered, {} skipped, {} failed ({} tiles cached)",
            report.rendered.len(),
            report.skipped.len(),
            report.failed.len(),
            stats.tile_count
        );
        Ok(report)
    }

    /// Reads and renders a single file
    pub fn process(&self, path: &Path) -> Result<RenderOutcome> {
        let track = self.reader.read_path(path)?;
        self.renderer.render(&track, path)
    }
}
