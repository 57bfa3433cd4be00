use std::path::{Path, PathBuf};

use trimline_cutout::Segmenter;

use crate::config::{Mode, ProcessConfig};
use crate::error::PipelineError;
use crate::pipeline::{
    cutout_file, has_extension, shrink_raster_file, shrink_svg_file, vectorize_file, FileOutcome,
};

/// Raster extensions accepted by every mode.
pub const RASTER_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// Whether a batch accepts the file, judging by its extension.
pub fn is_supported(path: &Path) -> bool {
    has_extension(path, "svg") || RASTER_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written, possibly with degraded steps.
    pub processed: Vec<FileOutcome>,
    /// Inputs that failed, with their error.
    pub failed: Vec<(PathBuf, PipelineError)>,
    /// Inputs with an unsupported extension or no file name.
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    /// Number of processed files that fell back to their input somewhere.
    pub fn degraded_count(&self) -> usize {
        self.processed.iter().filter(|o| o.is_degraded()).count()
    }
}

/// Process one file according to `config.mode`, writing next to `output`.
pub fn process_file(
    input: &Path,
    output: &Path,
    config: &ProcessConfig,
    segmenter: &mut dyn Segmenter,
) -> Result<FileOutcome, PipelineError> {
    let is_svg = has_extension(input, "svg");
    match (config.mode, is_svg) {
        (Mode::Shrink, true) => shrink_svg_file(input, output, config),
        (Mode::Shrink, false) => shrink_raster_file(input, output, config),
        (Mode::Vectorize, true) => {
            std::fs::copy(input, output)?;
            Ok(FileOutcome {
                output: output.to_path_buf(),
                degradations: Vec::new(),
            })
        }
        (Mode::Vectorize, false) => vectorize_file(input, output, config),
        (Mode::Matting, _) => cutout_file(segmenter, input, output, config),
    }
}

/// Run the configured pipeline over `inputs`, one file after the other.
///
/// Each output is named after its input inside `output_dir`. A failing file is
/// logged and recorded in the report, and the batch moves on. The batch fails
/// with [`PipelineError::NothingProcessed`] when no file could be processed.
pub fn run_batch<P: AsRef<Path>>(
    inputs: &[P],
    output_dir: impl AsRef<Path>,
    config: &ProcessConfig,
    segmenter: &mut dyn Segmenter,
) -> Result<BatchReport, PipelineError> {
    let output_dir = output_dir.as_ref();
    config.validate()?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    let mut attempted = 0;

    for input in inputs {
        let input = input.as_ref();
        let file_name = match input.file_name() {
            Some(name) if is_supported(input) => name,
            _ => {
                log::debug!("skipping {}", input.display());
                report.skipped.push(input.to_path_buf());
                continue;
            }
        };

        attempted += 1;
        let output = output_dir.join(file_name);
        match process_file(input, &output, config, segmenter) {
            Ok(outcome) => {
                for reason in &outcome.degradations {
                    log::warn!("{}: {reason}", input.display());
                }
                log::info!("{} -> {}", input.display(), outcome.output.display());
                report.processed.push(outcome);
            }
            Err(err) => {
                log::error!("{}: {err}", input.display());
                report.failed.push((input.to_path_buf(), err));
            }
        }
    }

    log::info!(
        "{} batch done: {} processed ({} degraded), {} failed, {} skipped",
        config.mode,
        report.processed.len(),
        report.degraded_count(),
        report.failed.len(),
        report.skipped.len()
    );

    if report.processed.is_empty() {
        return Err(PipelineError::NothingProcessed { attempted });
    }
    Ok(report)
}
