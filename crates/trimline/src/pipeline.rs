use std::path::{Path, PathBuf};

use trimline_core::{DegradeReason, Outcome};
use trimline_cutout::{cutout, Segmenter};
use trimline_imgproc::alpha::shrink_alpha;
use trimline_io::png::write_image_png_rgba8;
use trimline_io::{decode_image_any, read_image_any};
use trimline_vector::{shrink_document, ShrinkTarget, SvgDocument};

use crate::config::ProcessConfig;
use crate::error::PipelineError;

/// What a file pipeline wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    /// The file that was written.
    pub output: PathBuf,
    /// Steps that fell back to the unmodified input.
    pub degradations: Vec<DegradeReason>,
}

impl FileOutcome {
    fn complete(output: PathBuf) -> Self {
        Self {
            output,
            degradations: Vec::new(),
        }
    }

    /// Whether any step fell back to its input.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

fn ensure_parent(output: &Path) -> Result<(), PipelineError> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(std::fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

/// Shrink every shrink-target path of an SVG file and write the result to `output`.
///
/// Only the shrunk paths are written; the root attributes are kept.
pub fn shrink_svg_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<FileOutcome, PipelineError> {
    let output = output.as_ref();
    let document = SvgDocument::from_file(input.as_ref())?;

    let shrunk = shrink_document(
        &document,
        config.indent as f64,
        &ShrinkTarget::default(),
        &config.shrink_options(),
    );
    log::debug!(
        "{}: {} paths shrunk, {} degraded",
        input.as_ref().display(),
        shrunk.document.paths.len(),
        shrunk.degraded.len()
    );

    ensure_parent(output)?;
    shrunk.document.write_file(output)?;

    Ok(FileOutcome {
        output: output.to_path_buf(),
        degradations: shrunk.degraded.into_iter().map(|(_, reason)| reason).collect(),
    })
}

/// Erode the alpha channel of a raster by `indent` pixels and write it as PNG.
///
/// The file is always written with a `.png` extension next to `output`.
pub fn shrink_raster_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<FileOutcome, PipelineError> {
    let output = output.as_ref().with_extension("png");
    let image = read_image_any(input)?.into_rgba8()?;

    let shrunk = shrink_alpha(&image, config.indent as usize)?;

    ensure_parent(&output)?;
    write_image_png_rgba8(&output, &shrunk)?;
    Ok(FileOutcome::complete(output))
}

/// Trace the silhouette of a raster and write it as an SVG document.
///
/// The file is always written with a `.svg` extension next to `output`.
pub fn vectorize_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<FileOutcome, PipelineError> {
    let output = output.as_ref().with_extension("svg");
    let decoded = read_image_any(input)?;
    let has_alpha = decoded.has_alpha();
    let image = decoded.into_rgba8()?;

    let document = trimline_vector::vectorize(&image, has_alpha, &config.vectorize_options())?;
    log::debug!("{} outlines traced", document.paths.len());

    ensure_parent(&output)?;
    document.write_file(&output)?;
    Ok(FileOutcome::complete(output))
}

/// Cut the foreground out of a photo and write it as PNG.
///
/// On success the cutout is written to `output` with a `.png` extension. When
/// segmentation or post-processing fails, the input bytes are copied unchanged
/// to `output` with the input's extension and the outcome carries the reason.
/// Undecodable inputs are errors.
pub fn cutout_file<S: Segmenter + ?Sized>(
    segmenter: &mut S,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<FileOutcome, PipelineError> {
    let input = input.as_ref();
    let output = output.as_ref();

    if has_extension(input, "svg") {
        return Err(PipelineError::UnsupportedExtension(input.to_path_buf()));
    }

    let bytes = std::fs::read(input)?;
    let image = decode_image_any(&bytes)?.into_rgba8()?;

    ensure_parent(output)?;
    match cutout(segmenter, &image, &config.cutout_params()) {
        Outcome::Complete(result) => {
            let output = output.with_extension("png");
            write_image_png_rgba8(&output, &result)?;
            Ok(FileOutcome::complete(output))
        }
        Outcome::Degraded { reason, .. } => {
            let output = match input.extension() {
                Some(ext) => output.with_extension(ext),
                None => output.to_path_buf(),
            };
            std::fs::write(&output, &bytes)?;
            Ok(FileOutcome {
                output,
                degradations: vec![reason],
            })
        }
    }
}

/// Whether the file extension matches `ext`, ignoring ASCII case.
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
