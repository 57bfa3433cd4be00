use std::path::{Path, PathBuf};

use argh::FromArgs;
use trimline::common::Rgb8;
use trimline::cutout::{BackgroundKeySegmenter, SharedSegmenter};
use trimline::imgproc::stroke::StrokePosition;
use trimline::vector::IslandPolicy;
use trimline::{run_batch, Mode, ProcessConfig};

/// Shrink, vectorize or cut out label artwork in batch
#[derive(Debug, FromArgs)]
struct Args {
    /// input files or directories
    #[argh(positional)]
    inputs: Vec<PathBuf>,

    /// output directory
    #[argh(option, short = 'o', default = "PathBuf::from(\"processed\")")]
    output: PathBuf,

    /// JSON configuration file, overridden by the flags below
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// pipeline to run: shrink, vectorize or matting
    #[argh(option, short = 'm')]
    mode: Option<Mode>,

    /// shrink distance in pixels
    #[argh(option, short = 'i')]
    indent: Option<u32>,

    /// vectorize simplification strength
    #[argh(option, short = 's')]
    smoothness: Option<f64>,

    /// vectorize corner radius in pixels
    #[argh(option, short = 'r')]
    radius: Option<f64>,

    /// vectorize fill color
    #[argh(option)]
    fill_color: Option<String>,

    /// cutout alpha cutoff, 0 keeps soft edges
    #[argh(option, short = 't')]
    alpha_threshold: Option<u8>,

    /// cutout edge shift in pixels, positive shrinks
    #[argh(option)]
    edge_shift: Option<i32>,

    /// cutout stroke width in pixels
    #[argh(option, short = 'w')]
    stroke_width: Option<usize>,

    /// cutout stroke color as #RGB or #RRGGBB
    #[argh(option)]
    stroke_color: Option<Rgb8>,

    /// cutout stroke placement: outer, inner or center
    #[argh(option)]
    stroke_position: Option<StrokePosition>,

    /// samples taken along each SVG path
    #[argh(option)]
    samples: Option<usize>,

    /// regions kept when a shrink splits a path: keep-largest or keep-all
    #[argh(option)]
    island_policy: Option<IslandPolicy>,

    /// backdrop color tolerance of the built-in cutout segmenter
    #[argh(option, default = "32")]
    key_tolerance: u8,
}

impl Args {
    fn process_config(&self) -> Result<ProcessConfig, trimline::PipelineError> {
        let mut config = match &self.config {
            Some(path) => ProcessConfig::from_json_file(path)?,
            None => ProcessConfig::default(),
        };

        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = &self.$field {
                    config.$field = value.clone();
                })*
            };
        }
        apply!(
            mode,
            indent,
            smoothness,
            radius,
            fill_color,
            alpha_threshold,
            edge_shift,
            stroke_width,
            stroke_color,
            stroke_position,
            samples,
            island_policy
        );

        config.validate()?;
        Ok(config)
    }
}

/// Expand directories one level deep, in name order.
fn collect_inputs(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries = std::fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()?;
            entries.retain(|p| p.is_file());
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let config = args.process_config()?;
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        return Err("no input files given".into());
    }

    log::info!(
        "running {} on {} files into {}",
        config.mode,
        inputs.len(),
        args.output.display()
    );

    let mut segmenter = SharedSegmenter::new(BackgroundKeySegmenter::new(args.key_tolerance));
    let report = run_batch(&inputs, Path::new(&args.output), &config, &mut segmenter)?;

    for (path, err) in &report.failed {
        log::error!("failed: {} ({err})", path.display());
    }
    log::info!(
        "{} written, {} degraded, {} failed, {} skipped",
        report.processed.len(),
        report.degraded_count(),
        report.failed.len(),
        report.skipped.len()
    );

    Ok(())
}
