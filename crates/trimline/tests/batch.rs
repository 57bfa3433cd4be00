use std::path::{Path, PathBuf};

use kurbo::Shape;
use trimline::cutout::{BackgroundKeySegmenter, CutoutError, Segmenter};
use trimline::image::Image;
use trimline::imgproc::alpha::count_opaque;
use trimline::io::png::{read_image_png_rgba8, write_image_png_rgba8};
use trimline::vector::SvgDocument;
use trimline::{run_batch, Mode, PipelineError, ProcessConfig};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const LABEL_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <rect x="10" y="10" width="80" height="80" fill="black"/>
  <circle cx="50" cy="50" r="10" fill="red"/>
</svg>"#;

struct Unavailable;

impl Segmenter for Unavailable {
    fn segment(&mut self, _image: &Image<u8, 4>) -> Result<Image<u8, 4>, CutoutError> {
        Err(CutoutError::Segmentation("model weights missing".to_string()))
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 40x40 transparent canvas with an opaque blue 20x20 square in the middle.
fn write_sticker(path: &Path) -> TestResult {
    let mut img = Image::<u8, 4>::from_size_val([40, 40].into(), 0)?;
    for y in 10..30 {
        for x in 10..30 {
            img.set_pixel(x, y, 2, 255)?;
            img.set_pixel(x, y, 3, 255)?;
        }
    }
    write_image_png_rgba8(path, &img)?;
    Ok(())
}

/// An opaque 30x30 white photo with a red 10x10 subject.
fn write_photo(path: &Path) -> TestResult {
    let mut img = Image::<u8, 4>::from_size_val([30, 30].into(), 255)?;
    for y in 10..20 {
        for x in 10..20 {
            img.set_pixel(x, y, 1, 0)?;
            img.set_pixel(x, y, 2, 0)?;
        }
    }
    write_image_png_rgba8(path, &img)?;
    Ok(())
}

fn inputs(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let svg = dir.join("label.svg");
    std::fs::write(&svg, LABEL_SVG)?;
    let png = dir.join("sticker.png");
    write_sticker(&png)?;
    let txt = dir.join("notes.txt");
    std::fs::write(&txt, "not an image")?;
    Ok(vec![svg, png, txt])
}

#[test]
fn shrink_batch_routes_by_extension() -> TestResult {
    init_logger();
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    let files = inputs(tmp.path())?;

    let report = run_batch(&files, &out, &ProcessConfig::default(), &mut Unavailable)?;
    assert_eq!(report.processed.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(report.skipped, vec![files[2].clone()]);
    assert_eq!(report.degraded_count(), 0);

    // only the black rect survives, inset by 8 px
    let doc = SvgDocument::from_file(out.join("label.svg"))?;
    assert_eq!(doc.attribute("viewBox"), Some("0 0 100 100"));
    assert_eq!(doc.paths.len(), 1);
    assert_eq!(doc.paths[0].style.fill(), Some("black"));
    let bbox = doc.paths[0].path.bounding_box();
    for (got, want) in [(bbox.x0, 18.0), (bbox.y0, 18.0), (bbox.x1, 82.0), (bbox.y1, 82.0)] {
        assert!((got - want).abs() < 0.5, "{got} != {want}");
    }

    // a 17x17 min filter leaves a 4x4 core of the 20x20 square
    let sticker = read_image_png_rgba8(out.join("sticker.png"))?;
    assert_eq!(count_opaque(&sticker, 0), 16);
    Ok(())
}

#[test]
fn vectorize_batch_copies_svg_through() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    let files = inputs(tmp.path())?;
    let config = ProcessConfig {
        mode: Mode::Vectorize,
        ..Default::default()
    };

    let report = run_batch(&files, &out, &config, &mut Unavailable)?;
    assert_eq!(report.processed.len(), 2);

    assert_eq!(std::fs::read_to_string(out.join("label.svg"))?, LABEL_SVG);

    let traced = SvgDocument::from_file(out.join("sticker.svg"))?;
    assert_eq!(traced.attribute("width"), Some("40"));
    assert_eq!(traced.paths.len(), 1);
    assert_eq!(traced.paths[0].style.stroke(), Some("none"));
    let area = traced.paths[0].path.area().abs();
    assert!((area - 361.0).abs() < 40.0, "area {area}");
    Ok(())
}

#[test]
fn matting_batch_keys_out_backdrop() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let photo = tmp.path().join("photo.png");
    write_photo(&photo)?;
    let config = ProcessConfig {
        mode: Mode::Matting,
        ..Default::default()
    };

    let report = run_batch(&[&photo], tmp.path().join("out"), &config, &mut BackgroundKeySegmenter::default())?;
    assert_eq!(report.processed.len(), 1);
    assert!(!report.processed[0].is_degraded());

    let cut = read_image_png_rgba8(&report.processed[0].output)?;
    assert_eq!(count_opaque(&cut, 254), 100);
    assert_eq!(cut.get_pixel(15, 15, 0)?, 255);
    assert_eq!(cut.get_pixel(2, 2, 3)?, 0);
    Ok(())
}

#[test]
fn matting_failure_copies_input_bytes() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let photo = tmp.path().join("photo.png");
    write_photo(&photo)?;
    let config = ProcessConfig {
        mode: Mode::Matting,
        stroke_width: 3,
        ..Default::default()
    };

    let report = run_batch(&[&photo], tmp.path().join("out"), &config, &mut Unavailable)?;
    assert_eq!(report.degraded_count(), 1);

    let outcome = &report.processed[0];
    assert_eq!(outcome.output, tmp.path().join("out").join("photo.png"));
    assert_eq!(std::fs::read(&outcome.output)?, std::fs::read(&photo)?);
    Ok(())
}

#[test]
fn batch_without_successes_fails() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let broken = tmp.path().join("broken.png");
    std::fs::write(&broken, b"\x89PNG but not really")?;
    let notes = tmp.path().join("notes.txt");
    std::fs::write(&notes, "skip me")?;

    let result = run_batch(&[broken, notes], tmp.path().join("out"), &ProcessConfig::default(), &mut Unavailable);
    assert!(matches!(result, Err(PipelineError::NothingProcessed { attempted: 1 })));
    Ok(())
}

#[test]
fn matting_rejects_svg() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let files = inputs(tmp.path())?;
    let config = ProcessConfig {
        mode: Mode::Matting,
        ..Default::default()
    };

    let report = run_batch(&files, tmp.path().join("out"), &config, &mut BackgroundKeySegmenter::default())?;
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, PipelineError::UnsupportedExtension(_)));
    Ok(())
}

#[test]
fn config_file_drives_the_batch() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let config_path = tmp.path().join("config.json");
    std::fs::write(&config_path, r#"{ "mode": "shrink", "indent": 2 }"#)?;
    let config = ProcessConfig::from_json_file(&config_path)?;

    let sticker = tmp.path().join("sticker.png");
    write_sticker(&sticker)?;
    let report = run_batch(&[&sticker], tmp.path().join("out"), &config, &mut Unavailable)?;

    let shrunk = read_image_png_rgba8(&report.processed[0].output)?;
    assert_eq!(count_opaque(&shrunk, 0), 16 * 16);
    Ok(())
}
