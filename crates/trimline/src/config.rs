use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use trimline_core::Rgb8;
use trimline_cutout::CutoutParams;
use trimline_imgproc::stroke::StrokePosition;
use trimline_vector::{IslandPolicy, OffsetOptions, ShrinkOptions, VectorizeOptions};

use crate::error::PipelineError;

/// The pipeline a batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Shrink SVG paths and raster silhouettes by `indent` pixels.
    #[default]
    Shrink,
    /// Convert rasters to SVG outlines.
    Vectorize,
    /// Cut the foreground out of photos.
    Matting,
}

impl Mode {
    /// The lowercase name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Shrink => "shrink",
            Mode::Vectorize => "vectorize",
            Mode::Matting => "matting",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shrink" => Ok(Mode::Shrink),
            "vectorize" => Ok(Mode::Vectorize),
            "matting" => Ok(Mode::Matting),
            _ => Err(PipelineError::InvalidConfig(format!(
                "unknown mode {s:?}, expected shrink, vectorize or matting"
            ))),
        }
    }
}

/// Largest `indent`, `|edge_shift|` and `stroke_width` accepted, in pixels.
pub const MAX_PIXEL_DISTANCE: u32 = 4096;

/// (De)serialize a value through its `Display` and `FromStr` implementations.
mod as_string {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Every tunable of the pipelines.
///
/// Missing fields take their default value, so a JSON file only needs to
/// list what it changes:
///
/// ```
/// use trimline::config::{Mode, ProcessConfig};
///
/// let config = ProcessConfig::from_json_str(r#"{ "mode": "matting", "stroke_width": 4 }"#).unwrap();
/// assert_eq!(config.mode, Mode::Matting);
/// assert_eq!(config.stroke_width, 4);
/// assert_eq!(config.indent, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Pipeline to run.
    pub mode: Mode,
    /// Shrink distance in pixels.
    pub indent: u32,
    /// Vectorize simplification strength.
    pub smoothness: f64,
    /// Vectorize corner radius in pixels, `0` for sharp corners.
    pub radius: f64,
    /// Vectorize fill color, any SVG color.
    pub fill_color: String,
    /// Cutout alpha cutoff, `0` keeps soft edges.
    pub alpha_threshold: u8,
    /// Cutout edge shift in pixels, positive shrinks.
    pub edge_shift: i32,
    /// Cutout stroke width in pixels, `0` disables the stroke.
    pub stroke_width: usize,
    /// Cutout stroke color.
    pub stroke_color: Rgb8,
    /// Cutout stroke placement.
    #[serde(with = "as_string")]
    pub stroke_position: StrokePosition,
    /// Samples taken along an SVG path before shrinking it.
    pub samples: usize,
    /// Regions kept when shrinking splits a path.
    #[serde(with = "as_string")]
    pub island_policy: IslandPolicy,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            indent: 8,
            smoothness: 4.0,
            radius: 0.0,
            fill_color: "black".to_string(),
            alpha_threshold: 10,
            edge_shift: 0,
            stroke_width: 0,
            stroke_color: Rgb8::new(255, 255, 255),
            stroke_position: StrokePosition::Outer,
            samples: 1000,
            island_policy: IslandPolicy::KeepLargest,
        }
    }
}

impl ProcessConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(file_path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(file_path)?;
        Self::from_json_str(&text)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));

        if !self.smoothness.is_finite() || self.smoothness < 0.0 {
            return invalid(format!("smoothness must be >= 0, got {}", self.smoothness));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return invalid(format!("radius must be >= 0, got {}", self.radius));
        }
        if self.indent > MAX_PIXEL_DISTANCE {
            return invalid(format!("indent must be <= {MAX_PIXEL_DISTANCE}, got {}", self.indent));
        }
        if self.edge_shift.unsigned_abs() > MAX_PIXEL_DISTANCE {
            return invalid(format!(
                "edge_shift must be within +-{MAX_PIXEL_DISTANCE}, got {}",
                self.edge_shift
            ));
        }
        if self.stroke_width > MAX_PIXEL_DISTANCE as usize {
            return invalid(format!(
                "stroke_width must be <= {MAX_PIXEL_DISTANCE}, got {}",
                self.stroke_width
            ));
        }
        if self.samples < 3 {
            return invalid(format!("samples must be >= 3, got {}", self.samples));
        }
        if self.fill_color.trim().is_empty() {
            return invalid("fill_color must not be empty".to_string());
        }
        Ok(())
    }

    /// Options of the SVG shrink.
    pub fn shrink_options(&self) -> ShrinkOptions {
        ShrinkOptions {
            samples: self.samples,
            offset: OffsetOptions {
                island_policy: self.island_policy,
                ..Default::default()
            },
        }
    }

    /// Options of the raster vectorization.
    pub fn vectorize_options(&self) -> VectorizeOptions {
        VectorizeOptions {
            smoothness: self.smoothness,
            corner_radius: self.radius,
            fill_color: self.fill_color.clone(),
            ..Default::default()
        }
    }

    /// Parameters of the cutout post-processing.
    pub fn cutout_params(&self) -> CutoutParams {
        CutoutParams {
            alpha_threshold: self.alpha_threshold,
            edge_shift: self.edge_shift,
            stroke_width: self.stroke_width,
            stroke_color: self.stroke_color,
            stroke_position: self.stroke_position,
        }
    }
}
