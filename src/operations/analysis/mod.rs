mod audit;
mod density;
mod flipped;
mod islands;
mod stretch;

pub use audit::{AuditReport, UvAudit};
pub use density::{island_density, DensityCheck, DensityReport, IslandDensity};
pub use flipped::{FlipReport, FlippedCheck};
pub use islands::{SegmentIslands, UvIsland, UvMatch};
pub use stretch::{is_stretched, ratio_deviation, stretch_deviation, StretchCheck, StretchReport};

use crate::error::{GeometryError, Result};

/// Floor applied to 3D edge lengths before dividing, so degenerate edges
/// do not blow up the stretch ratio.
pub const MIN_EDGE_LENGTH: f64 = 1e-6;

/// Per-axis tolerance under which two UV coordinates are considered equal.
pub const UV_MATCH_TOLERANCE: f64 = 1e-4;

/// Default maximum deviation of a face's stretch ratios from their mean.
pub const DEFAULT_STRETCH_THRESHOLD: f64 = 0.1;

/// Triangle areas below this are treated as degenerate by the flip test.
pub const FLIP_EPSILON: f64 = 1e-8;

/// Face areas (3D or UV) below this are treated as degenerate.
pub const AREA_EPSILON: f64 = 1e-10;

/// Default target texel density, in texels per world unit.
pub const DEFAULT_TARGET_DENSITY: f64 = 1024.0;

/// Default allowed deviation from the target density, in percent.
pub const DEFAULT_DENSITY_TOLERANCE_PERCENT: f64 = 1.0;

/// Texture resolution used to convert UV area into texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TextureSize {
    /// Creates a texture size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of texels.
    #[must_use]
    pub fn texels(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    pub(crate) fn validate(self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "texture_size",
                value: f64::from(self.width.min(self.height)),
                min: 1.0,
                max: f64::from(u32::MAX),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self::new(2048, 2048)
    }
}

/// Parameters shared by the UV checks.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisParams {
    /// Stretch threshold, in `[0, 1]`.
    pub stretch_threshold: f64,
    /// Per-axis UV equality tolerance used for island connectivity.
    pub uv_tolerance: f64,
    /// How many shared corners must match for two faces to be UV-connected.
    pub uv_match: UvMatch,
    /// Treat seam edges as island boundaries.
    pub respect_seams: bool,
    /// Texture resolution for texel density.
    pub texture: TextureSize,
    /// Target texel density.
    pub target_density: f64,
    /// Allowed density deviation, in percent of the target.
    pub density_tolerance_percent: f64,
    /// Degenerate-area threshold for the flip test.
    pub flip_epsilon: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            stretch_threshold: DEFAULT_STRETCH_THRESHOLD,
            uv_tolerance: UV_MATCH_TOLERANCE,
            uv_match: UvMatch::default(),
            respect_seams: false,
            texture: TextureSize::default(),
            target_density: DEFAULT_TARGET_DENSITY,
            density_tolerance_percent: DEFAULT_DENSITY_TOLERANCE_PERCENT,
            flip_epsilon: FLIP_EPSILON,
        }
    }
}

impl AnalysisParams {
    /// Checks every parameter against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for the first invalid value.
    pub fn validate(&self) -> Result<()> {
        check_range("stretch_threshold", self.stretch_threshold, 0.0, 1.0)?;
        check_non_negative("uv_tolerance", self.uv_tolerance)?;
        self.texture.validate()?;
        check_positive("target_density", self.target_density)?;
        check_non_negative("density_tolerance_percent", self.density_tolerance_percent)?;
        check_non_negative("flip_epsilon", self.flip_epsilon)
    }
}

pub(crate) fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        }
        .into())
    }
}

pub(crate) fn check_non_negative(parameter: &'static str, value: f64) -> Result<()> {
    check_range(parameter, value, 0.0, f64::MAX)
}

pub(crate) fn check_positive(parameter: &'static str, value: f64) -> Result<()> {
    check_range(parameter, value, f64::MIN_POSITIVE, f64::MAX)
}
