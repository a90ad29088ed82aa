use crate::error::Result;
use crate::math::polygon_3d::polygon_area_3d;
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::query::texel_density;

use super::{
    check_non_negative, check_positive, SegmentIslands, TextureSize, UvIsland,
    DEFAULT_DENSITY_TOLERANCE_PERCENT, DEFAULT_TARGET_DENSITY,
};

/// Area-weighted mean texel density of an island.
///
/// Faces with zero density (degenerate or missing UVs) are left out of both
/// sums. Returns `0.0` when no face contributes.
///
/// # Errors
///
/// Returns an error if a face or the layer is not found.
pub fn island_density(
    store: &MeshStore,
    island: &UvIsland,
    layer: UvLayerId,
    texture: TextureSize,
) -> Result<f64> {
    let mut weighted = 0.0;
    let mut total_area = 0.0;
    for &face in &island.faces {
        let Some(uvs) = store.face_uvs(face, layer)? else {
            continue;
        };
        let points = store.face_points(face)?;
        let density = texel_density(&points, &uvs, texture);
        if density > 0.0 {
            let area = polygon_area_3d(&points);
            weighted += density * area;
            total_area += area;
        }
    }
    if total_area > 0.0 {
        Ok(weighted / total_area)
    } else {
        Ok(0.0)
    }
}

/// Density figures for one island.
#[derive(Debug, Clone, PartialEq)]
pub struct IslandDensity {
    /// The island.
    pub island: UvIsland,
    /// Area-weighted texel density.
    pub density: f64,
    /// Signed deviation from the target, in percent of the target.
    pub deviation_percent: f64,
    /// Deviation magnitude exceeds the tolerance.
    pub flagged: bool,
}

/// Result of a [`DensityCheck`].
#[derive(Debug, Clone, Default)]
pub struct DensityReport {
    /// Every island with a measurable density, in segmentation order.
    pub islands: Vec<IslandDensity>,
    /// Islands with zero total area, excluded from reporting.
    pub degenerate: usize,
}

impl DensityReport {
    /// Islands whose density is out of tolerance.
    pub fn flagged(&self) -> impl Iterator<Item = &IslandDensity> {
        self.islands.iter().filter(|i| i.flagged)
    }

    /// Faces of every flagged island.
    #[must_use]
    pub fn flagged_faces(&self) -> Vec<FaceId> {
        self.flagged()
            .flat_map(|i| i.island.faces.iter().copied())
            .collect()
    }
}

/// Flags UV islands whose texel density deviates from a target.
pub struct DensityCheck {
    layer: UvLayerId,
    texture: TextureSize,
    target_density: f64,
    tolerance_percent: f64,
    islands: Option<Vec<UvIsland>>,
}

impl DensityCheck {
    /// Creates a new `DensityCheck` for a 2048x2048 texture at 1024 texels
    /// per unit with a 1% tolerance.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            texture: TextureSize::default(),
            target_density: DEFAULT_TARGET_DENSITY,
            tolerance_percent: DEFAULT_DENSITY_TOLERANCE_PERCENT,
            islands: None,
        }
    }

    /// Sets the texture resolution.
    #[must_use]
    pub fn with_texture_size(mut self, texture: TextureSize) -> Self {
        self.texture = texture;
        self
    }

    /// Sets the target density, in texels per world unit.
    #[must_use]
    pub fn with_target_density(mut self, target_density: f64) -> Self {
        self.target_density = target_density;
        self
    }

    /// Sets the allowed deviation, in percent of the target.
    #[must_use]
    pub fn with_tolerance_percent(mut self, tolerance_percent: f64) -> Self {
        self.tolerance_percent = tolerance_percent;
        self
    }

    /// Uses an existing segmentation instead of segmenting with defaults.
    #[must_use]
    pub fn with_islands(mut self, islands: Vec<UvIsland>) -> Self {
        self.islands = Some(islands);
        self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range, or a face or the
    /// layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<DensityReport> {
        self.texture.validate()?;
        check_positive("target_density", self.target_density)?;
        check_non_negative("density_tolerance_percent", self.tolerance_percent)?;

        let segmented;
        let islands = if let Some(islands) = &self.islands {
            store.uv_layer(self.layer)?;
            islands
        } else {
            segmented = SegmentIslands::new(self.layer).execute(store)?;
            &segmented
        };

        let mut report = DensityReport::default();
        for island in islands {
            let density = island_density(store, island, self.layer, self.texture)?;
            if density <= 0.0 {
                report.degenerate += 1;
                continue;
            }
            let deviation_percent = (density - self.target_density) / self.target_density * 100.0;
            report.islands.push(IslandDensity {
                island: island.clone(),
                density,
                deviation_percent,
                flagged: deviation_percent.abs() > self.tolerance_percent,
            });
        }

        tracing::debug!(
            islands = report.islands.len(),
            flagged = report.flagged().count(),
            degenerate = report.degenerate,
            target = self.target_density,
            "density check finished"
        );
        Ok(report)
    }
}
