use crate::error::Result;
use crate::math::polygon_2d::area_2d;
use crate::math::polygon_3d::polygon_area_3d;
use crate::math::{Point2, Point3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::query::{edge_lengths, EdgeLengthPair};

use super::{check_range, AREA_EPSILON, DEFAULT_STRETCH_THRESHOLD, MIN_EDGE_LENGTH};

/// Largest deviation of per-edge UV/3D length ratios from their mean.
///
/// Returns `None` if the two length lists are empty or not index-aligned.
#[must_use]
pub fn ratio_deviation(lengths: &EdgeLengthPair) -> Option<f64> {
    if !lengths.is_aligned() {
        return None;
    }
    let ratios: Vec<f64> = lengths
        .length_uv
        .iter()
        .zip(&lengths.length_3d)
        .map(|(uv, l3)| uv / l3.max(MIN_EDGE_LENGTH))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let avg = ratios.iter().sum::<f64>() / ratios.len() as f64;
    Some(ratios.iter().map(|r| (r - avg).abs()).fold(0.0, f64::max))
}

/// Stretch deviation of a polygon given its corner positions and UVs.
///
/// Returns `None` for faces that cannot be measured or have zero area in 3D
/// or in UV space; those are skipped, never reported as outliers.
#[must_use]
pub fn stretch_deviation(points: &[Point3], uvs: &[Point2]) -> Option<f64> {
    if polygon_area_3d(points) < AREA_EPSILON || area_2d(uvs) < AREA_EPSILON {
        return None;
    }
    ratio_deviation(&edge_lengths(points, uvs))
}

/// Returns `true` if the polygon's stretch deviation exceeds `threshold`.
#[must_use]
pub fn is_stretched(points: &[Point3], uvs: &[Point2], threshold: f64) -> bool {
    stretch_deviation(points, uvs).is_some_and(|d| d > threshold)
}

/// Result of a [`StretchCheck`].
#[derive(Debug, Clone, Default)]
pub struct StretchReport {
    /// Faces whose deviation exceeds the threshold, in store order.
    pub flagged: Vec<FaceId>,
    /// Deviation of every measured face, in store order.
    pub deviations: Vec<(FaceId, f64)>,
    /// Faces skipped for missing UVs, malformed or degenerate geometry.
    pub skipped: usize,
}

/// Flags faces whose UV edge lengths are out of proportion with their
/// 3D edge lengths.
///
/// The test is relative to each face: a uniformly scaled face is not
/// stretched, only one whose edges scale unevenly.
pub struct StretchCheck {
    layer: UvLayerId,
    threshold: f64,
}

impl StretchCheck {
    /// Creates a new `StretchCheck` with the default threshold.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            threshold: DEFAULT_STRETCH_THRESHOLD,
        }
    }

    /// Sets the deviation threshold, in `[0, 1]`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Executes the check over every face of the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is out of range or the layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<StretchReport> {
        check_range("stretch_threshold", self.threshold, 0.0, 1.0)?;
        store.uv_layer(self.layer)?;

        let mut report = StretchReport::default();
        for id in store.face_ids() {
            let Some(uvs) = store.face_uvs(id, self.layer)? else {
                report.skipped += 1;
                continue;
            };
            let Some(deviation) = stretch_deviation(&store.face_points(id)?, &uvs) else {
                report.skipped += 1;
                continue;
            };
            if deviation > self.threshold {
                report.flagged.push(id);
            }
            report.deviations.push((id, deviation));
        }

        if report.skipped > 0 {
            tracing::warn!(
                skipped = report.skipped,
                "stretch check skipped faces without usable UVs or with zero area"
            );
        }
        tracing::debug!(
            flagged = report.flagged.len(),
            threshold = self.threshold,
            "stretch check finished"
        );
        Ok(report)
    }
}
