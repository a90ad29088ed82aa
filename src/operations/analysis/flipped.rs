use crate::error::Result;
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::query::is_flipped;

use super::{check_non_negative, FLIP_EPSILON};

/// Result of a [`FlippedCheck`].
#[derive(Debug, Clone, Default)]
pub struct FlipReport {
    /// Faces with a mirrored UV mapping, in store order.
    pub flagged: Vec<FaceId>,
    /// Faces skipped for missing UVs.
    pub skipped: usize,
}

/// Finds every face whose UV mapping is mirrored relative to its 3D winding.
pub struct FlippedCheck {
    layer: UvLayerId,
    epsilon: f64,
}

impl FlippedCheck {
    /// Creates a new `FlippedCheck`.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            epsilon: FLIP_EPSILON,
        }
    }

    /// Sets the degenerate-area threshold.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns an error if epsilon is negative or the layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<FlipReport> {
        check_non_negative("flip_epsilon", self.epsilon)?;
        store.uv_layer(self.layer)?;

        let mut report = FlipReport::default();
        for id in store.face_ids() {
            let Some(uvs) = store.face_uvs(id, self.layer)? else {
                report.skipped += 1;
                continue;
            };
            if is_flipped(&store.face_points(id)?, &uvs, self.epsilon) {
                report.flagged.push(id);
            }
        }

        if report.skipped > 0 {
            tracing::warn!(skipped = report.skipped, "flip check skipped faces without UV data");
        }
        tracing::debug!(flipped = report.flagged.len(), "flip check finished");
        Ok(report)
    }
}
