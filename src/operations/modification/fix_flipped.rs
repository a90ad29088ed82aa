use crate::error::Result;
use crate::math::bounds_2d::UvBounds;
use crate::math::{Point2, TOLERANCE};
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::analysis::FLIP_EPSILON;
use crate::operations::query::is_flipped;

/// Mirrors UV coordinates in U about their bounding-box center, then maps
/// the result back onto the original bounding box.
///
/// An axis whose mirrored extent is zero keeps a scale of 1.
pub fn mirror_uvs(uvs: &mut [Point2]) {
    let Some(before) = UvBounds::from_points(uvs.iter()) else {
        return;
    };
    let cx = before.center().x;
    for uv in uvs.iter_mut() {
        uv.x = 2.0 * cx - uv.x;
    }
    let Some(after) = UvBounds::from_points(uvs.iter()) else {
        return;
    };
    let (target, current) = (before.extent(), after.extent());
    let sx = if current.x > TOLERANCE { target.x / current.x } else { 1.0 };
    let sy = if current.y > TOLERANCE { target.y / current.y } else { 1.0 };
    for uv in uvs.iter_mut() {
        uv.x = before.min.x + (uv.x - after.min.x) * sx;
        uv.y = before.min.y + (uv.y - after.min.y) * sy;
    }
}

/// Corrects faces with a mirrored UV mapping.
///
/// Each flipped face is mirrored in place within its own UV bounds. The fix
/// is local: continuity with UV-adjacent faces is not preserved. Faces that
/// are not flipped are left untouched, so running the fix twice is a no-op.
pub struct FixFlipped {
    layer: UvLayerId,
    epsilon: f64,
    faces: Option<Vec<FaceId>>,
}

impl FixFlipped {
    /// Creates a new `FixFlipped` operation over every face.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            epsilon: FLIP_EPSILON,
            faces: None,
        }
    }

    /// Sets the degenerate-area threshold of the flip test.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Restricts the fix to the given faces.
    #[must_use]
    pub fn with_faces(mut self, faces: Vec<FaceId>) -> Self {
        self.faces = Some(faces);
        self
    }

    /// Executes the fix, returning the corrected faces.
    ///
    /// # Errors
    ///
    /// Returns an error if a face or the layer is not found.
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        store.uv_layer(self.layer)?;
        let faces: Vec<FaceId> = match &self.faces {
            Some(faces) => faces.clone(),
            None => store.face_ids().collect(),
        };

        let mut fixed = Vec::new();
        for face in faces {
            let Some(mut uvs) = store.face_uvs(face, self.layer)? else {
                continue;
            };
            if !is_flipped(&store.face_points(face)?, &uvs, self.epsilon) {
                continue;
            }
            mirror_uvs(&mut uvs);
            store.set_face_uvs(face, self.layer, &uvs)?;
            fixed.push(face);
        }

        tracing::debug!(fixed = fixed.len(), "fixed flipped UV faces");
        Ok(fixed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::query::IsFlipped;
    use approx::assert_relative_eq;

    fn flipped_triangle() -> (MeshStore, UvLayerId, FaceId) {
        let mut store = MeshStore::new();
        let layer = store.add_uv_layer("UVMap");
        let v: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| store.add_vertex(Point3::new(x, y, 0.0)))
            .collect();
        let face = store.add_face(&v).unwrap();
        store
            .set_face_uvs(
                face,
                layer,
                &[Point2::new(0.2, 0.1), Point2::new(0.2, 0.6), Point2::new(0.9, 0.1)],
            )
            .unwrap();
        (store, layer, face)
    }

    #[test]
    fn mirror_keeps_bounds() {
        let mut uvs = vec![
            Point2::new(0.2, 0.1),
            Point2::new(0.2, 0.6),
            Point2::new(0.9, 0.1),
        ];
        let before = UvBounds::from_points(uvs.iter()).unwrap();
        mirror_uvs(&mut uvs);
        let after = UvBounds::from_points(uvs.iter()).unwrap();
        assert_relative_eq!(before.min.x, after.min.x, epsilon = 1e-12);
        assert_relative_eq!(before.min.y, after.min.y, epsilon = 1e-12);
        assert_relative_eq!(before.max.x, after.max.x, epsilon = 1e-12);
        assert_relative_eq!(before.max.y, after.max.y, epsilon = 1e-12);
        assert_relative_eq!(uvs[0].x, 0.9, epsilon = 1e-12);
        assert_relative_eq!(uvs[2].x, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn mirror_of_zero_width_face_is_stable() {
        let mut uvs = vec![
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 1.0),
        ];
        mirror_uvs(&mut uvs);
        for uv in &uvs {
            assert!(uv.x.is_finite() && (uv.x - 0.5).abs() < 1e-12);
        }
        mirror_uvs(&mut []);
    }

    #[test]
    fn fixed_face_is_no_longer_flipped() {
        let (mut store, layer, face) = flipped_triangle();
        assert!(IsFlipped::new(face, layer).execute(&store).unwrap());

        let fixed = FixFlipped::new(layer).execute(&mut store).unwrap();
        assert_eq!(fixed, vec![face]);
        assert!(!IsFlipped::new(face, layer).execute(&store).unwrap());

        let again = FixFlipped::new(layer).execute(&mut store).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn restricted_to_given_faces() {
        let (mut store, layer, face) = flipped_triangle();
        let fixed = FixFlipped::new(layer)
            .with_faces(Vec::new())
            .execute(&mut store)
            .unwrap();
        assert!(fixed.is_empty());
        assert!(IsFlipped::new(face, layer).execute(&store).unwrap());
    }
}
