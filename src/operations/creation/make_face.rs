use crate::error::{OperationError, Result};
use crate::math::{Point2, Point3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};

/// Creates a standalone face with its own vertices and UV coordinates.
pub struct MakeFace {
    layer: UvLayerId,
    points: Vec<Point3>,
    uvs: Vec<Point2>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation. `uvs[i]` belongs to `points[i]`.
    #[must_use]
    pub fn new(layer: UvLayerId, points: Vec<Point3>, uvs: Vec<Point2>) -> Self {
        Self { layer, points, uvs }
    }

    /// Executes the operation, creating the face in the mesh store.
    ///
    /// # Errors
    ///
    /// Returns an error if points and UVs differ in count, the polygon has
    /// fewer than three corners, or the layer is not found.
    pub fn execute(&self, store: &mut MeshStore) -> Result<FaceId> {
        if self.points.len() != self.uvs.len() {
            return Err(OperationError::InvalidInput(format!(
                "{} points but {} UV coordinates",
                self.points.len(),
                self.uvs.len()
            ))
            .into());
        }
        store.uv_layer(self.layer)?;
        let vertices: Vec<_> = self.points.iter().map(|&p| store.add_vertex(p)).collect();
        let face = store.add_face(&vertices)?;
        store.set_face_uvs(face, self.layer, &self.uvs)?;
        Ok(face)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn creates_face_with_uvs() {
        let mut store = MeshStore::new();
        let layer = store.add_uv_layer("UVMap");
        let face = MakeFace::new(
            layer,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
        )
        .execute(&mut store)
        .unwrap();
        assert_eq!(store.face(face).unwrap().len(), 3);
        assert_eq!(store.vertex_count(), 3);
        assert!(store.face_uvs(face, layer).unwrap().is_some());
    }

    #[test]
    fn rejects_mismatched_uvs() {
        let mut store = MeshStore::new();
        let layer = store.add_uv_layer("UVMap");
        let result = MakeFace::new(
            layer,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Point2::new(0.0, 0.0)],
        )
        .execute(&mut store);
        assert!(result.is_err());
        assert_eq!(store.vertex_count(), 0);
    }
}
