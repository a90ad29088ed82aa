use crate::error::{OperationError, Result};
use crate::math::{Point2, Point3, Vector2, Vector3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};

/// Creates a planar grid of quads in the XY plane with continuous UVs.
///
/// Vertices are shared between neighbouring quads and UVs map the whole grid
/// linearly onto `uv_origin .. uv_origin + uv_size`, so the grid is a single
/// UV island.
pub struct MakeGrid {
    layer: UvLayerId,
    columns: usize,
    rows: usize,
    size: Vector2,
    origin: Point3,
    uv_origin: Point2,
    uv_size: Vector2,
}

impl MakeGrid {
    /// Creates a new `MakeGrid` operation: a unit square split into
    /// `columns x rows` quads, mapped onto the unit UV square.
    #[must_use]
    pub fn new(layer: UvLayerId, columns: usize, rows: usize) -> Self {
        Self {
            layer,
            columns,
            rows,
            size: Vector2::new(1.0, 1.0),
            origin: Point3::origin(),
            uv_origin: Point2::origin(),
            uv_size: Vector2::new(1.0, 1.0),
        }
    }

    /// Sets the world-space width and height of the grid.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Vector2::new(width, height);
        self
    }

    /// Sets the position of the grid's minimum corner.
    #[must_use]
    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the UV rectangle the grid is mapped onto.
    #[must_use]
    pub fn with_uv_rect(mut self, uv_origin: Point2, uv_size: Vector2) -> Self {
        self.uv_origin = uv_origin;
        self.uv_size = uv_size;
        self
    }

    /// Executes the operation, returning the faces row by row.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no columns or rows, or the layer is
    /// not found.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        if self.columns == 0 || self.rows == 0 {
            return Err(OperationError::InvalidInput(format!(
                "grid needs at least one column and row, got {}x{}",
                self.columns, self.rows
            ))
            .into());
        }
        store.uv_layer(self.layer)?;

        let (nx, ny) = (self.columns, self.rows);
        let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
        let mut uvs = Vec::with_capacity(vertices.capacity());
        for j in 0..=ny {
            for i in 0..=nx {
                let s = i as f64 / nx as f64;
                let t = j as f64 / ny as f64;
                vertices.push(store.add_vertex(
                    self.origin + Vector3::new(s * self.size.x, t * self.size.y, 0.0),
                ));
                uvs.push(self.uv_origin + Vector2::new(s * self.uv_size.x, t * self.uv_size.y));
            }
        }

        let index = |i: usize, j: usize| j * (nx + 1) + i;
        let mut faces = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let corners = [index(i, j), index(i + 1, j), index(i + 1, j + 1), index(i, j + 1)];
                let face = store.add_face(&corners.map(|c| vertices[c]))?;
                store.set_face_uvs(face, self.layer, &corners.map(|c| uvs[c]))?;
                faces.push(face);
            }
        }
        Ok(faces)
    }
}
