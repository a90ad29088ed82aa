use crate::error::Result;
use crate::math::polygon_2d::area_2d;
use crate::math::polygon_3d::polygon_area_3d;
use crate::math::{Point2, Point3};
use crate::mesh::{FaceId, MeshStore, UvLayerId};
use crate::operations::analysis::{TextureSize, AREA_EPSILON};

/// Texel density of a polygon: texels per world unit along one axis.
///
/// `sqrt(uv_area * texels / world_area)`. Returns `0.0` for a face that is
/// degenerate in 3D or in UV space.
#[must_use]
pub fn texel_density(points: &[Point3], uvs: &[Point2], texture: TextureSize) -> f64 {
    if points.len() < 3 || uvs.len() != points.len() {
        return 0.0;
    }
    let uv_area = area_2d(uvs);
    let world_area = polygon_area_3d(points);
    if uv_area < AREA_EPSILON || world_area < AREA_EPSILON {
        return 0.0;
    }
    (uv_area * texture.texels() / world_area).sqrt()
}

/// Computes the texel density of one face.
pub struct FaceTexelDensity {
    face: FaceId,
    layer: UvLayerId,
    texture: TextureSize,
}

impl FaceTexelDensity {
    /// Creates a new `FaceTexelDensity` query for a 2048x2048 texture.
    #[must_use]
    pub fn new(face: FaceId, layer: UvLayerId) -> Self {
        Self {
            face,
            layer,
            texture: TextureSize::default(),
        }
    }

    /// Sets the texture resolution.
    #[must_use]
    pub fn with_texture_size(mut self, texture: TextureSize) -> Self {
        self.texture = texture;
        self
    }

    /// Executes the query. A face without UV data has density `0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or layer is not found, or the texture
    /// size is zero.
    pub fn execute(&self, store: &MeshStore) -> Result<f64> {
        self.texture.validate()?;
        let Some(uvs) = store.face_uvs(self.face, self.layer)? else {
            return Ok(0.0);
        };
        Ok(texel_density(&store.face_points(self.face)?, &uvs, self.texture))
    }
}
