use crate::error::Result;
use crate::math::bounds_2d::UvBounds;
use crate::math::Point2;
use crate::mesh::{MeshStore, UvLayerId};
use crate::operations::analysis::{
    check_positive, island_density, SegmentIslands, TextureSize, UvIsland, DEFAULT_TARGET_DENSITY,
};

/// Scales every UV island so that its texel density matches a target.
///
/// Each island is scaled uniformly about the center of its UV bounding box.
/// Islands with zero density (degenerate or without UVs) are left alone.
pub struct ScaleToDensity {
    layer: UvLayerId,
    texture: TextureSize,
    target_density: f64,
    islands: Option<Vec<UvIsland>>,
}

impl ScaleToDensity {
    /// Creates a new `ScaleToDensity` for a 2048x2048 texture at 1024 texels
    /// per unit.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            texture: TextureSize::default(),
            target_density: DEFAULT_TARGET_DENSITY,
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

    /// Uses an existing segmentation instead of segmenting with defaults.
    #[must_use]
    pub fn with_islands(mut self, islands: Vec<UvIsland>) -> Self {
        self.islands = Some(islands);
        self
    }

    /// Executes the scaling, returning the number of islands rescaled.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range, or a face or the
    /// layer is not found.
    pub fn execute(&self, store: &mut MeshStore) -> Result<usize> {
        self.texture.validate()?;
        check_positive("target_density", self.target_density)?;
        let islands = match &self.islands {
            Some(islands) => islands.clone(),
            None => SegmentIslands::new(self.layer).execute(store)?,
        };

        let mut scaled = 0;
        for island in &islands {
            let density = island_density(store, island, self.layer, self.texture)?;
            if density <= 0.0 {
                continue;
            }
            let factor = self.target_density / density;

            let mut face_uvs = Vec::with_capacity(island.len());
            for &face in &island.faces {
                if let Some(uvs) = store.face_uvs(face, self.layer)? {
                    face_uvs.push((face, uvs));
                }
            }
            let Some(bounds) = UvBounds::from_points(face_uvs.iter().flat_map(|(_, uvs)| uvs)) else {
                continue;
            };
            let center = bounds.center();
            for (face, uvs) in face_uvs {
                let uvs: Vec<Point2> = uvs.iter().map(|uv| center + (uv - center) * factor).collect();
                store.set_face_uvs(face, self.layer, &uvs)?;
            }
            scaled += 1;
        }

        tracing::debug!(
            scaled,
            islands = islands.len(),
            target = self.target_density,
            "scaled UV islands to target density"
        );
        Ok(scaled)
    }
}
