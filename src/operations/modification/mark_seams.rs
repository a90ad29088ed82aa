use crate::error::Result;
use crate::mesh::{EdgeId, MeshStore, UvLayerId};
use crate::operations::analysis::{SegmentIslands, UvMatch, UV_MATCH_TOLERANCE};

/// Marks UV island borders as seams.
///
/// Every edge shared by faces that are not UV-connected across it becomes a
/// seam. Open boundary edges and edges next to faces without UV data are
/// left untouched; existing seams are never cleared.
pub struct MarkSeamsFromIslands {
    layer: UvLayerId,
    tolerance: f64,
    uv_match: UvMatch,
}

impl MarkSeamsFromIslands {
    /// Creates a new `MarkSeamsFromIslands` operation.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            tolerance: UV_MATCH_TOLERANCE,
            uv_match: UvMatch::default(),
        }
    }

    /// Sets the per-axis UV equality tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets how many corners of a shared edge must match.
    #[must_use]
    pub fn with_uv_match(mut self, uv_match: UvMatch) -> Self {
        self.uv_match = uv_match;
        self
    }

    /// Executes the operation, returning every island border edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is invalid or the layer is not found.
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<EdgeId>> {
        let borders = {
            let connectivity = SegmentIslands::new(self.layer)
                .with_tolerance(self.tolerance)
                .with_uv_match(self.uv_match)
                .connectivity(store)?;
            let mut borders = Vec::new();
            for edge in store.edge_ids() {
                if connectivity.adjacency().is_boundary(edge) {
                    continue;
                }
                let faces = connectivity.adjacency().faces(edge);
                let mut split = false;
                for (i, &a) in faces.iter().enumerate() {
                    for &b in &faces[i + 1..] {
                        split |= connectivity.connected_across(a, b, edge)? == Some(false);
                    }
                }
                if split {
                    borders.push(edge);
                }
            }
            borders
        };

        for &edge in &borders {
            store.set_seam(edge, true)?;
        }
        tracing::debug!(seams = borders.len(), "marked seams from UV islands");
        Ok(borders)
    }
}
