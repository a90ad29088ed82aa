use super::edge::EdgeId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh store.
    pub struct FaceId;
}

slotmap::new_key_type! {
    /// Unique identifier for a face corner (loop).
    pub struct LoopId;
}

/// One corner of a face: a vertex reference bound to a position in the
/// face boundary. UV coordinates are stored per loop in a UV layer.
#[derive(Debug, Clone, Copy)]
pub struct LoopData {
    /// The vertex at this corner.
    pub vertex: VertexId,
    /// The face that owns this corner.
    pub face: FaceId,
}

/// Data associated with a polygon face.
///
/// `loops[i]` and `loops[i + 1]` (wrapping) bound `edges[i]`.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Ordered corners of the face boundary.
    pub loops: Vec<LoopId>,
    /// Boundary edges, index-aligned with `loops`.
    pub edges: Vec<EdgeId>,
    /// Selection flag, the output channel back to the caller.
    pub selected: bool,
}

impl FaceData {
    /// Number of corners of the face.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns `true` if the face has no corners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}
