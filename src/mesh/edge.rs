use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the mesh store.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// Edges are shared by every face that uses the same unordered vertex pair.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// End vertices, stored in ascending key order.
    pub vertices: [VertexId; 2],
    /// Marked UV seam.
    pub seam: bool,
}
