use slotmap::SecondaryMap;

use super::{EdgeId, FaceId, MeshStore};

/// Edge-to-face incidence, built once per operation call.
///
/// Faces are listed per edge in store order, so traversals driven by this
/// table are deterministic.
#[derive(Debug, Default)]
pub struct EdgeAdjacency {
    faces: SecondaryMap<EdgeId, Vec<FaceId>>,
}

impl EdgeAdjacency {
    /// Builds the incidence table for every face in the store.
    #[must_use]
    pub fn build(store: &MeshStore) -> Self {
        let mut faces: SecondaryMap<EdgeId, Vec<FaceId>> = SecondaryMap::new();
        for id in store.face_ids() {
            let Ok(face) = store.face(id) else { continue };
            for &edge in &face.edges {
                if let Some(list) = faces.entry(edge) {
                    list.or_default().push(id);
                }
            }
        }
        Self { faces }
    }

    /// Faces using `edge`; empty for unknown or unused edges.
    #[must_use]
    pub fn faces(&self, edge: EdgeId) -> &[FaceId] {
        self.faces.get(edge).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if exactly one face uses `edge`.
    #[must_use]
    pub fn is_boundary(&self, edge: EdgeId) -> bool {
        self.faces(edge).len() == 1
    }
}
