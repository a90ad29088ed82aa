pub mod adjacency;
pub mod edge;
pub mod face;
pub mod uv_layer;
pub mod vertex;

pub use adjacency::EdgeAdjacency;
pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId, LoopData, LoopId};
pub use uv_layer::{UvLayerData, UvLayerId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use crate::error::{MeshError, Result};
use crate::math::{Point2, Point3};
use slotmap::SlotMap;

/// Central arena that owns all mesh entities.
///
/// Entities reference each other via typed IDs (generational indices).
/// Faces, edges and loops are only ever added, so iteration order is
/// insertion order and repeated analysis runs see the same sequence.
#[derive(Debug, Default)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    loops: SlotMap<LoopId, LoopData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    uv_layers: SlotMap<UvLayerId, UvLayerData>,
    edge_lookup: HashMap<[VertexId; 2], EdgeId>,
    active_uv_layer: Option<UvLayerId>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("vertex".into()).into())
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Face operations ---

    /// Inserts a polygon over the given vertices, creating its loops and any
    /// edges not already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon has fewer than three corners, uses a
    /// vertex twice, or references a vertex that does not exist.
    pub fn add_face(&mut self, vertices: &[VertexId]) -> Result<FaceId> {
        if vertices.len() < 3 {
            return Err(MeshError::InvalidFace(format!(
                "a face needs at least 3 vertices, got {}",
                vertices.len()
            ))
            .into());
        }
        for (i, &v) in vertices.iter().enumerate() {
            self.vertex(v)?;
            if vertices[..i].contains(&v) {
                return Err(MeshError::InvalidFace("face uses a vertex twice".into()).into());
            }
        }

        let n = vertices.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            edges.push(self.edge_or_insert(vertices[i], vertices[(i + 1) % n]));
        }

        let face = self.faces.insert(FaceData {
            loops: Vec::with_capacity(n),
            edges,
            selected: false,
        });
        let loops: Vec<LoopId> = vertices
            .iter()
            .map(|&vertex| self.loops.insert(LoopData { vertex, face }))
            .collect();
        if let Some(data) = self.faces.get_mut(face) {
            data.loops = loops;
        }
        Ok(face)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData> {
        self.faces
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("face".into()).into())
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// Callers may only touch `selected`; `loops` and `edges` must stay
    /// index-aligned.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub(crate) fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| MeshError::EntityNotFound("face".into()).into())
    }

    /// All face IDs in insertion order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Corner positions of a face, in boundary order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices is not found.
    pub fn face_points(&self, id: FaceId) -> Result<Vec<Point3>> {
        self.face(id)?
            .loops
            .iter()
            .map(|&l| -> Result<Point3> { Ok(self.vertex(self.loop_data(l)?.vertex)?.point) })
            .collect()
    }

    /// Corner UV coordinates of a face in the given layer, in boundary order.
    ///
    /// Returns `Ok(None)` when any corner has no coordinate in the layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or the layer is not found.
    pub fn face_uvs(&self, id: FaceId, layer: UvLayerId) -> Result<Option<Vec<Point2>>> {
        let coords = &self.uv_layer(layer)?.coords;
        Ok(self
            .face(id)?
            .loops
            .iter()
            .map(|&l| coords.get(l).copied())
            .collect())
    }

    // --- Loop operations ---

    /// Returns a reference to the loop data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn loop_data(&self, id: LoopId) -> Result<&LoopData> {
        self.loops
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("loop".into()).into())
    }

    // --- Edge operations ---

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData> {
        self.edges
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("edge".into()).into())
    }

    /// All edge IDs in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge joining two vertices, if any face uses it.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Marks or clears an edge as a UV seam.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found.
    pub fn set_seam(&mut self, id: EdgeId, seam: bool) -> Result<()> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| MeshError::EntityNotFound("edge".into()))?
            .seam = seam;
        Ok(())
    }

    fn edge_or_insert(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let key = edge_key(a, b);
        *self.edge_lookup.entry(key).or_insert_with(|| {
            self.edges.insert(EdgeData {
                vertices: key,
                seam: false,
            })
        })
    }

    // --- UV layer operations ---

    /// Adds an empty UV layer. The first layer added becomes active.
    pub fn add_uv_layer(&mut self, name: impl Into<String>) -> UvLayerId {
        let id = self.uv_layers.insert(UvLayerData::new(name));
        self.active_uv_layer.get_or_insert(id);
        id
    }

    /// Returns a reference to the layer data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn uv_layer(&self, id: UvLayerId) -> Result<&UvLayerData> {
        self.uv_layers
            .get(id)
            .ok_or_else(|| MeshError::EntityNotFound("uv layer".into()).into())
    }

    /// Finds a layer by name.
    #[must_use]
    pub fn uv_layer_by_name(&self, name: &str) -> Option<UvLayerId> {
        self.uv_layers
            .iter()
            .find_map(|(id, layer)| (layer.name == name).then_some(id))
    }

    /// The active UV layer, if the mesh has any.
    #[must_use]
    pub fn active_uv_layer(&self) -> Option<UvLayerId> {
        self.active_uv_layer
    }

    /// Makes `id` the active UV layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn set_active_uv_layer(&mut self, id: UvLayerId) -> Result<()> {
        self.uv_layer(id)?;
        self.active_uv_layer = Some(id);
        Ok(())
    }

    /// UV coordinate of a loop, or `None` if the loop has no UV in `layer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not found.
    pub fn uv(&self, layer: UvLayerId, id: LoopId) -> Result<Option<Point2>> {
        Ok(self.uv_layer(layer)?.coords.get(id).copied())
    }

    /// Sets the UV coordinate of a loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer or the loop is not found.
    pub fn set_uv(&mut self, layer: UvLayerId, id: LoopId, uv: Point2) -> Result<()> {
        self.loop_data(id)?;
        self.uv_layers
            .get_mut(layer)
            .ok_or_else(|| MeshError::EntityNotFound("uv layer".into()))?
            .coords
            .insert(id, uv);
        Ok(())
    }

    /// Sets the UV coordinates of every corner of a face, in boundary order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or layer is not found, or if the number
    /// of coordinates does not match the number of corners.
    pub fn set_face_uvs(&mut self, face: FaceId, layer: UvLayerId, uvs: &[Point2]) -> Result<()> {
        let loops = self.face(face)?.loops.clone();
        if loops.len() != uvs.len() {
            return Err(MeshError::InvalidFace(format!(
                "face has {} corners but {} UV coordinates were given",
                loops.len(),
                uvs.len()
            ))
            .into());
        }
        for (l, uv) in loops.into_iter().zip(uvs) {
            self.set_uv(layer, l, *uv)?;
        }
        Ok(())
    }

    // --- Selection ---

    /// Replaces the face selection: clears every flag, then selects `faces`.
    ///
    /// # Errors
    ///
    /// Returns an error (leaving the selection untouched) if any face is not found.
    pub fn set_selection(&mut self, faces: &[FaceId]) -> Result<()> {
        for &f in faces {
            self.face(f)?;
        }
        for face in self.faces.values_mut() {
            face.selected = false;
        }
        for &f in faces {
            self.face_mut(f)?.selected = true;
        }
        Ok(())
    }

    /// Selected faces in insertion order.
    #[must_use]
    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter_map(|(id, face)| face.selected.then_some(id))
            .collect()
    }
}

fn edge_key(a: VertexId, b: VertexId) -> [VertexId; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}
