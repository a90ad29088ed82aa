use std::collections::VecDeque;

use slotmap::SecondaryMap;

use crate::error::Result;
use crate::math::polygon_2d::uv_close;
use crate::math::Point2;
use crate::mesh::{EdgeAdjacency, EdgeId, FaceId, MeshStore, UvLayerId, VertexId};

use super::{check_non_negative, UV_MATCH_TOLERANCE};

/// How many corners of a shared edge must carry matching UVs for the two
/// faces to be UV-connected across it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UvMatch {
    /// At least one shared corner matches.
    #[default]
    AnyCorner,
    /// Both corners of the shared edge match.
    BothCorners,
}

/// A maximal set of faces contiguous in UV space.
///
/// Islands have no identity beyond their faces and are only meaningful for
/// the mesh state they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UvIsland {
    /// Faces in discovery order; the first is the lowest face in store order.
    pub faces: Vec<FaceId>,
}

impl UvIsland {
    /// Number of faces in the island.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the island has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// UV connectivity between edge-adjacent faces of one layer.
pub(crate) struct UvConnectivity<'a> {
    store: &'a MeshStore,
    adjacency: EdgeAdjacency,
    corners: SecondaryMap<FaceId, Vec<(VertexId, Point2)>>,
    tolerance: f64,
    uv_match: UvMatch,
    respect_seams: bool,
}

impl<'a> UvConnectivity<'a> {
    /// Gathers per-face corner UVs. Faces lacking UV data in `layer` are
    /// left out and never connect to anything.
    pub(crate) fn build(
        store: &'a MeshStore,
        layer: UvLayerId,
        tolerance: f64,
        uv_match: UvMatch,
        respect_seams: bool,
    ) -> Result<Self> {
        let mut corners = SecondaryMap::new();
        for id in store.face_ids() {
            let Some(uvs) = store.face_uvs(id, layer)? else {
                continue;
            };
            let face = store.face(id)?;
            let mut list = Vec::with_capacity(face.len());
            for (&l, uv) in face.loops.iter().zip(uvs) {
                list.push((store.loop_data(l)?.vertex, uv));
            }
            corners.insert(id, list);
        }
        Ok(Self {
            store,
            adjacency: EdgeAdjacency::build(store),
            corners,
            tolerance,
            uv_match,
            respect_seams,
        })
    }

    pub(crate) fn adjacency(&self) -> &EdgeAdjacency {
        &self.adjacency
    }

    /// Returns `true` if `face` has UV data.
    pub(crate) fn has_uvs(&self, face: FaceId) -> bool {
        self.corners.contains_key(face)
    }

    /// Whether `a` and `b` are UV-connected across `edge`.
    ///
    /// Returns `None` if either face has no UV data.
    pub(crate) fn connected_across(&self, a: FaceId, b: FaceId, edge: EdgeId) -> Result<Option<bool>> {
        let (Some(ca), Some(cb)) = (self.corners.get(a), self.corners.get(b)) else {
            return Ok(None);
        };
        let data = self.store.edge(edge)?;
        if self.respect_seams && data.seam {
            return Ok(Some(false));
        }
        let matching = data
            .vertices
            .iter()
            .filter(|&&v| match (corner_uv(ca, v), corner_uv(cb, v)) {
                (Some(ua), Some(ub)) => uv_close(&ua, &ub, self.tolerance),
                _ => false,
            })
            .count();
        Ok(Some(match self.uv_match {
            UvMatch::AnyCorner => matching >= 1,
            UvMatch::BothCorners => matching == 2,
        }))
    }
}

fn corner_uv(corners: &[(VertexId, Point2)], vertex: VertexId) -> Option<Point2> {
    corners
        .iter()
        .find_map(|&(v, uv)| (v == vertex).then_some(uv))
}

/// Partitions the faces of a mesh into UV islands.
///
/// Flood fill over edge-adjacent faces whose UVs agree on the shared edge.
/// Every face lands in exactly one island; faces without UV data form
/// single-face islands. Seeds are taken in store order, so the partition is
/// stable across runs on an unmodified mesh.
pub struct SegmentIslands {
    layer: UvLayerId,
    tolerance: f64,
    uv_match: UvMatch,
    respect_seams: bool,
}

impl SegmentIslands {
    /// Creates a new `SegmentIslands` operation with the default tolerance.
    #[must_use]
    pub fn new(layer: UvLayerId) -> Self {
        Self {
            layer,
            tolerance: UV_MATCH_TOLERANCE,
            uv_match: UvMatch::default(),
            respect_seams: false,
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

    /// Treats seam edges as island boundaries.
    #[must_use]
    pub fn with_seams(mut self, respect_seams: bool) -> Self {
        self.respect_seams = respect_seams;
        self
    }

    pub(crate) fn connectivity<'a>(&self, store: &'a MeshStore) -> Result<UvConnectivity<'a>> {
        check_non_negative("uv_tolerance", self.tolerance)?;
        store.uv_layer(self.layer)?;
        UvConnectivity::build(
            store,
            self.layer,
            self.tolerance,
            self.uv_match,
            self.respect_seams,
        )
    }

    /// Executes the segmentation.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is invalid or the layer is not found.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<UvIsland>> {
        let connectivity = self.connectivity(store)?;
        let mut visited: SecondaryMap<FaceId, ()> = SecondaryMap::new();
        let mut islands = Vec::new();
        let mut missing_uv = 0usize;

        for seed in store.face_ids() {
            if visited.contains_key(seed) {
                continue;
            }
            visited.insert(seed, ());
            if !connectivity.has_uvs(seed) {
                missing_uv += 1;
                islands.push(UvIsland { faces: vec![seed] });
                continue;
            }

            let mut faces = Vec::new();
            let mut frontier = VecDeque::from([seed]);
            while let Some(face) = frontier.pop_front() {
                faces.push(face);
                for &edge in &store.face(face)?.edges {
                    for &other in connectivity.adjacency().faces(edge) {
                        if visited.contains_key(other) {
                            continue;
                        }
                        if connectivity.connected_across(face, other, edge)? == Some(true) {
                            visited.insert(other, ());
                            frontier.push_back(other);
                        }
                    }
                }
            }
            islands.push(UvIsland { faces });
        }

        if missing_uv > 0 {
            tracing::warn!(faces = missing_uv, "faces without UV data form their own islands");
        }
        tracing::debug!(islands = islands.len(), faces = store.face_count(), "segmented UV islands");
        Ok(islands)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    /// Two unit quads sharing the edge x = 1. UVs of the right quad are
    /// offset by `shift` in U, so a non-zero shift cuts the shared edge.
    fn two_quads(shift: f64) -> (MeshStore, UvLayerId, FaceId, FaceId) {
        let mut store = MeshStore::new();
        let layer = store.add_uv_layer("UVMap");
        let v: Vec<_> = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
        ]
        .iter()
        .map(|&(x, y)| store.add_vertex(Point3::new(x, y, 0.0)))
        .collect();
        let a = store.add_face(&[v[0], v[1], v[4], v[3]]).unwrap();
        let b = store.add_face(&[v[1], v[2], v[5], v[4]]).unwrap();
        store
            .set_face_uvs(
                a,
                layer,
                &[
                    Point2::new(0.0, 0.0),
                    Point2::new(0.5, 0.0),
                    Point2::new(0.5, 0.5),
                    Point2::new(0.0, 0.5),
                ],
            )
            .unwrap();
        store
            .set_face_uvs(
                b,
                layer,
                &[
                    Point2::new(0.5 + shift, 0.0),
                    Point2::new(1.0 + shift, 0.0),
                    Point2::new(1.0 + shift, 0.5),
                    Point2::new(0.5 + shift, 0.5),
                ],
            )
            .unwrap();
        (store, layer, a, b)
    }

    #[test]
    fn shared_uv_edge_forms_one_island() {
        let (store, layer, a, b) = two_quads(0.0);
        let islands = SegmentIslands::new(layer).execute(&store).unwrap();
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].faces, vec![a, b]);
    }

    #[test]
    fn split_uv_edge_forms_two_islands() {
        let (store, layer, a, b) = two_quads(0.25);
        let islands = SegmentIslands::new(layer).execute(&store).unwrap();
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0].faces, vec![a]);
        assert_eq!(islands[1].faces, vec![b]);
    }

    #[test]
    fn difference_within_tolerance_still_connects() {
        let (store, layer, _, _) = two_quads(5e-5);
        assert_eq!(SegmentIslands::new(layer).execute(&store).unwrap().len(), 1);
        assert_eq!(
            SegmentIslands::new(layer)
                .with_tolerance(1e-6)
                .execute(&store)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn one_matching_corner_is_enough_by_default() {
        let (mut store, layer, _, b) = two_quads(0.0);
        // Move the upper shared corner of the right quad away.
        let upper = store.face(b).unwrap().loops[3];
        store.set_uv(layer, upper, Point2::new(0.7, 0.9)).unwrap();

        assert_eq!(SegmentIslands::new(layer).execute(&store).unwrap().len(), 1);
        assert_eq!(
            SegmentIslands::new(layer)
                .with_uv_match(UvMatch::BothCorners)
                .execute(&store)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn seams_split_when_requested() {
        let (mut store, layer, _, _) = two_quads(0.0);
        let shared = store
            .edge_ids()
            .find(|&e| {
                let v = store.edge(e).unwrap().vertices;
                let p0 = store.vertex(v[0]).unwrap().point;
                let p1 = store.vertex(v[1]).unwrap().point;
                (p0.x - 1.0).abs() < 1e-12 && (p1.x - 1.0).abs() < 1e-12
            })
            .unwrap();
        store.set_seam(shared, true).unwrap();

        assert_eq!(SegmentIslands::new(layer).execute(&store).unwrap().len(), 1);
        assert_eq!(
            SegmentIslands::new(layer)
                .with_seams(true)
                .execute(&store)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn faces_without_uvs_are_single_islands() {
        let (mut store, layer, a, b) = two_quads(0.0);
        let v: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| store.add_vertex(Point3::new(x, y, 5.0)))
            .collect();
        let lone = store.add_face(&v).unwrap();
        let islands = SegmentIslands::new(layer).execute(&store).unwrap();
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0].faces, vec![a, b]);
        assert_eq!(islands[1].faces, vec![lone]);
    }

    #[test]
    fn empty_mesh_has_no_islands() {
        let mut store = MeshStore::new();
        let layer = store.add_uv_layer("UVMap");
        assert!(SegmentIslands::new(layer).execute(&store).unwrap().is_empty());
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let (store, _, _, _) = two_quads(0.0);
        let mut other = MeshStore::new();
        other.add_uv_layer("a");
        let foreign = other.add_uv_layer("b");
        assert!(SegmentIslands::new(foreign).execute(&store).is_err());
    }
}
