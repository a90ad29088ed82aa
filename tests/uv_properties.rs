#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use uvkit::math::bounds_2d::UvBounds;
use uvkit::math::polygon_2d::area_2d;
use uvkit::math::polygon_3d::polygon_area_3d;
use uvkit::math::{Point2, Point3, Vector2};
use uvkit::mesh::{FaceId, MeshStore, UvLayerId};
use uvkit::operations::analysis::{
    is_stretched, stretch_deviation, DensityCheck, SegmentIslands, StretchCheck, UvAudit,
    FLIP_EPSILON,
};
use uvkit::operations::creation::{MakeFace, MakeGrid};
use uvkit::operations::modification::{mirror_uvs, FixFlipped};
use uvkit::operations::query::{edge_lengths, is_flipped, IsFlipped};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn new_store() -> (MeshStore, UvLayerId) {
    let mut store = MeshStore::new();
    let layer = store.add_uv_layer("UVMap");
    (store, layer)
}

fn unit_square() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

fn uv(points: &[(f64, f64)]) -> Vec<Point2> {
    points.iter().map(|&(u, v)| Point2::new(u, v)).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_matching_quad_is_not_stretched() {
    init_tracing();
    let (mut store, layer) = new_store();
    MakeFace::new(layer, unit_square(), uv(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
        .execute(&mut store)
        .unwrap();
    let report = StretchCheck::new(layer)
        .with_threshold(0.05)
        .execute(&store)
        .unwrap();
    assert!(report.flagged.is_empty());
    assert!(report.deviations[0].1.abs() < 1e-12);
}

#[test]
fn scenario_x_scaled_quad_is_stretched() {
    let (mut store, layer) = new_store();
    let face = MakeFace::new(layer, unit_square(), uv(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]))
        .execute(&mut store)
        .unwrap();
    let report = StretchCheck::new(layer)
        .with_threshold(0.1)
        .execute(&store)
        .unwrap();
    assert_eq!(report.flagged, vec![face]);
    assert!((report.deviations[0].1 - 0.5).abs() < 1e-12);
}

#[test]
fn scenario_zero_area_faces_are_never_selected() {
    let (mut store, layer) = new_store();
    let flat_3d = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    MakeFace::new(layer, flat_3d, uv(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]))
        .execute(&mut store)
        .unwrap();
    let triangle = vec![
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    MakeFace::new(layer, triangle, uv(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]))
        .execute(&mut store)
        .unwrap();

    let report = UvAudit::new(layer).execute_and_select(&mut store).unwrap();
    assert!(report.stretch.flagged.is_empty());
    assert_eq!(report.stretch.skipped, 2);
    assert!(store.selected_faces().is_empty());
}

#[test]
fn scenario_two_squares_share_an_island() {
    let (mut store, layer) = new_store();
    MakeGrid::new(layer, 2, 1)
        .with_size(2.0, 1.0)
        .execute(&mut store)
        .unwrap();
    let islands = SegmentIslands::new(layer).execute(&store).unwrap();
    assert_eq!(islands.len(), 1);
    assert_eq!(islands[0].len(), 2);
}

#[test]
fn scenario_triangle_orientation() {
    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    assert!(!is_flipped(&points, &uv(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]), FLIP_EPSILON));
    assert!(is_flipped(&points, &uv(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]), FLIP_EPSILON));
}

#[test]
fn scenario_density_matches_target() {
    let (mut store, layer) = new_store();
    MakeGrid::new(layer, 1, 1)
        .with_size(2.0, 2.0)
        .execute(&mut store)
        .unwrap();
    let report = DensityCheck::new(layer).execute(&store).unwrap();
    assert_eq!(report.islands.len(), 1);
    assert!((report.islands[0].density - 1024.0).abs() < 1e-9);
    assert!(!report.islands[0].flagged);
}

#[test]
fn audit_and_fix_round_trip() {
    init_tracing();
    let (mut store, layer) = new_store();
    MakeGrid::new(layer, 2, 2)
        .with_size(2.0, 2.0)
        .execute(&mut store)
        .unwrap();
    let flipped = MakeFace::new(
        layer,
        vec![
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(7.0, 0.0, 0.0),
            Point3::new(5.0, 2.0, 0.0),
        ],
        uv(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]),
    )
    .execute(&mut store)
    .unwrap();

    let report = UvAudit::new(layer).execute_and_select(&mut store).unwrap();
    assert_eq!(report.islands.len(), 2);
    assert_eq!(report.flipped.flagged, vec![flipped]);
    assert_eq!(store.selected_faces(), vec![flipped]);

    FixFlipped::new(layer).execute(&mut store).unwrap();
    let report = UvAudit::new(layer).execute(&store).unwrap();
    assert!(report.is_clean(), "{report}");
}

// =============================================================================
// Strategies
// =============================================================================

fn arb_point3() -> impl Strategy<Value = Point3> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

fn arb_point2() -> impl Strategy<Value = Point2> {
    prop::array::uniform2(-2.0..2.0f64).prop_map(|[u, v]| Point2::new(u, v))
}

/// A polygon with 3 to 8 corners and one UV per corner.
fn arb_polygon() -> impl Strategy<Value = (Vec<Point3>, Vec<Point2>)> {
    (3usize..=8).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_point3(), n),
            prop::collection::vec(arb_point2(), n),
        )
    })
}

/// A grid size plus, per face, whether its UVs are torn away from the grid.
fn arb_torn_grid() -> impl Strategy<Value = (usize, usize, Vec<bool>)> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(columns, rows)| {
        (
            Just(columns),
            Just(rows),
            prop::collection::vec(any::<bool>(), columns * rows),
        )
    })
}

fn build_torn_grid(columns: usize, rows: usize, torn: &[bool]) -> (MeshStore, UvLayerId, Vec<FaceId>) {
    let (mut store, layer) = new_store();
    let faces = MakeGrid::new(layer, columns, rows).execute(&mut store).unwrap();
    for (i, (&face, &tear)) in faces.iter().zip(torn).enumerate() {
        if tear {
            let offset = Vector2::new(10.0 + 3.0 * i as f64, 0.0);
            let uvs: Vec<Point2> = store
                .face_uvs(face, layer)
                .unwrap()
                .unwrap()
                .into_iter()
                .map(|p| p + offset)
                .collect();
            store.set_face_uvs(face, layer, &uvs).unwrap();
        }
    }
    (store, layer, faces)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edge_lengths_are_index_aligned((points, uvs) in arb_polygon()) {
        let pair = edge_lengths(&points, &uvs);
        prop_assert_eq!(pair.length_3d.len(), points.len());
        prop_assert_eq!(pair.length_uv.len(), uvs.len());
        prop_assert!(pair.length_3d.iter().chain(&pair.length_uv).all(|l| *l >= 0.0));
    }

    #[test]
    fn lowering_threshold_never_unflags(
        (points, uvs) in arb_polygon(),
        high in 0.0..=1.0f64,
        fraction in 0.0..=1.0f64,
    ) {
        prop_assume!(polygon_area_3d(&points) > 1e-3 && area_2d(&uvs) > 1e-3);
        let deviation = stretch_deviation(&points, &uvs).unwrap();
        prop_assert!(deviation >= 0.0);
        prop_assert_eq!(is_stretched(&points, &uvs, high), deviation > high);
        let low = high * fraction;
        if is_stretched(&points, &uvs, high) {
            prop_assert!(is_stretched(&points, &uvs, low));
        }
    }

    #[test]
    fn islands_partition_faces((columns, rows, torn) in arb_torn_grid()) {
        let (store, layer, faces) = build_torn_grid(columns, rows, &torn);
        let islands = SegmentIslands::new(layer).execute(&store).unwrap();

        let mut seen: Vec<FaceId> = islands.iter().flat_map(|i| i.faces.iter().copied()).collect();
        prop_assert_eq!(seen.len(), faces.len());
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), faces.len());

        for (face, tear) in faces.iter().zip(&torn) {
            if *tear {
                let island = islands.iter().find(|i| i.faces.contains(face)).unwrap();
                prop_assert_eq!(island.len(), 1);
            }
        }

        let again = SegmentIslands::new(layer).execute(&store).unwrap();
        prop_assert_eq!(islands, again);
    }

    #[test]
    fn fixing_a_flipped_triangle_sticks(
        corners in prop::array::uniform3(arb_point2()),
    ) {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let area = (corners[1] - corners[0]).perp(&(corners[2] - corners[0]));
        prop_assume!(area < -1e-3);

        let (mut store, layer) = new_store();
        let face = MakeFace::new(layer, points.to_vec(), corners.to_vec())
            .execute(&mut store)
            .unwrap();
        prop_assert!(IsFlipped::new(face, layer).execute(&store).unwrap());

        let before = UvBounds::from_points(&corners).unwrap();
        let fixed = FixFlipped::new(layer).execute(&mut store).unwrap();
        prop_assert_eq!(fixed, vec![face]);
        prop_assert!(!IsFlipped::new(face, layer).execute(&store).unwrap());

        let uvs = store.face_uvs(face, layer).unwrap().unwrap();
        let after = UvBounds::from_points(&uvs).unwrap();
        prop_assert!((before.min - after.min).norm() < 1e-9);
        prop_assert!((before.max - after.max).norm() < 1e-9);
    }

    #[test]
    fn mirroring_twice_restores_uvs(uvs in prop::collection::vec(arb_point2(), 3..8)) {
        let mut mirrored = uvs.clone();
        mirror_uvs(&mut mirrored);
        mirror_uvs(&mut mirrored);
        for (a, b) in uvs.iter().zip(&mirrored) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }
}
