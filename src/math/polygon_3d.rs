use super::{Point3, Vector3, TOLERANCE};

/// Area-weighted polygon normal via Newell's method.
///
/// The length of the returned vector is twice the polygon area; its direction
/// follows the winding of `points` (right-hand rule). Works for non-convex
/// polygons as long as they are close to planar.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    if n < 3 {
        return normal;
    }
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Area of a (near-)planar polygon in 3D.
#[must_use]
pub fn polygon_area_3d(points: &[Point3]) -> f64 {
    newell_normal(points).norm() * 0.5
}

/// Unit normal of a polygon, or `None` if the polygon is degenerate.
#[must_use]
pub fn polygon_unit_normal(points: &[Point3]) -> Option<Vector3> {
    let normal = newell_normal(points);
    let len = normal.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(normal / len)
    }
}
