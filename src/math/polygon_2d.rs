use super::{Point2, Vector2};

/// Computes the signed area of a polygon in UV space (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned polygon area in UV space.
#[must_use]
pub fn area_2d(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// 2D cross product (z component of the 3D cross product).
#[inline]
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed doubled area of the triangle `(a, b, c)`.
///
/// Positive when the corners wind counter-clockwise.
#[must_use]
pub fn triangle_orientation_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross_2d(&(b - a), &(c - a))
}

/// Returns `true` if both coordinates of `a` and `b` differ by at most `tolerance`.
#[inline]
#[must_use]
pub fn uv_close(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}
