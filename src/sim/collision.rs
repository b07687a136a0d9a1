//! Collision tests
//!
//! Every pairwise interaction in the shooter reduces to one of two checks:
//! an axis-aligned rectangle against a circle, or a point inside a radius.
//! Both are center-based and allocation free.

use glam::Vec2;

/// Check overlap between an axis-aligned rectangle and a circle
///
/// The circle center is clamped to the rectangle bounds to find the nearest
/// point on the rectangle; the squared distance from that point is compared
/// against the squared radius. Touching counts as overlap.
#[inline]
pub fn rect_circle_overlap(
    rect_center: Vec2,
    rect_size: Vec2,
    circle_center: Vec2,
    radius: f32,
) -> bool {
    let half = rect_size * 0.5;
    let nearest = circle_center.clamp(rect_center - half, rect_center + half);
    nearest.distance_squared(circle_center) <= radius * radius
}

/// Check whether `point` lies within `radius` of `center` (blast test)
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}
