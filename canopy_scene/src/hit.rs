// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometric predicates shared by the item kinds.

use kurbo::{Line, ParamCurveNearest, Point, Rect, Vec2};

/// Bounds of items that cover the whole canvas (guides, catch-alls).
pub(crate) const INFINITE: Rect = Rect::new(
    f64::NEG_INFINITY,
    f64::NEG_INFINITY,
    f64::INFINITY,
    f64::INFINITY,
);

/// Strict interior test: points on the edge are outside.
pub(crate) fn interior_contains(rect: Rect, pt: Point) -> bool {
    pt.x > rect.x0 && pt.x < rect.x1 && pt.y > rect.y0 && pt.y < rect.y1
}

/// Tests `pt` against `rect` grown by `tolerance` on every side.
///
/// The edge counts as inside, matching the leaf outline tests, so a point on
/// a child's edge also hits the group holding it.
pub(crate) fn contains_with_tolerance(rect: Rect, pt: Point, tolerance: f64) -> bool {
    let tolerance = tolerance.max(0.0);
    let grown = rect.inflate(tolerance, tolerance);
    pt.x >= grown.x0 && pt.x <= grown.x1 && pt.y >= grown.y0 && pt.y <= grown.y1
}

/// Returns `true` if the two rectangles share interior area.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Union where `None` is the identity element.
pub(crate) fn union_opt(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Distance from `pt` to the segment `a`-`b`.
pub(crate) fn segment_distance(a: Point, b: Point, pt: Point) -> f64 {
    Line::new(a, b).nearest(pt, 0.).distance_sq.sqrt()
}

/// Distance from `pt` to the infinite line through `origin` with unit `direction`.
pub(crate) fn line_distance(origin: Point, direction: Vec2, pt: Point) -> f64 {
    direction.cross(pt - origin).abs()
}

/// Inside test for a convex quadrilateral given in either winding order.
/// Points on the boundary count as inside.
pub(crate) fn quad_contains(quad: &[Point; 4], pt: Point) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b - a).cross(pt - a);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Distance from `pt` to the outline of a quadrilateral.
pub(crate) fn quad_outline_distance(quad: &[Point; 4], pt: Point) -> f64 {
    (0..4)
        .map(|i| segment_distance(quad[i], quad[(i + 1) % 4], pt))
        .fold(f64::INFINITY, f64::min)
}

/// Axis-aligned bounding box of a set of points.
pub(crate) fn bbox_of(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, &p| acc.union_pt(p)),
    )
}
