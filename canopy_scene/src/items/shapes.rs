// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, BezPath, ParamCurveNearest, Point, Rect, Shape, Vec2};

use crate::hit::{self, INFINITE};

/// Extra room around a path's geometric bounds for stroke width and antialiasing.
const PATH_BOUNDS_MARGIN: f64 = 2.0;

/// Hit slop used by paths and guides when no tolerance is given.
const MIN_LINE_TOLERANCE: f64 = 1.0;

/// A desktop-space rectangle, drawn as the quad it maps to.
#[derive(Clone, Debug)]
pub struct RectItem {
    rect: Rect,
    canvas_corners: Option<[Point; 4]>,
}

impl RectItem {
    /// Creates a rectangle item; a finite rect is normalized.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: normalize_rect(rect),
            canvas_corners: None,
        }
    }

    /// The desktop rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = normalize_rect(rect);
    }

    /// Corners in canvas units as of the last update.
    #[must_use]
    pub fn canvas_corners(&self) -> Option<[Point; 4]> {
        self.canvas_corners
    }

    pub(crate) fn update(&mut self, affine: Affine) -> Option<Rect> {
        let r = self.rect;
        if !is_finite_rect(r) {
            self.canvas_corners = None;
            return None;
        }
        let corners = [
            affine * Point::new(r.x0, r.y0),
            affine * Point::new(r.x1, r.y0),
            affine * Point::new(r.x1, r.y1),
            affine * Point::new(r.x0, r.y1),
        ];
        self.canvas_corners = Some(corners);
        hit::bbox_of(&corners)
    }

    pub(crate) fn contains(&self, pt: Point, tolerance: f64) -> bool {
        let Some(corners) = &self.canvas_corners else {
            return false;
        };
        hit::quad_contains(corners, pt)
            || (tolerance > 0.0 && hit::quad_outline_distance(corners, pt) <= tolerance)
    }
}

fn is_finite_rect(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

/// `Rect::abs` drops NaN coordinates, so non-finite rects are kept as given.
fn normalize_rect(r: Rect) -> Rect {
    if is_finite_rect(r) { r.abs() } else { r }
}

/// A Bézier path in desktop coordinates.
#[derive(Clone, Debug, Default)]
pub struct BpathItem {
    path: BezPath,
    canvas_path: BezPath,
}

impl BpathItem {
    /// Creates a path item.
    #[must_use]
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            canvas_path: BezPath::new(),
        }
    }

    /// The desktop path.
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: BezPath) {
        self.path = path;
    }

    /// The path in canvas units as of the last update.
    #[must_use]
    pub fn canvas_path(&self) -> &BezPath {
        &self.canvas_path
    }

    pub(crate) fn update(&mut self, affine: Affine) -> Option<Rect> {
        self.canvas_path = affine * self.path.clone();
        if self.canvas_path.elements().is_empty() {
            return None;
        }
        let bounds = self.canvas_path.bounding_box();
        bounds
            .is_finite()
            .then(|| bounds.inflate(PATH_BOUNDS_MARGIN, PATH_BOUNDS_MARGIN))
    }

    pub(crate) fn contains(&self, pt: Point, tolerance: f64, filled: bool) -> bool {
        if filled && self.canvas_path.winding(pt) != 0 {
            return true;
        }
        let tolerance = tolerance.max(MIN_LINE_TOLERANCE);
        let tolerance_sq = tolerance * tolerance;
        self.canvas_path
            .segments()
            .any(|seg| seg.nearest(pt, 1e-6).distance_sq <= tolerance_sq)
    }
}

/// An infinite line through a desktop point at a given angle.
#[derive(Clone, Debug)]
pub struct GuidelineItem {
    origin: Point,
    angle: f64,
    canvas_origin: Point,
    canvas_direction: Vec2,
}

impl GuidelineItem {
    /// Creates a guide through `origin`; `angle` is in radians from the desktop x axis.
    #[must_use]
    pub fn new(origin: Point, angle: f64) -> Self {
        Self {
            origin,
            angle,
            canvas_origin: Point::ZERO,
            canvas_direction: Vec2::new(1.0, 0.0),
        }
    }

    /// Desktop origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Desktop angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub(crate) fn set_line(&mut self, origin: Point, angle: f64) {
        self.origin = origin;
        self.angle = angle;
    }

    /// Mapped origin as of the last update.
    #[must_use]
    pub fn canvas_origin(&self) -> Point {
        self.canvas_origin
    }

    /// Unit direction in canvas units as of the last update.
    #[must_use]
    pub fn canvas_direction(&self) -> Vec2 {
        self.canvas_direction
    }

    pub(crate) fn update(&mut self, affine: Affine) -> Option<Rect> {
        let through = self.origin + Vec2::from_angle(self.angle);
        let origin = affine * self.origin;
        let direction = (affine * through) - origin;
        let length = direction.hypot();
        if !origin.is_finite() || !length.is_finite() || length == 0.0 {
            return None;
        }
        self.canvas_origin = origin;
        self.canvas_direction = direction / length;
        Some(INFINITE)
    }

    pub(crate) fn contains(&self, pt: Point, tolerance: f64) -> bool {
        hit::line_distance(self.canvas_origin, self.canvas_direction, pt)
            <= tolerance.max(MIN_LINE_TOLERANCE)
    }
}

/// The document drawing, known only by its visual bounds.
#[derive(Clone, Debug, Default)]
pub struct DrawingItem {
    visual_bounds: Option<Rect>,
}

impl DrawingItem {
    /// Creates a drawing item with the given desktop visual bounds.
    #[must_use]
    pub fn new(visual_bounds: Option<Rect>) -> Self {
        Self { visual_bounds }
    }

    /// Desktop visual bounds.
    #[must_use]
    pub fn visual_bounds(&self) -> Option<Rect> {
        self.visual_bounds
    }

    pub(crate) fn set_visual_bounds(&mut self, bounds: Option<Rect>) {
        self.visual_bounds = bounds;
    }

    pub(crate) fn update(&mut self, affine: Affine) -> Option<Rect> {
        self.visual_bounds
            .map(|r| affine.transform_rect_bbox(r))
            .filter(|r| r.is_finite())
    }
}
