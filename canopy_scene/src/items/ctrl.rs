// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control handles: fixed pixel-size markers placed at desktop positions.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use kurbo::{Affine, Point, Rect};

use crate::hit;

/// Which part of the handle sits on its position.
///
/// The discriminant order is significant: arrow shapes point along
/// `index * π/4` (plus the canvas rotation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    /// The handle is centered on its position.
    #[default]
    Center,
    /// Top edge center.
    North,
    /// Top-left corner.
    NorthWest,
    /// Left edge center.
    West,
    /// Bottom-left corner.
    SouthWest,
    /// Bottom edge center.
    South,
    /// Bottom-right corner.
    SouthEast,
    /// Right edge center.
    East,
    /// Top-right corner.
    NorthEast,
}

impl Anchor {
    const fn index(self) -> u8 {
        match self {
            Self::Center => 0,
            Self::North => 1,
            Self::NorthWest => 2,
            Self::West => 3,
            Self::SouthWest => 4,
            Self::South => 5,
            Self::SouthEast => 6,
            Self::East => 7,
            Self::NorthEast => 8,
        }
    }

    /// Pixel offset of the handle box for a handle of the given half extents.
    fn offset(self, w_half: f64, h_half: f64) -> (f64, f64) {
        let dx = match self {
            Self::NorthWest | Self::West | Self::SouthWest => w_half,
            Self::NorthEast | Self::East | Self::SouthEast => -w_half,
            Self::North | Self::Center | Self::South => 0.0,
        };
        let dy = match self {
            Self::NorthWest | Self::North | Self::NorthEast => h_half,
            Self::SouthWest | Self::South | Self::SouthEast => -h_half,
            Self::West | Self::Center | Self::East => 0.0,
        };
        (dx, dy)
    }
}

/// How a handle is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CtrlShape {
    /// Filled square.
    #[default]
    Square,
    /// Square rotated by 45°.
    Diamond,
    /// Filled circle.
    Circle,
    /// Triangle pointing up.
    Triangle,
    /// Diagonal cross.
    Cross,
    /// Upright cross.
    Plus,
    /// Rotation center marker.
    Pivot,
    /// Double-headed arrow (scale handles).
    DArrow,
    /// Skew arrow.
    SArrow,
    /// Corner rotation arrow.
    CArrow,
    /// Side alignment marker.
    SAlign,
    /// Corner alignment marker.
    CAlign,
    /// Middle alignment marker.
    MAlign,
}

/// A handle drawn at a fixed pixel size regardless of zoom.
#[derive(Clone, Debug)]
pub struct CtrlItem {
    position: Point,
    width: u32,
    height: u32,
    anchor: Anchor,
    shape: CtrlShape,
    angle: f64,
    canvas_position: Point,
}

impl CtrlItem {
    /// Creates a square handle of `size` pixels (rounded up to odd) at `position`.
    #[must_use]
    pub fn new(position: Point, size: u32) -> Self {
        let size = odd(size);
        Self {
            position,
            width: size,
            height: size,
            anchor: Anchor::default(),
            shape: CtrlShape::default(),
            angle: 0.0,
            canvas_position: Point::ZERO,
        }
    }

    /// Sets the anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the shape.
    #[must_use]
    pub fn with_shape(mut self, shape: CtrlShape) -> Self {
        self.shape = shape;
        self
    }

    /// Desktop position. May be non-finite, which hides the handle.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Pixel width and height; both odd.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Anchor.
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Shape.
    #[must_use]
    pub fn shape(&self) -> CtrlShape {
        self.shape
    }

    /// Drawing angle in radians, as of the last update.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Returns `true` if the setter changed anything.
    pub(crate) fn set_position(&mut self, position: Point) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        true
    }

    pub(crate) fn set_size(&mut self, size: u32) -> bool {
        let size = odd(size);
        if self.width == size && self.height == size {
            return false;
        }
        self.width = size;
        self.height = size;
        true
    }

    pub(crate) fn set_anchor(&mut self, anchor: Anchor) -> bool {
        let changed = self.anchor != anchor;
        self.anchor = anchor;
        changed
    }

    pub(crate) fn set_shape(&mut self, shape: CtrlShape) -> bool {
        let changed = self.shape != shape;
        self.shape = shape;
        changed
    }

    pub(crate) fn update(&mut self, affine: Affine) -> Option<Rect> {
        if !self.position.is_finite() {
            return None;
        }
        let w_half = f64::from(self.width / 2);
        let h_half = f64::from(self.height / 2);
        let rotation = angle_of(affine);

        let (dx, dy) = match self.shape {
            CtrlShape::DArrow
            | CtrlShape::SArrow
            | CtrlShape::CArrow
            | CtrlShape::SAlign
            | CtrlShape::CAlign => {
                let mut angle = f64::from(self.anchor.index()) * FRAC_PI_4 + rotation;
                let half = f64::from(self.width) / 2.0;
                // Pushed out by two pixels so the tip never overlaps the position.
                let mut dx = -(half + 2.0) * angle.cos();
                let mut dy = -(half + 2.0) * angle.sin();
                match self.shape {
                    CtrlShape::CArrow => angle += 5.0 * FRAC_PI_4,
                    CtrlShape::SArrow => angle += FRAC_PI_2,
                    CtrlShape::SAlign => {
                        dx = -(half / 2.0 + 2.0) * angle.cos();
                        dy = -(half / 2.0 + 2.0) * angle.sin();
                        angle -= FRAC_PI_2;
                    }
                    CtrlShape::CAlign => {
                        angle -= FRAC_PI_4;
                        dx = (half / 2.0 + 2.0) * (angle.sin() - angle.cos());
                        dy = (half / 2.0 + 2.0) * (-angle.sin() - angle.cos());
                    }
                    _ => {}
                }
                self.angle = angle;
                (dx.trunc(), dy.trunc())
            }
            CtrlShape::Pivot | CtrlShape::MAlign => {
                self.angle = rotation;
                (0.0, 0.0)
            }
            _ => self.anchor.offset(w_half, h_half),
        };

        self.canvas_position = affine * self.position;
        let origin = self.canvas_position.floor();
        let x0 = origin.x - w_half + dx;
        let y0 = origin.y - h_half + dy;
        Some(Rect::new(
            x0,
            y0,
            x0 + f64::from(self.width),
            y0 + f64::from(self.height),
        ))
    }

    pub(crate) fn contains(&self, bounds: Rect, pt: Point, tolerance: f64) -> bool {
        if tolerance == 0.0 {
            hit::interior_contains(bounds, pt)
        } else {
            self.canvas_position.distance(pt) <= tolerance
        }
    }
}

fn odd(size: u32) -> u32 {
    size | 1
}

/// Rotation angle of a matrix, taken from its first column.
fn angle_of(affine: Affine) -> f64 {
    let [a, b, ..] = affine.as_coeffs();
    b.atan2(a)
}
