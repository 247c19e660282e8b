// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::{PI, TAU};

use kurbo::{Affine, Point, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

bitflags::bitflags! {
    /// Canvas mirroring directions.
    ///
    /// Flips are independent: a canvas can be mirrored horizontally,
    /// vertically, or both (which is equivalent to a half turn).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CanvasFlip: u8 {
        /// Mirror across the vertical axis (x ↦ -x).
        const HORIZONTAL = 0b0000_0001;
        /// Mirror across the horizontal axis (y ↦ -y).
        const VERTICAL   = 0b0000_0010;
    }
}

impl CanvasFlip {
    /// No mirroring.
    pub const NONE: Self = Self::empty();

    fn to_affine(self) -> Affine {
        let sx = if self.contains(Self::HORIZONTAL) { -1.0 } else { 1.0 };
        let sy = if self.contains(Self::VERTICAL) { -1.0 } else { 1.0 };
        Affine::scale_non_uniform(sx, sy)
    }
}

/// Decomposed desktop → window transform of a viewport.
///
/// `DesktopAffine` stores scale, rotation and flip as separate factors and
/// keeps two composed matrices in sync with them:
/// - [`d2w`](Self::d2w): desktop → world, `flip * rotate * scale`.
/// - [`w2d`](Self::w2d): its inverse.
///
/// Every setter recomputes both matrices, so `w2d` is always the algebraic
/// inverse of `d2w`.
///
/// The scroll [`offset`](Self::offset) is kept next to the factors but is not
/// folded into the matrices; window coordinates are world coordinates minus
/// the offset.
///
/// The scale is anisotropic: a negative y scale encodes a y-up document
/// orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesktopAffine {
    scale: Vec2,
    rotate: f64,
    flip: CanvasFlip,
    offset: Point,
    d2w: Affine,
    w2d: Affine,
}

impl Default for DesktopAffine {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            rotate: 0.0,
            flip: CanvasFlip::NONE,
            offset: Point::ZERO,
            d2w: Affine::IDENTITY,
            w2d: Affine::IDENTITY,
        }
    }
}

impl DesktopAffine {
    /// Creates a transform with the given scale factors and no rotation or flip.
    #[must_use]
    pub fn with_scale(scale: Vec2) -> Self {
        let mut affine = Self::default();
        affine.set_scale(scale);
        affine
    }

    /// Returns the window → desktop matrix (without the scroll offset).
    #[must_use]
    pub fn w2d(&self) -> Affine {
        self.w2d
    }

    /// Returns the desktop → window matrix (without the scroll offset).
    #[must_use]
    pub fn d2w(&self) -> Affine {
        self.d2w
    }

    /// Returns the scale factor.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sets the absolute scale factor.
    ///
    /// Zero or non-finite components would make the transform singular and
    /// are ignored.
    pub fn set_scale(&mut self, scale: Vec2) {
        if !is_usable_scale(scale) {
            tracing::warn!(?scale, "ignoring singular scale");
            return;
        }
        self.scale = scale;
        self.update();
    }

    /// Multiplies the current scale factor component-wise by `scale`.
    pub fn add_scale(&mut self, scale: Vec2) {
        self.set_scale(Vec2::new(self.scale.x * scale.x, self.scale.y * scale.y));
    }

    /// Returns the rotation angle in radians, normalized to `(-π, π]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotate
    }

    /// Sets the absolute rotation angle in radians.
    pub fn set_rotate(&mut self, angle: f64) {
        if !angle.is_finite() {
            return;
        }
        self.rotate = normalize_angle(angle);
        self.update();
    }

    /// Adds `angle` radians to the current rotation.
    pub fn add_rotate(&mut self, angle: f64) {
        self.set_rotate(self.rotate + angle);
    }

    /// Returns the current flip factor.
    #[must_use]
    pub fn flip(&self) -> CanvasFlip {
        self.flip
    }

    /// Replaces the flip factor.
    pub fn set_flip(&mut self, flip: CanvasFlip) {
        self.flip = CanvasFlip::NONE;
        self.add_flip(flip);
    }

    /// Toggles mirroring in each direction contained in `flip`.
    pub fn add_flip(&mut self, flip: CanvasFlip) {
        self.flip ^= flip;
        self.update();
    }

    /// Returns `true` if any of the directions in `flip` is currently mirrored.
    #[must_use]
    pub fn is_flipped(&self, flip: CanvasFlip) -> bool {
        self.flip.intersects(flip)
    }

    /// Returns the zoom factor.
    ///
    /// This is the scale magnitude of [`d2w`](Self::d2w), `sqrt(|det|)`,
    /// computed from the scale factor alone.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        (self.scale.x * self.scale.y).abs().sqrt()
    }

    /// Returns the scroll offset: the world position of the window origin.
    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Sets the scroll offset.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Moves the scroll offset by `delta`.
    pub fn add_offset(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Maps a desktop point to window coordinates, including the scroll offset.
    #[must_use]
    pub fn desktop_to_window(&self, pt: Point) -> Point {
        self.d2w * pt - self.offset.to_vec2()
    }

    /// Maps a window point to desktop coordinates, including the scroll offset.
    #[must_use]
    pub fn window_to_desktop(&self, pt: Point) -> Point {
        self.w2d * (pt + self.offset.to_vec2())
    }

    fn update(&mut self) {
        self.d2w = self.flip.to_affine() * Affine::rotate(self.rotate) * scale_affine(self.scale);
        self.w2d = self.d2w.inverse();
    }
}

fn scale_affine(scale: Vec2) -> Affine {
    Affine::scale_non_uniform(scale.x, scale.y)
}

fn is_usable_scale(scale: Vec2) -> bool {
    scale.x.is_finite() && scale.y.is_finite() && scale.x != 0.0 && scale.y != 0.0
}

fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}
