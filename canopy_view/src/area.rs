// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect};

/// The visible viewport expressed in desktop coordinates.
///
/// A viewport is an axis-aligned rectangle in world space. Mapped back
/// through a rotated or flipped [`DesktopAffine::w2d`](crate::DesktopAffine::w2d)
/// it becomes a parallelogram, so it is stored as four corners in the order
/// of the world rectangle's corners: `(x0, y0)`, `(x1, y0)`, `(x1, y1)`, `(x0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayArea {
    corners: [Point; 4],
}

impl DisplayArea {
    /// Maps a world-space viewport rectangle through `w2d`.
    #[must_use]
    pub fn from_world_rect(world: Rect, w2d: Affine) -> Self {
        let corners = [
            Point::new(world.x0, world.y0),
            Point::new(world.x1, world.y0),
            Point::new(world.x1, world.y1),
            Point::new(world.x0, world.y1),
        ]
        .map(|p| w2d * p);
        Self { corners }
    }

    /// Returns the four corners in desktop coordinates.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Returns the center of the area.
    #[must_use]
    pub fn center(&self) -> Point {
        self.corners[0].midpoint(self.corners[2])
    }

    /// Returns the axis-aligned bounding box of the area.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let [first, rest @ ..] = self.corners;
        rest.iter()
            .fold(Rect::from_points(first, first), |acc, &p| acc.union_pt(p))
    }

    /// Returns `true` if `pt` lies inside the area or on its boundary.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let mut side = None;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let cross = (b - a).cross(pt - a);
            if cross.is_nan() {
                return false;
            }
            if cross == 0.0 {
                continue;
            }
            let left = cross > 0.0;
            match side {
                None => side = Some(left),
                Some(s) if s != left => return false,
                Some(_) => {}
            }
        }
        true
    }
}
