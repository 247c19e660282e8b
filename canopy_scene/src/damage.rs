// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage accumulated between frames.

use kurbo::Rect;

/// Regions of the canvas that must be repainted.
///
/// Items request redraws of their old bounds before they change and of their
/// new bounds afterwards; the canvas collects these here until the host takes
/// them with [`Canvas::take_damage`](crate::Canvas::take_damage).
///
/// `Damage` is intentionally coarse: rectangles may overlap and are not
/// deduplicated. When the canvas transform changes, everything is stale and
/// [`redraw_all`](Self::redraw_all) is set instead of listing rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
    /// The whole visible area must be repainted.
    pub redraw_all: bool,
}

impl Damage {
    /// Returns `true` if nothing needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.redraw_all && self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    ///
    /// This ignores [`redraw_all`](Self::redraw_all); callers should check it first.
    #[must_use]
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    pub(crate) fn add(&mut self, rect: Rect) {
        if !self.redraw_all {
            self.dirty_rects.push(rect);
        }
    }

    pub(crate) fn invalidate_all(&mut self) {
        self.redraw_all = true;
        self.dirty_rects.clear();
    }
}
