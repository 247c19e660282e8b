// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topmost-item lookup under a point.

use kurbo::Point;
use smallvec::SmallVec;

use crate::canvas::Canvas;
use crate::types::ItemId;

impl Canvas {
    /// Returns the topmost pickable leaf under `pt` (canvas units).
    ///
    /// Uses the configured pick tolerance.
    #[must_use]
    pub fn pick_item(&self, pt: Point) -> Option<ItemId> {
        self.pick_item_in(self.root(), pt)
    }

    /// Returns the topmost pickable leaf under `pt` within `group`.
    ///
    /// Children are tested last-to-first, so later siblings win over earlier
    /// ones. A matching group is searched recursively; if nothing inside it
    /// matches, the search continues with the group's lower siblings. Hidden
    /// and unpickable items are skipped along with their subtrees.
    #[must_use]
    pub fn pick_item_in(&self, group: ItemId, pt: Point) -> Option<ItemId> {
        let tolerance = self.config().pick_tolerance;
        for &child in self.children_of(group).iter().rev() {
            let Some(item) = self.get(child) else {
                continue;
            };
            if !item.is_visible() || !item.is_pickable() || !item.contains(pt, tolerance) {
                continue;
            }
            if item.kind().is_group() {
                if let Some(hit) = self.pick_item_in(child, pt) {
                    return Some(hit);
                }
            } else {
                tracing::trace!(?child, ?pt, "picked canvas item");
                return Some(child);
            }
        }
        None
    }

    /// Hit-tests a single item without regard to its siblings.
    #[must_use]
    pub fn contains(&self, id: ItemId, pt: Point, tolerance: f64) -> bool {
        self.get(id).is_some_and(|item| item.contains(pt, tolerance))
    }

    /// Returns `id` and its ancestors, innermost first.
    #[must_use]
    pub fn ancestry(&self, id: ItemId) -> SmallVec<[ItemId; 8]> {
        let mut path = SmallVec::new();
        let mut cursor = self.is_alive(id).then_some(id);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.parent_of(id);
        }
        path
    }
}
