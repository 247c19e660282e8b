// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lazy update pass.
//!
//! Items that need new bounds are marked with `NEEDS_UPDATE`, and so are all
//! their ancestors. The update pass walks down from the root and only enters
//! marked subtrees, so a frame in which one handle moved touches only that
//! handle and its ancestors.

use kurbo::{Affine, Rect};

use crate::canvas::Canvas;
use crate::hit::union_opt;
use crate::types::{ItemFlags, ItemId};

impl Canvas {
    /// Marks `id` and its ancestors as needing an update.
    ///
    /// Stops at the first ancestor that is already marked. Hidden items are
    /// never marked: their bounds are recomputed when they are shown again.
    pub fn request_update(&mut self, id: ItemId) {
        let mut cursor = Some(id);
        while let Some(id) = cursor {
            let Some(item) = self.get_mut(id) else {
                return;
            };
            if item.flags.contains(ItemFlags::NEEDS_UPDATE)
                || !item.flags.contains(ItemFlags::VISIBLE)
            {
                return;
            }
            item.flags.insert(ItemFlags::NEEDS_UPDATE);
            cursor = item.parent;
        }
        self.frame_pending = true;
    }

    /// Recomputes stale bounds, starting at the root.
    ///
    /// If the canvas affine changed since the last pass, every net-visible
    /// item is recomputed. Commands deferred during the pass are applied when
    /// it finishes.
    pub fn update(&mut self) {
        let propagate = core::mem::take(&mut self.propagate_next);
        self.update_with(propagate);
    }

    /// Runs an update pass; `propagate` forces every net-visible item to be
    /// recomputed.
    pub fn update_with(&mut self, propagate: bool) {
        debug_assert!(
            !self.is_traversing(),
            "canvas update started inside another traversal"
        );
        if self.is_traversing() {
            tracing::error!("ignoring re-entrant canvas update");
            return;
        }
        tracing::trace!(propagate, "canvas update");
        self.frame_pending = false;
        self.begin_traversal();
        let affine = self.affine();
        self.update_item(self.root(), affine, propagate);
        self.end_traversal();
    }

    fn update_item(&mut self, id: ItemId, affine: Affine, propagate: bool) {
        let Some(item) = self.get_mut(id) else {
            return;
        };
        if !item.flags.contains(ItemFlags::VISIBLE) {
            self.mark_net_invisible(id);
            return;
        }
        let reappearing = !item.flags.contains(ItemFlags::NET_VISIBLE);
        item.flags.insert(ItemFlags::NET_VISIBLE);
        if !(item.flags.contains(ItemFlags::NEEDS_UPDATE) || reappearing || propagate) {
            return;
        }
        item.flags.remove(ItemFlags::NEEDS_UPDATE);

        if item.kind.is_group() {
            let bounds = self.update_children(id, affine, propagate);
            if let Some(item) = self.get_mut(id) {
                item.bounds = bounds;
            }
        } else {
            // Old area first, then the new one.
            self.redraw_item(id);
            if let Some(item) = self.get_mut(id) {
                item.bounds = item.kind.update_leaf(affine);
            }
            self.redraw_item(id);
            return;
        }

        if reappearing {
            self.redraw_item(id);
        }
    }

    fn update_children(&mut self, id: ItemId, affine: Affine, propagate: bool) -> Option<Rect> {
        let mut bounds = None;
        let mut index = 0;
        while let Some(&child) = self.children_of(id).get(index) {
            self.update_item(child, affine, propagate);
            bounds = union_opt(bounds, self.bounds(child));
            index += 1;
        }
        bounds
    }

    /// Clears `NET_VISIBLE` on a subtree and drops its bounds, requesting a
    /// repaint of the area each leaf used to cover.
    fn mark_net_invisible(&mut self, id: ItemId) {
        let Some(item) = self.get_mut(id) else {
            return;
        };
        if !item.flags.contains(ItemFlags::NET_VISIBLE) {
            return;
        }
        item.flags.remove(ItemFlags::NET_VISIBLE | ItemFlags::NEEDS_UPDATE);
        if item.kind.is_group() {
            item.bounds = None;
            let mut index = 0;
            while let Some(&child) = self.children_of(id).get(index) {
                self.mark_net_invisible(child);
                index += 1;
            }
        } else {
            self.redraw_item(id);
            if let Some(item) = self.get_mut(id) {
                item.bounds = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use proptest::prelude::*;

    use crate::canvas::Canvas;
    use crate::items::{ItemKind, RectItem};
    use crate::types::ItemId;

    fn rect_kind(x: f64, y: f64, size: f64) -> ItemKind {
        ItemKind::Rect(RectItem::new(Rect::new(x, y, x + size, y + size)))
    }

    /// No net-visible item needs an update unless its parent does too.
    fn assert_dirty_subtree(canvas: &Canvas) {
        for id in canvas.depth_first(canvas.root()) {
            let item = canvas.get(id).unwrap();
            if !(item.needs_update() && item.is_net_visible()) {
                continue;
            }
            if let Some(parent) = item.parent() {
                let parent = canvas.get(parent).unwrap();
                assert!(
                    parent.needs_update() || !parent.is_net_visible(),
                    "item {id:?} needs an update but its net-visible parent does not"
                );
            }
        }
    }

    fn assert_bounds_union(canvas: &Canvas) {
        for id in canvas.depth_first(canvas.root()) {
            let item = canvas.get(id).unwrap();
            if !item.kind().is_group() || !item.is_net_visible() {
                continue;
            }
            let expected = canvas
                .children_of(id)
                .iter()
                .filter(|&&c| canvas.get(c).unwrap().is_visible())
                .filter_map(|&c| canvas.bounds(c))
                .reduce(|a, b| a.union(b));
            assert_eq!(item.bounds(), expected, "group {id:?} bounds are not the union of its children");
        }
    }

    #[test]
    fn group_bounds_are_the_union_of_children() {
        let mut canvas = Canvas::new();
        let root = canvas.root();
        let g = canvas.add_group(root, "layer").unwrap();
        canvas.add_item(g, rect_kind(0.0, 0.0, 10.0)).unwrap();
        canvas.add_item(g, rect_kind(20.0, 5.0, 10.0)).unwrap();
        canvas.update();
        assert_eq!(canvas.bounds(g), Some(Rect::new(0.0, 0.0, 30.0, 15.0)));
        assert_eq!(canvas.bounds(root), canvas.bounds(g));
    }

    #[test]
    fn empty_group_has_no_bounds() {
        let mut canvas = Canvas::new();
        let g = canvas.add_group(canvas.root(), "empty").unwrap();
        canvas.update();
        assert!(canvas.is_net_visible(g));
        assert_eq!(canvas.bounds(g), None);
    }

    #[test]
    fn hidden_items_drop_bounds_and_damage_their_area() {
        let mut canvas = Canvas::new();
        let root = canvas.root();
        let a = canvas.add_item(root, rect_kind(0.0, 0.0, 10.0)).unwrap();
        let b = canvas.add_item(root, rect_kind(20.0, 0.0, 10.0)).unwrap();
        canvas.update();
        canvas.take_damage();

        canvas.hide(b);
        assert!(!canvas.needs_update(b));
        assert!(canvas.needs_update(root));
        canvas.update();
        assert!(!canvas.is_net_visible(b));
        assert_eq!(canvas.bounds(b), None);
        assert_eq!(canvas.bounds(root), canvas.bounds(a));
        assert_eq!(
            canvas.take_damage().dirty_rects,
            vec![Rect::new(20.0, 0.0, 30.0, 10.0)]
        );

        canvas.show(b);
        canvas.update();
        assert!(canvas.is_net_visible(b));
        assert_eq!(canvas.bounds(root), Some(Rect::new(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn hiding_a_group_cuts_off_its_subtree() {
        let mut canvas = Canvas::new();
        let root = canvas.root();
        let g = canvas.add_group(root, "controls").unwrap();
        let a = canvas.add_item(g, rect_kind(0.0, 0.0, 1.0)).unwrap();
        canvas.update();
        canvas.hide(g);
        canvas.update();
        assert!(!canvas.is_net_visible(a));
        assert_eq!(canvas.bounds(a), None);

        // Edits while hidden are picked up when the group reappears.
        canvas.set_rect(a, Rect::new(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert!(!canvas.needs_update(g));
        canvas.show(g);
        canvas.update();
        assert_eq!(canvas.bounds(a), Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(canvas.bounds(g), Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn clean_subtrees_are_skipped() {
        let mut canvas = Canvas::new();
        let root = canvas.root();
        let a = canvas.add_item(root, rect_kind(0.0, 0.0, 1.0)).unwrap();
        let b = canvas.add_item(root, rect_kind(5.0, 5.0, 1.0)).unwrap();
        canvas.update();
        canvas.take_damage();
        canvas.set_rect(a, Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
        canvas.update();
        // Only a's old and new areas were repainted; b was not touched.
        let damage = canvas.take_damage();
        assert_eq!(
            damage.dirty_rects,
            vec![Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 2.0, 2.0)]
        );
        assert_eq!(canvas.bounds(b), Some(Rect::new(5.0, 5.0, 6.0, 6.0)));
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddRect { parent: usize, x: u8, y: u8 },
        AddGroup { parent: usize },
        SetRect { target: usize, x: u8, y: u8 },
        Toggle { target: usize },
        Raise { target: usize },
        Unlink { target: usize },
        Update,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<usize>(), any::<u8>(), any::<u8>())
                .prop_map(|(parent, x, y)| Op::AddRect { parent, x, y }),
            any::<usize>().prop_map(|parent| Op::AddGroup { parent }),
            (any::<usize>(), any::<u8>(), any::<u8>())
                .prop_map(|(target, x, y)| Op::SetRect { target, x, y }),
            any::<usize>().prop_map(|target| Op::Toggle { target }),
            any::<usize>().prop_map(|target| Op::Raise { target }),
            any::<usize>().prop_map(|target| Op::Unlink { target }),
            Just(Op::Update),
        ]
    }

    fn pick<T: Copy>(items: &[T], index: usize) -> Option<T> {
        (!items.is_empty()).then(|| items[index % items.len()])
    }

    fn run(canvas: &mut Canvas, groups: &mut Vec<ItemId>, items: &mut Vec<ItemId>, op: Op) {
        let root = canvas.root();
        match op {
            Op::AddRect { parent, x, y } => {
                let parent = pick(groups, parent).unwrap_or(root);
                let id = canvas
                    .add_item(parent, rect_kind(f64::from(x), f64::from(y), 4.0))
                    .unwrap();
                items.push(id);
            }
            Op::AddGroup { parent } => {
                let parent = pick(groups, parent).unwrap_or(root);
                let id = canvas.add_group(parent, "g").unwrap();
                groups.push(id);
                items.push(id);
            }
            Op::SetRect { target, x, y } => {
                if let Some(id) = pick(items, target) {
                    let r = Rect::new(f64::from(x), f64::from(y), f64::from(x) + 3.0, f64::from(y) + 3.0);
                    let _ = canvas.set_rect(id, r);
                }
            }
            Op::Toggle { target } => {
                if let Some(id) = pick(items, target) {
                    let visible = canvas.get(id).unwrap().is_visible();
                    canvas.set_visible(id, !visible);
                }
            }
            Op::Raise { target } => {
                if let Some(id) = pick(items, target) {
                    canvas.raise_to_top(id);
                }
            }
            Op::Unlink { target } => {
                if let Some(id) = pick(items, target) {
                    canvas.unlink(id);
                    groups.retain(|&g| canvas.is_alive(g));
                    items.retain(|&i| canvas.is_alive(i));
                }
            }
            Op::Update => canvas.update(),
        }
    }

    proptest! {
        #[test]
        fn update_restores_dirty_subtree_and_bounds_union(ops in prop::collection::vec(op(), 1..60)) {
            let mut canvas = Canvas::new();
            let mut groups = Vec::new();
            let mut items = Vec::new();
            for op in ops {
                run(&mut canvas, &mut groups, &mut items, op);
            }
            canvas.update();
            assert_dirty_subtree(&canvas);
            assert_bounds_union(&canvas);
            for id in canvas.depth_first(canvas.root()) {
                let item = canvas.get(id).unwrap();
                prop_assert!(!(item.is_net_visible() && item.needs_update()));
            }
        }
    }
}
