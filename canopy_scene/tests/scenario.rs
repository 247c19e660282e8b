// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the `canopy_scene` crate.
//!
//! These build small trees through the public API and check how picking,
//! visibility and event routing interact with the deferred command queue.

use canopy_scene::{Canvas, CanvasEvent, EventMask, ItemFlags, ItemId, ItemKind, RectItem};
use kurbo::{Point, Rect};

struct Scene {
    canvas: Canvas,
    c1: ItemId,
    c2: ItemId,
    r1: ItemId,
    r2: ItemId,
}

fn two_overlapping_groups() -> Scene {
    let mut canvas = Canvas::new();
    let root = canvas.root();
    let c1 = canvas.add_group(root, "c1").unwrap();
    let r1 = canvas
        .add_item(c1, ItemKind::Rect(RectItem::new(Rect::new(0.0, 0.0, 10.0, 10.0))))
        .unwrap();
    let c2 = canvas.add_group(root, "c2").unwrap();
    let r2 = canvas
        .add_item(c2, ItemKind::Rect(RectItem::new(Rect::new(5.0, 5.0, 15.0, 15.0))))
        .unwrap();
    canvas.update();
    Scene {
        canvas,
        c1,
        c2,
        r1,
        r2,
    }
}

#[test]
fn hiding_the_upper_group_uncovers_the_lower_one() {
    let Scene {
        mut canvas,
        c1,
        c2,
        r1,
        r2,
    } = two_overlapping_groups();
    assert_eq!(canvas.pick_item(Point::new(7.0, 7.0)), Some(r2));
    assert_eq!(canvas.ancestry(r2)[1], c2);

    canvas.set_visible(c2, false);
    assert_eq!(canvas.pending_commands(), 0);
    canvas.update();
    assert_eq!(canvas.pick_item(Point::new(7.0, 7.0)), Some(r1));
    assert_eq!(canvas.ancestry(r1)[1], c1);
    assert_eq!(canvas.bounds(canvas.root()), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn hiding_from_an_event_handler_applies_after_dispatch() {
    let Scene {
        mut canvas,
        c2,
        r1,
        r2,
        ..
    } = two_overlapping_groups();
    let press = CanvasEvent::ButtonPress {
        position: Point::new(7.0, 7.0),
        button: 1,
    };
    let mut queued_during_dispatch = 0;
    let handled = canvas.handle_event(&press, |canvas, id, _| {
        if id != c2 {
            return false;
        }
        canvas.hide(c2);
        queued_during_dispatch = canvas.pending_commands();
        // Still visible until the traversal ends.
        canvas.flags(c2).is_some_and(|f| f.contains(ItemFlags::VISIBLE))
    });
    assert_eq!(handled, Some(c2));
    assert_eq!(queued_during_dispatch, 1);
    assert_eq!(canvas.pending_commands(), 0);

    canvas.update();
    assert_eq!(canvas.pick_item(Point::new(7.0, 7.0)), Some(r1));
    assert!(!canvas.is_net_visible(r2));
}

#[test]
fn grab_is_exclusive_until_released() {
    let Scene {
        mut canvas, r1, r2, ..
    } = two_overlapping_groups();
    assert!(canvas.grab(r1, EventMask::POINTER, Some("move")));
    assert!(!canvas.grab(r2, EventMask::POINTER, None));
    assert_eq!(canvas.grabbed_item(), Some(r1));
    assert_eq!(
        canvas.grab_info().and_then(|g| g.cursor.as_deref()),
        Some("move")
    );

    // The grab holder receives pointer events wherever they land.
    let mut seen = Vec::new();
    let motion = CanvasEvent::Motion {
        position: Point::new(100.0, 100.0),
    };
    canvas.handle_event(&motion, |_, id, _| {
        seen.push(id);
        true
    });
    assert_eq!(seen, vec![r1]);

    canvas.ungrab(r1);
    assert!(canvas.grab(r2, EventMask::POINTER, None));
}

#[test]
fn unlinking_a_group_frees_its_subtree() {
    let Scene {
        mut canvas, c2, r2, ..
    } = two_overlapping_groups();
    let before = canvas.len();
    canvas.unlink(c2);
    assert!(!canvas.is_alive(c2));
    assert!(!canvas.is_alive(r2));
    assert_eq!(canvas.len(), before - 2);
    canvas.update();
    assert_eq!(canvas.bounds(canvas.root()), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}
