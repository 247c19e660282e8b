// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: item arena, root group, shared affine and damage.

use std::collections::VecDeque;

use kurbo::{Affine, BezPath, Point, Rect, Size};
use smallvec::SmallVec;

use crate::command::{Command, Deferred};
use crate::config::CanvasConfig;
use crate::damage::Damage;
use crate::error::{SceneError, SceneResult};
use crate::event::Grab;
use crate::hit::overlaps;
use crate::items::{Anchor, CanvasItem, CtrlItem, CtrlShape, Group, ItemKind};
use crate::types::{ItemFlags, ItemId, Rgba};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    item: Option<CanvasItem>,
}

/// An on-screen item tree and everything its items share.
///
/// The canvas owns:
/// - an arena of [`CanvasItem`]s addressed by generational [`ItemId`]s, with
///   a root group created by [`Canvas::new`];
/// - the canvas affine that maps desktop coordinates to canvas units, read by
///   every item during [`update`](Self::update);
/// - the queue of deferred structural commands (see [`Command`](crate::Command));
/// - the accumulated [`Damage`], the pointer grab and the hovered item.
///
/// ## Frame protocol
///
/// A host drives the canvas once per frame:
/// 1. route input through [`handle_event`](Self::handle_event);
/// 2. call [`update`](Self::update) to recompute stale bounds;
/// 3. take the damage with [`take_damage`](Self::take_damage) and
///    [`render`](Self::render) the damaged region.
///
/// Structural changes requested while a traversal is running are queued and
/// applied in FIFO order when it completes; outside a traversal they apply
/// immediately.
#[derive(Clone, Debug)]
pub struct Canvas {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    root: ItemId,
    config: CanvasConfig,
    affine: Affine,
    pos: Point,
    size: Size,
    pub(crate) queue: VecDeque<Deferred>,
    pub(crate) traversal_depth: u32,
    pub(crate) damage: Damage,
    /// Set when an update request reaches the root; cleared by `update`.
    pub(crate) frame_pending: bool,
    /// Forces the next update to recompute every net-visible item.
    pub(crate) propagate_next: bool,
    pub(crate) grab: Option<Grab>,
    pub(crate) current: Option<ItemId>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Creates an empty canvas with a root group.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Creates an empty canvas with the given settings.
    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        let mut root = CanvasItem::new(None, ItemKind::Group(Group::default()));
        root.name = "CanvasItemGroup:Root".to_owned();
        root.attached = true;
        let mut canvas = Self {
            slots: vec![Slot {
                generation: 1,
                item: Some(root),
            }],
            free_list: Vec::new(),
            root: ItemId::new(0, 1),
            config,
            affine: Affine::IDENTITY,
            pos: Point::ZERO,
            size: Size::ZERO,
            queue: VecDeque::new(),
            traversal_depth: 0,
            damage: Damage::default(),
            frame_pending: false,
            propagate_next: false,
            grab: None,
            current: None,
        };
        canvas.request_update(canvas.root);
        canvas
    }

    /// Returns the root group.
    #[must_use]
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // --- arena ---

    fn alloc(&mut self, item: CanvasItem) -> SceneResult<ItemId> {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1).max(1);
            slot.item = Some(item);
            Ok(ItemId::new(idx, slot.generation))
        } else {
            let idx = slot_index(self.slots.len())?;
            self.slots.push(Slot {
                generation: 1,
                item: Some(item),
            });
            Ok(ItemId::new(idx, 1))
        }
    }

    /// Frees `id` and everything below it. Clears grab and hover state that
    /// pointed into the subtree.
    pub(crate) fn free_subtree(&mut self, id: ItemId) {
        let mut stack: SmallVec<[ItemId; 16]> = SmallVec::new();
        stack.push(id);
        let mut freed = 0_usize;
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.idx())
                .filter(|slot| slot.generation == id.generation())
            else {
                continue;
            };
            let Some(item) = slot.item.take() else {
                continue;
            };
            if let ItemKind::Group(group) = item.kind {
                stack.extend(group.children);
            }
            self.free_list.push(id.0);
            freed += 1;
            if self.grab.as_ref().is_some_and(|g| g.item == id) {
                tracing::debug!(?id, "grab holder unlinked; releasing grab");
                self.grab = None;
            }
            if self.current == Some(id) {
                self.current = None;
            }
        }
        tracing::trace!(?id, freed, "freed canvas subtree");
    }

    /// Returns `true` if `id` refers to a live item.
    #[must_use]
    pub fn is_alive(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the item for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CanvasItem> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.item.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut CanvasItem> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.item.as_mut())
    }

    fn try_get_mut(&mut self, id: ItemId) -> SceneResult<&mut CanvasItem> {
        self.get_mut(id).ok_or(SceneError::StaleItem(id))
    }

    /// Number of live items, including the root and items whose insertion is
    /// still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.item.is_some()).count()
    }

    /// Always `false`: the root group is never freed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- construction ---

    /// Creates an item under `parent`.
    ///
    /// The handle is usable immediately (properties may be set on it), but
    /// the item only joins its parent's children when the insert command is
    /// applied: right away outside a traversal, or when the running traversal
    /// completes.
    pub fn add_item(&mut self, parent: ItemId, kind: ItemKind) -> SceneResult<ItemId> {
        let parent_item = self.get(parent).ok_or(SceneError::StaleItem(parent))?;
        if !parent_item.kind.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        let id = self.alloc(CanvasItem::new(Some(parent), kind))?;
        self.defer(id, Command::Insert);
        Ok(id)
    }

    /// Creates a named group under `parent`, such as a layer for controls or guides.
    pub fn add_group(&mut self, parent: ItemId, name: &str) -> SceneResult<ItemId> {
        let id = self.add_item(parent, ItemKind::Group(Group::default()))?;
        if let Some(item) = self.get_mut(id) {
            item.name = format!("CanvasItemGroup:{name}");
        }
        Ok(id)
    }

    /// Creates a control handle of the configured default size.
    pub fn add_ctrl(&mut self, parent: ItemId, position: Point) -> SceneResult<ItemId> {
        let ctrl = CtrlItem::new(position, self.config.default_ctrl_size);
        self.add_item(parent, ItemKind::Ctrl(ctrl))
    }

    // --- structure queries ---

    /// Returns the parent group of `id`.
    #[must_use]
    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).and_then(|item| item.parent)
    }

    /// Returns the children of a group, bottom first. Empty for leaves and
    /// stale handles.
    #[must_use]
    pub fn children_of(&self, id: ItemId) -> &[ItemId] {
        self.get(id)
            .and_then(|item| item.kind.as_group())
            .map_or(&[], Group::children)
    }

    /// Returns the index of `id` within its parent's children (0 = bottom).
    #[must_use]
    pub fn z_position(&self, id: ItemId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.children_of(parent).iter().position(|&c| c == id)
    }

    /// Returns the cached bounds of `id` in canvas units.
    #[must_use]
    pub fn bounds(&self, id: ItemId) -> Option<Rect> {
        self.get(id).and_then(|item| item.bounds)
    }

    /// Returns the state flags of `id`.
    #[must_use]
    pub fn flags(&self, id: ItemId) -> Option<ItemFlags> {
        self.get(id).map(|item| item.flags)
    }

    /// Returns whether `id` and its ancestors were visible at the last update.
    #[must_use]
    pub fn is_net_visible(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(CanvasItem::is_net_visible)
    }

    /// Returns whether `id` carries a pending update.
    #[must_use]
    pub fn needs_update(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(CanvasItem::needs_update)
    }

    /// Returns `true` if the next [`update`](Self::update) has work to do.
    #[must_use]
    pub fn is_update_pending(&self) -> bool {
        self.frame_pending || self.propagate_next
    }

    /// Iterates `from` and its descendants in pre-order, bottom child first.
    #[must_use]
    pub fn depth_first(&self, from: ItemId) -> DepthFirst<'_> {
        let mut stack = SmallVec::new();
        if self.is_alive(from) {
            stack.push(from);
        }
        DepthFirst {
            canvas: self,
            stack,
        }
    }

    /// Returns net-visible leaf items whose bounds overlap `rect`, bottom first.
    #[must_use]
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        self.depth_first(self.root)
            .filter(|&id| {
                self.get(id).is_some_and(|item| {
                    !item.kind.is_group()
                        && item.is_net_visible()
                        && item.bounds.is_some_and(|b| overlaps(b, rect))
                })
            })
            .collect()
    }

    // --- properties ---

    /// Sets whether `id` takes part in picking.
    pub fn set_pickable(&mut self, id: ItemId, pickable: bool) -> SceneResult<()> {
        self.try_get_mut(id)?.flags.set(ItemFlags::PICKABLE, pickable);
        Ok(())
    }

    /// Sets the debug name of `id`.
    pub fn set_name(&mut self, id: ItemId, name: impl Into<String>) -> SceneResult<()> {
        self.try_get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Sets the fill color of `id` and schedules a repaint.
    pub fn set_fill(&mut self, id: ItemId, fill: Rgba) -> SceneResult<()> {
        let item = self.try_get_mut(id)?;
        if item.fill != fill {
            item.fill = fill;
            self.redraw_item(id);
        }
        Ok(())
    }

    /// Sets the stroke color of `id` and schedules a repaint.
    pub fn set_stroke(&mut self, id: ItemId, stroke: Rgba) -> SceneResult<()> {
        let item = self.try_get_mut(id)?;
        if item.stroke != stroke {
            item.stroke = stroke;
            self.redraw_item(id);
        }
        Ok(())
    }

    /// Applies `edit` to the kind payload and requests an update if it
    /// reports a change.
    fn edit_kind(
        &mut self,
        id: ItemId,
        expected: &'static str,
        edit: impl FnOnce(&mut ItemKind) -> Option<bool>,
    ) -> SceneResult<()> {
        let item = self.try_get_mut(id)?;
        let changed = edit(&mut item.kind).ok_or(SceneError::WrongKind { item: id, expected })?;
        if changed {
            self.request_update(id);
        }
        Ok(())
    }

    /// Replaces the desktop rectangle of a rect item.
    pub fn set_rect(&mut self, id: ItemId, rect: Rect) -> SceneResult<()> {
        self.edit_kind(id, "rect", |kind| match kind {
            ItemKind::Rect(item) => {
                item.set_rect(rect);
                Some(true)
            }
            _ => None,
        })
    }

    /// Replaces the path of a path item.
    pub fn set_path(&mut self, id: ItemId, path: BezPath) -> SceneResult<()> {
        self.edit_kind(id, "path", |kind| match kind {
            ItemKind::Bpath(item) => {
                item.set_path(path);
                Some(true)
            }
            _ => None,
        })
    }

    /// Moves a guide line.
    pub fn set_guide(&mut self, id: ItemId, origin: Point, angle: f64) -> SceneResult<()> {
        self.edit_kind(id, "guideline", |kind| match kind {
            ItemKind::Guideline(item) => {
                item.set_line(origin, angle);
                Some(true)
            }
            _ => None,
        })
    }

    /// Moves a control handle. A non-finite position hides it.
    pub fn set_ctrl_position(&mut self, id: ItemId, position: Point) -> SceneResult<()> {
        self.edit_kind(id, "ctrl", |kind| match kind {
            ItemKind::Ctrl(item) => Some(item.set_position(position)),
            _ => None,
        })
    }

    /// Resizes a control handle; the size is rounded up to odd.
    pub fn set_ctrl_size(&mut self, id: ItemId, size: u32) -> SceneResult<()> {
        self.edit_kind(id, "ctrl", |kind| match kind {
            ItemKind::Ctrl(item) => Some(item.set_size(size)),
            _ => None,
        })
    }

    /// Changes which part of a control handle sits on its position.
    pub fn set_ctrl_anchor(&mut self, id: ItemId, anchor: Anchor) -> SceneResult<()> {
        self.edit_kind(id, "ctrl", |kind| match kind {
            ItemKind::Ctrl(item) => Some(item.set_anchor(anchor)),
            _ => None,
        })
    }

    /// Changes the shape of a control handle.
    pub fn set_ctrl_shape(&mut self, id: ItemId, shape: CtrlShape) -> SceneResult<()> {
        self.edit_kind(id, "ctrl", |kind| match kind {
            ItemKind::Ctrl(item) => Some(item.set_shape(shape)),
            _ => None,
        })
    }

    /// Replaces the visual bounds of a drawing item.
    pub fn set_drawing_bounds(&mut self, id: ItemId, bounds: Option<Rect>) -> SceneResult<()> {
        self.edit_kind(id, "drawing", |kind| match kind {
            ItemKind::Drawing(item) => {
                item.set_visual_bounds(bounds);
                Some(true)
            }
            _ => None,
        })
    }

    // --- view state ---

    /// Returns the desktop-to-canvas affine.
    #[must_use]
    pub fn affine(&self) -> Affine {
        self.affine
    }

    /// Replaces the desktop-to-canvas affine.
    ///
    /// Every item's geometry is stale afterwards: the next update recomputes
    /// all net-visible items and the whole canvas is damaged.
    pub fn set_affine(&mut self, affine: Affine) {
        if self.affine == affine {
            return;
        }
        self.affine = affine;
        self.propagate_next = true;
        self.damage.invalidate_all();
    }

    /// Returns the canvas-space position of the window's top-left corner.
    #[must_use]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Scrolls the canvas so `pos` is at the window's top-left corner.
    pub fn set_pos(&mut self, pos: Point) {
        if self.pos != pos {
            self.pos = pos;
            self.damage.invalidate_all();
        }
    }

    /// Returns the window size in canvas units.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Sets the window size.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.damage.invalidate_all();
        }
    }

    /// Returns the visible rectangle in canvas units.
    #[must_use]
    pub fn area_world(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    // --- damage ---

    /// Marks `rect` (canvas units) as needing a repaint.
    ///
    /// Once the window size is known, damage is clipped to the visible area
    /// and off-screen damage is dropped.
    pub fn request_redraw(&mut self, rect: Rect) {
        let rect = if self.size.is_zero_area() {
            rect
        } else {
            let clipped = rect.intersect(self.area_world());
            if clipped.is_zero_area() {
                return;
            }
            clipped
        };
        self.damage.add(rect);
    }

    /// Marks the whole canvas as needing a repaint.
    pub fn redraw_all(&mut self) {
        self.damage.invalidate_all();
    }

    /// Requests a repaint of the cached bounds of `id`.
    pub(crate) fn redraw_item(&mut self, id: ItemId) {
        if let Some(bounds) = self.bounds(id) {
            self.request_redraw(bounds);
        }
    }

    /// Returns and resets the accumulated damage.
    pub fn take_damage(&mut self) -> Damage {
        core::mem::take(&mut self.damage)
    }

    /// Returns the accumulated damage without resetting it.
    #[must_use]
    pub fn damage(&self) -> &Damage {
        &self.damage
    }
}

/// Pre-order iterator over a subtree; see [`Canvas::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    canvas: &'a Canvas,
    stack: SmallVec<[ItemId; 16]>,
}

impl Iterator for DepthFirst<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.canvas.children_of(id).iter().rev().copied());
        Some(id)
    }
}

/// Index of the next fresh slot; handles carry 32-bit indices.
fn slot_index(len: usize) -> SceneResult<u32> {
    u32::try_from(len).map_err(|_| SceneError::ArenaExhausted)
}
