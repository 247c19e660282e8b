// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item records and the closed set of item kinds.
//!
//! Every node on the canvas is a [`CanvasItem`]: shared state (parent link,
//! cached bounds, flags, colors) plus an [`ItemKind`] carrying the per-kind
//! geometry. Kind behavior (computing bounds, hit-testing, producing draw
//! commands) is a plain `match` over the enum.

mod ctrl;
mod shapes;

pub use ctrl::{Anchor, CtrlItem, CtrlShape};
pub use shapes::{BpathItem, DrawingItem, GuidelineItem, RectItem};

use kurbo::{Affine, Point, Rect};

use crate::hit::{self, INFINITE};
use crate::render::DrawCommand;
use crate::types::{ItemFlags, ItemId, Rgba, is_transparent};

/// Ordered children of a group. The first child is drawn first (bottom).
#[derive(Clone, Debug, Default)]
pub struct Group {
    pub(crate) children: Vec<ItemId>,
}

impl Group {
    /// Returns the children, bottom first.
    #[must_use]
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }
}

/// The kind-specific part of an item.
#[derive(Clone, Debug)]
pub enum ItemKind {
    /// A container of other items.
    Group(Group),
    /// An axis-aligned desktop rectangle.
    Rect(RectItem),
    /// A Bézier path.
    Bpath(BpathItem),
    /// An infinite guide line.
    Guideline(GuidelineItem),
    /// A fixed-size control handle.
    Ctrl(CtrlItem),
    /// The document drawing.
    Drawing(DrawingItem),
    /// Covers the whole canvas and catches events nothing else takes.
    Catchall,
}

impl ItemKind {
    /// Returns `true` for [`ItemKind::Group`].
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the group payload if this is a group.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Name used for items that were not given one.
    #[must_use]
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Group(_) => "CanvasItemGroup",
            Self::Rect(_) => "CanvasItemRect",
            Self::Bpath(_) => "CanvasItemBpath",
            Self::Guideline(_) => "CanvasItemGuideLine",
            Self::Ctrl(_) => "CanvasItemCtrl",
            Self::Drawing(_) => "CanvasItemDrawing",
            Self::Catchall => "CanvasItemCatchall",
        }
    }

    /// Recomputes cached canvas-space geometry and returns the new bounds.
    ///
    /// Groups are handled by the canvas, which owns their children.
    pub(crate) fn update_leaf(&mut self, affine: Affine) -> Option<Rect> {
        match self {
            Self::Group(_) => None,
            Self::Rect(rect) => rect.update(affine),
            Self::Bpath(path) => path.update(affine),
            Self::Guideline(guide) => guide.update(affine),
            Self::Ctrl(ctrl) => ctrl.update(affine),
            Self::Drawing(drawing) => drawing.update(affine),
            Self::Catchall => Some(INFINITE),
        }
    }
}

/// A node of the canvas tree.
#[derive(Clone, Debug)]
pub struct CanvasItem {
    pub(crate) parent: Option<ItemId>,
    pub(crate) kind: ItemKind,
    pub(crate) bounds: Option<Rect>,
    pub(crate) flags: ItemFlags,
    pub(crate) name: String,
    pub(crate) fill: Rgba,
    pub(crate) stroke: Rgba,
    /// Set once the insert command has placed the item in its parent.
    pub(crate) attached: bool,
}

impl CanvasItem {
    /// Default stroke: opaque black.
    pub const DEFAULT_STROKE: Rgba = 0x0000_00ff;
    /// Default fill: transparent.
    pub const DEFAULT_FILL: Rgba = 0x0000_0000;

    pub(crate) fn new(parent: Option<ItemId>, kind: ItemKind) -> Self {
        Self {
            parent,
            name: kind.default_name().to_owned(),
            kind,
            bounds: None,
            flags: ItemFlags::default(),
            fill: Self::DEFAULT_FILL,
            stroke: Self::DEFAULT_STROKE,
            attached: false,
        }
    }

    /// Returns the owning group, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Returns the kind payload.
    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Returns the bounds in canvas units; `None` before the first update
    /// and while the item is not net-visible.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Returns the state flags.
    #[must_use]
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Returns the item's own visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ItemFlags::VISIBLE)
    }

    /// Returns whether the item and all ancestors were visible at the last update.
    #[must_use]
    pub fn is_net_visible(&self) -> bool {
        self.flags.contains(ItemFlags::NET_VISIBLE)
    }

    /// Returns whether the item participates in picking.
    #[must_use]
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(ItemFlags::PICKABLE)
    }

    /// Returns whether the item's bounds are stale.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.flags.contains(ItemFlags::NEEDS_UPDATE)
    }

    /// Returns whether the item has been placed in its parent's children.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill color.
    #[must_use]
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    /// Stroke color.
    #[must_use]
    pub fn stroke(&self) -> Rgba {
        self.stroke
    }

    /// Hit-tests `pt` (canvas units) against this item.
    ///
    /// Items without bounds never contain anything. Groups and drawings test
    /// their bounds; the other kinds test their own geometry.
    #[must_use]
    pub fn contains(&self, pt: Point, tolerance: f64) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        match &self.kind {
            ItemKind::Group(_) | ItemKind::Drawing(_) => {
                hit::contains_with_tolerance(bounds, pt, tolerance)
            }
            ItemKind::Rect(rect) => rect.contains(pt, tolerance),
            ItemKind::Bpath(path) => path.contains(pt, tolerance, !is_transparent(self.fill)),
            ItemKind::Guideline(guide) => guide.contains(pt, tolerance),
            ItemKind::Ctrl(ctrl) => ctrl.contains(bounds, pt, tolerance),
            ItemKind::Catchall => true,
        }
    }

    /// Produces the draw command for this item, if it draws anything.
    pub(crate) fn draw_command(&self) -> Option<DrawCommand<'_>> {
        let bounds = self.bounds?;
        match &self.kind {
            ItemKind::Group(_) | ItemKind::Catchall => None,
            ItemKind::Rect(rect) => Some(DrawCommand::Quad {
                corners: rect.canvas_corners()?,
                fill: self.fill,
                stroke: self.stroke,
            }),
            ItemKind::Bpath(path) => Some(DrawCommand::Path {
                path: path.canvas_path(),
                fill: self.fill,
                stroke: self.stroke,
            }),
            ItemKind::Guideline(guide) => Some(DrawCommand::Line {
                origin: guide.canvas_origin(),
                direction: guide.canvas_direction(),
                stroke: self.stroke,
            }),
            ItemKind::Ctrl(ctrl) => Some(DrawCommand::Ctrl {
                rect: bounds,
                shape: ctrl.shape(),
                angle: ctrl.angle(),
                fill: self.fill,
                stroke: self.stroke,
            }),
            ItemKind::Drawing(_) => Some(DrawCommand::Drawing { rect: bounds }),
        }
    }
}
