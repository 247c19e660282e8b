// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Scene: the on-canvas item tree of a vector editor.
//!
//! Everything an editor draws on top of (and including) the document lives in
//! one tree per canvas: selection handles, guides, rubberbands, the drawing
//! itself. This crate keeps that tree cheap to maintain frame after frame.
//!
//! - [`Canvas`]: owns the items, the desktop-to-canvas affine, accumulated
//!   [`Damage`], the pointer grab and the queue of deferred [`Command`]s.
//! - [`CanvasItem`] / [`ItemKind`]: per-item state and the closed set of item
//!   kinds (groups, rects, paths, guides, control handles, the drawing and a
//!   catch-all).
//! - [`ItemId`]: generational handle of an item.
//!
//! ## Lazy updates
//!
//! Changing an item marks it and its ancestors with
//! [`ItemFlags::NEEDS_UPDATE`]. [`Canvas::update`] walks down from the root
//! and only enters marked subtrees, recomputing bounds in canvas units. A
//! group's bounds are the union of its visible children's bounds. Hidden
//! subtrees are cut off entirely and catch up when shown again.
//!
//! ## Deferred structure changes
//!
//! Inserting, unlinking, reordering and showing/hiding items go through
//! [`Canvas::defer`]. Outside a traversal the change applies immediately;
//! during an update or event dispatch it is queued and applied, in order,
//! right after the traversal ends. Handlers may therefore delete siblings
//! or raise items freely while events are being routed.
//!
//! ## Picking and events
//!
//! [`Canvas::pick_item`] returns the topmost pickable leaf under a point:
//! later siblings win, and groups are searched depth-first.
//! [`Canvas::handle_event`] routes [`CanvasEvent`]s through picking, hover
//! tracking and the exclusive pointer grab.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use canopy_scene::{Canvas, ItemKind, RectItem};
//!
//! let mut canvas = Canvas::new();
//! let root = canvas.root();
//! let below = canvas
//!     .add_item(root, ItemKind::Rect(RectItem::new(Rect::new(0.0, 0.0, 10.0, 10.0))))
//!     .unwrap();
//! let above = canvas
//!     .add_item(root, ItemKind::Rect(RectItem::new(Rect::new(5.0, 5.0, 15.0, 15.0))))
//!     .unwrap();
//! canvas.update();
//! assert_eq!(canvas.pick_item(Point::new(7.0, 7.0)), Some(above));
//!
//! canvas.hide(above);
//! canvas.update();
//! assert_eq!(canvas.pick_item(Point::new(7.0, 7.0)), Some(below));
//! ```
//!
//! This crate does not rasterize; [`Canvas::render`] emits [`DrawCommand`]s
//! to a host-supplied [`RenderSink`].

mod canvas;
mod command;
mod config;
mod damage;
mod error;
mod event;
mod hit;
mod items;
mod pick;
mod render;
mod types;
mod update;

pub use canvas::{Canvas, DepthFirst};
pub use command::{Command, ZOrder};
pub use config::CanvasConfig;
pub use damage::Damage;
pub use error::{SceneError, SceneResult};
pub use event::{CanvasEvent, Grab};
pub use items::{
    Anchor, BpathItem, CanvasItem, CtrlItem, CtrlShape, DrawingItem, Group, GuidelineItem,
    ItemKind, RectItem,
};
pub use render::{CanvasItemBuffer, DrawCommand, RenderSink};
pub use types::{EventMask, ItemFlags, ItemId, Rgba, is_transparent};
