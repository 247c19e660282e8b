// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render contract.
//!
//! The scene does not rasterize. [`Canvas::render`] walks the tree back to
//! front and hands one [`DrawCommand`] per visible leaf to a [`RenderSink`]
//! supplied by the host, which owns the actual drawing backend.

use kurbo::{BezPath, Point, Rect, Vec2};

use crate::canvas::Canvas;
use crate::hit::overlaps;
use crate::items::CtrlShape;
use crate::types::{ItemId, Rgba};

/// What a single item wants drawn, in canvas units.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    /// A quadrilateral (a mapped rectangle).
    Quad {
        /// Corners in drawing order.
        corners: [Point; 4],
        /// Fill color.
        fill: Rgba,
        /// Stroke color.
        stroke: Rgba,
    },
    /// A path.
    Path {
        /// The mapped path.
        path: &'a BezPath,
        /// Fill color.
        fill: Rgba,
        /// Stroke color.
        stroke: Rgba,
    },
    /// An infinite line, to be clipped to the buffer.
    Line {
        /// A point on the line.
        origin: Point,
        /// Unit direction.
        direction: Vec2,
        /// Stroke color.
        stroke: Rgba,
    },
    /// A control handle occupying a pixel-aligned box.
    Ctrl {
        /// The handle box.
        rect: Rect,
        /// Handle shape.
        shape: CtrlShape,
        /// Rotation of the shape in radians.
        angle: f64,
        /// Fill color.
        fill: Rgba,
        /// Stroke color.
        stroke: Rgba,
    },
    /// The document drawing; the host renders its own content here.
    Drawing {
        /// Visible bounds of the drawing.
        rect: Rect,
    },
}

/// Receives draw commands from [`Canvas::render`].
pub trait RenderSink {
    /// Draws one item.
    fn draw(&mut self, item: ItemId, command: DrawCommand<'_>);
}

impl<F> RenderSink for F
where
    F: FnMut(ItemId, DrawCommand<'_>),
{
    fn draw(&mut self, item: ItemId, command: DrawCommand<'_>) {
        self(item, command);
    }
}

/// The region being painted and where to send draw commands.
pub struct CanvasItemBuffer<'a> {
    /// Canvas-space rectangle being painted.
    pub rect: Rect,
    /// Device pixels per canvas unit.
    pub device_scale: u32,
    /// Destination for draw commands.
    pub sink: &'a mut dyn RenderSink,
}

impl core::fmt::Debug for CanvasItemBuffer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasItemBuffer")
            .field("rect", &self.rect)
            .field("device_scale", &self.device_scale)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Emits draw commands for every net-visible item overlapping `buf.rect`,
    /// bottom first.
    ///
    /// Rendering only reads the tree; call [`update`](Self::update) first so
    /// bounds are current.
    pub fn render(&self, buf: &mut CanvasItemBuffer<'_>) {
        self.render_item(self.root(), buf);
    }

    fn render_item(&self, id: ItemId, buf: &mut CanvasItemBuffer<'_>) {
        let Some(item) = self.get(id) else {
            return;
        };
        if !item.is_visible() || !item.is_net_visible() {
            return;
        }
        let Some(bounds) = item.bounds() else {
            return;
        };
        if !overlaps(bounds, buf.rect) {
            return;
        }
        if item.kind().is_group() {
            for &child in self.children_of(id) {
                self.render_item(child, buf);
            }
        } else if let Some(command) = item.draw_command() {
            buf.sink.draw(id, command);
        }
    }
}
