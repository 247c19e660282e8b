// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy View: the desktop ↔ window transform of an editor viewport.
//!
//! This crate provides small, headless models of how a document ("desktop")
//! plane is mapped into the pixels of an on-screen canvas. It focuses on:
//! - [`DesktopAffine`]: zoom, rotation and flip kept as separate factors and
//!   composed into forward/inverse matrices on every change.
//! - [`DisplayArea`]: the viewport expressed back in desktop coordinates,
//!   which is a parallelogram as soon as rotation is involved.
//! - [`TransformHistory`]: linear undo/redo of view changes.
//! - [`ViewConfig`]: zoom limits, y-axis orientation and history size.
//!
//! It does **not** own a scene graph or a widget. The `canopy_desktop` crate
//! combines these pieces with a `canopy_scene` canvas into a viewport
//! controller.
//!
//! ## Coordinate spaces
//!
//! - *Desktop* coordinates are the document's logical space.
//! - *World* (canvas) coordinates are desktop coordinates mapped through
//!   [`DesktopAffine::d2w`]. The scroll offset is not part of that matrix.
//! - *Window* coordinates are world coordinates minus the scroll offset
//!   ([`DesktopAffine::offset`]); they are the pixels of the widget.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use canopy_view::{CanvasFlip, DesktopAffine};
//!
//! let mut affine = DesktopAffine::default();
//! affine.set_scale(Vec2::new(2.0, 2.0));
//! affine.add_rotate(core::f64::consts::FRAC_PI_2);
//! affine.add_flip(CanvasFlip::HORIZONTAL);
//!
//! let p = Point::new(3.0, 4.0);
//! let back = affine.w2d() * (affine.d2w() * p);
//! assert!((back - p).hypot() < 1e-9);
//! assert!((affine.zoom() - 2.0).abs() < 1e-12);
//! assert!(affine.is_flipped(CanvasFlip::HORIZONTAL));
//! ```
//!
//! ## Design notes
//!
//! - Rotation is read back from its own factor, never re-derived from the
//!   composed matrix. Zoom is read from the scale factor for the same reason;
//!   both agree with the composed matrix because rotation and flip are
//!   orthonormal.
//! - The scroll offset is applied outside the composed matrices so that zoom
//!   and rotation computations never need to undo a translation.
//!
//! This crate is `no_std` and only needs `alloc`. Enable the `libm` feature
//! when building without `std`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod affine;
mod area;
mod config;
mod history;

pub use affine::{CanvasFlip, DesktopAffine};
pub use area::DisplayArea;
pub use config::ViewConfig;
pub use history::{HistoryError, HistoryResult, TransformHistory};
