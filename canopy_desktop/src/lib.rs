// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Desktop: the viewport controller of a vector editor canvas.
//!
//! A [`Desktop`] owns a [`canopy_scene::Canvas`] together with the
//! [`canopy_view::DesktopAffine`] that maps the document plane into it, and
//! offers the navigation operations an editor binds to its zoom, rotate,
//! flip and scroll tools:
//! - zooming about a point, to a rectangle, to real-world size, or
//!   temporarily ("quick zoom");
//! - rotating and flipping either about a point that stays put on screen or
//!   about the window center;
//! - scrolling, including autoscroll towards a point near the edge;
//! - undo/redo of view changes through a bounded history.
//!
//! After every change the canvas receives the new matrix and scroll position
//! and schedules a full update and redraw.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use canopy_desktop::Desktop;
//! use canopy_scene::Canvas;
//!
//! let mut desktop = Desktop::new(Canvas::new(), Size::new(200.0, 100.0));
//! let anchor = Point::new(30.0, 20.0);
//! let on_screen = desktop.desktop_to_window(anchor);
//!
//! desktop.zoom_absolute(anchor, 4.0, true);
//! assert_eq!(desktop.current_zoom(), 4.0);
//! assert!((desktop.desktop_to_window(anchor) - on_screen).hypot() < 1e-9);
//!
//! desktop.prev_transform().unwrap();
//! assert_eq!(desktop.current_zoom(), 1.0);
//! ```

mod config;
mod desktop;

pub use config::DesktopConfig;
pub use desktop::{Desktop, DesktopDebugInfo};
