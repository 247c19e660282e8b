// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_view::ViewConfig;

/// Tunables of a [`Desktop`](crate::Desktop).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DesktopConfig {
    /// Zoom limits, y-axis orientation and history bound.
    pub view: ViewConfig,
    /// Ratio between a real-world length and its on-screen length at zoom 1.
    ///
    /// Used by [`Desktop::zoom_realworld`](crate::Desktop::zoom_realworld) so
    /// that "100%" can mean "actual size" on the user's monitor.
    pub zoom_correction: f64,
    /// Margin, in window pixels, kept between a scrolled-to point and the
    /// window edge.
    pub autoscroll_distance: f64,
    /// Border, in window pixels, left around a rectangle fitted into the view.
    pub fit_border: f64,
    /// Rectangles whose smaller extent is below this (desktop units) are not
    /// zoomed to.
    pub min_fit_extent: f64,
}

impl DesktopConfig {
    /// Replaces the view configuration.
    #[must_use]
    pub fn with_view(mut self, view: ViewConfig) -> Self {
        self.view = view;
        self
    }

    /// Sets the real-world zoom correction. Non-positive or non-finite values
    /// are ignored.
    #[must_use]
    pub fn with_zoom_correction(mut self, correction: f64) -> Self {
        if correction.is_finite() && correction > 0.0 {
            self.zoom_correction = correction;
        }
        self
    }

    /// Sets the autoscroll margin.
    #[must_use]
    pub fn with_autoscroll_distance(mut self, distance: f64) -> Self {
        self.autoscroll_distance = distance.max(0.0);
        self
    }

    /// Sets the fit border.
    #[must_use]
    pub fn with_fit_border(mut self, border: f64) -> Self {
        self.fit_border = border.max(0.0);
        self
    }
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            zoom_correction: 1.0,
            autoscroll_distance: 0.0,
            fit_border: 10.0,
            min_fit_extent: 0.1,
        }
    }
}
