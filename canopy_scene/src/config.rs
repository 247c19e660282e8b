// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Canvas-wide settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Hit slop in canvas units used when routing pointer events.
    pub pick_tolerance: f64,
    /// Pixel size of control handles created with
    /// [`Canvas::add_ctrl`](crate::Canvas::add_ctrl). Rounded up to odd.
    pub default_ctrl_size: u32,
}

impl CanvasConfig {
    /// Sets the pick tolerance; negative values are treated as zero.
    #[must_use]
    pub fn with_pick_tolerance(mut self, tolerance: f64) -> Self {
        self.pick_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the default handle size.
    #[must_use]
    pub fn with_default_ctrl_size(mut self, size: u32) -> Self {
        self.default_ctrl_size = size;
        self
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            pick_tolerance: 0.0,
            default_ctrl_size: 7,
        }
    }
}
