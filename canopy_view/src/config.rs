// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Limits and orientation shared by every viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewConfig {
    /// Smallest allowed zoom factor.
    pub zoom_min: f64,
    /// Largest allowed zoom factor.
    pub zoom_max: f64,
    /// Whether the document y axis points down (the window's orientation).
    ///
    /// When `false`, the y scale is negated so that desktop y grows upwards.
    pub y_axis_down: bool,
    /// Maximum number of entries kept in each of the past and future
    /// transform lists.
    pub history_limit: usize,
}

impl ViewConfig {
    /// Default lower zoom limit (1%).
    pub const ZOOM_MIN: f64 = 0.01;
    /// Default upper zoom limit (25600%).
    pub const ZOOM_MAX: f64 = 256.0;

    /// Sets the zoom limits, normalizing them as [`zoom_limits`](Self::zoom_limits) does.
    #[must_use]
    pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
        (self.zoom_min, self.zoom_max) = normalize_limits(min, max);
        self
    }

    /// Returns the effective `(min, max)` zoom limits.
    ///
    /// The fields are public and may come from a deserialized file, so they
    /// are normalized on every read: a NaN limit falls back to its default
    /// and inverted limits are swapped.
    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        normalize_limits(self.zoom_min, self.zoom_max)
    }

    /// Sets the document y-axis orientation.
    #[must_use]
    pub fn with_y_axis_down(mut self, down: bool) -> Self {
        self.y_axis_down = down;
        self
    }

    /// Sets the history bound. A limit of zero is raised to one, since the
    /// past list always holds the current transform.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Clamps `zoom` into the effective zoom limits. A NaN zoom maps to the
    /// lower limit.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = self.zoom_limits();
        zoom.max(min).min(max)
    }

    /// Returns the y-axis direction: `1.0` for y-down documents, `-1.0` otherwise.
    #[must_use]
    pub fn yaxisdir(&self) -> f64 {
        if self.y_axis_down { 1.0 } else { -1.0 }
    }
}

fn normalize_limits(min: f64, max: f64) -> (f64, f64) {
    let min = if min.is_nan() { ViewConfig::ZOOM_MIN } else { min };
    let max = if max.is_nan() { ViewConfig::ZOOM_MAX } else { max };
    if min <= max { (min, max) } else { (max, min) }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_min: Self::ZOOM_MIN,
            zoom_max: Self::ZOOM_MAX,
            y_axis_down: true,
            history_limit: 64,
        }
    }
}
