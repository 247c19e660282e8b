// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_scene::{Canvas, ItemKind};
use canopy_view::{
    CanvasFlip, DesktopAffine, DisplayArea, HistoryResult, TransformHistory, ViewConfig,
};
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::config::DesktopConfig;

/// A viewport onto a document: owns a [`Canvas`] and the transform that maps
/// the document ("desktop") plane into it.
///
/// Every display change recomposes the [`DesktopAffine`] and pushes its
/// matrix and scroll offset into the canvas, which schedules a full update
/// and redraw. Zoom, rotation and flip changes are logged to a bounded
/// [`TransformHistory`]; scrolling is not.
#[derive(Debug)]
pub struct Desktop {
    canvas: Canvas,
    current: DesktopAffine,
    history: TransformHistory,
    config: DesktopConfig,
    quick_zoom: Option<DesktopAffine>,
}

impl Desktop {
    /// Creates a desktop at zoom 1 whose canvas is `viewport` window pixels.
    #[must_use]
    pub fn new(canvas: Canvas, viewport: Size) -> Self {
        Self::with_config(canvas, viewport, DesktopConfig::default())
    }

    /// Creates a desktop with explicit tunables.
    #[must_use]
    pub fn with_config(mut canvas: Canvas, viewport: Size, config: DesktopConfig) -> Self {
        canvas.set_size(sanitize_size(viewport));
        let current = DesktopAffine::with_scale(Vec2::new(1.0, config.view.yaxisdir()));
        let mut desktop = Self {
            canvas,
            current,
            history: TransformHistory::new(current, config.view.history_limit),
            config,
            quick_zoom: None,
        };
        desktop.set_display_area(false);
        desktop
    }

    /// Returns the owned canvas.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Returns the owned canvas for item edits, updates and event dispatch.
    ///
    /// The canvas affine and scroll position belong to the desktop; setting
    /// them directly is overwritten by the next display change.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    /// Returns the live view transform.
    #[must_use]
    pub fn affine(&self) -> &DesktopAffine {
        &self.current
    }

    /// Returns the transform history.
    #[must_use]
    pub fn history(&self) -> &TransformHistory {
        &self.history
    }

    /// Returns the window → desktop matrix (without the scroll offset).
    #[must_use]
    pub fn w2d(&self) -> Affine {
        self.current.w2d()
    }

    /// Returns the desktop → world matrix (without the scroll offset).
    #[must_use]
    pub fn d2w(&self) -> Affine {
        self.current.d2w()
    }

    /// Maps a desktop point into world (canvas) coordinates.
    #[must_use]
    pub fn d2w_point(&self, pt: Point) -> Point {
        self.current.d2w() * pt
    }

    /// Maps a world (canvas) point into desktop coordinates.
    #[must_use]
    pub fn w2d_point(&self, pt: Point) -> Point {
        self.current.w2d() * pt
    }

    /// Maps a window pixel to desktop coordinates.
    #[must_use]
    pub fn window_to_desktop(&self, pt: Point) -> Point {
        self.current.window_to_desktop(pt)
    }

    /// Maps a desktop point to window pixels.
    #[must_use]
    pub fn desktop_to_window(&self, pt: Point) -> Point {
        self.current.desktop_to_window(pt)
    }

    /// Maps a window pixel to world (canvas) coordinates, the space picking
    /// and canvas events work in.
    #[must_use]
    pub fn window_to_world(&self, pt: Point) -> Point {
        pt + self.current.offset().to_vec2()
    }

    /// Returns the zoom factor.
    #[must_use]
    pub fn current_zoom(&self) -> f64 {
        self.current.zoom()
    }

    /// Returns the zoom factor relative to real-world size.
    #[must_use]
    pub fn current_realworld_zoom(&self) -> f64 {
        self.current.zoom() / self.config.zoom_correction
    }

    /// Returns the rotation angle in radians.
    #[must_use]
    pub fn current_rotation(&self) -> f64 {
        self.current.rotation()
    }

    /// Returns the desktop point shown at the center of the window.
    #[must_use]
    pub fn current_center(&self) -> Point {
        self.w2d_point(self.canvas.area_world().center())
    }

    /// Returns the visible part of the desktop.
    #[must_use]
    pub fn display_area(&self) -> DisplayArea {
        DisplayArea::from_world_rect(self.canvas.area_world(), self.current.w2d())
    }

    /// Returns `true` if any direction in `flip` is mirrored.
    #[must_use]
    pub fn is_flipped(&self, flip: CanvasFlip) -> bool {
        self.current.is_flipped(flip)
    }

    /// Returns `1.0` for y-down documents and `-1.0` for y-up documents.
    #[must_use]
    pub fn yaxisdir(&self) -> f64 {
        self.config.view.yaxisdir()
    }

    /// Resizes the viewport (the host widget was resized).
    ///
    /// Keeps the scroll offset, so the top-left corner stays put.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.canvas.set_size(sanitize_size(size));
    }

    /// Pushes the current transform into the canvas, optionally logging it
    /// to the history first.
    pub fn set_display_area(&mut self, log: bool) {
        if log {
            tracing::debug!(
                zoom = self.current.zoom(),
                rotation = self.current.rotation(),
                "view transform logged"
            );
            self.history.log(self.current);
        }
        self.canvas.set_pos(self.current.offset());
        self.canvas.set_affine(self.current.d2w());
    }

    /// Scrolls so that desktop point `c` is shown where world point `w`
    /// currently is, then applies the transform.
    ///
    /// Callers change zoom, rotation or flip first and pass the world
    /// position `c` had before the change to keep it fixed on screen.
    pub fn set_display_area_anchor(&mut self, c: Point, w: Point, log: bool) {
        let delta = self.d2w_point(c) - w;
        self.current.add_offset(delta);
        self.set_display_area(log);
    }

    /// Zooms and scrolls so that desktop rectangle `r` fits the window,
    /// leaving `border` pixels free on every side. Rotation and flip are kept.
    pub fn set_display_area_rect(&mut self, r: Rect, border: f64, log: bool) {
        let r = r.abs();
        let window =
            Rect::from_origin_size(Point::ZERO, self.canvas.size()).inset(-border.max(0.0));
        if window.width() <= 0.0 || window.height() <= 0.0 {
            tracing::debug!(?window, "viewport too small to fit a rectangle");
            return;
        }
        let zoom = if r.width() * window.height() > r.height() * window.width() {
            window.width() / r.width()
        } else {
            window.height() / r.height()
        };
        if zoom.is_nan() {
            return;
        }
        let zoom = self.config.view.clamp_zoom(zoom);
        let dir = self.yaxisdir();
        self.current.set_scale(Vec2::new(zoom, dir * zoom));
        self.current.set_offset(Point::ZERO);
        self.set_display_area_anchor(r.center(), window.center(), log);
    }

    /// Fits the horizontal extent of `rect` into the window, keeping the
    /// vertical center. Rectangles narrower than one unit are ignored.
    pub fn set_display_width(&mut self, rect: Rect, border: f64) {
        let rect = rect.abs();
        if rect.width() < 1.0 {
            return;
        }
        let cy = self.current_center().y;
        self.set_display_area_rect(Rect::new(rect.x0, cy, rect.x1, cy), border, true);
    }

    /// Centers `rect` in the window without changing the zoom.
    pub fn set_display_center(&mut self, rect: Rect) {
        self.zoom_absolute(rect.center(), self.current_zoom(), false);
    }

    /// Sets the zoom factor, clamped to the configured limits.
    ///
    /// With `keep_point`, desktop point `center` stays where it is on screen;
    /// otherwise it moves to the window center.
    pub fn zoom_absolute(&mut self, center: Point, zoom: f64, keep_point: bool) {
        self.zoom_absolute_logged(center, zoom, keep_point, true);
    }

    /// Multiplies the zoom factor by `factor`. See
    /// [`zoom_absolute`](Self::zoom_absolute).
    pub fn zoom_relative(&mut self, center: Point, factor: f64, keep_point: bool) {
        self.zoom_absolute(center, self.current_zoom() * factor, keep_point);
    }

    /// Zooms to `ratio` of real-world size, centered on `center`.
    pub fn zoom_realworld(&mut self, center: Point, ratio: f64) {
        self.zoom_absolute(center, ratio * self.config.zoom_correction, false);
    }

    /// Fits desktop rectangle `rect` into the window with the configured
    /// border.
    ///
    /// Returns `false`, leaving the view alone, for rectangles whose smaller
    /// extent is below [`DesktopConfig::min_fit_extent`].
    pub fn zoom_rect(&mut self, rect: Rect) -> bool {
        let rect = rect.abs();
        let extent = rect.width().min(rect.height());
        if extent.is_nan() || extent < self.config.min_fit_extent {
            tracing::debug!(?rect, "rectangle too small to zoom to");
            return false;
        }
        self.set_display_area_rect(rect, self.config.fit_border, true);
        true
    }

    /// Fits the visual bounds of every drawing item on the canvas.
    pub fn zoom_drawing(&mut self) -> bool {
        let canvas = &self.canvas;
        let bounds = canvas
            .depth_first(canvas.root())
            .filter_map(|id| match canvas.get(id)?.kind() {
                ItemKind::Drawing(drawing) => drawing.visual_bounds(),
                _ => None,
            })
            .reduce(|acc, r| acc.union(r));
        match bounds {
            Some(bounds) => self.zoom_rect(bounds),
            None => false,
        }
    }

    /// Enters or leaves the temporary "quick zoom".
    ///
    /// Entering saves the transform and fits `focus` if it is large enough,
    /// or zooms in 2× about the window center. Leaving restores the saved
    /// transform. Neither step is logged to the history.
    pub fn zoom_quick(&mut self, enable: bool, focus: Option<Rect>) {
        if enable == self.quick_zoom.is_some() {
            return;
        }
        if !enable {
            if let Some(saved) = self.quick_zoom.take() {
                self.current = saved;
                self.set_display_area(false);
            }
            return;
        }
        self.quick_zoom = Some(self.current);
        let min_extent = self.config.min_fit_extent;
        match focus.map(|r| r.abs()).filter(|r| r.width().min(r.height()) >= min_extent) {
            Some(rect) => self.set_display_area_rect(rect, self.config.fit_border, false),
            None => {
                let center = self.current_center();
                self.zoom_absolute_logged(center, self.current_zoom() * 2.0, false, false);
            }
        }
    }

    /// Returns `true` while quick zoom is active.
    #[must_use]
    pub fn is_quick_zoomed(&self) -> bool {
        self.quick_zoom.is_some()
    }

    /// Sets the rotation, keeping desktop point `c` fixed on screen.
    pub fn rotate_absolute_keep_point(&mut self, c: Point, angle: f64) {
        let w = self.d2w_point(c);
        self.current.set_rotate(angle);
        self.set_display_area_anchor(c, w, true);
    }

    /// Adds to the rotation, keeping desktop point `c` fixed on screen.
    pub fn rotate_relative_keep_point(&mut self, c: Point, angle: f64) {
        let w = self.d2w_point(c);
        self.current.add_rotate(angle);
        self.set_display_area_anchor(c, w, true);
    }

    /// Sets the rotation and moves desktop point `c` to the window center.
    pub fn rotate_absolute_center_point(&mut self, c: Point, angle: f64) {
        self.current.set_rotate(angle);
        self.center_on(c);
    }

    /// Adds to the rotation and moves desktop point `c` to the window center.
    pub fn rotate_relative_center_point(&mut self, c: Point, angle: f64) {
        self.current.add_rotate(angle);
        self.center_on(c);
    }

    /// Replaces the flip, keeping desktop point `c` fixed on screen.
    pub fn flip_absolute_keep_point(&mut self, c: Point, flip: CanvasFlip) {
        let w = self.d2w_point(c);
        self.current.set_flip(flip);
        self.set_display_area_anchor(c, w, true);
    }

    /// Toggles the directions in `flip`, keeping desktop point `c` fixed on
    /// screen.
    pub fn flip_relative_keep_point(&mut self, c: Point, flip: CanvasFlip) {
        let w = self.d2w_point(c);
        self.current.add_flip(flip);
        self.set_display_area_anchor(c, w, true);
    }

    /// Replaces the flip and moves desktop point `c` to the window center.
    pub fn flip_absolute_center_point(&mut self, c: Point, flip: CanvasFlip) {
        self.current.set_flip(flip);
        self.center_on(c);
    }

    /// Toggles the directions in `flip` and moves desktop point `c` to the
    /// window center.
    pub fn flip_relative_center_point(&mut self, c: Point, flip: CanvasFlip) {
        self.current.add_flip(flip);
        self.center_on(c);
    }

    /// Scrolls so that the window origin shows world point `point`.
    ///
    /// Scrolling is not logged to the history.
    pub fn scroll_absolute(&mut self, point: Point) {
        self.canvas.set_pos(point);
        self.current.set_offset(point);
    }

    /// Moves the content by `delta` window pixels.
    pub fn scroll_relative(&mut self, delta: Vec2) {
        let origin = self.canvas.area_world().origin();
        self.scroll_absolute(origin - delta);
    }

    /// Moves the content by `(dx, dy)` desktop units at the current zoom.
    pub fn scroll_relative_in_desktop(&mut self, dx: f64, dy: f64) {
        let zoom = self.current_zoom();
        self.scroll_relative(Vec2::new(dx * zoom, dy * zoom));
    }

    /// Scrolls just enough for desktop point `p` to be inside the window,
    /// at least [`DesktopConfig::autoscroll_distance`] pixels from its edges.
    ///
    /// Returns `true` if the view scrolled.
    pub fn scroll_to_point(&mut self, p: Point) -> bool {
        let area = self.canvas.area_world();
        let margin = self
            .config
            .autoscroll_distance
            .max(0.0)
            .min(area.width() / 2.0)
            .min(area.height() / 2.0);
        let inner = area.inset(-margin);
        let c = self.d2w_point(p);
        if !c.is_finite() || contains_closed(inner, c) {
            return false;
        }
        let clamped = Point::new(c.x.clamp(inner.x0, inner.x1), c.y.clamp(inner.y0, inner.y1));
        tracing::trace!(?p, delta = ?(clamped - c), "autoscroll");
        self.scroll_relative(clamped - c);
        true
    }

    /// Restores the previously logged transform.
    pub fn prev_transform(&mut self) -> HistoryResult<()> {
        match self.history.prev(self.current) {
            Ok(previous) => {
                self.current = previous;
                self.set_display_area(false);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(%err, "view history step back refused");
                Err(err)
            }
        }
    }

    /// Re-applies the transform undone by the last
    /// [`prev_transform`](Self::prev_transform).
    pub fn next_transform(&mut self) -> HistoryResult<()> {
        match self.history.next() {
            Ok(next) => {
                self.current = next;
                self.set_display_area(false);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(%err, "view history step forward refused");
                Err(err)
            }
        }
    }

    /// Forgets every logged transform.
    pub fn clear_transform_history(&mut self) {
        self.history.clear();
    }

    /// Returns a snapshot of the view state for inspectors and logging.
    #[must_use]
    pub fn debug_info(&self) -> DesktopDebugInfo {
        DesktopDebugInfo {
            viewport: self.canvas.size(),
            area_world: self.canvas.area_world(),
            visible_desktop_rect: self.display_area().bounding_box(),
            zoom: self.current.zoom(),
            rotation: self.current.rotation(),
            flip: self.current.flip(),
            offset: self.current.offset(),
            view: self.config.view,
            past_len: self.history.past().len(),
            future_len: self.history.future().len(),
            quick_zoom: self.quick_zoom.is_some(),
        }
    }

    fn zoom_absolute_logged(&mut self, center: Point, zoom: f64, keep_point: bool, log: bool) {
        if zoom.is_nan() {
            return;
        }
        let w = if keep_point {
            self.d2w_point(center)
        } else {
            self.canvas.area_world().center()
        };
        let zoom = self.config.view.clamp_zoom(zoom);
        let dir = self.yaxisdir();
        self.current.set_scale(Vec2::new(zoom, dir * zoom));
        self.set_display_area_anchor(center, w, log);
    }

    fn center_on(&mut self, c: Point) {
        let w = self.canvas.area_world().center();
        self.set_display_area_anchor(c, w, true);
    }
}

/// Snapshot of a [`Desktop`]'s view state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesktopDebugInfo {
    /// Viewport size in window pixels.
    pub viewport: Size,
    /// World rectangle covered by the window.
    pub area_world: Rect,
    /// Bounding box of the visible desktop area.
    pub visible_desktop_rect: Rect,
    /// Zoom factor.
    pub zoom: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Mirrored directions.
    pub flip: CanvasFlip,
    /// Scroll offset (world position of the window origin).
    pub offset: Point,
    /// Zoom limits and orientation in effect.
    pub view: ViewConfig,
    /// Entries in the past list, the current transform included.
    pub past_len: usize,
    /// Entries in the future list.
    pub future_len: usize,
    /// Whether quick zoom is active.
    pub quick_zoom: bool,
}

fn sanitize_size(size: Size) -> Size {
    if size.is_finite() {
        Size::new(size.width.max(0.0), size.height.max(0.0))
    } else {
        tracing::warn!(?size, "ignoring non-finite viewport size");
        Size::ZERO
    }
}

fn contains_closed(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use canopy_scene::{Canvas, DrawingItem, ItemKind};
    use canopy_view::{CanvasFlip, HistoryError, ViewConfig};
    use kurbo::{Point, Rect, Size, Vec2};

    use super::Desktop;
    use crate::config::DesktopConfig;

    fn desktop() -> Desktop {
        Desktop::new(Canvas::new(), Size::new(200.0, 100.0))
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn starts_at_unit_zoom_with_canvas_in_sync() {
        let desktop = desktop();
        assert_eq!(desktop.current_zoom(), 1.0);
        assert_eq!(desktop.canvas().affine(), desktop.d2w());
        assert_eq!(desktop.canvas().area_world(), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(desktop.current_center(), Point::new(100.0, 50.0));
        assert!(!desktop.history().can_undo());
    }

    #[test]
    fn y_up_documents_negate_the_y_scale() {
        let config =
            DesktopConfig::default().with_view(ViewConfig::default().with_y_axis_down(false));
        let desktop = Desktop::with_config(Canvas::new(), Size::new(100.0, 100.0), config);
        assert_eq!(desktop.yaxisdir(), -1.0);
        assert_eq!(desktop.affine().scale(), Vec2::new(1.0, -1.0));
        assert_eq!(desktop.current_zoom(), 1.0);
        assert_eq!(desktop.d2w_point(Point::new(3.0, 4.0)), Point::new(3.0, -4.0));
    }

    #[test]
    fn zoom_keep_point_keeps_the_anchor_on_screen() {
        let mut desktop = desktop();
        let c = Point::new(30.0, 20.0);
        let before = desktop.desktop_to_window(c);
        desktop.zoom_absolute(c, 4.0, true);
        assert_eq!(desktop.current_zoom(), 4.0);
        assert!(close(desktop.desktop_to_window(c), before));
        assert_eq!(desktop.canvas().affine(), desktop.d2w());
        assert_eq!(desktop.canvas().pos(), desktop.affine().offset());
    }

    #[test]
    fn zoom_without_keep_point_centers_the_anchor() {
        let mut desktop = desktop();
        let c = Point::new(30.0, 20.0);
        desktop.zoom_absolute(c, 2.0, false);
        assert!(close(desktop.desktop_to_window(c), Point::new(100.0, 50.0)));
        assert!(close(desktop.current_center(), c));
    }

    #[test]
    fn zoom_is_clamped_to_the_limits() {
        let mut desktop = desktop();
        desktop.zoom_absolute(Point::ZERO, 1.0e6, true);
        assert_eq!(desktop.current_zoom(), 256.0);
        desktop.zoom_relative(Point::ZERO, 1.0e-9, true);
        assert!((desktop.current_zoom() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn inverted_limits_from_a_config_file_still_clamp() {
        let view = ViewConfig {
            zoom_min: 4.0,
            zoom_max: 1.0,
            ..ViewConfig::default()
        };
        let config = DesktopConfig::default().with_view(view);
        let mut desktop = Desktop::with_config(Canvas::new(), Size::new(100.0, 100.0), config);
        desktop.zoom_absolute(Point::ZERO, 10.0, true);
        assert_eq!(desktop.current_zoom(), 4.0);
        desktop.zoom_absolute(Point::ZERO, 0.5, true);
        assert_eq!(desktop.current_zoom(), 1.0);
    }

    #[test]
    fn realworld_zoom_applies_the_correction() {
        let config = DesktopConfig::default().with_zoom_correction(1.5);
        let mut desktop = Desktop::with_config(Canvas::new(), Size::new(100.0, 100.0), config);
        desktop.zoom_realworld(Point::new(10.0, 10.0), 2.0);
        assert_eq!(desktop.current_zoom(), 3.0);
        assert_eq!(desktop.current_realworld_zoom(), 2.0);
    }

    #[test]
    fn fitting_a_rect_uses_the_limiting_axis() {
        let mut desktop = desktop();
        // Window 200x100, border 10 leaves 180x80; a 40x40 rect is height bound.
        assert!(desktop.zoom_rect(Rect::new(0.0, 0.0, 40.0, 40.0)));
        assert_eq!(desktop.current_zoom(), 2.0);
        assert!(close(desktop.current_center(), Point::new(20.0, 20.0)));
        // A wide rect is width bound.
        desktop.set_display_area_rect(Rect::new(0.0, 0.0, 360.0, 10.0), 10.0, true);
        assert_eq!(desktop.current_zoom(), 0.5);
    }

    #[test]
    fn tiny_rects_are_not_zoomed_to() {
        let mut desktop = desktop();
        assert!(!desktop.zoom_rect(Rect::new(5.0, 5.0, 5.05, 50.0)));
        assert_eq!(desktop.current_zoom(), 1.0);
        assert!(!desktop.history().can_undo());
    }

    #[test]
    fn display_width_keeps_vertical_center() {
        let mut desktop = desktop();
        desktop.set_display_width(Rect::new(0.0, 0.0, 90.0, 1000.0), 10.0);
        assert_eq!(desktop.current_zoom(), 2.0);
        assert!(close(desktop.current_center(), Point::new(45.0, 50.0)));

        desktop.set_display_width(Rect::new(0.0, 0.0, 0.5, 10.0), 0.0);
        assert_eq!(desktop.current_zoom(), 2.0);
    }

    #[test]
    fn display_center_keeps_zoom() {
        let mut desktop = desktop();
        desktop.zoom_absolute(Point::ZERO, 3.0, true);
        desktop.set_display_center(Rect::new(10.0, 10.0, 30.0, 50.0));
        assert_eq!(desktop.current_zoom(), 3.0);
        assert!(close(desktop.current_center(), Point::new(20.0, 30.0)));
    }

    #[test]
    fn zoom_drawing_fits_drawing_items() {
        let mut desktop = desktop();
        let root = desktop.canvas().root();
        desktop
            .canvas_mut()
            .add_item(
                root,
                ItemKind::Drawing(DrawingItem::new(Some(Rect::new(0.0, 0.0, 90.0, 40.0)))),
            )
            .unwrap();
        assert!(desktop.zoom_drawing());
        assert_eq!(desktop.current_zoom(), 2.0);
        assert!(close(desktop.current_center(), Point::new(45.0, 20.0)));
    }

    #[test]
    fn zoom_drawing_without_drawings_is_a_no_op() {
        let mut desktop = desktop();
        assert!(!desktop.zoom_drawing());
        assert_eq!(desktop.current_zoom(), 1.0);
    }

    #[test]
    fn rotation_keep_point_and_center_point() {
        let mut desktop = desktop();
        let c = Point::new(70.0, 30.0);
        let before = desktop.desktop_to_window(c);
        desktop.rotate_relative_keep_point(c, core::f64::consts::FRAC_PI_2);
        assert!(close(desktop.desktop_to_window(c), before));
        assert!((desktop.current_rotation() - core::f64::consts::FRAC_PI_2).abs() < 1e-12);

        desktop.rotate_absolute_center_point(c, 0.0);
        assert_eq!(desktop.current_rotation(), 0.0);
        assert!(close(desktop.desktop_to_window(c), Point::new(100.0, 50.0)));
    }

    #[test]
    fn flips_toggle_and_keep_the_anchor() {
        let mut desktop = desktop();
        let c = Point::new(20.0, 20.0);
        let before = desktop.desktop_to_window(c);
        desktop.flip_relative_keep_point(c, CanvasFlip::HORIZONTAL);
        assert!(desktop.is_flipped(CanvasFlip::HORIZONTAL));
        assert!(close(desktop.desktop_to_window(c), before));

        desktop.flip_relative_center_point(c, CanvasFlip::HORIZONTAL);
        assert!(!desktop.is_flipped(CanvasFlip::HORIZONTAL));
        assert!(close(desktop.current_center(), c));

        desktop.flip_absolute_keep_point(c, CanvasFlip::VERTICAL);
        assert!(desktop.is_flipped(CanvasFlip::VERTICAL));
        desktop.flip_absolute_center_point(c, CanvasFlip::NONE);
        assert!(!desktop.is_flipped(CanvasFlip::all()));
    }

    #[test]
    fn scrolling_moves_content_and_is_not_logged() {
        let mut desktop = desktop();
        desktop.scroll_relative(Vec2::new(10.0, -5.0));
        assert_eq!(desktop.canvas().pos(), Point::new(-10.0, 5.0));
        assert_eq!(desktop.desktop_to_window(Point::ZERO), Point::new(10.0, -5.0));

        desktop.zoom_absolute(Point::ZERO, 2.0, true);
        desktop.scroll_relative_in_desktop(1.0, 0.0);
        assert_eq!(desktop.desktop_to_window(Point::ZERO), Point::new(12.0, -5.0));

        desktop.scroll_absolute(Point::new(3.0, 4.0));
        assert_eq!(desktop.affine().offset(), Point::new(3.0, 4.0));
        assert_eq!(desktop.history().past().len(), 2);
    }

    #[test]
    fn scroll_to_point_respects_the_margin() {
        let config = DesktopConfig::default().with_autoscroll_distance(10.0);
        let mut desktop = Desktop::with_config(Canvas::new(), Size::new(200.0, 100.0), config);
        assert!(!desktop.scroll_to_point(Point::new(50.0, 50.0)));

        assert!(desktop.scroll_to_point(Point::new(250.0, 50.0)));
        assert_eq!(desktop.desktop_to_window(Point::new(250.0, 50.0)), Point::new(190.0, 50.0));

        assert!(desktop.scroll_to_point(Point::new(0.0, -20.0)));
        assert_eq!(desktop.desktop_to_window(Point::new(0.0, -20.0)).y, 10.0);
    }

    #[test]
    fn quick_zoom_restores_without_logging() {
        let mut desktop = desktop();
        desktop.zoom_quick(true, None);
        assert!(desktop.is_quick_zoomed());
        assert_eq!(desktop.current_zoom(), 2.0);
        assert!(close(desktop.current_center(), Point::new(100.0, 50.0)));

        desktop.zoom_quick(true, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(desktop.current_zoom(), 2.0);

        desktop.zoom_quick(false, None);
        assert!(!desktop.is_quick_zoomed());
        assert_eq!(desktop.current_zoom(), 1.0);
        assert_eq!(desktop.canvas().affine(), desktop.d2w());
        assert!(!desktop.history().can_undo());
    }

    #[test]
    fn quick_zoom_fits_the_focus() {
        let mut desktop = desktop();
        desktop.zoom_quick(true, Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
        assert_eq!(desktop.current_zoom(), 2.0);
        desktop.zoom_quick(false, None);
        assert_eq!(desktop.current_zoom(), 1.0);
    }

    #[test]
    fn history_steps_back_and_forth() {
        let mut desktop = desktop();
        assert_eq!(desktop.prev_transform(), Err(HistoryError::NoPrevious));
        assert_eq!(desktop.next_transform(), Err(HistoryError::NoNext));

        desktop.zoom_absolute(Point::ZERO, 2.0, true);
        desktop.zoom_absolute(Point::ZERO, 4.0, true);
        desktop.prev_transform().unwrap();
        assert_eq!(desktop.current_zoom(), 2.0);
        assert_eq!(desktop.canvas().affine(), desktop.d2w());
        desktop.prev_transform().unwrap();
        assert_eq!(desktop.current_zoom(), 1.0);
        desktop.next_transform().unwrap();
        assert_eq!(desktop.current_zoom(), 2.0);

        // A new change drops the redo branch.
        desktop.zoom_absolute(Point::ZERO, 8.0, true);
        assert_eq!(desktop.next_transform(), Err(HistoryError::NoNext));

        desktop.clear_transform_history();
        assert_eq!(desktop.prev_transform(), Err(HistoryError::MissingCurrent));
        assert_eq!(desktop.current_zoom(), 8.0);
    }

    #[test]
    fn viewport_resize_keeps_the_origin() {
        let mut desktop = desktop();
        desktop.scroll_absolute(Point::new(5.0, 5.0));
        desktop.set_viewport_size(Size::new(50.0, 60.0));
        assert_eq!(desktop.canvas().area_world(), Rect::new(5.0, 5.0, 55.0, 65.0));
        desktop.set_viewport_size(Size::new(-1.0, 10.0));
        assert_eq!(desktop.canvas().size(), Size::new(0.0, 10.0));
    }

    #[test]
    fn debug_info_reflects_state() {
        let mut desktop = desktop();
        desktop.zoom_absolute(Point::ZERO, 2.0, true);
        desktop.zoom_quick(true, None);
        let info = desktop.debug_info();
        assert_eq!(info.zoom, 4.0);
        assert_eq!(info.past_len, 2);
        assert_eq!(info.future_len, 0);
        assert!(info.quick_zoom);
        assert_eq!(info.viewport, Size::new(200.0, 100.0));
        assert_eq!(info.visible_desktop_rect.width(), 50.0);
    }

    #[test]
    fn display_area_is_a_parallelogram_when_rotated() {
        let mut desktop = desktop();
        let c = Point::new(100.0, 50.0);
        desktop.rotate_absolute_center_point(c, core::f64::consts::FRAC_PI_4);
        let area = desktop.display_area();
        assert!(close(area.center(), Point::new(100.0, 50.0)));
        assert!(area.contains(Point::new(100.0, 50.0)));
        let bbox = area.bounding_box();
        assert!(bbox.width() > 200.0);
    }
}
