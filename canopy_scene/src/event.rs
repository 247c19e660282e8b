// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input routing and the pointer grab.
//!
//! ## Routing rules
//!
//! - If an item holds the grab, events whose kind is in the grab mask go to
//!   that item only. Other events are dropped while the grab is held.
//! - Otherwise, pointer events are picked at their position and bubble from
//!   the picked item to the root until a handler returns `true`.
//! - Motion that changes the hovered ("current") item first sends
//!   [`CanvasEvent::Leave`] to the old item and [`CanvasEvent::Enter`] to the
//!   new one.
//! - Key events bubble from the current item.
//!
//! Handlers receive `&mut Canvas`. Structural changes they make are queued
//! and applied after dispatch returns.

use kurbo::{Point, Vec2};

use crate::canvas::Canvas;
use crate::types::{EventMask, ItemId};

/// An input event in canvas units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasEvent {
    /// A pointer button was pressed.
    ButtonPress {
        /// Pointer position.
        position: Point,
        /// Button number (1 = primary).
        button: u32,
    },
    /// A pointer button was released.
    ButtonRelease {
        /// Pointer position.
        position: Point,
        /// Button number (1 = primary).
        button: u32,
    },
    /// The pointer moved.
    Motion {
        /// Pointer position.
        position: Point,
    },
    /// Scroll wheel or touchpad scroll.
    Scroll {
        /// Pointer position.
        position: Point,
        /// Scroll amount.
        delta: Vec2,
    },
    /// A key was pressed.
    KeyPress {
        /// Platform key value.
        keyval: u32,
    },
    /// A key was released.
    KeyRelease {
        /// Platform key value.
        keyval: u32,
    },
    /// The pointer entered an item (or the canvas).
    Enter {
        /// Pointer position.
        position: Point,
    },
    /// The pointer left an item (or the canvas).
    Leave {
        /// Pointer position.
        position: Point,
    },
}

impl CanvasEvent {
    /// Pointer position, for pointer events.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::ButtonPress { position, .. }
            | Self::ButtonRelease { position, .. }
            | Self::Motion { position }
            | Self::Scroll { position, .. }
            | Self::Enter { position }
            | Self::Leave { position } => Some(position),
            Self::KeyPress { .. } | Self::KeyRelease { .. } => None,
        }
    }

    /// The mask bit for this kind of event.
    #[must_use]
    pub fn mask(&self) -> EventMask {
        match self {
            Self::ButtonPress { .. } => EventMask::BUTTON_PRESS,
            Self::ButtonRelease { .. } => EventMask::BUTTON_RELEASE,
            Self::Motion { .. } => EventMask::POINTER_MOTION,
            Self::Scroll { .. } => EventMask::SCROLL,
            Self::KeyPress { .. } => EventMask::KEY_PRESS,
            Self::KeyRelease { .. } => EventMask::KEY_RELEASE,
            Self::Enter { .. } => EventMask::ENTER,
            Self::Leave { .. } => EventMask::LEAVE,
        }
    }
}

/// The current holder of the pointer grab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grab {
    /// The grabbing item.
    pub item: ItemId,
    /// Events delivered to the item while the grab is held.
    pub mask: EventMask,
    /// Cursor name the host should show, if any.
    pub cursor: Option<String>,
}

impl Canvas {
    /// Gives `item` exclusive delivery of the events in `mask`.
    ///
    /// Returns `false` and changes nothing if another item holds the grab.
    /// Grabbing again with the holder updates its mask and cursor.
    pub fn grab(&mut self, item: ItemId, mask: EventMask, cursor: Option<&str>) -> bool {
        if !self.is_alive(item) {
            return false;
        }
        if let Some(grab) = &self.grab
            && grab.item != item
        {
            tracing::debug!(holder = ?grab.item, requester = ?item, "grab refused; already held");
            return false;
        }
        tracing::debug!(?item, ?mask, "grab acquired");
        self.grab = Some(Grab {
            item,
            mask,
            cursor: cursor.map(str::to_owned),
        });
        true
    }

    /// Releases the grab held by `item`.
    ///
    /// Releasing a grab held by another item is a contract violation.
    pub fn ungrab(&mut self, item: ItemId) {
        let holder = self.grab.as_ref().map(|g| g.item);
        debug_assert!(
            holder == Some(item),
            "ungrab called by an item that does not hold the grab"
        );
        if holder != Some(item) {
            tracing::warn!(?item, ?holder, "ignoring ungrab by a non-holder");
            return;
        }
        tracing::debug!(?item, "grab released");
        self.grab = None;
    }

    /// Returns the current grab.
    #[must_use]
    pub fn grab_info(&self) -> Option<&Grab> {
        self.grab.as_ref()
    }

    /// Returns the item holding the grab.
    #[must_use]
    pub fn grabbed_item(&self) -> Option<ItemId> {
        self.grab.as_ref().map(|g| g.item)
    }

    /// Returns the item under the pointer as of the last motion event.
    #[must_use]
    pub fn current_item(&self) -> Option<ItemId> {
        self.current
    }

    /// Routes `event` to items, calling `handler` for each candidate until
    /// one returns `true`. Returns the item that handled it.
    ///
    /// Structural changes made by the handler are applied after routing.
    pub fn handle_event<F>(&mut self, event: &CanvasEvent, mut handler: F) -> Option<ItemId>
    where
        F: FnMut(&mut Self, ItemId, &CanvasEvent) -> bool,
    {
        self.begin_traversal();
        let handled = self.dispatch(event, &mut handler);
        self.end_traversal();
        handled
    }

    fn dispatch<F>(&mut self, event: &CanvasEvent, handler: &mut F) -> Option<ItemId>
    where
        F: FnMut(&mut Self, ItemId, &CanvasEvent) -> bool,
    {
        if let Some(grab) = &self.grab {
            let item = grab.item;
            if !grab.mask.contains(event.mask()) {
                return None;
            }
            return handler(self, item, event).then_some(item);
        }

        match *event {
            CanvasEvent::Motion { position } => {
                self.update_current(position, handler);
                self.bubble(self.current, event, handler)
            }
            CanvasEvent::Enter { position } => {
                self.update_current(position, handler);
                None
            }
            CanvasEvent::Leave { .. } => {
                let old = self.current.take()?;
                handler(self, old, event).then_some(old)
            }
            CanvasEvent::ButtonPress { position, .. }
            | CanvasEvent::ButtonRelease { position, .. }
            | CanvasEvent::Scroll { position, .. } => {
                let target = self.pick_item(position);
                self.bubble(target, event, handler)
            }
            CanvasEvent::KeyPress { .. } | CanvasEvent::KeyRelease { .. } => {
                self.bubble(self.current, event, handler)
            }
        }
    }

    fn update_current<F>(&mut self, position: Point, handler: &mut F)
    where
        F: FnMut(&mut Self, ItemId, &CanvasEvent) -> bool,
    {
        let picked = self.pick_item(position);
        if picked == self.current {
            return;
        }
        if let Some(old) = self.current
            && self.is_alive(old)
        {
            handler(self, old, &CanvasEvent::Leave { position });
        }
        self.current = picked;
        if let Some(new) = picked {
            handler(self, new, &CanvasEvent::Enter { position });
        }
    }

    fn bubble<F>(&mut self, target: Option<ItemId>, event: &CanvasEvent, handler: &mut F) -> Option<ItemId>
    where
        F: FnMut(&mut Self, ItemId, &CanvasEvent) -> bool,
    {
        for id in self.ancestry(target?) {
            if handler(self, id, event) {
                return Some(id);
            }
        }
        None
    }
}
