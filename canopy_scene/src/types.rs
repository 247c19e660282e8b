// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: item identifiers, state flags and event masks.

/// Identifier for an item on a [`Canvas`](crate::Canvas).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the item is unlinked and its slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On allocation, a fresh slot is used with generation `1`.
/// - When an unlink is applied, the slot is freed; any existing `ItemId` that
///   pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new,
///   distinct `ItemId`.
///
/// Use [`Canvas::is_alive`](crate::Canvas::is_alive) to check whether an `ItemId`
/// still refers to a live item. Stale ids never alias a different live item
/// because the generation must match; every canvas operation treats a stale id
/// as absent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32, pub(crate) u32);

impl ItemId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-item state.
    ///
    /// `VISIBLE` and `PICKABLE` are set by callers. `NET_VISIBLE` and
    /// `NEEDS_UPDATE` are maintained by the update protocol:
    /// - `NET_VISIBLE`: the item and all its ancestors were visible at the last
    ///   update pass that reached it.
    /// - `NEEDS_UPDATE`: the item's bounds are stale. Within the net-visible
    ///   part of the tree, an item only carries this flag if its parent does.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The item is visible on its own.
        const VISIBLE      = 0b0000_0001;
        /// The item participates in picking.
        const PICKABLE     = 0b0000_0010;
        /// The item and all its ancestors are visible.
        const NET_VISIBLE  = 0b0000_0100;
        /// The item's bounds must be recomputed by the next update pass.
        const NEEDS_UPDATE = 0b0000_1000;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Kinds of events an item wants to receive while it holds the grab.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        /// Pointer button presses.
        const BUTTON_PRESS   = 1 << 0;
        /// Pointer button releases.
        const BUTTON_RELEASE = 1 << 1;
        /// Pointer motion.
        const POINTER_MOTION = 1 << 2;
        /// Scroll wheel.
        const SCROLL         = 1 << 3;
        /// Key presses.
        const KEY_PRESS      = 1 << 4;
        /// Key releases.
        const KEY_RELEASE    = 1 << 5;
        /// Pointer entering an item.
        const ENTER          = 1 << 6;
        /// Pointer leaving an item.
        const LEAVE          = 1 << 7;
    }
}

impl EventMask {
    /// All pointer-originated events.
    pub const POINTER: Self = Self::BUTTON_PRESS
        .union(Self::BUTTON_RELEASE)
        .union(Self::POINTER_MOTION)
        .union(Self::SCROLL);
}

/// A packed `0xRRGGBBAA` color.
pub type Rgba = u32;

/// Returns `true` if the color is fully transparent.
#[must_use]
pub const fn is_transparent(color: Rgba) -> bool {
    color & 0xff == 0
}
