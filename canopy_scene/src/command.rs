// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred structural commands.
//!
//! Children of a group are only ever inserted, removed or reordered by
//! applying a [`Command`]. While a traversal (update or event dispatch) is
//! running, commands are queued; the queue is flushed in FIFO order when the
//! outermost traversal ends, so a traversal never observes its own edits and
//! the next traversal observes all of them.

use crate::canvas::Canvas;
use crate::types::{ItemFlags, ItemId};

/// Target position for [`Command::Reorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZOrder {
    /// Last child: drawn last, picked first.
    Top,
    /// First child.
    Bottom,
    /// Index in the final child order, clamped to the valid range.
    Position(usize),
}

/// A structural change to the item tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Append the item to its parent's children.
    Insert,
    /// Detach the item and free it with its subtree.
    Unlink,
    /// Move the item within its parent's children.
    Reorder(ZOrder),
    /// Show or hide the item.
    SetVisible(bool),
}

/// A queued command and the item it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Deferred {
    pub(crate) target: ItemId,
    pub(crate) command: Command,
}

impl Canvas {
    /// Applies `command` to `target` now, or after the running traversal.
    pub fn defer(&mut self, target: ItemId, command: Command) {
        let deferred = Deferred { target, command };
        if self.traversal_depth == 0 {
            self.apply(deferred);
        } else {
            self.queue.push_back(deferred);
        }
    }

    /// Number of commands waiting for the running traversal to end.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` while an update or event dispatch is running.
    #[must_use]
    pub fn is_traversing(&self) -> bool {
        self.traversal_depth > 0
    }

    /// Shows or hides `id`.
    pub fn set_visible(&mut self, id: ItemId, visible: bool) {
        self.defer(id, Command::SetVisible(visible));
    }

    /// Shows `id`.
    pub fn show(&mut self, id: ItemId) {
        self.set_visible(id, true);
    }

    /// Hides `id`.
    pub fn hide(&mut self, id: ItemId) {
        self.set_visible(id, false);
    }

    /// Detaches `id` from its parent and frees it with all its descendants.
    ///
    /// The handle (and handles into the subtree) are stale once the command
    /// has been applied.
    pub fn unlink(&mut self, id: ItemId) {
        debug_assert!(
            self.parent_of(id).is_some() || !self.is_alive(id),
            "the root item cannot be unlinked"
        );
        if id == self.root() {
            tracing::error!(?id, "ignoring unlink of the root item");
            return;
        }
        self.defer(id, Command::Unlink);
    }

    /// Moves `id` to the top of its siblings.
    pub fn raise_to_top(&mut self, id: ItemId) {
        self.reorder(id, ZOrder::Top);
    }

    /// Moves `id` to the bottom of its siblings.
    pub fn lower_to_bottom(&mut self, id: ItemId) {
        self.reorder(id, ZOrder::Bottom);
    }

    /// Moves `id` to `index` among its siblings.
    pub fn set_z_position(&mut self, id: ItemId, index: usize) {
        self.reorder(id, ZOrder::Position(index));
    }

    fn reorder(&mut self, id: ItemId, order: ZOrder) {
        debug_assert!(
            self.parent_of(id).is_some() || !self.is_alive(id),
            "z-order change requested on an item without a parent"
        );
        if id == self.root() {
            tracing::error!(?id, ?order, "ignoring z-order change on the root item");
            return;
        }
        self.defer(id, Command::Reorder(order));
    }

    pub(crate) fn begin_traversal(&mut self) {
        self.traversal_depth += 1;
    }

    pub(crate) fn end_traversal(&mut self) {
        self.traversal_depth = self.traversal_depth.saturating_sub(1);
        if self.traversal_depth == 0 {
            self.flush_deferred();
        }
    }

    fn flush_deferred(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        tracing::debug!(count = self.queue.len(), "flushing deferred canvas commands");
        while let Some(deferred) = self.queue.pop_front() {
            self.apply(deferred);
        }
    }

    fn apply(&mut self, Deferred { target, command }: Deferred) {
        if !self.is_alive(target) {
            tracing::warn!(?target, ?command, "dropping command for a stale item");
            return;
        }
        match command {
            Command::Insert => self.apply_insert(target),
            Command::Unlink => self.apply_unlink(target),
            Command::Reorder(order) => self.apply_reorder(target, order),
            Command::SetVisible(visible) => self.apply_set_visible(target, visible),
        }
    }

    fn apply_insert(&mut self, target: ItemId) {
        let Some(item) = self.get(target) else {
            return;
        };
        if item.attached {
            return;
        }
        let Some(parent) = item.parent else {
            return;
        };
        let Some(group) = self.get_mut(parent).and_then(|p| p.kind.as_group_mut()) else {
            // The parent was unlinked before this item joined it.
            self.free_subtree(target);
            return;
        };
        group.children.push(target);
        if let Some(item) = self.get_mut(target) {
            item.attached = true;
        }
        self.request_update(target);
    }

    fn apply_unlink(&mut self, target: ItemId) {
        if self.is_net_visible(target) {
            self.redraw_item(target);
        }
        if let Some(parent) = self.parent_of(target) {
            if let Some(group) = self.get_mut(parent).and_then(|p| p.kind.as_group_mut())
                && let Some(pos) = group.children.iter().position(|&c| c == target)
            {
                group.children.remove(pos);
            }
            self.request_update(parent);
        }
        self.free_subtree(target);
    }

    fn apply_reorder(&mut self, target: ItemId, order: ZOrder) {
        let Some(parent) = self.parent_of(target) else {
            return;
        };
        let Some(group) = self.get_mut(parent).and_then(|p| p.kind.as_group_mut()) else {
            return;
        };
        let Some(from) = group.children.iter().position(|&c| c == target) else {
            return;
        };
        group.children.remove(from);
        let to = match order {
            ZOrder::Top => group.children.len(),
            ZOrder::Bottom => 0,
            ZOrder::Position(index) => index.min(group.children.len()),
        };
        group.children.insert(to, target);
        if from != to {
            self.redraw_item(target);
        }
    }

    fn apply_set_visible(&mut self, target: ItemId, visible: bool) {
        let Some(item) = self.get_mut(target) else {
            return;
        };
        if item.is_visible() == visible {
            return;
        }
        if visible {
            item.flags.insert(ItemFlags::VISIBLE);
            item.flags.remove(ItemFlags::NEEDS_UPDATE);
            self.request_update(target);
        } else {
            item.flags.remove(ItemFlags::VISIBLE | ItemFlags::NEEDS_UPDATE);
            // The next pass must reach the item to mark it net-invisible.
            match self.parent_of(target) {
                Some(parent) => self.request_update(parent),
                None => self.frame_pending = true,
            }
        }
    }
}
