// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by canvas operations.

use thiserror::Error;

use crate::types::ItemId;

/// Result alias for fallible canvas operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors returned by fallible canvas operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The handle refers to an item that has been unlinked.
    #[error("item {0:?} is no longer alive")]
    StaleItem(ItemId),
    /// A group was required (for example as the parent of a new item).
    #[error("item {0:?} is not a group")]
    NotAGroup(ItemId),
    /// A kind-specific setter was used on an item of another kind.
    #[error("item {item:?} is not a {expected} item")]
    WrongKind {
        /// The item the setter was called on.
        item: ItemId,
        /// The kind the setter applies to.
        expected: &'static str,
    },
    /// Every 32-bit item index is in use.
    #[error("canvas item arena exhausted")]
    ArenaExhausted,
}
