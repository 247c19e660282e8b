// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear undo/redo of view transforms.

use alloc::collections::VecDeque;

use thiserror::Error;

use crate::affine::DesktopAffine;

/// Result alias for history navigation.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Why a history navigation step could not be taken.
///
/// These are ordinary outcomes (nothing to undo or redo); the `Display` text
/// is suitable for a status bar.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// The past list only holds the current transform.
    #[error("no previous transform")]
    NoPrevious,
    /// The future list is empty.
    #[error("no next transform")]
    NoNext,
    /// The past list lost its current transform (it was cleared).
    #[error("current transform missing from history")]
    MissingCurrent,
}

/// Past and future lists of logged view transforms.
///
/// The front of the past list is always the current transform, so a history
/// of length one means "nothing to undo". Logging a new transform clears the
/// future list: once a new change is made after undoing, the undone branch
/// can no longer be redone.
///
/// Both lists are bounded; the oldest entries are dropped first.
#[derive(Clone, Debug)]
pub struct TransformHistory {
    past: VecDeque<DesktopAffine>,
    future: VecDeque<DesktopAffine>,
    limit: usize,
}

impl TransformHistory {
    /// Creates a history holding `current` as its only entry.
    #[must_use]
    pub fn new(current: DesktopAffine, limit: usize) -> Self {
        let mut past = VecDeque::new();
        past.push_front(current);
        Self {
            past,
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Records `current` as the newest transform and invalidates redo.
    pub fn log(&mut self, current: DesktopAffine) {
        self.past.push_front(current);
        self.past.truncate(self.limit);
        if !self.future.is_empty() {
            tracing::debug!(dropped = self.future.len(), "transform log discards redo history");
            self.future.clear();
        }
    }

    /// Steps back one transform.
    ///
    /// `current` is the live transform; it is moved to the future list so that
    /// [`next`](Self::next) can restore it. Returns the transform to restore.
    pub fn prev(&mut self, current: DesktopAffine) -> HistoryResult<DesktopAffine> {
        match self.past.len() {
            0 => return Err(HistoryError::MissingCurrent),
            1 => return Err(HistoryError::NoPrevious),
            _ => {}
        }
        self.future.push_front(current);
        self.future.truncate(self.limit);
        self.past.pop_front();
        self.past.front().copied().ok_or(HistoryError::MissingCurrent)
    }

    /// Steps forward one transform, returning the transform to restore.
    pub fn next(&mut self) -> HistoryResult<DesktopAffine> {
        let next = self.future.pop_front().ok_or(HistoryError::NoNext)?;
        self.past.push_front(next);
        self.past.truncate(self.limit);
        Ok(next)
    }

    /// Drops both lists.
    ///
    /// Afterwards [`prev`](Self::prev) reports
    /// [`HistoryError::MissingCurrent`] until a transform is logged again.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Returns the newest logged transform.
    #[must_use]
    pub fn current(&self) -> Option<&DesktopAffine> {
        self.past.front()
    }

    /// Returns `true` if [`prev`](Self::prev) would succeed.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    /// Returns `true` if [`next`](Self::next) would succeed.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Iterates the past list, newest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &DesktopAffine> {
        self.past.iter()
    }

    /// Iterates the future list, nearest first.
    pub fn future(&self) -> impl ExactSizeIterator<Item = &DesktopAffine> {
        self.future.iter()
    }
}
