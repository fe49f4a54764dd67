//! Snapshot-based undo/redo.

use crate::draw::{Snapshot, Surface, SurfaceError};
use std::collections::VecDeque;

/// Ordered full-surface snapshots plus a cursor.
///
/// While non-empty, `cursor < entries.len()`. Capturing after an undo drops
/// every entry past the cursor, so redo branches do not survive a new edit.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    /// Maximum number of entries kept (0 = unbounded)
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot at the cursor, i.e. what the surface should currently show.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Clears all entries and records `surface` as the sole entry.
    pub fn reset(&mut self, surface: &Surface) -> Result<(), SurfaceError> {
        let snapshot = surface.snapshot()?;
        self.entries.clear();
        self.entries.push_back(snapshot);
        self.cursor = 0;
        Ok(())
    }

    /// Appends a copy of `surface` after the cursor and moves the cursor to it.
    pub fn capture(&mut self, surface: &Surface) -> Result<(), SurfaceError> {
        let snapshot = surface.snapshot()?;

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(snapshot);

        if self.max_depth > 0 {
            while self.entries.len() > self.max_depth {
                self.entries.pop_front();
            }
        }
        self.cursor = self.entries.len() - 1;

        log::debug!(
            "History captured entry {} of {}",
            self.cursor + 1,
            self.entries.len()
        );
        Ok(())
    }

    /// Steps back one entry and restores it onto `surface`.
    ///
    /// # Returns
    /// `false` if already at the first entry (nothing changed).
    pub fn undo(&mut self, surface: &mut Surface) -> Result<bool, SurfaceError> {
        if !self.can_undo() {
            return Ok(false);
        }
        surface.restore(&self.entries[self.cursor - 1])?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Steps forward one entry and restores it onto `surface`.
    ///
    /// # Returns
    /// `false` if already at the last entry (nothing changed).
    pub fn redo(&mut self, surface: &mut Surface) -> Result<bool, SurfaceError> {
        if !self.can_redo() {
            return Ok(false);
        }
        surface.restore(&self.entries[self.cursor + 1])?;
        self.cursor += 1;
        Ok(true)
    }

    /// Drops every entry (used when the session loses its surface).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
