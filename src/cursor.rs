// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The cursor state machine, including VT100 pending-wrap semantics:
//! writing the last column of a line leaves the cursor parked on it with
//! the wrap armed, and only the next printable character moves it.

use crate::error::Error;

/// The callback surface cursor motion needs from the grid: how tall the
/// screen is, how to scroll a line off the top, and how to mark a row as
/// a soft-wrap continuation. Passing this in keeps ownership acyclic;
/// the cursor holds no pointer back into the grid.
pub(crate) trait ScrollHook {
    fn height(&self) -> usize;
    fn scroll(&mut self) -> Result<(), Error>;
    fn mark_wrapped(&mut self, row: usize);
}

/// A cursor position. After any public move, `row` and `col` are inside
/// the screen, and `pending_wrap` is only ever set while the cursor sits
/// on the last column.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Cursor {
    row: usize,
    col: usize,
    pending_wrap: bool,
}

impl Cursor {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn pending_wrap(&self) -> bool {
        self.pending_wrap
    }

    /// Move to `(row, col)`, clamping into the screen. Explicit motion
    /// always disarms a pending wrap.
    pub(crate) fn set(&mut self, row: usize, col: usize, width: usize, height: usize) {
        self.row = row.min(height - 1);
        self.col = col.min(width - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
        self.pending_wrap = false;
    }

    pub(crate) fn down(&mut self, n: usize, height: usize) {
        self.row = (self.row + n).min(height - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    pub(crate) fn right(&mut self, n: usize, width: usize) {
        self.col = (self.col + n).min(width - 1);
        self.pending_wrap = false;
    }

    /// Step one column right after a narrow write. On the last column
    /// the cursor stays put and arms the wrap instead.
    pub(crate) fn advance(&mut self, width: usize) {
        if self.col + 1 < width {
            self.col += 1;
        } else {
            self.pending_wrap = true;
        }
    }

    /// Step two columns right after a double-width write, arming the
    /// wrap when the character ended flush with the right edge.
    pub(crate) fn advance_for_wide(&mut self, width: usize) {
        if self.col + 2 < width {
            self.col += 2;
        } else {
            self.col = width - 1;
            self.pending_wrap = true;
        }
    }

    /// Perform an armed wrap: move to the start of the next row,
    /// scrolling if the cursor is already on the bottom row, and mark
    /// the row it lands on as a soft-wrap continuation. A no-op unless
    /// the wrap is pending.
    pub(crate) fn resolve_wrap(&mut self, hook: &mut impl ScrollHook) -> Result<(), Error> {
        if !self.pending_wrap {
            return Ok(());
        }
        if self.row + 1 == hook.height() {
            hook.scroll()?;
        } else {
            self.row += 1;
        }
        self.col = 0;
        hook.mark_wrapped(self.row);
        self.pending_wrap = false;
        Ok(())
    }

    /// Move one row down, scrolling instead when already on the bottom
    /// row.
    pub(crate) fn advance_down(&mut self, hook: &mut impl ScrollHook) -> Result<(), Error> {
        if self.row + 1 == hook.height() {
            hook.scroll()?;
        } else {
            self.row += 1;
        }
        Ok(())
    }

    /// Carriage return and line feed handling. Both disarm a pending
    /// wrap; anything else is ignored here.
    pub(crate) fn handle_control(
        &mut self,
        ch: char,
        hook: &mut impl ScrollHook,
    ) -> Result<(), Error> {
        match ch {
            '\n' => {
                self.advance_down(hook)?;
                self.col = 0;
            }
            '\r' => self.col = 0,
            _ => {}
        }
        self.pending_wrap = false;
        Ok(())
    }
}
