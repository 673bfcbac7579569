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

//! The terminal grid: a fixed-height visible screen plus a bounded
//! scrollback tail. All input enters through [`Grid::write`] and
//! [`Grid::insert`]; the query surface reads cells back out, with
//! negative row indexes reaching into the scrollback.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::attrs::Attrs;
use crate::cursor::{Cursor, ScrollHook};
use crate::error::Error;
use crate::line::{Line, Overflow, WIDE_PAD};
use crate::reflow;
use crate::ring::RingBuffer;
use crate::wide::is_wide;

/// The in-memory cell grid of a terminal.
pub struct Grid {
    width: usize,
    height: usize,
    max_scrollback: usize,
    /// The visible screen, always exactly `height` lines.
    screen: RingBuffer<Line>,
    /// Lines scrolled off the top, oldest at the front. When full, the
    /// oldest line is evicted on push.
    scrollback: RingBuffer<Line>,
    /// The attributes applied to subsequent writes.
    current_attrs: Attrs,
    cursor: Cursor,
}

// The slice of grid state that cursor motion is allowed to touch.
struct Scroller<'a> {
    screen: &'a mut RingBuffer<Line>,
    scrollback: &'a mut RingBuffer<Line>,
    width: usize,
    height: usize,
    max_scrollback: usize,
    attrs: Attrs,
}

impl ScrollHook for Scroller<'_> {
    fn height(&self) -> usize {
        self.height
    }

    fn scroll(&mut self) -> Result<(), Error> {
        let evicted = self.screen.pop()?;
        if self.max_scrollback > 0 {
            if self.scrollback.size() == self.scrollback.capacity() {
                self.scrollback.pop()?;
            }
            self.scrollback.push(evicted)?;
        }
        self.screen.push(Line::new(self.width, self.attrs))
    }

    fn mark_wrapped(&mut self, row: usize) {
        match self.screen.get_mut(row) {
            Ok(line) => line.set_wrapped(),
            Err(e) => warn!("marking row {row} wrapped: {e}"),
        }
    }
}

// Absorbs scrolls while simulating cursor motion: the final position of
// a write does not depend on which lines moved into the scrollback.
struct DryRun {
    height: usize,
}

impl ScrollHook for DryRun {
    fn height(&self) -> usize {
        self.height
    }

    fn scroll(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn mark_wrapped(&mut self, _row: usize) {}
}

fn is_boundary(c: char) -> bool {
    c == '\r' || c == '\n' || c == WIDE_PAD || is_wide(c)
}

impl Grid {
    /// Create a grid with a `width` x `height` screen and room for
    /// `max_scrollback` scrolled-off lines (0 disables scrollback).
    pub fn new(width: usize, height: usize, max_scrollback: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvariantViolation("grid dimensions must be at least 1x1"));
        }
        let current_attrs = Attrs::default();
        let mut screen = RingBuffer::new(height);
        for _ in 0..height {
            screen.push(Line::new(width, current_attrs))?;
        }
        Ok(Grid {
            width,
            height,
            max_scrollback,
            screen,
            scrollback: RingBuffer::new(max_scrollback),
            current_attrs,
            cursor: Cursor::default(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scrollback_size(&self) -> usize {
        self.scrollback.size()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_attributes(&self) -> Attrs {
        self.current_attrs
    }

    /// Set the attributes applied to subsequent writes. See the
    /// `STYLE_*` constants for the style flags.
    pub fn set_attributes(&mut self, fg: u8, bg: u8, style: u8) {
        self.current_attrs = Attrs::pack(fg, bg, style);
    }

    // Split the cursor off from the state its motion may mutate.
    fn parts(&mut self) -> (&mut Cursor, Scroller<'_>) {
        let Grid { width, height, max_scrollback, screen, scrollback, current_attrs, cursor } =
            self;
        (
            cursor,
            Scroller {
                screen,
                scrollback,
                width: *width,
                height: *height,
                max_scrollback: *max_scrollback,
                attrs: *current_attrs,
            },
        )
    }

    fn resolve_wrap(&mut self) -> Result<(), Error> {
        let (cursor, mut hook) = self.parts();
        cursor.resolve_wrap(&mut hook)
    }

    /// Write `text` at the cursor, overwriting existing cells. Carriage
    /// returns and line feeds move the cursor; stray pad characters in
    /// the input are skipped; everything else prints.
    pub fn write(&mut self, text: &str) -> Result<(), Error> {
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\r' || c == '\n' {
                let (cursor, mut hook) = self.parts();
                cursor.handle_control(c, &mut hook)?;
                i += 1;
            } else if c == WIDE_PAD {
                i += 1;
            } else if is_wide(c) {
                self.write_wide(c)?;
                i += 1;
            } else {
                // Batch the narrow run up to the next boundary.
                let mut end = i + 1;
                while end < chars.len() && !is_boundary(chars[end]) {
                    end += 1;
                }
                self.write_run(&chars, i, end)?;
                i = end;
            }
        }
        Ok(())
    }

    /// `cursor.set(row, col)` followed by [`Grid::write`].
    pub fn write_at(&mut self, text: &str, row: usize, col: usize) -> Result<(), Error> {
        self.cursor.set(row, col, self.width, self.height);
        self.write(text)
    }

    // Emit a narrow run in chunks bounded by the remaining line width.
    fn write_run(&mut self, chars: &[char], mut start: usize, end: usize) -> Result<(), Error> {
        while start < end {
            self.resolve_wrap()?;
            let row = self.cursor.row();
            let col = self.cursor.col();
            let to_write = (self.width - col).min(end - start);
            let attrs = self.current_attrs;
            self.screen.get_mut(row)?.write_block(col, chars, start, to_write, attrs)?;
            self.cursor.right(to_write - 1, self.width);
            self.cursor.advance(self.width);
            start += to_write;
        }
        Ok(())
    }

    fn write_wide(&mut self, c: char) -> Result<(), Error> {
        if self.width < 2 {
            warn!("dropping double-width character {c:?}: grid is one column wide");
            return Ok(());
        }
        self.resolve_wrap()?;
        if self.cursor.col() + 1 == self.width {
            // A double-width character cannot straddle the line edge:
            // pad the last column with a space and wrap first.
            let row = self.cursor.row();
            let col = self.cursor.col();
            let attrs = self.current_attrs;
            self.screen.get_mut(row)?.set(col, ' ', attrs)?;
            self.cursor.advance(self.width);
            self.resolve_wrap()?;
        }
        let row = self.cursor.row();
        let col = self.cursor.col();
        let attrs = self.current_attrs;
        self.screen.get_mut(row)?.set_wide(col, c, attrs)?;
        self.cursor.advance_for_wide(self.width);
        Ok(())
    }

    /// Insert `text` at the cursor, shifting existing content to the
    /// right and cascading cells that fall off a line onto the next one,
    /// scrolling as the cascade passes the bottom row.
    pub fn insert(&mut self, text: &str) -> Result<(), Error> {
        let attrs = self.current_attrs;
        // Expand double-width characters into (base, pad) cell pairs so
        // the initial text and cascaded overflow share one shape.
        let mut seg = Overflow::default();
        for c in text.chars() {
            if c == WIDE_PAD {
                continue;
            }
            seg.chars.push(c);
            seg.attrs.push(attrs);
            if is_wide(c) {
                seg.chars.push(WIDE_PAD);
                seg.attrs.push(attrs);
            }
        }

        // Where the cursor must land once the cascade settles: the same
        // place a plain write of the text would leave it.
        let target = self.end_of_write(&seg.chars)?;

        let mut queue: VecDeque<Overflow> = VecDeque::new();
        queue.push_back(seg);
        while let Some(seg) = queue.pop_front() {
            self.insert_segment(&seg, &mut queue)?;
        }

        self.cursor = target;
        Ok(())
    }

    /// `cursor.set(row, col)` followed by [`Grid::insert`].
    pub fn insert_at(&mut self, text: &str, row: usize, col: usize) -> Result<(), Error> {
        self.cursor.set(row, col, self.width, self.height);
        self.insert(text)
    }

    // Replay write cursor motion over `chars` without touching cells.
    fn end_of_write(&self, chars: &[char]) -> Result<Cursor, Error> {
        let mut cursor = self.cursor;
        let mut dry = DryRun { height: self.height };
        for &c in chars {
            match c {
                '\r' | '\n' => cursor.handle_control(c, &mut dry)?,
                WIDE_PAD => {}
                c if is_wide(c) => {
                    if self.width < 2 {
                        continue;
                    }
                    cursor.resolve_wrap(&mut dry)?;
                    if cursor.col() + 1 == self.width {
                        cursor.advance(self.width);
                        cursor.resolve_wrap(&mut dry)?;
                    }
                    cursor.advance_for_wide(self.width);
                }
                _ => {
                    cursor.resolve_wrap(&mut dry)?;
                    cursor.advance(self.width);
                }
            }
        }
        Ok(cursor)
    }

    fn insert_segment(
        &mut self,
        seg: &Overflow,
        queue: &mut VecDeque<Overflow>,
    ) -> Result<(), Error> {
        let chars = seg.chars.as_slice();
        let attrs = seg.attrs.as_slice();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\r' || c == '\n' {
                let (cursor, mut hook) = self.parts();
                cursor.handle_control(c, &mut hook)?;
                i += 1;
            } else if c == WIDE_PAD {
                i += 1;
            } else if is_wide(c) {
                self.insert_wide_cell(c, attrs[i], queue)?;
                i += 1;
                // Consume the pad the expansion (or a spilled pair)
                // carries along.
                if i < chars.len() && chars[i] == WIDE_PAD {
                    i += 1;
                }
            } else {
                let mut end = i + 1;
                while end < chars.len() && !is_boundary(chars[end]) {
                    end += 1;
                }
                self.insert_run(chars, attrs, i, end, queue)?;
                i = end;
            }
        }
        Ok(())
    }

    fn insert_run(
        &mut self,
        chars: &[char],
        attrs: &[Attrs],
        start: usize,
        end: usize,
        queue: &mut VecDeque<Overflow>,
    ) -> Result<(), Error> {
        self.resolve_wrap()?;
        let row = self.cursor.row();
        let col = self.cursor.col();
        let overflow = self.screen.get_mut(row)?.insert_at(col, chars, attrs, start, end)?;
        match overflow {
            Some(spill) => {
                // The line filled up: park on the last column with the
                // wrap armed so the spill lands at the start of the next
                // line.
                self.cursor.right(self.width, self.width);
                self.cursor.advance(self.width);
                queue.push_back(spill);
            }
            None => {
                self.cursor.right(end - start - 1, self.width);
                self.cursor.advance(self.width);
            }
        }
        Ok(())
    }

    fn insert_wide_cell(
        &mut self,
        c: char,
        attr: Attrs,
        queue: &mut VecDeque<Overflow>,
    ) -> Result<(), Error> {
        if self.width < 2 {
            warn!("dropping double-width character {c:?}: grid is one column wide");
            return Ok(());
        }
        self.resolve_wrap()?;
        if self.cursor.col() + 1 == self.width {
            self.cursor.advance(self.width);
            self.resolve_wrap()?;
        }
        let row = self.cursor.row();
        let col = self.cursor.col();
        let overflow = self.screen.get_mut(row)?.insert_wide(col, c, attr)?;
        match overflow {
            Some(spill) => {
                // Same as the narrow case: park at the edge with the
                // wrap armed so the spill continues on the next line.
                self.cursor.right(self.width, self.width);
                self.cursor.advance(self.width);
                queue.push_back(spill);
            }
            None => self.cursor.advance_for_wide(self.width),
        }
        Ok(())
    }

    /// Move the top screen line into the scrollback (evicting the
    /// scrollback's oldest line when full, or discarding when scrollback
    /// is disabled) and append a fresh blank line to the screen.
    pub fn scroll(&mut self) -> Result<(), Error> {
        let (_cursor, mut hook) = self.parts();
        hook.scroll()
    }

    /// Scroll, leaving the cursor on the line it was on (now one row
    /// higher, clamped at the top).
    pub fn add_empty_line(&mut self) -> Result<(), Error> {
        self.scroll()?;
        let row = self.cursor.row().saturating_sub(1);
        let col = self.cursor.col();
        self.cursor.set(row, col, self.width, self.height);
        Ok(())
    }

    /// Fill a screen row with `ch` under the current attributes.
    pub fn fill_line(&mut self, row: usize, ch: char) -> Result<(), Error> {
        let attrs = self.current_attrs;
        self.screen.get_mut(row)?.fill(ch, attrs);
        Ok(())
    }

    /// Blank every screen line and home the cursor. Scrollback is
    /// untouched.
    pub fn clear_screen(&mut self) -> Result<(), Error> {
        let attrs = self.current_attrs;
        for row in 0..self.height {
            *self.screen.get_mut(row)? = Line::new(self.width, attrs);
        }
        self.cursor.set(0, 0, self.width, self.height);
        Ok(())
    }

    pub fn clear_screen_and_scrollback(&mut self) -> Result<(), Error> {
        self.scrollback.clear();
        self.clear_screen()
    }

    /// Move the cursor, clamping into the screen.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor.set(row, col, self.width, self.height);
    }

    pub fn cursor_up(&mut self, n: usize) {
        self.cursor.up(n);
    }

    pub fn cursor_down(&mut self, n: usize) {
        self.cursor.down(n, self.height);
    }

    pub fn cursor_left(&mut self, n: usize) {
        self.cursor.left(n);
    }

    pub fn cursor_right(&mut self, n: usize) {
        self.cursor.right(n, self.width);
    }

    // Non-negative rows index the screen from the top; negative rows
    // index the scrollback, -1 being the most recent scrolled-off line.
    fn line_at(&self, row: isize) -> Result<&Line, Error> {
        if row >= 0 {
            let idx = row as usize;
            if idx >= self.height {
                return Err(Error::OutOfRange { what: "row", index: row, limit: self.height });
            }
            self.screen.get(idx)
        } else {
            let back = row.unsigned_abs();
            if back > self.scrollback.size() {
                return Err(Error::OutOfRange {
                    what: "row",
                    index: row,
                    limit: self.scrollback.size(),
                });
            }
            self.scrollback.get(self.scrollback.size() - back)
        }
    }

    pub fn get_char(&self, row: isize, col: usize) -> Result<char, Error> {
        self.line_at(row)?.get_char(col)
    }

    pub fn get_attr(&self, row: isize, col: usize) -> Result<Attrs, Error> {
        self.line_at(row)?.get_attr(col)
    }

    pub fn get_line(&self, row: isize) -> Result<&Line, Error> {
        self.line_at(row)
    }

    /// The visible screen as text: one `width`-character row per line,
    /// each terminated by a newline, pad cells rendered verbatim.
    pub fn screen_to_string(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for line in self.screen.iter() {
            out.extend(line.chars().iter());
            out.push('\n');
        }
        out
    }

    /// Like [`Grid::screen_to_string`], preceded by the scrollback
    /// contents, oldest line first.
    pub fn screen_and_scrollback_to_string(&self) -> String {
        let rows = self.scrollback.size() + self.height;
        let mut out = String::with_capacity((self.width + 1) * rows);
        for line in self.scrollback.iter() {
            out.extend(line.chars().iter());
            out.push('\n');
        }
        out.push_str(&self.screen_to_string());
        out
    }

    /// Resize the grid, reflowing soft-wrapped paragraphs to the new
    /// width and redistributing lines between screen and scrollback. The
    /// cursor stays anchored to the cell it pointed at.
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<(), Error> {
        if new_width == 0 || new_height == 0 {
            return Err(Error::InvariantViolation("grid dimensions must be at least 1x1"));
        }
        debug!(new_width, new_height, "resizing grid");

        // Collect scrollback plus the meaningful prefix of the screen:
        // everything up to the last non-empty line or the cursor's row,
        // whichever is lower on the screen.
        let scrollback_len = self.scrollback.size();
        let mut all = Vec::with_capacity(scrollback_len + self.height);
        while let Ok(line) = self.scrollback.pop() {
            all.push(line);
        }
        let mut last_content = None;
        for row in 0..self.height {
            if !self.screen.get(row)?.is_empty() {
                last_content = Some(row);
            }
        }
        let bound = match last_content {
            Some(row) => row.max(self.cursor.row()),
            None => self.cursor.row(),
        };
        for _ in 0..=bound {
            all.push(self.screen.pop()?);
        }

        let anchor = (scrollback_len + self.cursor.row(), self.cursor.col());
        let reflowed = reflow::reflow(&all, self.width, new_width, anchor, self.current_attrs)?;

        self.width = new_width;
        self.height = new_height;
        self.scrollback.clear();
        self.screen.resize_and_clear(new_height);

        // The latest lines fill the screen; older ones spill into the
        // scrollback, oldest evicted first.
        let to_scrollback = reflowed.lines.len().saturating_sub(new_height);
        for (i, line) in reflowed.lines.into_iter().enumerate() {
            if i < to_scrollback {
                if self.max_scrollback > 0 {
                    if self.scrollback.size() == self.scrollback.capacity() {
                        self.scrollback.pop()?;
                    }
                    self.scrollback.push(line)?;
                }
            } else {
                self.screen.push(line)?;
            }
        }
        while self.screen.size() < new_height {
            self.screen.push(Line::new(new_width, self.current_attrs))?;
        }

        match reflowed.cursor {
            Some((line_idx, col)) if line_idx >= to_scrollback => {
                self.cursor.set(line_idx - to_scrollback, col, new_width, new_height);
            }
            // The anchored cell moved into the scrollback (or was never
            // placed): home the cursor.
            _ => self.cursor.set(0, 0, new_width, new_height),
        }
        Ok(())
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.width {
            write!(f, "-")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.screen_to_string())?;
        for _ in 0..self.width {
            write!(f, "-")?;
        }
        Ok(())
    }
}
