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

//! One row of the grid: parallel character and attribute arrays plus a
//! soft-wrap marker. Cells are never stored as an aggregate object so
//! that block writes and reflow copies stay bulk memory moves.

use smallvec::SmallVec;

use crate::attrs::Attrs;
use crate::error::Error;
use crate::wide::is_wide;

/// The trailing half of a double-width character. Never written by
/// callers directly; produced by `set_wide`/`insert_wide` and skipped
/// when it appears in an input stream.
pub const WIDE_PAD: char = '\0';

// Inline capacity for overflow segments. Most cascades displace a
// handful of cells, so they stay off the heap.
const OVERFLOW_INLINE: usize = 8;

/// Cells pushed off the right edge of a line by an insert, in the order
/// they must re-enter the grid at the start of the next line: the tail
/// of the new text that did not fit, then the displaced existing
/// content, left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overflow {
    pub chars: SmallVec<[char; OVERFLOW_INLINE]>,
    pub attrs: SmallVec<[Attrs; OVERFLOW_INLINE]>,
}

impl Overflow {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    fn push(&mut self, ch: char, attr: Attrs) {
        self.chars.push(ch);
        self.attrs.push(attr);
    }
}

/// One row of cells. The row length is fixed at construction; resize
/// rebuilds lines rather than growing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    chars: Vec<char>,
    attrs: Vec<Attrs>,
    wrapped: bool,
}

impl Line {
    /// A blank line of the given width. Every cell holds a space and
    /// carries `attr` with the empty marker set.
    pub fn new(width: usize, attr: Attrs) -> Self {
        Line {
            chars: vec![' '; width],
            attrs: vec![attr.with_empty_set(); width],
            wrapped: false,
        }
    }

    pub fn width(&self) -> usize {
        self.chars.len()
    }

    /// The backing character array, exactly `width` long. Trailing
    /// halves of double-width characters appear as [`WIDE_PAD`].
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The backing attribute array, index-aligned with [`Line::chars`].
    pub fn attrs(&self) -> &[Attrs] {
        &self.attrs
    }

    pub fn get_char(&self, col: usize) -> Result<char, Error> {
        self.check_col(col)?;
        Ok(self.chars[col])
    }

    pub fn get_attr(&self, col: usize) -> Result<Attrs, Error> {
        self.check_col(col)?;
        Ok(self.attrs[col])
    }

    /// True iff this line is the soft-wrap continuation of its
    /// predecessor, i.e. part of the same logical paragraph.
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn set_wrapped(&mut self) {
        self.wrapped = true;
    }

    /// Write a single narrow cell.
    pub fn set(&mut self, col: usize, ch: char, attr: Attrs) -> Result<(), Error> {
        self.check_col(col)?;
        self.heal(col);
        self.chars[col] = ch;
        self.attrs[col] = attr.with_empty_cleared();
        Ok(())
    }

    /// Write a double-width character: the base cell at `col` and the
    /// trailing pad at `col + 1`, atomically.
    pub fn set_wide(&mut self, col: usize, ch: char, attr: Attrs) -> Result<(), Error> {
        if col + 1 >= self.chars.len() {
            return Err(Error::InvariantViolation("double-width character at the last column"));
        }
        self.heal(col);
        self.heal(col + 1);
        let attr = attr.with_empty_cleared();
        self.chars[col] = ch;
        self.attrs[col] = attr;
        self.chars[col + 1] = WIDE_PAD;
        self.attrs[col + 1] = attr;
        Ok(())
    }

    /// Bulk-copy `len` characters from `src[src_start..]` into the cells
    /// starting at `col`, all carrying `attr`.
    pub fn write_block(
        &mut self,
        col: usize,
        src: &[char],
        src_start: usize,
        len: usize,
        attr: Attrs,
    ) -> Result<(), Error> {
        if col + len > self.chars.len() {
            return Err(Error::InvariantViolation("block write past the end of the line"));
        }
        if src_start + len > src.len() {
            return Err(Error::InvariantViolation("block write outside its source"));
        }
        if len == 0 {
            return Ok(());
        }
        self.heal(col);
        self.heal(col + len - 1);
        self.chars[col..col + len].copy_from_slice(&src[src_start..src_start + len]);
        let attr = attr.with_empty_cleared();
        for slot in self.attrs[col..col + len].iter_mut() {
            *slot = attr;
        }
        Ok(())
    }

    /// Set every cell to `ch` with `attr`. Filling with spaces blanks
    /// the line: the empty marker comes back on.
    pub fn fill(&mut self, ch: char, attr: Attrs) {
        let attr = if ch == ' ' { attr.with_empty_set() } else { attr.with_empty_cleared() };
        for slot in self.chars.iter_mut() {
            *slot = ch;
        }
        for slot in self.attrs.iter_mut() {
            *slot = attr;
        }
    }

    /// True iff no cell has been written since construction or blanking.
    pub fn is_empty(&self) -> bool {
        self.attrs.iter().all(|attr| attr.is_empty())
    }

    pub fn is_empty_cell(&self, col: usize) -> Result<bool, Error> {
        self.check_col(col)?;
        Ok(self.attrs[col].is_empty())
    }

    /// Insert `src[start..end]` at `index`, shifting existing content to
    /// the right. Cells pushed past the right edge come back as an
    /// [`Overflow`] for the caller to cascade onto the next line.
    pub fn insert_at(
        &mut self,
        index: usize,
        src: &[char],
        attr_src: &[Attrs],
        start: usize,
        end: usize,
    ) -> Result<Option<Overflow>, Error> {
        let width = self.chars.len();
        self.check_col(index)?;
        if start > end || end > src.len() || end > attr_src.len() {
            return Err(Error::InvariantViolation("insert range outside its source"));
        }
        let text_len = end - start;
        if text_len == 0 {
            return Ok(None);
        }
        let keep = text_len.min(width - index);

        if self.is_empty() {
            // Nothing to shift: write what fits, spill the rest.
            for k in 0..keep {
                self.chars[index + k] = src[start + k];
                self.attrs[index + k] = attr_src[start + k].with_empty_cleared();
            }
            if keep == text_len {
                return Ok(None);
            }
            let mut overflow = Overflow::default();
            for k in keep..text_len {
                overflow.push(src[start + k], attr_src[start + k].with_empty_cleared());
            }
            return Ok(Some(overflow));
        }

        // The insert point may land on the trailing half of a
        // double-width pair; the base cell cannot survive on its own.
        if index > 0 && is_wide(self.chars[index - 1]) && self.chars[index] == WIDE_PAD {
            self.chars[index - 1] = ' ';
            self.chars[index] = ' ';
        }

        let mut overflow = Overflow::default();
        // Tail of the new text that does not fit comes first so the
        // cascade re-inserts cells in logical order.
        for k in keep..text_len {
            overflow.push(src[start + k], attr_src[start + k].with_empty_cleared());
        }

        // Existing cells at [spill_from, width) get pushed off the edge.
        let spill_from = if text_len >= width - index { index } else { width - text_len };
        if spill_from > index
            && self.chars[spill_from] == WIDE_PAD
            && is_wide(self.chars[spill_from - 1])
        {
            // Keep the pair together: move the base cell into the
            // overflow ahead of its pad and blank the slot it leaves.
            overflow.push(self.chars[spill_from - 1], self.attrs[spill_from - 1]);
            self.chars[spill_from - 1] = ' ';
        }
        for col in spill_from..width {
            overflow.push(self.chars[col], self.attrs[col]);
        }
        // Never-written cells at the right edge spill along with the
        // content; cascading them would write phantom spaces onto the
        // next line, so drop the trailing run.
        while overflow.attrs.last().map_or(false, |attr| attr.is_empty()) {
            overflow.chars.pop();
            overflow.attrs.pop();
        }

        // Shift the survivors right, back to front.
        for dst in (index + text_len..width).rev() {
            self.chars[dst] = self.chars[dst - text_len];
            self.attrs[dst] = self.attrs[dst - text_len];
        }

        for k in 0..keep {
            self.chars[index + k] = src[start + k];
            self.attrs[index + k] = attr_src[start + k].with_empty_cleared();
        }

        Ok(if overflow.is_empty() { None } else { Some(overflow) })
    }

    /// Insert one double-width character (two cells) at `index`,
    /// mirroring [`Line::insert_at`] for the two-cell case.
    pub fn insert_wide(
        &mut self,
        index: usize,
        ch: char,
        attr: Attrs,
    ) -> Result<Option<Overflow>, Error> {
        if index + 1 >= self.chars.len() {
            return Err(Error::InvariantViolation("double-width insert at the last column"));
        }
        let pair = [ch, WIDE_PAD];
        let attrs = [attr, attr];
        self.insert_at(index, &pair, &attrs, 0, 2)
    }

    // Overwriting half of a double-width pair leaves the other half
    // meaningless; blank it before the write lands.
    fn heal(&mut self, col: usize) {
        if self.chars[col] == WIDE_PAD && col > 0 && is_wide(self.chars[col - 1]) {
            self.chars[col - 1] = ' ';
        }
        if is_wide(self.chars[col]) {
            if let Some(next) = self.chars.get_mut(col + 1) {
                if *next == WIDE_PAD {
                    *next = ' ';
                }
            }
        }
    }

    fn check_col(&self, col: usize) -> Result<(), Error> {
        if col >= self.chars.len() {
            return Err(Error::OutOfRange {
                what: "column",
                index: col as isize,
                limit: self.chars.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Line {
    /// Exactly `width` characters, pad cells rendered verbatim.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &c in self.chars.iter() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Attrs {
        Attrs::default()
    }

    #[test]
    fn new_line_is_blank_and_empty() -> anyhow::Result<()> {
        let line = Line::new(4, attrs());
        assert_eq!(line.to_string(), "    ");
        assert!(line.is_empty());
        assert!(line.is_empty_cell(3)?);
        assert!(!line.wrapped());
        Ok(())
    }

    #[test]
    fn set_clears_empty_marker() -> anyhow::Result<()> {
        let mut line = Line::new(4, attrs());
        line.set(1, 'x', attrs())?;
        assert_eq!(line.get_char(1)?, 'x');
        assert!(!line.is_empty_cell(1)?);
        assert!(line.is_empty_cell(0)?);
        assert!(!line.is_empty());
        Ok(())
    }

    #[test]
    fn set_wide_places_pad_with_same_attrs() -> anyhow::Result<()> {
        let mut line = Line::new(4, attrs());
        let red = Attrs::pack(1, 0, 0);
        line.set_wide(1, '中', red)?;
        assert_eq!(line.get_char(1)?, '中');
        assert_eq!(line.get_char(2)?, WIDE_PAD);
        assert_eq!(line.get_attr(2)?, red);
        assert!(!line.is_empty_cell(2)?);
        Ok(())
    }

    #[test]
    fn set_wide_rejects_last_column() {
        let mut line = Line::new(4, attrs());
        assert!(matches!(line.set_wide(3, '中', attrs()), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn overwriting_half_a_pair_blanks_the_other_half() -> anyhow::Result<()> {
        let mut line = Line::new(6, attrs());
        line.set_wide(1, '中', attrs())?;
        // Clobber the base cell; the pad must not survive alone.
        line.set(1, 'x', attrs())?;
        assert_eq!(line.get_char(2)?, ' ');

        line.set_wide(3, '中', attrs())?;
        // Clobber the pad; the base must not survive alone.
        line.set(4, 'y', attrs())?;
        assert_eq!(line.get_char(3)?, ' ');
        Ok(())
    }

    #[test]
    fn write_block_copies_chars_and_attrs() -> anyhow::Result<()> {
        let mut line = Line::new(5, attrs());
        let src: Vec<char> = "abcdef".chars().collect();
        let green = Attrs::pack(2, 0, 0);
        line.write_block(1, &src, 2, 3, green)?;
        assert_eq!(line.to_string(), " cde ");
        assert_eq!(line.get_attr(2)?, green);
        assert!(line.is_empty_cell(0)?);
        Ok(())
    }

    #[test]
    fn write_block_rejects_past_end() {
        let mut line = Line::new(3, attrs());
        let src: Vec<char> = "abcd".chars().collect();
        assert!(line.write_block(1, &src, 0, 3, attrs()).is_err());
    }

    #[test]
    fn fill_with_space_blanks_the_line() {
        let mut line = Line::new(3, attrs());
        line.fill('#', attrs());
        assert_eq!(line.to_string(), "###");
        assert!(!line.is_empty());
        line.fill(' ', attrs());
        assert!(line.is_empty());
    }

    #[test]
    fn insert_into_empty_line_writes_in_place() -> anyhow::Result<()> {
        let mut line = Line::new(5, attrs());
        let src: Vec<char> = "xy".chars().collect();
        let asrc = vec![attrs(); 2];
        let overflow = line.insert_at(2, &src, &asrc, 0, 2)?;
        assert!(overflow.is_none());
        assert_eq!(line.to_string(), "  xy ");
        Ok(())
    }

    #[test]
    fn insert_into_empty_line_spills_whatever_does_not_fit() -> anyhow::Result<()> {
        let mut line = Line::new(4, attrs());
        let src: Vec<char> = "abcdef".chars().collect();
        let asrc = vec![attrs(); 6];
        let overflow = line.insert_at(2, &src, &asrc, 0, 6)?.expect("overflow");
        assert_eq!(line.to_string(), "  ab");
        assert_eq!(overflow.chars.as_slice(), &['c', 'd', 'e', 'f']);
        Ok(())
    }

    #[test]
    fn insert_shifts_existing_content_right() -> anyhow::Result<()> {
        let mut line = Line::new(10, attrs());
        let full: Vec<char> = "AAAAAAAAAA".chars().collect();
        line.write_block(0, &full, 0, 10, attrs())?;
        let src: Vec<char> = "XYZ".chars().collect();
        let asrc = vec![attrs(); 3];
        let overflow = line.insert_at(5, &src, &asrc, 0, 3)?.expect("overflow");
        assert_eq!(line.to_string(), "AAAAAXYZAA");
        assert_eq!(overflow.chars.as_slice(), &['A', 'A', 'A']);
        Ok(())
    }

    #[test]
    fn overflow_orders_new_text_tail_before_displaced_cells() -> anyhow::Result<()> {
        let mut line = Line::new(4, attrs());
        let old: Vec<char> = "abcd".chars().collect();
        line.write_block(0, &old, 0, 4, attrs())?;
        // Insert 6 chars at column 2: only "UV" fits, "WXYZ" spills,
        // then the displaced "cd" follows.
        let src: Vec<char> = "UVWXYZ".chars().collect();
        let asrc = vec![attrs(); 6];
        let overflow = line.insert_at(2, &src, &asrc, 0, 6)?.expect("overflow");
        assert_eq!(line.to_string(), "abUV");
        assert_eq!(overflow.chars.as_slice(), &['W', 'X', 'Y', 'Z', 'c', 'd']);
        Ok(())
    }

    #[test]
    fn insert_keeps_wide_pair_together_in_overflow() -> anyhow::Result<()> {
        let mut line = Line::new(6, attrs());
        let old: Vec<char> = "abcd".chars().collect();
        line.write_block(0, &old, 0, 4, attrs())?;
        line.set_wide(4, '中', attrs())?;
        // Shifting right by one would strand the base cell in the last
        // column; the whole pair must spill instead.
        let src: Vec<char> = "x".chars().collect();
        let asrc = vec![attrs(); 1];
        let overflow = line.insert_at(0, &src, &asrc, 0, 1)?.expect("overflow");
        assert_eq!(overflow.chars.as_slice(), &['中', WIDE_PAD]);
        assert_eq!(line.to_string(), "xabcd ");
        Ok(())
    }

    #[test]
    fn insert_wide_shifts_two_cells() -> anyhow::Result<()> {
        let mut line = Line::new(6, attrs());
        let old: Vec<char> = "abcdef".chars().collect();
        line.write_block(0, &old, 0, 6, attrs())?;
        let overflow = line.insert_wide(2, '中', attrs())?.expect("overflow");
        assert_eq!(line.to_string(), "ab中\u{0}cd");
        assert_eq!(overflow.chars.as_slice(), &['e', 'f']);
        Ok(())
    }

    #[test]
    fn displaced_blank_tail_does_not_cascade() -> anyhow::Result<()> {
        let mut line = Line::new(8, attrs());
        let old: Vec<char> = "abc".chars().collect();
        line.write_block(0, &old, 0, 3, attrs())?;
        // Only never-written cells fall off the edge; nothing cascades.
        let src: Vec<char> = "Z".chars().collect();
        let asrc = vec![attrs(); 1];
        let overflow = line.insert_at(1, &src, &asrc, 0, 1)?;
        assert!(overflow.is_none());
        assert_eq!(line.to_string(), "aZbc    ");
        Ok(())
    }

    #[test]
    fn insert_empty_range_is_a_no_op() -> anyhow::Result<()> {
        let mut line = Line::new(3, attrs());
        let overflow = line.insert_at(0, &[], &[], 0, 0)?;
        assert!(overflow.is_none());
        assert!(line.is_empty());
        Ok(())
    }
}
