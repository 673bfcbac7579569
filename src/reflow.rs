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

//! Reflowing lines to a new width. Soft-wrapped runs are grouped back
//! into logical paragraphs, trimmed of trailing blank cells, and re-cut
//! at the new width with the cursor anchored to the cell it pointed at.

use tracing::warn;

use crate::attrs::Attrs;
use crate::error::Error;
use crate::line::{Line, WIDE_PAD};
use crate::wide::is_wide;

/// The product of a reflow: the re-cut lines, oldest first, and where
/// the cursor anchor landed within them.
pub(crate) struct Reflowed {
    pub lines: Vec<Line>,
    /// (index into `lines`, column), if the anchor was placed.
    pub cursor: Option<(usize, usize)>,
}

/// Re-cut `all` (uniformly `old_width` wide, oldest first) to
/// `new_width`. `anchor` names the cursor's line index within `all` and
/// its column; `attrs` is the grid's current attribute word, used both
/// for fresh cells and to decide which trailing cells are meaningless.
pub(crate) fn reflow(
    all: &[Line],
    old_width: usize,
    new_width: usize,
    anchor: (usize, usize),
    attrs: Attrs,
) -> Result<Reflowed, Error> {
    let (anchor_line, anchor_col) = anchor;
    let mut out = Reflowed { lines: Vec::with_capacity(all.len()), cursor: None };

    let mut para_start = 0;
    while para_start < all.len() {
        // A paragraph is one hard line plus its soft-wrap continuations.
        let mut para_end = para_start + 1;
        while para_end < all.len() && all[para_end].wrapped() {
            para_end += 1;
        }
        let para = &all[para_start..para_end];

        let anchor_off = if anchor_line >= para_start && anchor_line < para_end {
            Some((anchor_line - para_start) * old_width + anchor_col)
        } else {
            None
        };

        let eff = effective_len(para, attrs);
        let para_out_start = out.lines.len();
        let mut emitted = 0;
        let mut line = Line::new(new_width, attrs);
        let mut tcol = 0;

        let mut src = 0;
        while src < eff {
            let (ch, at) = cell(para, old_width, src);
            if at.is_empty() {
                // Interior never-written cell: leave the fresh target
                // cell alone so emptiness survives the reflow.
                if anchor_off == Some(src) {
                    out.cursor = Some((out.lines.len(), tcol));
                }
                src += 1;
                tcol += 1;
            } else if is_wide(ch) {
                if new_width < 2 {
                    warn!(
                        "dropping double-width character {ch:?} in reflow: \
                         target grid is one column wide"
                    );
                    src += 1;
                    if src < eff && cell(para, old_width, src).0 == WIDE_PAD {
                        src += 1;
                    }
                    continue;
                }
                if tcol + 2 > new_width {
                    // No room for both halves: finish this line short
                    // and roll the character onto the next one.
                    flush(&mut out.lines, &mut line, &mut emitted, new_width, attrs);
                    tcol = 0;
                }
                if anchor_off == Some(src) {
                    out.cursor = Some((out.lines.len(), tcol));
                } else if anchor_off == Some(src + 1) {
                    out.cursor = Some((out.lines.len(), tcol + 1));
                }
                line.set_wide(tcol, ch, at)?;
                tcol += 2;
                src += 1;
                if src < eff && cell(para, old_width, src).0 == WIDE_PAD {
                    src += 1;
                }
            } else {
                if anchor_off == Some(src) {
                    out.cursor = Some((out.lines.len(), tcol));
                }
                line.set(tcol, ch, at)?;
                tcol += 1;
                src += 1;
            }
            if tcol == new_width && src < eff {
                flush(&mut out.lines, &mut line, &mut emitted, new_width, attrs);
                tcol = 0;
            }
        }

        // Flush the final partial line; an empty paragraph still emits
        // one blank line so blank-line structure survives.
        if tcol > 0 || emitted == 0 {
            flush(&mut out.lines, &mut line, &mut emitted, new_width, attrs);
        }

        // The cursor may sit in the blank space past the text; emit
        // enough lines for its offset to stay addressable.
        if let Some(off) = anchor_off {
            if out.cursor.is_none() {
                let need = off / new_width + 1;
                while emitted < need {
                    flush(&mut out.lines, &mut line, &mut emitted, new_width, attrs);
                }
                out.cursor = Some((para_out_start + off / new_width, off % new_width));
            }
        }

        para_start = para_end;
    }

    Ok(out)
}

// Push the working line and start a fresh one. Every emitted line after
// the first in a paragraph carries the soft-wrap mark.
fn flush(lines: &mut Vec<Line>, line: &mut Line, emitted: &mut usize, width: usize, attrs: Attrs) {
    let mut done = std::mem::replace(line, Line::new(width, attrs));
    if *emitted > 0 {
        done.set_wrapped();
    }
    lines.push(done);
    *emitted += 1;
}

fn cell(para: &[Line], width: usize, idx: usize) -> (char, Attrs) {
    let line = &para[idx / width];
    let col = idx % width;
    (line.chars()[col], line.attrs()[col])
}

// The 1-based offset of the last cell in the paragraph that still means
// something: written, and either not a space or styled differently from
// the current attributes.
fn effective_len(para: &[Line], attrs: Attrs) -> usize {
    for line_idx in (0..para.len()).rev() {
        let line = &para[line_idx];
        let chars = line.chars();
        let cell_attrs = line.attrs();
        for col in (0..chars.len()).rev() {
            if cell_attrs[col].is_empty() {
                continue;
            }
            if chars[col] != ' ' || cell_attrs[col] != attrs {
                return line_idx * chars.len() + col + 1;
            }
        }
    }
    0
}
