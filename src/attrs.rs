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

//! Cell attributes, bit-packed into a single 32-bit word so a line can
//! store them in a flat array and copy them in bulk.

use static_assertions::const_assert;

// Word layout. Bits 11..=23 and 25..=31 are reserved and must be zero
// when packing, but unknown bits round-trip unchanged through
// from_bits/bits so serialized words survive version skew.
const FG_MASK: u32 = 0x0000_000f;
const BG_SHIFT: u32 = 4;
const BG_MASK: u32 = 0x0000_00f0;
const STYLE_SHIFT: u32 = 8;
const STYLE_MASK: u32 = 0x0000_0700;
const EMPTY: u32 = 1 << 24;

// The empty marker must never collide with a colour nibble or style bit.
const_assert!(EMPTY & (FG_MASK | BG_MASK | STYLE_MASK) == 0);

/// Style flag for the `style` argument of [`Attrs::pack`].
pub const STYLE_BOLD: u8 = 0b0000_0001;
pub const STYLE_ITALIC: u8 = 0b0000_0010;
pub const STYLE_UNDERLINE: u8 = 0b0000_0100;

/// The fixed 16-entry palette the colour indices refer to, as RGB
/// triples. Pure reference data for renderers; the engine never reads it.
pub const PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// The packed attributes of one cell: a foreground and background colour
/// index (0-15), a set of style flags, and an emptiness marker that is
/// set iff the cell has never been written since its line was created or
/// blanked.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Attrs(u32);

impl Attrs {
    /// Pack a foreground index, background index, and style flag set.
    /// The emptiness marker is clear; this is a "write" attribute.
    pub fn pack(fg: u8, bg: u8, style: u8) -> Self {
        Attrs(
            (fg as u32 & FG_MASK)
                | (((bg as u32) << BG_SHIFT) & BG_MASK)
                | (((style as u32) << STYLE_SHIFT) & STYLE_MASK),
        )
    }

    /// Reconstruct from a previously serialized word. Unknown bits are
    /// tolerated and preserved.
    pub fn from_bits(bits: u32) -> Self {
        Attrs(bits)
    }

    /// The raw word, suitable for serialization.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn fg(self) -> u8 {
        (self.0 & FG_MASK) as u8
    }

    pub fn bg(self) -> u8 {
        ((self.0 & BG_MASK) >> BG_SHIFT) as u8
    }

    pub fn style(self) -> u8 {
        ((self.0 & STYLE_MASK) >> STYLE_SHIFT) as u8
    }

    pub fn bold(self) -> bool {
        self.style() & STYLE_BOLD != 0
    }

    pub fn italic(self) -> bool {
        self.style() & STYLE_ITALIC != 0
    }

    pub fn underline(self) -> bool {
        self.style() & STYLE_UNDERLINE != 0
    }

    /// True iff the cell carrying this word has never been written.
    pub fn is_empty(self) -> bool {
        self.0 & EMPTY != 0
    }

    pub fn with_empty_set(self) -> Self {
        Attrs(self.0 | EMPTY)
    }

    pub fn with_empty_cleared(self) -> Self {
        Attrs(self.0 & !EMPTY)
    }
}

impl Default for Attrs {
    fn default() -> Self {
        // White-ish on black, the conventional terminal default.
        Attrs::pack(7, 0, 0)
    }
}
