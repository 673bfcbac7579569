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

//! Double-width code point classification.
//!
//! Deliberately coarser than full East Asian Width: whole CJK, kana,
//! Hangul, and common emoji blocks render double width, everything else
//! single. Consumers that need East Asian Ambiguous handling must layer
//! their own classifier on top.

use std::cmp::Ordering;

// Inclusive code point ranges rendered double width, sorted by start so
// lookups can binary search.
const WIDE_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x11FF),   // Hangul Jamo
    (0x2600, 0x26FF),   // Miscellaneous Symbols
    (0x2700, 0x27BF),   // Dingbats
    (0x3040, 0x309F),   // Hiragana
    (0x30A0, 0x30FF),   // Katakana
    (0x3400, 0x4DBF),   // CJK Unified Ideographs Extension A
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0xAC00, 0xD7AF),   // Hangul Syllables
    (0xF900, 0xFAFF),   // CJK Compatibility Ideographs
    (0x1F300, 0x1F9FF), // Emoji & pictographs
    (0x20000, 0x2A6DF), // CJK Unified Ideographs Extension B
];

/// True iff the character occupies two grid cells.
pub fn is_wide(c: char) -> bool {
    let cp = c as u32;
    // ASCII dominates real terminal traffic; bail before the table.
    if cp < 128 {
        return false;
    }
    WIDE_RANGES
        .binary_search_by(|&(start, end)| {
            if end < cp {
                Ordering::Less
            } else if start > cp {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}
