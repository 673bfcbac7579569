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

//! An in-memory terminal cell grid.
//!
//! A [`Grid`] holds a fixed-height visible screen plus a bounded
//! scrollback tail of styled cells. It implements the parts of a
//! terminal that are about cells rather than escape codes: batched
//! overwrites, VT100 pending-wrap cursor semantics, double-width
//! character placement, insert with cascading overflow, and resize with
//! full paragraph reflow.
//!
//! Escape sequence parsing, pty plumbing, and rendering are out of
//! scope. Feed the grid already-decoded characters (carriage returns
//! and line feeds are understood) and read cells, lines, or whole
//! screens back out. The engine is single-threaded and performs no I/O.
//!
//! ```
//! use termgrid::Grid;
//!
//! # fn main() -> Result<(), termgrid::Error> {
//! let mut grid = Grid::new(10, 5, 100)?;
//! grid.write("hello")?;
//! assert_eq!(grid.get_char(0, 0)?, 'h');
//! assert_eq!(grid.cursor().col(), 5);
//! grid.resize(3, 5)?;
//! assert_eq!(grid.get_char(1, 0)?, 'l');
//! # Ok(())
//! # }
//! ```

mod attrs;
mod cursor;
mod error;
mod grid;
mod line;
mod reflow;
mod ring;
mod wide;

pub use attrs::{Attrs, PALETTE, STYLE_BOLD, STYLE_ITALIC, STYLE_UNDERLINE};
pub use cursor::Cursor;
pub use error::Error;
pub use grid::Grid;
pub use line::{Line, Overflow, WIDE_PAD};
pub use wide::is_wide;
