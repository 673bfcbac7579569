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

//! Error kinds shared by the grid, line, and ring buffer layers.

use thiserror::Error;

/// Errors produced by grid operations.
///
/// None of these are recoverable at the API boundary: every variant is
/// either caller misuse (an index that is not currently addressable, a
/// precondition violation) or an internal inconsistency. No operation
/// leaves partial state behind when it returns an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A row, column, or buffer index outside the currently addressable
    /// region.
    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: isize,
        limit: usize,
    },

    /// Push into a full ring buffer. The grid layer evicts before it
    /// pushes, so this never escapes a correct build.
    #[error("push into a full ring buffer")]
    Overflow,

    /// Pop from an empty ring buffer.
    #[error("pop from an empty ring buffer")]
    Underflow,

    /// An operation that would corrupt grid state, such as placing a
    /// double-width character in the last column of a line.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),
}
