// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A span in the source code.
///
/// Synthesized nodes inherit the span of the late variable they were
/// generated for, so runtime errors point back at the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single file offset.
    pub fn at(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
