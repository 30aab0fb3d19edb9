// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small public types shared by the table and its cells.

bitflags::bitflags! {
    /// Alignment of a table inside its layout box, or of a widget inside its cell.
    ///
    /// Only the edge flags are consulted: an axis with neither edge set is centered.
    /// [`Align::CENTER`] exists so that "explicitly centered" can be stored and merged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Align: u8 {
        /// Centered on both axes.
        const CENTER = 0b0000_0001;
        /// Aligned to the smallest y.
        const TOP    = 0b0000_0010;
        /// Aligned to the largest y.
        const BOTTOM = 0b0000_0100;
        /// Aligned to the smallest x.
        const LEFT   = 0b0000_1000;
        /// Aligned to the largest x.
        const RIGHT  = 0b0001_0000;
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::CENTER
    }
}

impl Align {
    /// Returns `self` with `edge` set and the opposite edge on the same axis cleared.
    pub(crate) fn with_edge(self, edge: Self) -> Self {
        let opposite = if edge == Self::TOP {
            Self::BOTTOM
        } else if edge == Self::BOTTOM {
            Self::TOP
        } else if edge == Self::LEFT {
            Self::RIGHT
        } else {
            Self::LEFT
        };
        (self | edge) - opposite
    }
}

/// Which debug rectangles [`TableLayout::layout`](crate::TableLayout::layout) reports
/// to the [`Toolkit`](crate::Toolkit).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DebugLines {
    /// No debug output.
    #[default]
    None,
    /// Table, cell, and widget rectangles.
    All,
    /// The layout box and the table box.
    Table,
    /// Each cell's box, padding excluded.
    Cell,
    /// Each widget's resolved bounds.
    Widget,
}

impl DebugLines {
    pub(crate) fn shows(self, kind: Self) -> bool {
        self == kind || self == Self::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_edge_clears_opposite_edge() {
        let a = Align::CENTER.with_edge(Align::TOP).with_edge(Align::LEFT);
        assert!(a.contains(Align::TOP | Align::LEFT));
        let a = a.with_edge(Align::BOTTOM).with_edge(Align::RIGHT);
        assert!(a.contains(Align::BOTTOM | Align::RIGHT));
        assert!(!a.intersects(Align::TOP | Align::LEFT));
    }

    #[test]
    fn all_shows_every_kind() {
        assert!(DebugLines::All.shows(DebugLines::Cell));
        assert!(DebugLines::Cell.shows(DebugLines::Cell));
        assert!(!DebugLines::Cell.shows(DebugLines::Table));
        assert!(!DebugLines::None.shows(DebugLines::Widget));
    }
}
