// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the layout engine and a concrete widget system.

use kurbo::Rect;

use crate::DebugLines;

/// Bridges [`TableLayout`](crate::TableLayout) to a widget system.
///
/// The table never owns widgets. It asks the toolkit to attach and detach them and to
/// measure them. A toolkit value is passed explicitly to every table operation that
/// needs one; it typically borrows the host's widget storage for the duration of the call.
///
/// Only the literal size is required. The richer size queries default to it, except the
/// maximums which default to `0.0`, meaning "unbounded".
pub trait Toolkit {
    /// Handle to a widget. Compared with `==` to find a widget's cell.
    type Widget: Clone + PartialEq;

    /// Attach `widget` to the container that owns the table.
    fn add_child(&mut self, widget: &Self::Widget);

    /// Detach `widget` from the container that owns the table.
    fn remove_child(&mut self, widget: &Self::Widget);

    /// Current width of `widget`.
    fn width(&self, widget: &Self::Widget) -> f64;

    /// Current height of `widget`.
    fn height(&self, widget: &Self::Widget) -> f64;

    /// Minimum width of `widget`.
    fn min_width(&self, widget: &Self::Widget) -> f64 {
        self.width(widget)
    }

    /// Minimum height of `widget`.
    fn min_height(&self, widget: &Self::Widget) -> f64 {
        self.height(widget)
    }

    /// Preferred width of `widget`.
    fn pref_width(&self, widget: &Self::Widget) -> f64 {
        self.width(widget)
    }

    /// Preferred height of `widget`.
    fn pref_height(&self, widget: &Self::Widget) -> f64 {
        self.height(widget)
    }

    /// Maximum width of `widget`, or `0.0` for no maximum.
    fn max_width(&self, _widget: &Self::Widget) -> f64 {
        0.0
    }

    /// Maximum height of `widget`, or `0.0` for no maximum.
    fn max_height(&self, _widget: &Self::Widget) -> f64 {
        0.0
    }

    /// Drop the debug rectangles reported by the previous layout.
    fn clear_debug_rectangles(&mut self) {}

    /// Record one debug rectangle, in the coordinate space of the layout box.
    fn add_debug_rectangle(&mut self, _lines: DebugLines, _rect: Rect) {}
}
