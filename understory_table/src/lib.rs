// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_table --heading-base-level=0

//! Understory Table: a constraint-based table layout engine.
//!
//! A [`TableLayout`] arranges widgets in a grid of cells. Cells may span several columns,
//! carry padding and neighbor-aware spacing, expand into leftover space, fill their slot,
//! and share a uniform size with other cells. The engine measures (min and preferred size
//! per column and row) and arranges (resolved widget rectangles per cell); it never owns,
//! draws, or moves widgets itself.
//!
//! ## The toolkit seam
//!
//! Widgets are opaque handles. Everything the engine needs from a widget system goes
//! through the [`Toolkit`] trait: attaching and detaching children, and size queries.
//! The toolkit is passed explicitly to every operation that needs it, so there is no
//! global state and the same table type can drive actors, test fixtures, or anything
//! else that can answer "how big is this widget".
//!
//! ## Values
//!
//! Every size, padding, and spacing property holds a [`Value`]: a literal, a size
//! derived from the cell's widget, or a percentage of the table or of another widget.
//!
//! ## Layering defaults
//!
//! A new cell starts from [`TableLayout::defaults`], then takes what is set on
//! [`TableLayout::column_defaults`] for its column, then what is set on the current
//! row's defaults returned by [`TableLayout::row`], then the caller's own settings.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_table::{TableLayout, Toolkit};
//!
//! struct Boxes(Vec<Size>);
//!
//! impl Toolkit for Boxes {
//!     type Widget = usize;
//!     fn add_child(&mut self, _widget: &usize) {}
//!     fn remove_child(&mut self, _widget: &usize) {}
//!     fn width(&self, widget: &usize) -> f64 {
//!         self.0[*widget].width
//!     }
//!     fn height(&self, widget: &usize) -> f64 {
//!         self.0[*widget].height
//!     }
//! }
//!
//! let mut boxes = Boxes(vec![Size::new(40.0, 20.0), Size::new(60.0, 20.0)]);
//! let mut table = TableLayout::new();
//! table.add(&mut boxes, 0);
//! table.add(&mut boxes, 1).expand_x().fill_x();
//!
//! table.layout(&mut boxes, Rect::new(0.0, 0.0, 200.0, 20.0));
//! let label = &table.cells()[1];
//! assert_eq!(label.widget_x(), 40.0);
//! assert_eq!(label.widget_width(), 160.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod error;
mod layout;
mod toolkit;
mod types;
mod value;

pub use cell::Cell;
pub use error::LayoutError;
pub use layout::TableLayout;
pub use toolkit::Toolkit;
pub use types::{Align, DebugLines};
pub use value::Value;
