// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slot layout properties and resolved geometry.

use kurbo::{Insets, Rect, Size};

use crate::{Align, LayoutError, Toolkit, Value};

macro_rules! cell_props {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Every layout property of a cell, each one optional so that "unset" can be
        /// told apart from "set to the default".
        #[derive(Clone, Debug, PartialEq)]
        pub(crate) struct CellProps<W> {
            $(pub(crate) $field: Option<$ty>,)*
        }

        impl<W> Default for CellProps<W> {
            fn default() -> Self {
                Self { $($field: None,)* }
            }
        }

        impl<W: Clone> CellProps<W> {
            /// Copy the properties that are set in `other`, leaving the rest untouched.
            pub(crate) fn merge(&mut self, other: &Self) {
                $(
                    if let Some(v) = &other.$field {
                        self.$field = Some(v.clone());
                    }
                )*
            }
        }
    };
}

cell_props! {
    min_width: Value<W>,
    min_height: Value<W>,
    pref_width: Value<W>,
    pref_height: Value<W>,
    max_width: Value<W>,
    max_height: Value<W>,
    space_top: Value<W>,
    space_left: Value<W>,
    space_bottom: Value<W>,
    space_right: Value<W>,
    pad_top: Value<W>,
    pad_left: Value<W>,
    pad_bottom: Value<W>,
    pad_right: Value<W>,
    fill_x: f64,
    fill_y: f64,
    align: Align,
    expand_x: u32,
    expand_y: u32,
    ignore: bool,
    colspan: usize,
    uniform_x: bool,
    uniform_y: bool,
}

impl<W> CellProps<W> {
    /// Global cell defaults: widget-derived sizes, no spacing or padding, no fill or
    /// expand, centered, one column wide.
    pub(crate) fn defaults() -> Self {
        Self {
            min_width: Some(Value::MinWidth),
            min_height: Some(Value::MinHeight),
            pref_width: Some(Value::PrefWidth),
            pref_height: Some(Value::PrefHeight),
            max_width: Some(Value::MaxWidth),
            max_height: Some(Value::MaxHeight),
            space_top: Some(Value::ZERO),
            space_left: Some(Value::ZERO),
            space_bottom: Some(Value::ZERO),
            space_right: Some(Value::ZERO),
            pad_top: Some(Value::ZERO),
            pad_left: Some(Value::ZERO),
            pad_bottom: Some(Value::ZERO),
            pad_right: Some(Value::ZERO),
            fill_x: Some(0.0),
            fill_y: Some(0.0),
            align: Some(Align::CENTER),
            expand_x: Some(0),
            expand_y: Some(0),
            ignore: Some(false),
            colspan: Some(1),
            uniform_x: None,
            uniform_y: None,
        }
    }
}

/// Min, preferred, and max size of a cell's content, with the preferred size raised to
/// the minimum and then capped by a positive maximum.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Constraints {
    pub(crate) min: Size,
    pub(crate) pref: Size,
    pub(crate) max: Size,
}

fn non_negative<W>(value: Value<W>) -> Result<Value<W>, LayoutError> {
    let amount = match value {
        Value::Fixed(amount)
        | Value::PercentWidth(amount)
        | Value::PercentHeight(amount)
        | Value::PercentWidthOf(amount, _)
        | Value::PercentHeightOf(amount, _) => amount,
        _ => return Ok(value),
    };
    if amount < 0.0 {
        return Err(LayoutError::NegativeSpacing(amount));
    }
    Ok(value)
}

/// One slot of a [`TableLayout`](crate::TableLayout).
///
/// Cells are configured with chainable setters and read back after
/// [`TableLayout::layout`](crate::TableLayout::layout):
///
/// - Size setters accept a literal (`f64`) or any [`Value`].
/// - Spacing setters reject negative literals and percentages with
///   [`LayoutError::NegativeSpacing`].
/// - `widget_*` accessors expose the geometry computed by the last layout pass.
///
/// Row defaults, column defaults, and the table's global defaults are cells too; only
/// their properties are used.
#[derive(Clone, Debug)]
pub struct Cell<W> {
    pub(crate) props: CellProps<W>,
    pub(crate) widget: Option<W>,
    pub(crate) column: usize,
    pub(crate) row: usize,
    pub(crate) cell_above: Option<usize>,
    pub(crate) end_row: bool,
    /// Set once a later cell or the end of the row depends on this cell's span.
    pub(crate) frozen: bool,
    pub(crate) computed_pad: Insets,
    pub(crate) widget_x: f64,
    pub(crate) widget_y: f64,
    pub(crate) widget_width: f64,
    pub(crate) widget_height: f64,
}

impl<W> Cell<W> {
    pub(crate) fn new(widget: Option<W>) -> Self {
        Self {
            props: CellProps::default(),
            widget,
            column: 0,
            row: 0,
            cell_above: None,
            end_row: false,
            frozen: false,
            computed_pad: Insets::ZERO,
            widget_x: 0.0,
            widget_y: 0.0,
            widget_width: 0.0,
            widget_height: 0.0,
        }
    }

    pub(crate) fn with_defaults() -> Self {
        let mut cell = Self::new(None);
        cell.props = CellProps::defaults();
        cell
    }

    /// The widget in this cell, if any.
    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    /// Grid column of the cell's first spanned column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Grid row of the cell.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Number of columns the cell spans (at least 1).
    pub fn span(&self) -> usize {
        self.props.colspan.unwrap_or(1).max(1)
    }

    /// Whether this cell is the last one of its row.
    pub fn is_row_end(&self) -> bool {
        self.end_row
    }

    /// Index of the most recent cell in a previous row that occupies this cell's column.
    pub fn cell_above(&self) -> Option<usize> {
        self.cell_above
    }

    /// Whether the cell is excluded from sizing and positioning.
    pub fn is_ignored(&self) -> bool {
        self.props.ignore.unwrap_or(false)
    }

    /// Effective alignment of the widget inside the cell.
    pub fn alignment(&self) -> Align {
        self.props.align.unwrap_or_default()
    }

    /// Horizontal expand weight.
    pub fn expand_x_weight(&self) -> u32 {
        self.props.expand_x.unwrap_or(0)
    }

    /// Vertical expand weight.
    pub fn expand_y_weight(&self) -> u32 {
        self.props.expand_y.unwrap_or(0)
    }

    /// Horizontal fill ratio.
    pub fn fill_x_ratio(&self) -> f64 {
        self.props.fill_x.unwrap_or(0.0)
    }

    /// Vertical fill ratio.
    pub fn fill_y_ratio(&self) -> f64 {
        self.props.fill_y.unwrap_or(0.0)
    }

    /// Whether the cell takes part in uniform column sizing.
    pub fn is_uniform_x(&self) -> bool {
        self.props.uniform_x.unwrap_or(false)
    }

    /// Whether the cell takes part in uniform row sizing.
    pub fn is_uniform_y(&self) -> bool {
        self.props.uniform_y.unwrap_or(false)
    }

    /// Padding plus neighbor-aware spacing, as resolved by the last size computation.
    pub fn computed_padding(&self) -> Insets {
        self.computed_pad
    }

    /// Resolved widget x.
    pub fn widget_x(&self) -> f64 {
        self.widget_x
    }

    /// Resolved widget y.
    pub fn widget_y(&self) -> f64 {
        self.widget_y
    }

    /// Resolved widget width.
    pub fn widget_width(&self) -> f64 {
        self.widget_width
    }

    /// Resolved widget height.
    pub fn widget_height(&self) -> f64 {
        self.widget_height
    }

    /// Resolved widget bounds.
    pub fn widget_bounds(&self) -> Rect {
        Rect::from_origin_size(
            (self.widget_x, self.widget_y),
            (self.widget_width, self.widget_height),
        )
    }

    pub(crate) fn take_widget(&mut self) -> Option<W> {
        self.widget.take()
    }

    pub(crate) fn resolve<T>(&self, value: &Option<Value<W>>, toolkit: &T, table: Size) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        value
            .as_ref()
            .map_or(0.0, |v| v.cell_value(toolkit, self.widget.as_ref(), table))
    }

    pub(crate) fn constraints<T>(&self, toolkit: &T, table: Size) -> Constraints
    where
        T: Toolkit<Widget = W>,
    {
        let p = &self.props;
        let min = Size::new(
            self.resolve(&p.min_width, toolkit, table),
            self.resolve(&p.min_height, toolkit, table),
        );
        let max = Size::new(
            self.resolve(&p.max_width, toolkit, table),
            self.resolve(&p.max_height, toolkit, table),
        );
        let mut pref = Size::new(
            self.resolve(&p.pref_width, toolkit, table),
            self.resolve(&p.pref_height, toolkit, table),
        );
        pref.width = pref.width.max(min.width);
        pref.height = pref.height.max(min.height);
        if max.width > 0.0 && pref.width > max.width {
            pref.width = max.width;
        }
        if max.height > 0.0 && pref.height > max.height {
            pref.height = max.height;
        }
        Constraints { min, pref, max }
    }
}

impl<W: Clone> Cell<W> {
    /// Copy every property from `other`, including unset ones.
    pub fn set(&mut self, other: &Self) -> &mut Self {
        self.props = other.props.clone();
        self
    }

    /// Copy only the properties that are set in `other`.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        self.props.merge(&other.props);
        self
    }

    /// Unset every property.
    pub fn clear(&mut self) -> &mut Self {
        self.props = CellProps::default();
        self
    }

    /// Set min, preferred, and max width and height.
    pub fn size(&mut self, width: impl Into<Value<W>>, height: impl Into<Value<W>>) -> &mut Self {
        self.width(width).height(height)
    }

    /// Set min, preferred, and max width.
    pub fn width(&mut self, width: impl Into<Value<W>>) -> &mut Self {
        let width = width.into();
        self.props.min_width = Some(width.clone());
        self.props.pref_width = Some(width.clone());
        self.props.max_width = Some(width);
        self
    }

    /// Set min, preferred, and max height.
    pub fn height(&mut self, height: impl Into<Value<W>>) -> &mut Self {
        let height = height.into();
        self.props.min_height = Some(height.clone());
        self.props.pref_height = Some(height.clone());
        self.props.max_height = Some(height);
        self
    }

    /// Set the minimum width and height.
    pub fn min_size(
        &mut self,
        width: impl Into<Value<W>>,
        height: impl Into<Value<W>>,
    ) -> &mut Self {
        self.min_width(width).min_height(height)
    }

    /// Set the minimum width.
    pub fn min_width(&mut self, width: impl Into<Value<W>>) -> &mut Self {
        self.props.min_width = Some(width.into());
        self
    }

    /// Set the minimum height.
    pub fn min_height(&mut self, height: impl Into<Value<W>>) -> &mut Self {
        self.props.min_height = Some(height.into());
        self
    }

    /// Set the preferred width and height.
    pub fn pref_size(
        &mut self,
        width: impl Into<Value<W>>,
        height: impl Into<Value<W>>,
    ) -> &mut Self {
        self.pref_width(width).pref_height(height)
    }

    /// Set the preferred width.
    pub fn pref_width(&mut self, width: impl Into<Value<W>>) -> &mut Self {
        self.props.pref_width = Some(width.into());
        self
    }

    /// Set the preferred height.
    pub fn pref_height(&mut self, height: impl Into<Value<W>>) -> &mut Self {
        self.props.pref_height = Some(height.into());
        self
    }

    /// Set the maximum width and height. Zero means unbounded.
    pub fn max_size(
        &mut self,
        width: impl Into<Value<W>>,
        height: impl Into<Value<W>>,
    ) -> &mut Self {
        self.max_width(width).max_height(height)
    }

    /// Set the maximum width. Zero means unbounded.
    pub fn max_width(&mut self, width: impl Into<Value<W>>) -> &mut Self {
        self.props.max_width = Some(width.into());
        self
    }

    /// Set the maximum height. Zero means unbounded.
    pub fn max_height(&mut self, height: impl Into<Value<W>>) -> &mut Self {
        self.props.max_height = Some(height.into());
        self
    }

    /// Set the spacing on all four sides.
    ///
    /// Spacing between two neighbors is the larger of their facing spacings, and there
    /// is no spacing at the table edges.
    pub fn space(&mut self, space: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        let space = non_negative(space.into())?;
        self.props.space_top = Some(space.clone());
        self.props.space_left = Some(space.clone());
        self.props.space_bottom = Some(space.clone());
        self.props.space_right = Some(space);
        Ok(self)
    }

    /// Set the spacing above the cell.
    pub fn space_top(&mut self, space: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.props.space_top = Some(non_negative(space.into())?);
        Ok(self)
    }

    /// Set the spacing left of the cell.
    pub fn space_left(&mut self, space: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.props.space_left = Some(non_negative(space.into())?);
        Ok(self)
    }

    /// Set the spacing below the cell.
    pub fn space_bottom(
        &mut self,
        space: impl Into<Value<W>>,
    ) -> Result<&mut Self, LayoutError> {
        self.props.space_bottom = Some(non_negative(space.into())?);
        Ok(self)
    }

    /// Set the spacing right of the cell.
    pub fn space_right(
        &mut self,
        space: impl Into<Value<W>>,
    ) -> Result<&mut Self, LayoutError> {
        self.props.space_right = Some(non_negative(space.into())?);
        Ok(self)
    }

    /// Set the padding on all four sides.
    pub fn pad(&mut self, pad: impl Into<Value<W>>) -> &mut Self {
        let pad = pad.into();
        self.props.pad_top = Some(pad.clone());
        self.props.pad_left = Some(pad.clone());
        self.props.pad_bottom = Some(pad.clone());
        self.props.pad_right = Some(pad);
        self
    }

    /// Set the top padding.
    pub fn pad_top(&mut self, pad: impl Into<Value<W>>) -> &mut Self {
        self.props.pad_top = Some(pad.into());
        self
    }

    /// Set the left padding.
    pub fn pad_left(&mut self, pad: impl Into<Value<W>>) -> &mut Self {
        self.props.pad_left = Some(pad.into());
        self
    }

    /// Set the bottom padding.
    pub fn pad_bottom(&mut self, pad: impl Into<Value<W>>) -> &mut Self {
        self.props.pad_bottom = Some(pad.into());
        self
    }

    /// Set the right padding.
    pub fn pad_right(&mut self, pad: impl Into<Value<W>>) -> &mut Self {
        self.props.pad_right = Some(pad.into());
        self
    }

    /// Stretch the widget to the whole cell on both axes.
    pub fn fill(&mut self) -> &mut Self {
        self.fill_ratio(1.0, 1.0)
    }

    /// Stretch the widget to the cell width.
    pub fn fill_x(&mut self) -> &mut Self {
        self.props.fill_x = Some(1.0);
        self
    }

    /// Stretch the widget to the cell height.
    pub fn fill_y(&mut self) -> &mut Self {
        self.props.fill_y = Some(1.0);
        self
    }

    /// Size the widget to a fraction of the cell on each axis. Zero disables fill.
    pub fn fill_ratio(&mut self, x: f64, y: f64) -> &mut Self {
        self.props.fill_x = Some(x);
        self.props.fill_y = Some(y);
        self
    }

    /// Give the cell's column and row a share of leftover space.
    pub fn expand(&mut self) -> &mut Self {
        self.expand_weight(1, 1)
    }

    /// Give the cell's column a share of leftover width.
    pub fn expand_x(&mut self) -> &mut Self {
        self.props.expand_x = Some(1);
        self
    }

    /// Give the cell's row a share of leftover height.
    pub fn expand_y(&mut self) -> &mut Self {
        self.props.expand_y = Some(1);
        self
    }

    /// Set expand weights. Zero disables expansion on that axis.
    pub fn expand_weight(&mut self, x: u32, y: u32) -> &mut Self {
        self.props.expand_x = Some(x);
        self.props.expand_y = Some(y);
        self
    }

    /// Size the column and row uniformly with the other uniform cells.
    pub fn uniform(&mut self) -> &mut Self {
        self.uniform_x().uniform_y()
    }

    /// Size the column uniformly with the other `uniform_x` cells.
    pub fn uniform_x(&mut self) -> &mut Self {
        self.props.uniform_x = Some(true);
        self
    }

    /// Size the row uniformly with the other `uniform_y` cells.
    pub fn uniform_y(&mut self) -> &mut Self {
        self.props.uniform_y = Some(true);
        self
    }

    /// Set how many columns the cell spans.
    ///
    /// The span of a cell is fixed once another cell or the end of its row depends on it;
    /// later calls are ignored.
    pub fn colspan(&mut self, colspan: usize) -> &mut Self {
        if self.frozen {
            log::warn!("colspan change ignored on a cell whose row layout is fixed");
            return self;
        }
        self.props.colspan = Some(colspan.max(1));
        self
    }

    /// Exclude the cell from sizing and positioning.
    pub fn ignore(&mut self, ignore: bool) -> &mut Self {
        self.props.ignore = Some(ignore);
        self
    }

    /// Set the widget alignment inside the cell.
    pub fn align(&mut self, align: Align) -> &mut Self {
        self.props.align = Some(align);
        self
    }

    /// Center the widget on both axes.
    pub fn center(&mut self) -> &mut Self {
        self.align(Align::CENTER)
    }

    /// Align the widget to the top of the cell.
    pub fn top(&mut self) -> &mut Self {
        self.edge(Align::TOP)
    }

    /// Align the widget to the bottom of the cell.
    pub fn bottom(&mut self) -> &mut Self {
        self.edge(Align::BOTTOM)
    }

    /// Align the widget to the left of the cell.
    pub fn left(&mut self) -> &mut Self {
        self.edge(Align::LEFT)
    }

    /// Align the widget to the right of the cell.
    pub fn right(&mut self) -> &mut Self {
        self.edge(Align::RIGHT)
    }

    fn edge(&mut self, edge: Align) -> &mut Self {
        let current = self.props.align.unwrap_or(edge);
        self.props.align = Some(current.with_edge(edge));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_values_missing_from_source() {
        let mut base: Cell<u32> = Cell::with_defaults();
        let mut column = Cell::new(None);
        column.pad(4.0).expand_x();
        let mut row = Cell::new(None);
        row.pad_left(9.0);

        base.merge(&column).merge(&row);
        assert_eq!(base.props.pad_top, Some(Value::Fixed(4.0)));
        assert_eq!(base.props.pad_left, Some(Value::Fixed(9.0)));
        assert_eq!(base.expand_x_weight(), 1);
        assert_eq!(base.props.min_width, Some(Value::MinWidth));
    }

    #[test]
    fn set_copies_unset_values_too() {
        let mut cell: Cell<u32> = Cell::with_defaults();
        let empty = Cell::new(None);
        cell.set(&empty);
        assert_eq!(cell.props, CellProps::default());
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let mut cell: Cell<u32> = Cell::with_defaults();
        assert_eq!(
            cell.space_left(-1.0).err(),
            Some(LayoutError::NegativeSpacing(-1.0))
        );
        assert_eq!(cell.props.space_left, Some(Value::ZERO));
        assert!(cell.space(3.0).is_ok());
        assert_eq!(cell.props.space_bottom, Some(Value::Fixed(3.0)));

        assert_eq!(
            cell.space_top(Value::PercentWidth(-0.5)).err(),
            Some(LayoutError::NegativeSpacing(-0.5))
        );
        assert_eq!(
            cell.space_right(Value::PercentHeightOf(-0.25, 7)).err(),
            Some(LayoutError::NegativeSpacing(-0.25))
        );
        assert_eq!(cell.props.space_top, Some(Value::Fixed(3.0)));
        assert!(cell.space_top(Value::PercentWidth(0.5)).is_ok());
    }

    #[test]
    fn edge_alignment_toggles() {
        let mut cell: Cell<u32> = Cell::with_defaults();
        cell.top().left();
        assert!(cell.alignment().contains(Align::TOP | Align::LEFT));
        cell.bottom();
        assert!(cell.alignment().contains(Align::BOTTOM));
        assert!(!cell.alignment().contains(Align::TOP));
        cell.center();
        assert_eq!(cell.alignment(), Align::CENTER);
    }

    #[test]
    fn frozen_cells_keep_their_span() {
        let mut cell: Cell<u32> = Cell::with_defaults();
        cell.colspan(3);
        assert_eq!(cell.span(), 3);
        cell.frozen = true;
        cell.colspan(1);
        assert_eq!(cell.span(), 3);
        let mut zero: Cell<u32> = Cell::with_defaults();
        zero.colspan(0);
        assert_eq!(zero.span(), 1);
    }

    struct Measured;
    impl Toolkit for Measured {
        type Widget = u32;
        fn add_child(&mut self, _widget: &u32) {}
        fn remove_child(&mut self, _widget: &u32) {}
        fn width(&self, _widget: &u32) -> f64 {
            30.0
        }
        fn height(&self, _widget: &u32) -> f64 {
            10.0
        }
    }

    #[test]
    fn pref_is_raised_to_min_and_capped_by_max() {
        let mut cell: Cell<u32> = Cell::with_defaults();
        cell.widget = Some(1);
        cell.min_width(50.0).max_height(4.0);
        let k = cell.constraints(&Measured, Size::ZERO);
        assert_eq!(k.pref.width, 50.0);
        assert_eq!(k.pref.height, 4.0);
        assert_eq!(k.min.height, 10.0);
        assert_eq!(k.max.width, 0.0);
    }
}
