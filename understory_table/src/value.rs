// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing expressions.

use kurbo::Size;

use crate::{LayoutError, Toolkit};

/// A sizing expression that resolves to a scalar.
///
/// Every size, padding, and spacing property of a cell or table holds a `Value`, so a
/// property can be a literal or a formula without the solver knowing which.
///
/// - [`Value::Fixed`] is a constant. Plain `f64` converts into it.
/// - The widget-derived variants measure the cell's widget through the
///   [`Toolkit`] and resolve to `0.0` for an empty cell. They only make sense for a
///   cell; resolving them for the table fails with [`LayoutError::CellValueWithoutCell`].
/// - [`Value::PercentWidth`] and [`Value::PercentHeight`] are fractions of the table's
///   laid-out size.
/// - [`Value::PercentWidthOf`] and [`Value::PercentHeightOf`] are fractions of another
///   widget's current size.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<W> {
    /// A constant.
    Fixed(f64),
    /// Minimum width of the cell's widget.
    MinWidth,
    /// Minimum height of the cell's widget.
    MinHeight,
    /// Preferred width of the cell's widget.
    PrefWidth,
    /// Preferred height of the cell's widget.
    PrefHeight,
    /// Maximum width of the cell's widget.
    MaxWidth,
    /// Maximum height of the cell's widget.
    MaxHeight,
    /// Fraction of the table's width.
    PercentWidth(f64),
    /// Fraction of the table's height.
    PercentHeight(f64),
    /// Fraction of the given widget's width.
    PercentWidthOf(f64, W),
    /// Fraction of the given widget's height.
    PercentHeightOf(f64, W),
}

impl<W> Value<W> {
    /// The constant zero.
    pub const ZERO: Self = Self::Fixed(0.0);

    /// Returns true for the widget-derived variants, which require a cell.
    pub fn is_cell_only(&self) -> bool {
        matches!(
            self,
            Self::MinWidth
                | Self::MinHeight
                | Self::PrefWidth
                | Self::PrefHeight
                | Self::MaxWidth
                | Self::MaxHeight
        )
    }

    /// Resolve in a table context, where `table` is the table's laid-out size.
    pub fn table_value<T>(&self, toolkit: &T, table: Size) -> Result<f64, LayoutError>
    where
        T: Toolkit<Widget = W>,
    {
        if self.is_cell_only() {
            return Err(LayoutError::CellValueWithoutCell);
        }
        Ok(self.cell_value(toolkit, None, table))
    }

    /// Resolve in a cell context. `widget` is the cell's widget, if any.
    pub fn cell_value<T>(&self, toolkit: &T, widget: Option<&W>, table: Size) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        let measure = |f: fn(&T, &W) -> f64| widget.map_or(0.0, |w| f(toolkit, w));
        match self {
            Self::Fixed(v) => *v,
            Self::MinWidth => measure(T::min_width),
            Self::MinHeight => measure(T::min_height),
            Self::PrefWidth => measure(T::pref_width),
            Self::PrefHeight => measure(T::pref_height),
            Self::MaxWidth => measure(T::max_width),
            Self::MaxHeight => measure(T::max_height),
            Self::PercentWidth(p) => table.width * p,
            Self::PercentHeight(p) => table.height * p,
            Self::PercentWidthOf(p, other) => toolkit.width(other) * p,
            Self::PercentHeightOf(p, other) => toolkit.height(other) * p,
        }
    }
}

impl<W> Default for Value<W> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<W> From<f64> for Value<W> {
    fn from(v: f64) -> Self {
        Self::Fixed(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;
    impl Toolkit for Fixed {
        type Widget = u32;
        fn add_child(&mut self, _widget: &u32) {}
        fn remove_child(&mut self, _widget: &u32) {}
        fn width(&self, widget: &u32) -> f64 {
            f64::from(*widget)
        }
        fn height(&self, widget: &u32) -> f64 {
            f64::from(*widget) * 2.0
        }
        fn min_width(&self, _widget: &u32) -> f64 {
            5.0
        }
    }

    const TABLE: Size = Size::new(200.0, 100.0);

    #[test]
    fn widget_values_measure_the_cell_widget() {
        assert_eq!(Value::MinWidth.cell_value(&Fixed, Some(&40), TABLE), 5.0);
        assert_eq!(Value::PrefWidth.cell_value(&Fixed, Some(&40), TABLE), 40.0);
        assert_eq!(Value::PrefHeight.cell_value(&Fixed, Some(&40), TABLE), 80.0);
        assert_eq!(Value::MaxWidth.cell_value(&Fixed, Some(&40), TABLE), 0.0);
    }

    #[test]
    fn widget_values_are_zero_for_empty_cells() {
        assert_eq!(Value::<u32>::PrefWidth.cell_value(&Fixed, None, TABLE), 0.0);
        assert_eq!(Value::<u32>::MinHeight.cell_value(&Fixed, None, TABLE), 0.0);
    }

    #[test]
    fn widget_values_fail_without_a_cell() {
        assert_eq!(
            Value::<u32>::MinWidth.table_value(&Fixed, TABLE),
            Err(LayoutError::CellValueWithoutCell)
        );
        assert!(Value::<u32>::MaxHeight.is_cell_only());
        assert!(!Value::<u32>::PercentWidth(0.5).is_cell_only());
    }

    #[test]
    fn percent_values_use_table_or_named_widget() {
        assert_eq!(Value::PercentWidth(0.25).table_value(&Fixed, TABLE), Ok(50.0));
        assert_eq!(Value::PercentHeight(0.5).table_value(&Fixed, TABLE), Ok(50.0));
        assert_eq!(Value::PercentWidthOf(0.5, 30).table_value(&Fixed, TABLE), Ok(15.0));
        assert_eq!(
            Value::PercentHeightOf(0.5, 30).cell_value(&Fixed, Some(&1), TABLE),
            30.0
        );
    }

    #[test]
    fn literals_convert_to_fixed() {
        let v: Value<u32> = 12.5.into();
        assert_eq!(v, Value::Fixed(12.5));
        assert_eq!(Value::<u32>::default(), Value::ZERO);
    }
}
