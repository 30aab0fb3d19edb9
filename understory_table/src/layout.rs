// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The table solver: grid construction, measurement, and arrangement.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Insets, Rect, Size};

use crate::{Align, Cell, DebugLines, LayoutError, Toolkit, Value};

/// A grid of cells, each holding at most one widget.
///
/// Cells are appended left to right with [`add`](Self::add) and rows are closed with
/// [`row`](Self::row). The grid does not have to be rectangular: a row may cover fewer
/// columns than the widest row, and missing slots contribute no size.
///
/// Each new cell starts from [`defaults`](Self::defaults), then takes the properties set
/// on its [`column_defaults`](Self::column_defaults), then those set on the current row's
/// defaults, and finally whatever the caller sets on the returned cell.
///
/// Measurement ([`compute_size`](Self::compute_size)) is lazy and cached until something
/// calls [`invalidate`](Self::invalidate). [`layout`](Self::layout) arranges the cells
/// inside a box and writes each cell's widget geometry.
pub struct TableLayout<W> {
    cells: Vec<Cell<W>>,
    cell_defaults: Cell<W>,
    row_defaults: Cell<W>,
    column_defaults: Vec<Option<Cell<W>>>,
    columns: usize,
    rows: usize,
    /// The last row was closed by `compute_size` rather than by the caller.
    implicit_end_row: bool,
    size_invalid: bool,
    pad_top: Value<W>,
    pad_left: Value<W>,
    pad_bottom: Value<W>,
    pad_right: Value<W>,
    align: Align,
    debug: DebugLines,
    bounds: Rect,
    column_min_width: Vec<f64>,
    column_pref_width: Vec<f64>,
    row_min_height: Vec<f64>,
    row_pref_height: Vec<f64>,
    column_width: Vec<f64>,
    row_height: Vec<f64>,
    expand_width: Vec<u32>,
    expand_height: Vec<u32>,
    table_min: Size,
    table_pref: Size,
}

impl<W> fmt::Debug for TableLayout<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableLayout")
            .field("cells", &self.cells.len())
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("size_invalid", &self.size_invalid)
            .field("align", &self.align)
            .field("debug", &self.debug)
            .field("bounds", &self.bounds)
            .field("table_min", &self.table_min)
            .field("table_pref", &self.table_pref)
            .finish_non_exhaustive()
    }
}

impl<W: Clone + PartialEq> Default for TableLayout<W> {
    fn default() -> Self {
        Self::new()
    }
}

fn table_only<W>(value: Value<W>) -> Result<Value<W>, LayoutError> {
    if value.is_cell_only() {
        return Err(LayoutError::CellValueWithoutCell);
    }
    Ok(value)
}

fn zeroed<T: Copy + Default>(values: &mut Vec<T>, len: usize) {
    values.clear();
    values.resize(len, T::default());
}

fn span_sum(values: &[f64], start: usize, span: usize) -> f64 {
    values.iter().skip(start).take(span).sum()
}

/// Interpolate each track between its min and pref size by its share of the total growth.
fn weighted(min: &[f64], pref: &[f64], grow: f64, available: f64) -> Vec<f64> {
    if grow <= 0.0 {
        return min.to_vec();
    }
    let extra = grow.min(available.max(0.0));
    min.iter()
        .zip(pref)
        .map(|(&min, &pref)| min + extra * (pref - min) / grow)
        .collect()
}

/// Hand leftover space to expanding tracks by weight; the last expander takes the remainder.
fn distribute_expand(sizes: &mut [f64], weights: &[u32], available: f64) {
    let total: f64 = weights.iter().map(|&w| f64::from(w)).sum();
    if total <= 0.0 {
        return;
    }
    let extra = available - sizes.iter().sum::<f64>();
    if extra <= 0.0 {
        return;
    }
    let mut used = 0.0;
    let mut last = None;
    for (i, (size, &weight)) in sizes.iter_mut().zip(weights).enumerate() {
        if weight == 0 {
            continue;
        }
        let amount = extra * f64::from(weight) / total;
        *size += amount;
        used += amount;
        last = Some(i);
    }
    if let Some(last) = last {
        sizes[last] += extra - used;
    }
}

impl<W: Clone + PartialEq> TableLayout<W> {
    /// Create an empty table with the global cell defaults.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            cell_defaults: Cell::with_defaults(),
            row_defaults: Cell::new(None),
            column_defaults: Vec::new(),
            columns: 0,
            rows: 0,
            implicit_end_row: false,
            size_invalid: true,
            pad_top: Value::ZERO,
            pad_left: Value::ZERO,
            pad_bottom: Value::ZERO,
            pad_right: Value::ZERO,
            align: Align::CENTER,
            debug: DebugLines::None,
            bounds: Rect::ZERO,
            column_min_width: Vec::new(),
            column_pref_width: Vec::new(),
            row_min_height: Vec::new(),
            row_pref_height: Vec::new(),
            column_width: Vec::new(),
            row_height: Vec::new(),
            expand_width: Vec::new(),
            expand_height: Vec::new(),
            table_min: Size::ZERO,
            table_pref: Size::ZERO,
        }
    }

    /// Attach `widget` through the toolkit and append a cell for it.
    pub fn add<T>(&mut self, toolkit: &mut T, widget: W) -> &mut Cell<W>
    where
        T: Toolkit<Widget = W>,
    {
        toolkit.add_child(&widget);
        self.push_cell(Some(widget))
    }

    /// Append a cell without a widget.
    pub fn add_empty(&mut self) -> &mut Cell<W> {
        self.push_cell(None)
    }

    fn push_cell(&mut self, widget: Option<W>) -> &mut Cell<W> {
        if self.implicit_end_row {
            self.implicit_end_row = false;
            self.rows -= 1;
            if let Some(last) = self.cells.last_mut() {
                last.end_row = false;
            }
        }

        let mut cell = Cell::new(widget);
        if let Some(last) = self.cells.last_mut() {
            last.frozen = true;
            if last.end_row {
                cell.column = 0;
                cell.row = last.row + 1;
            } else {
                cell.column = last.column + last.span();
                cell.row = last.row;
            }
        }
        if cell.row > 0 {
            let column = cell.column;
            cell.cell_above = self
                .cells
                .iter()
                .rposition(|other| other.column <= column && column < other.column + other.span());
        }

        cell.set(&self.cell_defaults);
        if let Some(Some(column_cell)) = self.column_defaults.get(cell.column) {
            cell.merge(column_cell);
        }
        cell.merge(&self.row_defaults);

        self.invalidate();
        self.cells.push(cell);
        let index = self.cells.len() - 1;
        &mut self.cells[index]
    }

    /// Close the current row and return fresh defaults for the next one.
    ///
    /// Calling this when the row is already closed only replaces the row defaults.
    pub fn row(&mut self) -> &mut Cell<W> {
        if !self.cells.is_empty() {
            if !self.implicit_end_row && !self.cells.last().is_some_and(|c| c.end_row) {
                self.end_row();
            }
            self.invalidate();
        }
        self.implicit_end_row = false;
        self.row_defaults = Cell::new(None);
        &mut self.row_defaults
    }

    fn end_row(&mut self) {
        let mut row_columns = 0;
        for cell in self.cells.iter_mut().rev() {
            if cell.end_row {
                break;
            }
            cell.frozen = true;
            row_columns += cell.span();
        }
        self.columns = self.columns.max(row_columns);
        self.rows += 1;
        if let Some(last) = self.cells.last_mut() {
            last.end_row = true;
        }
    }

    /// The defaults cell for `column`, created on first use.
    pub fn column_defaults(&mut self, column: usize) -> &mut Cell<W> {
        if self.column_defaults.len() <= column {
            self.column_defaults.resize_with(column + 1, || None);
        }
        self.column_defaults[column].get_or_insert_with(|| Cell::new(None))
    }

    /// The global defaults applied to every new cell.
    pub fn defaults(&mut self) -> &mut Cell<W> {
        &mut self.cell_defaults
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> &[Cell<W>] {
        &self.cells
    }

    /// The cell holding `widget`.
    pub fn cell_of(&self, widget: &W) -> Option<&Cell<W>> {
        self.cells.iter().find(|c| c.widget.as_ref() == Some(widget))
    }

    /// The cell holding `widget`, for reconfiguration.
    pub fn cell_of_mut(&mut self, widget: &W) -> Option<&mut Cell<W>> {
        self.invalidate();
        self.cells
            .iter_mut()
            .find(|c| c.widget.as_ref() == Some(widget))
    }

    /// Detach `widget` and leave its cell empty. Returns false if no cell holds it.
    pub fn remove_widget<T>(&mut self, toolkit: &mut T, widget: &W) -> bool
    where
        T: Toolkit<Widget = W>,
    {
        let Some(cell) = self
            .cells
            .iter_mut()
            .find(|c| c.widget.as_ref() == Some(widget))
        else {
            return false;
        };
        if let Some(w) = cell.take_widget() {
            toolkit.remove_child(&w);
        }
        self.invalidate();
        true
    }

    /// Detach every widget and drop all cells. Table properties are kept.
    pub fn clear<T>(&mut self, toolkit: &mut T)
    where
        T: Toolkit<Widget = W>,
    {
        for cell in self.cells.iter_mut().rev() {
            if let Some(w) = cell.take_widget() {
                toolkit.remove_child(&w);
            }
        }
        self.cells.clear();
        self.rows = 0;
        self.columns = 0;
        self.row_defaults = Cell::new(None);
        self.implicit_end_row = false;
        self.invalidate();
    }

    /// [`clear`](Self::clear), then restore the table properties and all defaults.
    pub fn reset<T>(&mut self, toolkit: &mut T)
    where
        T: Toolkit<Widget = W>,
    {
        self.clear(toolkit);
        self.pad_top = Value::ZERO;
        self.pad_left = Value::ZERO;
        self.pad_bottom = Value::ZERO;
        self.pad_right = Value::ZERO;
        self.align = Align::CENTER;
        self.debug = DebugLines::None;
        self.cell_defaults = Cell::with_defaults();
        self.column_defaults.clear();
    }

    /// Drop the cached measurement.
    pub fn invalidate(&mut self) {
        self.size_invalid = true;
    }

    /// Whether the next query will recompute the measurement.
    pub fn is_invalid(&self) -> bool {
        self.size_invalid
    }

    /// Set the table padding on all four sides.
    pub fn pad(&mut self, pad: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        let pad = table_only(pad.into())?;
        self.pad_top = pad.clone();
        self.pad_left = pad.clone();
        self.pad_bottom = pad.clone();
        self.pad_right = pad;
        self.invalidate();
        Ok(self)
    }

    /// Set the top table padding.
    pub fn pad_top(&mut self, pad: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.pad_top = table_only(pad.into())?;
        self.invalidate();
        Ok(self)
    }

    /// Set the left table padding.
    pub fn pad_left(&mut self, pad: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.pad_left = table_only(pad.into())?;
        self.invalidate();
        Ok(self)
    }

    /// Set the bottom table padding.
    pub fn pad_bottom(&mut self, pad: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.pad_bottom = table_only(pad.into())?;
        self.invalidate();
        Ok(self)
    }

    /// Set the right table padding.
    pub fn pad_right(&mut self, pad: impl Into<Value<W>>) -> Result<&mut Self, LayoutError> {
        self.pad_right = table_only(pad.into())?;
        self.invalidate();
        Ok(self)
    }

    /// Set how the table sits inside its layout box.
    pub fn align(&mut self, align: Align) -> &mut Self {
        self.align = align;
        self
    }

    /// Center the table in its layout box.
    pub fn center(&mut self) -> &mut Self {
        self.align(Align::CENTER)
    }

    /// Align the table to the top of its layout box.
    pub fn top(&mut self) -> &mut Self {
        self.align = self.align.with_edge(Align::TOP);
        self
    }

    /// Align the table to the bottom of its layout box.
    pub fn bottom(&mut self) -> &mut Self {
        self.align = self.align.with_edge(Align::BOTTOM);
        self
    }

    /// Align the table to the left of its layout box.
    pub fn left(&mut self) -> &mut Self {
        self.align = self.align.with_edge(Align::LEFT);
        self
    }

    /// Align the table to the right of its layout box.
    pub fn right(&mut self) -> &mut Self {
        self.align = self.align.with_edge(Align::RIGHT);
        self
    }

    /// Choose which debug rectangles `layout` reports.
    pub fn debug(&mut self, debug: DebugLines) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Current table alignment.
    pub fn alignment(&self) -> Align {
        self.align
    }

    /// Current debug mode.
    pub fn debug_lines(&self) -> DebugLines {
        self.debug
    }

    /// Number of columns of the widest row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of closed rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The box passed to the last [`layout`](Self::layout).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Minimum table width, padding included.
    pub fn min_width<T>(&mut self, toolkit: &T) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        self.measured(toolkit).0.width
    }

    /// Minimum table height, padding included.
    pub fn min_height<T>(&mut self, toolkit: &T) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        self.measured(toolkit).0.height
    }

    /// Preferred table width, padding included. Never less than the minimum.
    pub fn pref_width<T>(&mut self, toolkit: &T) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        self.measured(toolkit).1.width
    }

    /// Preferred table height, padding included. Never less than the minimum.
    pub fn pref_height<T>(&mut self, toolkit: &T) -> f64
    where
        T: Toolkit<Widget = W>,
    {
        self.measured(toolkit).1.height
    }

    fn measured<T>(&mut self, toolkit: &T) -> (Size, Size)
    where
        T: Toolkit<Widget = W>,
    {
        if self.size_invalid {
            self.compute_size(toolkit);
        }
        (self.table_min, self.table_pref)
    }

    /// Minimum width of `column` from the last measurement.
    pub fn column_min_width(&self, column: usize) -> f64 {
        self.column_min_width.get(column).copied().unwrap_or(0.0)
    }

    /// Preferred width of `column` from the last measurement.
    pub fn column_pref_width(&self, column: usize) -> f64 {
        self.column_pref_width.get(column).copied().unwrap_or(0.0)
    }

    /// Minimum height of `row` from the last measurement.
    pub fn row_min_height(&self, row: usize) -> f64 {
        self.row_min_height.get(row).copied().unwrap_or(0.0)
    }

    /// Preferred height of `row` from the last measurement.
    pub fn row_pref_height(&self, row: usize) -> f64 {
        self.row_pref_height.get(row).copied().unwrap_or(0.0)
    }

    /// Width of `column` from the last layout.
    pub fn column_width(&self, column: usize) -> f64 {
        self.column_width.get(column).copied().unwrap_or(0.0)
    }

    /// Height of `row` from the last layout.
    pub fn row_height(&self, row: usize) -> f64 {
        self.row_height.get(row).copied().unwrap_or(0.0)
    }

    fn table_padding<T>(&self, toolkit: &T) -> Insets
    where
        T: Toolkit<Widget = W>,
    {
        let table = self.bounds.size();
        let resolve = |v: &Value<W>| v.cell_value(toolkit, None, table);
        Insets::new(
            resolve(&self.pad_left),
            resolve(&self.pad_top),
            resolve(&self.pad_right),
            resolve(&self.pad_bottom),
        )
    }

    /// Measure every column and row, and the table's min and preferred size.
    ///
    /// An unfinished last row is closed for measurement; adding another cell reopens it.
    pub fn compute_size<T>(&mut self, toolkit: &T)
    where
        T: Toolkit<Widget = W>,
    {
        self.size_invalid = false;
        if self.cells.last().is_some_and(|c| !c.end_row) {
            self.end_row();
            self.implicit_end_row = true;
        }

        let columns = self.columns;
        let rows = self.rows;
        let table = self.bounds.size();
        zeroed(&mut self.column_min_width, columns);
        zeroed(&mut self.column_pref_width, columns);
        zeroed(&mut self.row_min_height, rows);
        zeroed(&mut self.row_pref_height, rows);
        zeroed(&mut self.column_width, columns);
        zeroed(&mut self.row_height, rows);
        zeroed(&mut self.expand_width, columns);
        zeroed(&mut self.expand_height, rows);

        let mut space_right_last = 0.0;
        for i in 0..self.cells.len() {
            if self.cells[i].is_ignored() {
                continue;
            }
            let above_space_bottom = self.cells[i].cell_above.map(|above| {
                let above = &self.cells[above];
                above.resolve(&above.props.space_bottom, toolkit, table)
            });
            let c = &mut self.cells[i];
            let (column, row, span) = (c.column, c.row, c.span());

            let expand_y = c.expand_y_weight();
            if expand_y != 0 && self.expand_height[row] == 0 {
                self.expand_height[row] = expand_y;
            }
            let expand_x = c.expand_x_weight();
            if span == 1 && expand_x != 0 && self.expand_width[column] == 0 {
                self.expand_width[column] = expand_x;
            }

            // Spacing between neighbors is the larger of the two, and zero at the edges.
            let p = &c.props;
            let space_left = c.resolve(&p.space_left, toolkit, table);
            let space_right = c.resolve(&p.space_right, toolkit, table);
            let space_top = c.resolve(&p.space_top, toolkit, table);
            let space_bottom = c.resolve(&p.space_bottom, toolkit, table);
            let left = c.resolve(&p.pad_left, toolkit, table)
                + if column == 0 {
                    0.0
                } else {
                    (space_left - space_right_last).max(0.0)
                };
            let top = c.resolve(&p.pad_top, toolkit, table)
                + above_space_bottom.map_or(0.0, |below| (space_top - below).max(0.0));
            let right = c.resolve(&p.pad_right, toolkit, table)
                + if column + span == columns {
                    0.0
                } else {
                    space_right
                };
            let bottom = c.resolve(&p.pad_bottom, toolkit, table)
                + if row + 1 == rows { 0.0 } else { space_bottom };
            c.computed_pad = Insets::new(left, top, right, bottom);
            space_right_last = space_right;

            let k = c.constraints(toolkit, table);
            if span == 1 {
                let hpad = left + right;
                let min = &mut self.column_min_width[column];
                *min = min.max(k.min.width + hpad);
                let pref = &mut self.column_pref_width[column];
                *pref = pref.max(k.pref.width + hpad);
            }
            let vpad = top + bottom;
            let min = &mut self.row_min_height[row];
            *min = min.max(k.min.height + vpad);
            let pref = &mut self.row_pref_height[row];
            *pref = pref.max(k.pref.height + vpad);
        }

        // A spanning cell that expands marks all its columns when none of them expands.
        for c in self.cells.iter().filter(|c| !c.is_ignored()) {
            let expand_x = c.expand_x_weight();
            if expand_x == 0 {
                continue;
            }
            let spanned = c.column..(c.column + c.span()).min(columns);
            if self.expand_width[spanned.clone()].iter().all(|&e| e == 0) {
                for e in &mut self.expand_width[spanned] {
                    *e = expand_x;
                }
            }
        }

        for c in self.cells.iter().filter(|c| !c.is_ignored() && c.span() > 1) {
            let (column, span) = (c.column, c.span());
            let k = c.constraints(toolkit, table);
            let hpad = c.computed_pad.x0 + c.computed_pad.x1;
            let spanned_min = span_sum(&self.column_min_width, column, span) - hpad;
            let spanned_pref = span_sum(&self.column_pref_width, column, span) - hpad;
            let extra_min = (k.min.width - spanned_min).max(0.0);
            let extra_pref = (k.pref.width - spanned_pref).max(0.0);
            let total_expand: f64 = self
                .expand_width
                .iter()
                .skip(column)
                .take(span)
                .map(|&e| f64::from(e))
                .sum();
            for i in column..(column + span).min(columns) {
                let ratio = if total_expand == 0.0 {
                    1.0 / span as f64
                } else {
                    f64::from(self.expand_width[i]) / total_expand
                };
                self.column_min_width[i] += extra_min * ratio;
                self.column_pref_width[i] += extra_pref * ratio;
            }
        }

        let mut uniform_min = Size::ZERO;
        let mut uniform_pref = Size::ZERO;
        for c in self.cells.iter().filter(|c| !c.is_ignored()) {
            let pad = c.computed_pad;
            if c.is_uniform_x() && c.span() == 1 {
                let hpad = pad.x0 + pad.x1;
                uniform_min.width = uniform_min.width.max(self.column_min_width[c.column] - hpad);
                uniform_pref.width =
                    uniform_pref.width.max(self.column_pref_width[c.column] - hpad);
            }
            if c.is_uniform_y() {
                let vpad = pad.y0 + pad.y1;
                uniform_min.height = uniform_min.height.max(self.row_min_height[c.row] - vpad);
                uniform_pref.height =
                    uniform_pref.height.max(self.row_pref_height[c.row] - vpad);
            }
        }
        if uniform_pref.width > 0.0 || uniform_pref.height > 0.0 {
            for c in self.cells.iter().filter(|c| !c.is_ignored()) {
                let pad = c.computed_pad;
                if uniform_pref.width > 0.0 && c.is_uniform_x() && c.span() == 1 {
                    let hpad = pad.x0 + pad.x1;
                    self.column_min_width[c.column] = uniform_min.width + hpad;
                    self.column_pref_width[c.column] = uniform_pref.width + hpad;
                }
                if uniform_pref.height > 0.0 && c.is_uniform_y() {
                    let vpad = pad.y0 + pad.y1;
                    self.row_min_height[c.row] = uniform_min.height + vpad;
                    self.row_pref_height[c.row] = uniform_pref.height + vpad;
                }
            }
        }

        for (pref, &min) in self.column_pref_width.iter_mut().zip(&self.column_min_width) {
            *pref = pref.max(min);
        }
        for (pref, &min) in self.row_pref_height.iter_mut().zip(&self.row_min_height) {
            *pref = pref.max(min);
        }

        let pad = self.table_padding(toolkit);
        let hpad = pad.x0 + pad.x1;
        let vpad = pad.y0 + pad.y1;
        let min_width = hpad + self.column_min_width.iter().sum::<f64>();
        let pref_width = hpad + self.column_pref_width.iter().sum::<f64>();
        let min_height = vpad + self.row_min_height.iter().sum::<f64>();
        let pref_height = vpad
            + self
                .row_min_height
                .iter()
                .zip(&self.row_pref_height)
                .map(|(&min, &pref)| min.max(pref))
                .sum::<f64>();
        self.table_min = Size::new(min_width, min_height);
        self.table_pref = Size::new(pref_width.max(min_width), pref_height.max(min_height));

        log::debug!(
            "table measured: {columns}x{rows} grid, min {:?}, pref {:?}",
            self.table_min,
            self.table_pref
        );
    }

    /// Arrange the cells inside `bounds` and write each cell's widget geometry.
    ///
    /// Measurement is redone first if it is stale or if the box size changed, since
    /// percent values depend on it. Repeated calls with the same box and unchanged cells
    /// produce identical geometry.
    pub fn layout<T>(&mut self, toolkit: &mut T, bounds: Rect)
    where
        T: Toolkit<Widget = W>,
    {
        if self.bounds.size() != bounds.size() {
            self.size_invalid = true;
        }
        self.bounds = bounds;
        if self.size_invalid {
            self.compute_size(&*toolkit);
        }
        toolkit.clear_debug_rectangles();

        let table = bounds.size();
        let pad = self.table_padding(&*toolkit);
        let hpad = pad.x0 + pad.x1;
        let vpad = pad.y0 + pad.y1;

        let column_weighted = weighted(
            &self.column_min_width,
            &self.column_pref_width,
            self.table_pref.width - self.table_min.width,
            bounds.width() - self.table_min.width,
        );
        let row_weighted = weighted(
            &self.row_min_height,
            &self.row_pref_height,
            self.table_pref.height - self.table_min.height,
            bounds.height() - self.table_min.height,
        );

        zeroed(&mut self.column_width, self.columns);
        zeroed(&mut self.row_height, self.rows);
        for c in self.cells.iter_mut().filter(|c| !c.is_ignored()) {
            let (column, row, span) = (c.column, c.row, c.span());
            let spanned_width = span_sum(&column_weighted, column, span);
            let weighted_height = row_weighted.get(row).copied().unwrap_or(0.0);
            let k = c.constraints(&*toolkit, table);
            let pad = c.computed_pad;
            c.widget_width = (spanned_width - pad.x0 - pad.x1).min(k.pref.width);
            c.widget_height = (weighted_height - pad.y0 - pad.y1).min(k.pref.height);
            if span == 1 {
                let width = &mut self.column_width[column];
                *width = width.max(spanned_width);
            }
            let height = &mut self.row_height[row];
            *height = height.max(weighted_height);
        }

        distribute_expand(&mut self.column_width, &self.expand_width, bounds.width() - hpad);
        distribute_expand(&mut self.row_height, &self.expand_height, bounds.height() - vpad);

        for c in self.cells.iter().filter(|c| !c.is_ignored() && c.span() > 1) {
            let (column, span) = (c.column, c.span());
            let excess: f64 = column_weighted
                .iter()
                .zip(&self.column_width)
                .skip(column)
                .take(span)
                .map(|(weighted, width)| weighted - width)
                .sum();
            let excess =
                (excess - (c.computed_pad.x0 + c.computed_pad.x1).max(0.0)) / span as f64;
            if excess > 0.0 {
                for width in self.column_width.iter_mut().skip(column).take(span) {
                    *width += excess;
                }
            }
        }

        let table_width = hpad + self.column_width.iter().sum::<f64>();
        let table_height = vpad + self.row_height.iter().sum::<f64>();
        let mut x = bounds.x0 + pad.x0;
        if self.align.contains(Align::RIGHT) {
            x += bounds.width() - table_width;
        } else if !self.align.contains(Align::LEFT) {
            x += (bounds.width() - table_width) / 2.0;
        }
        let mut y = bounds.y0 + pad.y0;
        if self.align.contains(Align::BOTTOM) {
            y += bounds.height() - table_height;
        } else if !self.align.contains(Align::TOP) {
            y += (bounds.height() - table_height) / 2.0;
        }

        let debug = self.debug;
        if debug.shows(DebugLines::Table) {
            toolkit.add_debug_rectangle(DebugLines::Table, bounds);
            toolkit.add_debug_rectangle(
                DebugLines::Table,
                Rect::from_origin_size((x, y), (table_width - hpad, table_height - vpad)),
            );
        }

        let (mut cx, mut cy) = (x, y);
        for c in &mut self.cells {
            if c.is_ignored() {
                if c.end_row {
                    cx = x;
                    cy += self.row_height.get(c.row).copied().unwrap_or(0.0);
                }
                continue;
            }
            let row_height = self.row_height.get(c.row).copied().unwrap_or(0.0);
            let pad = c.computed_pad;
            let spanned = span_sum(&self.column_width, c.column, c.span()) - pad.x0 - pad.x1;
            cx += pad.x0;

            let k = c.constraints(&*toolkit, table);
            let fill_x = c.fill_x_ratio();
            if fill_x > 0.0 {
                c.widget_width = (spanned * fill_x).max(k.min.width);
                if k.max.width > 0.0 {
                    c.widget_width = c.widget_width.min(k.max.width);
                }
            }
            let fill_y = c.fill_y_ratio();
            if fill_y > 0.0 {
                c.widget_height = (row_height * fill_y - pad.y0 - pad.y1).max(k.min.height);
                if k.max.height > 0.0 {
                    c.widget_height = c.widget_height.min(k.max.height);
                }
            }

            let align = c.alignment();
            c.widget_x = if align.contains(Align::LEFT) {
                cx
            } else if align.contains(Align::RIGHT) {
                cx + spanned - c.widget_width
            } else {
                cx + (spanned - c.widget_width) / 2.0
            };
            c.widget_y = if align.contains(Align::TOP) {
                cy + pad.y0
            } else if align.contains(Align::BOTTOM) {
                cy + row_height - c.widget_height - pad.y1
            } else {
                cy + (row_height - c.widget_height + pad.y0 - pad.y1) / 2.0
            };

            if debug.shows(DebugLines::Cell) {
                toolkit.add_debug_rectangle(
                    DebugLines::Cell,
                    Rect::from_origin_size(
                        (cx, cy + pad.y0),
                        (spanned, row_height - pad.y0 - pad.y1),
                    ),
                );
            }
            if debug.shows(DebugLines::Widget) {
                toolkit.add_debug_rectangle(DebugLines::Widget, c.widget_bounds());
            }

            if c.end_row {
                cx = x;
                cy += row_height;
            } else {
                cx += spanned + pad.x1;
            }
        }
    }
}
