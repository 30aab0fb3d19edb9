// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table layout for actors.
//!
//! ## Feature
//!
//! Enable with `table_adapter`.
//!
//! ## Notes
//!
//! A [`Table`] owns a group actor and a [`TableLayout`] over its children. Widgets are
//! measured by their [`SizeHints`] when published, and by their current size otherwise.
//! [`Table::validate`] arranges the children, writes their bounds, and publishes the
//! table's own hints so tables nest.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_table::{Cell, DebugLines, TableLayout, Toolkit};

use crate::{ActorId, LocalActor, SizeHints, Stage, Touchable};

/// A group actor whose children are arranged by a [`TableLayout`].
#[derive(Debug)]
pub struct Table {
    actor: ActorId,
    layout: TableLayout<ActorId>,
    debug_rects: Vec<(DebugLines, Rect)>,
}

/// The stage as seen by the layout engine, scoped to one group.
struct StageToolkit<'a> {
    stage: &'a mut Stage,
    group: ActorId,
    debug_rects: &'a mut Vec<(DebugLines, Rect)>,
}

impl Toolkit for StageToolkit<'_> {
    type Widget = ActorId;

    fn add_child(&mut self, widget: &ActorId) {
        if let Err(err) = self.stage.add_actor(self.group, *widget) {
            log::warn!("table {:?} cannot adopt {widget:?}: {err}", self.group);
        }
    }

    fn remove_child(&mut self, widget: &ActorId) {
        self.stage.remove_actor(self.group, *widget);
    }

    fn width(&self, widget: &ActorId) -> f64 {
        self.stage.local(*widget).map_or(0.0, |l| l.size.width)
    }

    fn height(&self, widget: &ActorId) -> f64 {
        self.stage.local(*widget).map_or(0.0, |l| l.size.height)
    }

    fn min_width(&self, widget: &ActorId) -> f64 {
        self.stage
            .size_hints(*widget)
            .map_or_else(|| self.width(widget), |h| h.min.width)
    }

    fn min_height(&self, widget: &ActorId) -> f64 {
        self.stage
            .size_hints(*widget)
            .map_or_else(|| self.height(widget), |h| h.min.height)
    }

    fn pref_width(&self, widget: &ActorId) -> f64 {
        self.stage
            .size_hints(*widget)
            .map_or_else(|| self.width(widget), |h| h.pref.width)
    }

    fn pref_height(&self, widget: &ActorId) -> f64 {
        self.stage
            .size_hints(*widget)
            .map_or_else(|| self.height(widget), |h| h.pref.height)
    }

    fn max_width(&self, widget: &ActorId) -> f64 {
        self.stage.size_hints(*widget).map_or(0.0, |h| h.max.width)
    }

    fn max_height(&self, widget: &ActorId) -> f64 {
        self.stage.size_hints(*widget).map_or(0.0, |h| h.max.height)
    }

    fn clear_debug_rectangles(&mut self) {
        self.debug_rects.clear();
    }

    fn add_debug_rectangle(&mut self, lines: DebugLines, rect: Rect) {
        self.debug_rects.push((lines, rect));
    }
}

impl Table {
    /// Create a table backed by a new, detached group actor.
    ///
    /// The group only lets its children be hit, like any container.
    pub fn new(stage: &mut Stage) -> Self {
        let actor = stage.create_actor(LocalActor {
            touchable: Touchable::ChildrenOnly,
            ..LocalActor::default()
        });
        Self {
            actor,
            layout: TableLayout::new(),
            debug_rects: Vec::new(),
        }
    }

    /// The group actor holding the table's children.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Add `actor` as a child of the table and append a cell for it.
    pub fn add(&mut self, stage: &mut Stage, actor: ActorId) -> &mut Cell<ActorId> {
        let mut toolkit = StageToolkit {
            stage,
            group: self.actor,
            debug_rects: &mut self.debug_rects,
        };
        self.layout.add(&mut toolkit, actor)
    }

    /// Append an empty cell.
    pub fn add_empty(&mut self) -> &mut Cell<ActorId> {
        self.layout.add_empty()
    }

    /// Start a new row; see [`TableLayout::row`].
    pub fn row(&mut self) -> &mut Cell<ActorId> {
        self.layout.row()
    }

    /// Defaults for every new cell.
    pub fn defaults(&mut self) -> &mut Cell<ActorId> {
        self.layout.defaults()
    }

    /// Defaults for new cells in `column`.
    pub fn column_defaults(&mut self, column: usize) -> &mut Cell<ActorId> {
        self.layout.column_defaults(column)
    }

    /// The underlying layout.
    pub fn layout(&self) -> &TableLayout<ActorId> {
        &self.layout
    }

    /// The underlying layout, for table-level properties such as padding and alignment.
    pub fn layout_mut(&mut self) -> &mut TableLayout<ActorId> {
        &mut self.layout
    }

    /// Detach `actor` from the table, leaving its cell empty.
    pub fn remove(&mut self, stage: &mut Stage, actor: ActorId) -> bool {
        let mut toolkit = StageToolkit {
            stage,
            group: self.actor,
            debug_rects: &mut self.debug_rects,
        };
        self.layout.remove_widget(&mut toolkit, &actor)
    }

    /// Detach every child and drop all cells.
    pub fn clear(&mut self, stage: &mut Stage) {
        let mut toolkit = StageToolkit {
            stage,
            group: self.actor,
            debug_rects: &mut self.debug_rects,
        };
        self.layout.clear(&mut toolkit);
    }

    /// Minimum size of the table.
    pub fn min_size(&mut self, stage: &mut Stage) -> Size {
        let toolkit = StageToolkit {
            stage,
            group: self.actor,
            debug_rects: &mut self.debug_rects,
        };
        Size::new(
            self.layout.min_width(&toolkit),
            self.layout.min_height(&toolkit),
        )
    }

    /// Preferred size of the table.
    pub fn pref_size(&mut self, stage: &mut Stage) -> Size {
        let toolkit = StageToolkit {
            stage,
            group: self.actor,
            debug_rects: &mut self.debug_rects,
        };
        Size::new(
            self.layout.pref_width(&toolkit),
            self.layout.pref_height(&toolkit),
        )
    }

    /// Debug rectangles from the last [`validate`](Self::validate), in the group's
    /// local space.
    pub fn debug_rects(&self) -> &[(DebugLines, Rect)] {
        &self.debug_rects
    }

    /// Lay out the children within the group's current size.
    ///
    /// Cells whose actor was removed from the group by other means are emptied. Each
    /// remaining child gets its cell's widget bounds, and the group publishes its
    /// measured min and preferred size as [`SizeHints`].
    pub fn validate(&mut self, stage: &mut Stage) {
        if stage.take_needs_layout(self.actor) {
            self.layout.invalidate();
        }
        let group = self.actor;
        let Some(size) = stage.local(group).map(|l| l.size) else {
            log::warn!("validating table on destroyed actor {group:?}");
            return;
        };

        let orphans: Vec<ActorId> = self
            .layout
            .cells()
            .iter()
            .filter_map(|c| c.widget().copied())
            .filter(|&w| stage.parent_of(w) != Some(group))
            .collect();

        let mut toolkit = StageToolkit {
            stage,
            group,
            debug_rects: &mut self.debug_rects,
        };
        for actor in orphans {
            log::debug!("table {group:?} dropping cell of departed child {actor:?}");
            self.layout.remove_widget(&mut toolkit, &actor);
        }

        self.layout
            .layout(&mut toolkit, Rect::from_origin_size(Point::ZERO, size));
        for cell in self.layout.cells() {
            if let Some(&actor) = cell.widget()
                && !cell.is_ignored()
            {
                toolkit.stage.set_bounds(actor, cell.widget_bounds());
            }
        }

        let hints = SizeHints {
            min: Size::new(
                self.layout.min_width(&toolkit),
                self.layout.min_height(&toolkit),
            ),
            pref: Size::new(
                self.layout.pref_width(&toolkit),
                self.layout.pref_height(&toolkit),
            ),
            max: Size::ZERO,
        };
        let stage = toolkit.stage;
        if stage.size_hints(group) != Some(hints) {
            stage.set_size_hints(group, Some(hints));
            // Hints were measured from this very layout.
            stage.take_needs_layout(group);
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};

    use super::Table;
    use crate::{LocalActor, SizeHints, Stage};
    use understory_table::DebugLines;

    #[test]
    fn validate_positions_children() {
        let mut stage = Stage::new(Size::new(200.0, 100.0));
        let mut table = Table::new(&mut stage);
        stage.add_to_root(table.actor()).unwrap();
        stage.set_size(table.actor(), Size::new(200.0, 50.0));

        let icon = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 40.0, 20.0)));
        let label = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 60.0, 20.0)));
        table.add(&mut stage, icon);
        table.add(&mut stage, label).expand_x().fill_x();
        assert_eq!(stage.parent_of(label), Some(table.actor()));

        table.validate(&mut stage);
        assert_eq!(stage.bounds(icon), Some(Rect::new(0.0, 15.0, 40.0, 35.0)));
        assert_eq!(stage.bounds(label), Some(Rect::new(40.0, 15.0, 200.0, 35.0)));
        assert_eq!(
            stage.size_hints(table.actor()),
            Some(SizeHints {
                min: Size::new(100.0, 20.0),
                pref: Size::new(100.0, 20.0),
                max: Size::ZERO,
            })
        );
    }

    #[test]
    fn hints_override_current_size() {
        let mut stage = Stage::new(Size::new(200.0, 100.0));
        let mut table = Table::new(&mut stage);
        let child = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 5.0, 5.0)));
        stage.set_size_hints(
            child,
            Some(SizeHints {
                min: Size::new(10.0, 10.0),
                pref: Size::new(30.0, 12.0),
                max: Size::ZERO,
            }),
        );
        table.add(&mut stage, child);
        assert_eq!(table.pref_size(&mut stage), Size::new(30.0, 12.0));
        assert_eq!(table.min_size(&mut stage), Size::new(10.0, 10.0));
    }

    #[test]
    fn departed_children_lose_their_cells() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let mut table = Table::new(&mut stage);
        let a = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        table.add(&mut stage, a);
        table.add(&mut stage, b);
        stage.add_to_root(b).unwrap();

        table.validate(&mut stage);
        assert!(table.layout().cell_of(&b).is_none());
        assert!(table.layout().cell_of(&a).is_some());
        assert_eq!(table.layout().cells().len(), 2, "the cell stays, empty");

        assert!(table.remove(&mut stage, a));
        assert_eq!(stage.parent_of(a), None);
    }

    #[test]
    fn debug_rects_are_collected() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let mut table = Table::new(&mut stage);
        stage.set_size(table.actor(), Size::new(50.0, 50.0));
        let a = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        table.add(&mut stage, a);
        table.layout_mut().debug(DebugLines::Table);
        table.validate(&mut stage);
        assert_eq!(table.debug_rects().len(), 2);
        assert!(table.debug_rects().iter().all(|(l, _)| *l == DebugLines::Table));
    }
}
