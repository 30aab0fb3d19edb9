// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage: actor storage, pointer state, and focus state.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect, Size};

use crate::touch::TouchFocus;
use crate::tree::ActorNode;
use crate::{ActorId, LocalActor, MAX_POINTERS, Touchable};

/// A tree of actors rooted at a group, plus the input routing state around it.
///
/// The stage owns every actor. Actors are created detached with
/// [`create_actor`](Self::create_actor) and take part in input once they are added
/// under [`root`](Self::root). Raw input enters through methods such as
/// [`touch_down`](Self::touch_down) and is routed to listeners by hit testing, touch
/// focus, or keyboard and scroll focus. Enter and exit notifications are computed in
/// [`act`](Self::act), once per frame.
///
/// ## Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use kurbo::{Point, Rect, Size};
/// use understory_stage::{Event, LocalActor, Stage};
///
/// let mut stage = Stage::new(Size::new(100.0, 100.0));
/// let button = stage.create_actor(LocalActor::with_bounds(Rect::new(10.0, 10.0, 50.0, 30.0)));
/// stage.add_to_root(button).unwrap();
///
/// let clicks = Rc::new(Cell::new(0));
/// let seen = clicks.clone();
/// stage.add_listener(
///     button,
///     Rc::new(move |_: &mut Stage, _: &mut Event| {
///         seen.set(seen.get() + 1);
///         true
///     }),
/// );
///
/// assert!(stage.touch_down(Point::new(20.0, 20.0), 0, 0));
/// assert!(!stage.touch_down(Point::new(90.0, 90.0), 1, 0));
/// assert_eq!(clicks.get(), 1);
/// ```
pub struct Stage {
    /// slots
    pub(crate) nodes: Vec<Option<ActorNode>>,
    /// last generation per slot (persists across frees)
    pub(crate) generations: Vec<u32>,
    pub(crate) free_list: Vec<usize>,
    root: ActorId,
    viewport: Size,
    screen_to_stage: Affine,
    pub(crate) pointer_touched: [bool; MAX_POINTERS],
    pub(crate) pointer_screen: [Point; MAX_POINTERS],
    pub(crate) pointer_over: [Option<ActorId>; MAX_POINTERS],
    pub(crate) mouse_screen: Point,
    pub(crate) mouse_over: Option<ActorId>,
    pub(crate) keyboard_focus: Option<ActorId>,
    pub(crate) scroll_focus: Option<ActorId>,
    pub(crate) touch_focuses: Vec<TouchFocus>,
    pub(crate) next_touch_serial: u64,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Stage")
            .field("actors_total", &total)
            .field("actors_alive", &alive)
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("keyboard_focus", &self.keyboard_focus)
            .field("scroll_focus", &self.scroll_focus)
            .field("touch_focuses", &self.touch_focuses.len())
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Create a stage whose viewport spans `viewport` in stage coordinates.
    ///
    /// Screen coordinates map to stage coordinates through the identity until
    /// [`set_viewport_transform`](Self::set_viewport_transform) says otherwise.
    pub fn new(viewport: Size) -> Self {
        let mut stage = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ActorId::new(0, 1),
            viewport,
            screen_to_stage: Affine::IDENTITY,
            pointer_touched: [false; MAX_POINTERS],
            pointer_screen: [Point::ZERO; MAX_POINTERS],
            pointer_over: [None; MAX_POINTERS],
            mouse_screen: Point::ZERO,
            mouse_over: None,
            keyboard_focus: None,
            scroll_focus: None,
            touch_focuses: Vec::new(),
            next_touch_serial: 0,
        };
        stage.root = stage.create_actor(LocalActor::default());
        stage.set_on_stage(stage.root, true);
        stage
    }

    /// The root group. It is never destroyed.
    pub fn root(&self) -> ActorId {
        self.root
    }

    /// Size of the visible area in stage coordinates.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the visible area.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The screen to stage mapping.
    pub fn viewport_transform(&self) -> Affine {
        self.screen_to_stage
    }

    /// Set the screen to stage mapping.
    pub fn set_viewport_transform(&mut self, screen_to_stage: Affine) {
        self.screen_to_stage = screen_to_stage;
    }

    /// Map a screen point to stage coordinates.
    pub fn screen_to_stage(&self, screen: Point) -> Point {
        self.screen_to_stage * screen
    }

    /// Map a stage point to screen coordinates.
    pub fn stage_to_screen(&self, stage: Point) -> Point {
        self.screen_to_stage.inverse() * stage
    }

    pub(crate) fn is_inside_viewport(&self, screen: Point) -> bool {
        Rect::from_origin_size(Point::ZERO, self.viewport).contains(self.screen_to_stage(screen))
    }

    /// Add `actor` as the last child of the root.
    pub fn add_to_root(&mut self, actor: ActorId) -> Result<(), crate::StageError> {
        let root = self.root;
        self.add_actor(root, actor)
    }

    /// The topmost touchable actor at `point` in stage coordinates.
    ///
    /// With `touchable` false, disabled actors are hit too.
    pub fn hit(&self, point: Point, touchable: bool) -> Option<ActorId> {
        let local = self.stage_to_local(self.root, point)?;
        self.hit_actor(self.root, local, touchable)
    }

    /// Drop focus, then remove every child of the root.
    pub fn clear(&mut self) {
        self.unfocus_all();
        let root = self.root;
        self.clear_children(root);
    }

    /// Whether `pointer` is currently down.
    pub fn is_touched(&self, pointer: usize) -> bool {
        self.pointer_touched[pointer]
    }

    /// Whether any pointer is down.
    pub fn is_any_touched(&self) -> bool {
        self.pointer_touched.iter().any(|&t| t)
    }

    /// The actor `pointer` was over at the last [`act`](Self::act).
    pub fn pointer_over(&self, pointer: usize) -> Option<ActorId> {
        self.pointer_over[pointer]
    }

    /// The actor the mouse was over at the last [`act`](Self::act).
    pub fn mouse_over(&self) -> Option<ActorId> {
        self.mouse_over
    }

    pub(crate) fn root_is_touchable(&self) -> bool {
        self.node(self.root)
            .is_some_and(|n| n.local.touchable == Touchable::Enabled)
    }
}
