// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_stage --heading-base-level=0

//! Understory Stage: an actor tree with input routing, focus, and touch focus.
//!
//! ## Overview
//!
//! A [`Stage`] owns a tree of actors addressed by generational [`ActorId`]s. Each actor
//! has a local transform ([`LocalActor`]), a hit-testing mode ([`Touchable`]), and two
//! listener lists: one notified during capture, one during target and bubble.
//!
//! ## Routing
//!
//! - Touch-down and mouse-move are hit tested against the tree. The topmost touchable
//!   actor is the target; when nothing is hit the root receives the event.
//! - A listener that handles a touch-down gains *touch focus* for that pointer and
//!   button. Drags and the matching touch-up go to touch focus only, wherever the
//!   pointer ends up. Touch focus can be cancelled, in which case the listener receives
//!   a touch-up marked by [`InputEvent::is_touch_focus_cancel`].
//! - Keys go to the keyboard focus actor and scrolls to the scroll focus actor,
//!   falling back to the root.
//! - [`Stage::act`] computes enter and exit for the mouse and every down pointer.
//!
//! Every event fired at a target travels capture (root to target), target, then bubble
//! (parent to root). Listeners may [`stop`](Event::stop) propagation, mark the event
//! [`handled`](Event::handle), or [`cancel`](Event::cancel) it.
//!
//! ## Focus
//!
//! [`Stage::set_keyboard_focus`] and [`Stage::set_scroll_focus`] fire a [`FocusEvent`]
//! at the old and new holders. Cancelling the losing event keeps focus where it was;
//! cancelling the gaining event rolls focus back. Removing an actor from the stage
//! releases any focus held in its subtree.
//!
//! ## Layout
//!
//! With the `table_adapter` feature, [`adapters::table::Table`] lays out a group's
//! children with `understory_table`.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect, Size};
//! use understory_stage::{Event, InputEventType, LocalActor, Stage};
//!
//! let mut stage = Stage::new(Size::new(200.0, 200.0));
//! let slider = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 100.0, 20.0)));
//! stage.add_to_root(slider).unwrap();
//! stage.add_listener(
//!     slider,
//!     Rc::new(|_: &mut Stage, event: &mut Event| {
//!         event.as_input().is_some_and(|i| {
//!             matches!(i.ty, InputEventType::TouchDown | InputEventType::TouchDragged)
//!         })
//!     }),
//! );
//!
//! assert!(stage.touch_down(Point::new(10.0, 10.0), 0, 0));
//! // The drag leaves the slider but still reaches it through touch focus.
//! assert!(stage.touch_dragged(Point::new(150.0, 120.0), 0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;

mod button_group;
mod error;
mod event;
mod focus;
mod input;
mod propagation;
mod stage;
mod touch;
mod tree;
mod types;

pub use button_group::ButtonGroup;
pub use error::StageError;
pub use event::{
    Event, EventKind, EventListener, FocusEvent, FocusKind, InputEvent, InputEventType, Listener,
};
pub use propagation::Phase;
pub use stage::Stage;
pub use types::{ActorId, LocalActor, MAX_POINTERS, SizeHints, Touchable};
