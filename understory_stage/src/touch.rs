// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch focus: sticky routing of drags and touch-ups to the listener that took the down.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::event::{Listener, same_listener};
use crate::{ActorId, Event, InputEvent, InputEventType, Phase, Stage};

/// One listener's claim on a pointer and button.
#[derive(Clone)]
pub(crate) struct TouchFocus {
    /// Distinguishes claims in snapshots taken before listeners run.
    pub(crate) serial: u64,
    pub(crate) listener: Listener,
    pub(crate) listener_actor: ActorId,
    pub(crate) target: ActorId,
    pub(crate) pointer: usize,
    pub(crate) button: u8,
}

impl fmt::Debug for TouchFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchFocus")
            .field("serial", &self.serial)
            .field("listener_actor", &self.listener_actor)
            .field("target", &self.target)
            .field("pointer", &self.pointer)
            .field("button", &self.button)
            .finish_non_exhaustive()
    }
}

impl TouchFocus {
    fn is(
        &self,
        listener: &Listener,
        listener_actor: ActorId,
        target: ActorId,
        pointer: usize,
        button: u8,
    ) -> bool {
        same_listener(&self.listener, listener)
            && self.listener_actor == listener_actor
            && self.target == target
            && self.pointer == pointer
            && self.button == button
    }
}

/// Stage position of the touch-up synthesized when touch focus is cancelled.
pub(crate) const CANCEL_POSITION: Point = Point::new(f64::MIN, f64::MIN);

impl Stage {
    /// Route later drags and the touch-up of `pointer` and `button` to `listener`.
    ///
    /// An identical existing claim is replaced, so each claim exists at most once.
    pub fn add_touch_focus(
        &mut self,
        listener: Listener,
        listener_actor: ActorId,
        target: ActorId,
        pointer: usize,
        button: u8,
    ) {
        self.remove_touch_focus(&listener, listener_actor, target, pointer, button);
        let serial = self.next_touch_serial;
        self.next_touch_serial += 1;
        log::trace!("touch focus on pointer {pointer} for {listener_actor:?}");
        self.touch_focuses.push(TouchFocus {
            serial,
            listener,
            listener_actor,
            target,
            pointer,
            button,
        });
    }

    /// Drop a claim without notifying its listener. Returns whether it existed.
    pub fn remove_touch_focus(
        &mut self,
        listener: &Listener,
        listener_actor: ActorId,
        target: ActorId,
        pointer: usize,
        button: u8,
    ) -> bool {
        let before = self.touch_focuses.len();
        self.touch_focuses
            .retain(|f| !f.is(listener, listener_actor, target, pointer, button));
        self.touch_focuses.len() != before
    }

    /// Number of active claims.
    pub fn touch_focus_count(&self) -> usize {
        self.touch_focuses.len()
    }

    /// Cancel the claims of listeners on `actor` or inside its subtree.
    ///
    /// Each cancelled listener receives a touch-up at an out-of-bounds stage position
    /// (see [`InputEvent::is_touch_focus_cancel`]).
    pub fn cancel_touch_focus(&mut self, actor: ActorId) {
        self.cancel_touch_focus_where(|stage, f| stage.is_descendant_of(f.listener_actor, actor));
    }

    /// Cancel every claim except those of `listener` on `listener_actor`.
    ///
    /// Used by a widget that takes over a gesture from whoever else was tracking it.
    pub fn cancel_touch_focus_except(&mut self, listener: &Listener, listener_actor: ActorId) {
        self.cancel_touch_focus_where(|_, f| {
            !(same_listener(&f.listener, listener) && f.listener_actor == listener_actor)
        });
    }

    /// Cancel every claim.
    pub fn cancel_all_touch_focus(&mut self) {
        self.cancel_touch_focus_where(|_, _| true);
    }

    fn cancel_touch_focus_where(&mut self, cancel: impl Fn(&Self, &TouchFocus) -> bool) {
        let snapshot: SmallVec<[TouchFocus; 4]> = self.touch_focuses.iter().cloned().collect();
        for focus in snapshot {
            if !cancel(self, &focus) {
                continue;
            }
            // Listeners cancelled earlier may already have released this claim.
            let Some(i) = self.touch_focuses.iter().position(|f| f.serial == focus.serial) else {
                continue;
            };
            self.touch_focuses.remove(i);
            log::debug!(
                "cancelling touch focus of {:?} on pointer {}",
                focus.listener_actor,
                focus.pointer
            );
            let mut event = Event::input(InputEvent {
                stage_position: CANCEL_POSITION,
                pointer: Some(focus.pointer),
                button: focus.button,
                ..InputEvent::new(InputEventType::TouchUp)
            });
            event.set_target(focus.target);
            event.set_listener(focus.listener_actor, Phase::Target);
            focus.listener.handle(self, &mut event);
        }
    }

    /// Deliver `event` to the claims selected by `claims`, without hit testing.
    ///
    /// With `consume`, each claim is released before its listener runs.
    pub(crate) fn deliver_to_touch_focus(
        &mut self,
        event: &mut Event,
        claims: impl Fn(&TouchFocus) -> bool,
        consume: bool,
    ) {
        let snapshot: SmallVec<[TouchFocus; 4]> = self
            .touch_focuses
            .iter()
            .filter(|f| claims(f))
            .cloned()
            .collect();
        for focus in snapshot {
            let Some(i) = self.touch_focuses.iter().position(|f| f.serial == focus.serial) else {
                continue;
            };
            if consume {
                self.touch_focuses.remove(i);
            }
            event.set_target(focus.target);
            event.set_listener(focus.listener_actor, Phase::Target);
            log::trace!("touch focus delivery to {:?}", focus.listener_actor);
            if focus.listener.handle(self, event) {
                event.handle();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect, Size};

    use super::CANCEL_POSITION;
    use crate::{ActorId, Event, InputEventType, Listener, LocalActor, Stage};

    type Ups = Rc<RefCell<Vec<(ActorId, Point)>>>;

    /// Takes every touch-down and records the touch-ups it receives.
    fn tracker(ups: &Ups) -> Listener {
        let ups = ups.clone();
        Rc::new(move |_: &mut Stage, event: &mut Event| {
            if let (Some(input), Some(actor)) = (event.as_input(), event.listener_actor())
                && input.ty == InputEventType::TouchUp
            {
                ups.borrow_mut().push((actor, input.stage_position));
            }
            true
        })
    }

    #[test]
    fn takeover_cancels_everyone_else() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let left = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 50.0, 100.0)));
        let right =
            stage.create_actor(LocalActor::with_bounds(Rect::new(50.0, 0.0, 100.0, 100.0)));
        stage.add_to_root(left).unwrap();
        stage.add_to_root(right).unwrap();

        let ups = Ups::default();
        let keeper = tracker(&ups);
        stage.add_listener(left, keeper.clone());
        stage.add_listener(right, tracker(&ups));

        assert!(stage.touch_down(Point::new(10.0, 10.0), 0, 0));
        assert!(stage.touch_down(Point::new(60.0, 10.0), 1, 0));
        assert_eq!(stage.touch_focus_count(), 2);

        stage.cancel_touch_focus_except(&keeper, left);
        assert_eq!(stage.touch_focus_count(), 1);
        assert_eq!(*ups.borrow(), [(right, CANCEL_POSITION)]);

        assert!(stage.touch_up(Point::new(10.0, 10.0), 0, 0));
        assert_eq!(*ups.borrow(), [(right, CANCEL_POSITION), (left, Point::new(10.0, 10.0))]);
    }

    #[test]
    fn cancelling_an_actor_reaches_its_subtree_only() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let group = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let inner = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 20.0, 20.0)));
        let other = stage.create_actor(LocalActor::with_bounds(Rect::new(60.0, 60.0, 90.0, 90.0)));
        stage.add_to_root(group).unwrap();
        stage.add_actor(group, inner).unwrap();
        stage.add_to_root(other).unwrap();

        let ups = Ups::default();
        stage.add_listener(inner, tracker(&ups));
        stage.add_listener(other, tracker(&ups));
        stage.touch_down(Point::new(5.0, 5.0), 0, 0);
        stage.touch_down(Point::new(70.0, 70.0), 1, 0);

        stage.cancel_touch_focus(group);
        assert_eq!(*ups.borrow(), [(inner, CANCEL_POSITION)]);
        stage.cancel_all_touch_focus();
        assert_eq!(*ups.borrow(), [(inner, CANCEL_POSITION), (other, CANCEL_POSITION)]);
        assert_eq!(stage.touch_focus_count(), 0);
    }
}
