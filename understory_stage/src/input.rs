// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input entry points and per-frame enter/exit tracking.
//!
//! Touch-down and mouse-move are hit tested. Drags and touch-ups go only to touch
//! focus. Keys go to keyboard focus and scrolls to scroll focus, falling back to the
//! root. Every entry point returns whether some listener handled the event.

use kurbo::{Point, Vec2};

use crate::{ActorId, Event, InputEvent, InputEventType, MAX_POINTERS, Stage};

impl Stage {
    /// A pointer went down at `screen`.
    ///
    /// Ignored outside the viewport. The event is fired at the topmost touchable actor,
    /// or at the root when nothing is hit and the root is touchable. Listeners that
    /// handle it take touch focus of `pointer` and `button`.
    pub fn touch_down(&mut self, screen: Point, pointer: usize, button: u8) -> bool {
        if !self.is_inside_viewport(screen) {
            return false;
        }
        self.pointer_touched[pointer] = true;
        self.pointer_screen[pointer] = screen;

        let position = self.screen_to_stage(screen);
        let mut event = Event::input(InputEvent {
            stage_position: position,
            pointer: Some(pointer),
            button,
            ..InputEvent::new(InputEventType::TouchDown)
        });
        let target = match self.hit(position, true) {
            Some(hit) => hit,
            None if self.root_is_touchable() => self.root(),
            None => return false,
        };
        log::trace!("touch down {pointer} at {position:?} on {target:?}");
        self.fire(target, &mut event);
        event.is_handled()
    }

    /// A down pointer moved to `screen`. Delivered only to its touch focus.
    pub fn touch_dragged(&mut self, screen: Point, pointer: usize) -> bool {
        self.pointer_screen[pointer] = screen;
        self.mouse_screen = screen;
        if self.touch_focuses.is_empty() {
            return false;
        }
        let mut event = Event::input(InputEvent {
            stage_position: self.screen_to_stage(screen),
            pointer: Some(pointer),
            ..InputEvent::new(InputEventType::TouchDragged)
        });
        self.deliver_to_touch_focus(&mut event, |f| f.pointer == pointer, false);
        event.is_handled()
    }

    /// A pointer came up at `screen`.
    ///
    /// Delivered only to the touch focus of `pointer` and `button`, which is released.
    pub fn touch_up(&mut self, screen: Point, pointer: usize, button: u8) -> bool {
        self.pointer_touched[pointer] = false;
        self.pointer_screen[pointer] = screen;
        if self.touch_focuses.is_empty() {
            return false;
        }
        let mut event = Event::input(InputEvent {
            stage_position: self.screen_to_stage(screen),
            pointer: Some(pointer),
            button,
            ..InputEvent::new(InputEventType::TouchUp)
        });
        self.deliver_to_touch_focus(
            &mut event,
            |f| f.pointer == pointer && f.button == button,
            true,
        );
        event.is_handled()
    }

    /// The mouse moved to `screen` with no button down.
    pub fn mouse_moved(&mut self, screen: Point) -> bool {
        self.mouse_screen = screen;
        if !self.is_inside_viewport(screen) {
            return false;
        }
        let position = self.screen_to_stage(screen);
        let mut event = Event::input(InputEvent {
            stage_position: position,
            ..InputEvent::new(InputEventType::MouseMoved)
        });
        let target = self.hit(position, true).unwrap_or(self.root());
        self.fire(target, &mut event);
        event.is_handled()
    }

    /// The scroll wheel turned by `amount`, at the last known mouse position.
    pub fn scrolled(&mut self, amount: Vec2) -> bool {
        let mut event = Event::input(InputEvent {
            stage_position: self.screen_to_stage(self.mouse_screen),
            scroll_amount: amount,
            ..InputEvent::new(InputEventType::Scrolled)
        });
        let target = self.scroll_focus.unwrap_or(self.root());
        self.fire(target, &mut event);
        event.is_handled()
    }

    /// A key went down.
    pub fn key_down(&mut self, key_code: u32) -> bool {
        self.fire_key(InputEvent {
            key_code,
            ..InputEvent::new(InputEventType::KeyDown)
        })
    }

    /// A key came up.
    pub fn key_up(&mut self, key_code: u32) -> bool {
        self.fire_key(InputEvent {
            key_code,
            ..InputEvent::new(InputEventType::KeyUp)
        })
    }

    /// A character was typed.
    pub fn key_typed(&mut self, character: char) -> bool {
        self.fire_key(InputEvent {
            character: Some(character),
            ..InputEvent::new(InputEventType::KeyTyped)
        })
    }

    fn fire_key(&mut self, input: InputEvent) -> bool {
        let target = self.keyboard_focus.unwrap_or(self.root());
        let mut event = Event::input(input);
        self.fire(target, &mut event);
        event.is_handled()
    }

    /// Per-frame update: fire enter and exit for every down pointer and the mouse.
    ///
    /// Pointers that came up since the last call exit the actor they were over.
    pub fn act(&mut self) {
        for pointer in 0..MAX_POINTERS {
            let last = self.pointer_over[pointer];
            if self.pointer_touched[pointer] {
                let screen = self.pointer_screen[pointer];
                self.pointer_over[pointer] = self.fire_enter_and_exit(last, screen, Some(pointer));
            } else if let Some(last) = last {
                self.pointer_over[pointer] = None;
                let screen = self.pointer_screen[pointer];
                self.fire_crossing(InputEventType::Exit, last, screen, Some(pointer), None);
            }
        }
        let (last, screen) = (self.mouse_over, self.mouse_screen);
        self.mouse_over = self.fire_enter_and_exit(last, screen, None);
    }

    fn fire_enter_and_exit(
        &mut self,
        last: Option<ActorId>,
        screen: Point,
        pointer: Option<usize>,
    ) -> Option<ActorId> {
        let over = self.hit(self.screen_to_stage(screen), true);
        if over == last {
            return last;
        }
        if let Some(last) = last {
            self.fire_crossing(InputEventType::Exit, last, screen, pointer, over);
        }
        if let Some(over) = over {
            self.fire_crossing(InputEventType::Enter, over, screen, pointer, last);
        }
        over
    }

    fn fire_crossing(
        &mut self,
        ty: InputEventType,
        actor: ActorId,
        screen: Point,
        pointer: Option<usize>,
        related_actor: Option<ActorId>,
    ) {
        // The actor may have been destroyed since it was last under the pointer.
        if !self.is_alive(actor) {
            return;
        }
        let mut event = Event::input(InputEvent {
            stage_position: self.screen_to_stage(screen),
            pointer,
            related_actor,
            ..InputEvent::new(ty)
        });
        self.fire(actor, &mut event);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Rect, Size, Vec2};

    use crate::{ActorId, Event, InputEventType, LocalActor, Phase, Stage, Touchable};

    type Log = Rc<RefCell<Vec<(ActorId, Phase, InputEventType)>>>;

    fn recorder(log: &Log, handled: bool) -> crate::Listener {
        let log = log.clone();
        Rc::new(move |_: &mut Stage, event: &mut Event| {
            if let (Some(input), Some(actor)) = (event.as_input(), event.listener_actor()) {
                log.borrow_mut().push((actor, event.phase(), input.ty));
            }
            handled
        })
    }

    fn stage_with_button(log: &Log) -> (Stage, ActorId, ActorId) {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let group = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 60.0, 60.0)));
        let button = stage.create_actor(LocalActor::with_bounds(Rect::new(10.0, 10.0, 30.0, 30.0)));
        stage.add_to_root(group).unwrap();
        stage.add_actor(group, button).unwrap();
        stage.add_listener(button, recorder(log, true));
        (stage, group, button)
    }

    #[test]
    fn drag_and_up_follow_touch_focus_off_the_actor() {
        let log = Log::default();
        let (mut stage, _, button) = stage_with_button(&log);
        assert!(stage.touch_down(Point::new(15.0, 15.0), 0, 0));
        assert_eq!(stage.touch_focus_count(), 1);

        // Far outside the button, still delivered.
        assert!(stage.touch_dragged(Point::new(90.0, 90.0), 0));
        assert!(!stage.touch_dragged(Point::new(90.0, 90.0), 1), "other pointer has no focus");
        assert!(stage.touch_up(Point::new(90.0, 90.0), 0, 0));
        assert_eq!(stage.touch_focus_count(), 0);
        assert!(!stage.is_touched(0));

        let types: Vec<_> = log.borrow().iter().map(|e| e.2).collect();
        assert_eq!(
            types,
            [
                InputEventType::TouchDown,
                InputEventType::TouchDragged,
                InputEventType::TouchUp
            ]
        );
        assert!(log.borrow().iter().all(|e| e.0 == button));
    }

    #[test]
    fn touch_outside_viewport_is_ignored() {
        let log = Log::default();
        let (mut stage, _, _) = stage_with_button(&log);
        assert!(!stage.touch_down(Point::new(150.0, 15.0), 0, 0));
        assert!(!stage.is_touched(0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn capture_then_target_then_bubble() {
        let log = Log::default();
        let (mut stage, group, button) = stage_with_button(&log);
        stage.add_capture_listener(group, recorder(&log, false));
        stage.add_listener(group, recorder(&log, false));
        stage.touch_down(Point::new(15.0, 15.0), 0, 0);
        assert_eq!(
            *log.borrow(),
            [
                (group, Phase::Capture, InputEventType::TouchDown),
                (button, Phase::Target, InputEventType::TouchDown),
                (group, Phase::Bubble, InputEventType::TouchDown),
            ]
        );
    }

    #[test]
    fn stopping_in_capture_skips_the_target() {
        let log = Log::default();
        let (mut stage, group, _) = stage_with_button(&log);
        stage.add_capture_listener(
            group,
            Rc::new(|_: &mut Stage, event: &mut Event| {
                event.stop();
                false
            }),
        );
        assert!(!stage.touch_down(Point::new(15.0, 15.0), 0, 0));
        assert!(log.borrow().is_empty());
        assert_eq!(stage.touch_focus_count(), 0);
    }

    #[test]
    fn cancelling_touch_focus_sends_a_marked_touch_up() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let button = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)));
        stage.add_to_root(button).unwrap();
        let cancels = Rc::new(RefCell::new(0));
        let seen = cancels.clone();
        stage.add_listener(
            button,
            Rc::new(move |_: &mut Stage, event: &mut Event| {
                if event.as_input().is_some_and(|i| i.is_touch_focus_cancel()) {
                    *seen.borrow_mut() += 1;
                }
                true
            }),
        );
        stage.touch_down(Point::new(5.0, 5.0), 0, 0);
        stage.touch_down(Point::new(6.0, 6.0), 1, 0);
        assert_eq!(stage.touch_focus_count(), 2);

        stage.cancel_touch_focus(button);
        assert_eq!(stage.touch_focus_count(), 0);
        assert_eq!(*cancels.borrow(), 2);
        assert!(!stage.touch_up(Point::new(5.0, 5.0), 0, 0), "nobody tracks the pointer now");
    }

    #[test]
    fn unhit_touch_goes_to_an_enabled_root() {
        let log = Log::default();
        let (mut stage, _, _) = stage_with_button(&log);
        let root = stage.root();
        stage.add_listener(root, recorder(&log, true));
        assert!(stage.touch_down(Point::new(90.0, 90.0), 0, 0));
        assert_eq!(log.borrow().last().map(|e| e.0), Some(root));

        stage.set_touchable(root, Touchable::ChildrenOnly);
        assert!(!stage.touch_down(Point::new(90.0, 90.0), 1, 0));
    }

    #[test]
    fn keys_and_scrolls_follow_focus() {
        let log = Log::default();
        let (mut stage, group, button) = stage_with_button(&log);
        stage.add_listener(group, recorder(&log, false));
        assert!(!stage.key_down(32), "root has no listeners");
        stage.set_keyboard_focus(Some(button));
        log.borrow_mut().clear();
        assert!(stage.key_typed('a'));
        assert!(!stage.scrolled(Vec2::new(0.0, 1.0)));
        stage.set_scroll_focus(Some(group));
        assert!(!stage.scrolled(Vec2::new(0.0, 1.0)));
        assert_eq!(
            *log.borrow(),
            [
                (button, Phase::Target, InputEventType::KeyTyped),
                (group, Phase::Bubble, InputEventType::KeyTyped),
                (group, Phase::Target, InputEventType::Scrolled),
            ]
        );
    }

    #[test]
    fn act_fires_enter_and_exit() {
        let log = Log::default();
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let a = stage.create_actor(LocalActor::with_bounds(Rect::new(0.0, 0.0, 40.0, 40.0)));
        let b = stage.create_actor(LocalActor::with_bounds(Rect::new(50.0, 0.0, 90.0, 40.0)));
        stage.add_to_root(a).unwrap();
        stage.add_to_root(b).unwrap();
        stage.add_listener(a, recorder(&log, false));
        stage.add_listener(b, recorder(&log, false));

        stage.mouse_moved(Point::new(10.0, 10.0));
        stage.act();
        assert_eq!(stage.mouse_over(), Some(a));
        stage.act();
        stage.mouse_moved(Point::new(60.0, 10.0));
        stage.act();
        assert_eq!(stage.mouse_over(), Some(b));

        let crossings: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| e.2 != InputEventType::MouseMoved)
            .map(|e| (e.0, e.2))
            .collect();
        assert_eq!(
            crossings,
            [
                (a, InputEventType::Enter),
                (a, InputEventType::Exit),
                (b, InputEventType::Enter),
            ]
        );
    }

    #[test]
    fn released_pointer_exits() {
        let log = Log::default();
        let (mut stage, _, button) = stage_with_button(&log);
        stage.touch_down(Point::new(15.0, 15.0), 3, 0);
        stage.act();
        assert_eq!(stage.pointer_over(3), Some(button));
        stage.touch_up(Point::new(15.0, 15.0), 3, 0);
        stage.act();
        assert_eq!(stage.pointer_over(3), None);
        let exits = log
            .borrow()
            .iter()
            .filter(|e| e.2 == InputEventType::Exit)
            .count();
        assert_eq!(exits, 1);
    }
}
