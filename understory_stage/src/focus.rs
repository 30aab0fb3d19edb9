// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard and scroll focus with cancelable, rolled-back transfers.

use crate::{ActorId, Event, FocusEvent, FocusKind, Stage};

impl Stage {
    /// The actor receiving key events, if any.
    pub fn keyboard_focus(&self) -> Option<ActorId> {
        self.keyboard_focus
    }

    /// The actor receiving scroll events, if any.
    pub fn scroll_focus(&self) -> Option<ActorId> {
        self.scroll_focus
    }

    /// Move keyboard focus to `actor`, or clear it.
    ///
    /// The current holder is told it is losing focus and may cancel, which keeps focus
    /// where it is. Otherwise `actor` is told it is gaining focus; if it cancels, focus
    /// is transferred back to the previous holder, and cleared if that holder cancels
    /// too. Returns true when focus ends on `actor`.
    pub fn set_keyboard_focus(&mut self, actor: Option<ActorId>) -> bool {
        self.transfer_focus(FocusKind::Keyboard, actor)
    }

    /// Move scroll focus to `actor`, or clear it. Same protocol as
    /// [`set_keyboard_focus`](Self::set_keyboard_focus).
    pub fn set_scroll_focus(&mut self, actor: Option<ActorId>) -> bool {
        self.transfer_focus(FocusKind::Scroll, actor)
    }

    fn focus_slot(&mut self, kind: FocusKind) -> &mut Option<ActorId> {
        match kind {
            FocusKind::Keyboard => &mut self.keyboard_focus,
            FocusKind::Scroll => &mut self.scroll_focus,
        }
    }

    fn transfer_focus(&mut self, kind: FocusKind, actor: Option<ActorId>) -> bool {
        self.transfer_focus_with(kind, actor, true)
    }

    /// A refused gain rolls back at most once. When the previous holder refuses to
    /// take focus back, focus is cleared.
    fn transfer_focus_with(
        &mut self,
        kind: FocusKind,
        actor: Option<ActorId>,
        roll_back: bool,
    ) -> bool {
        let old = *self.focus_slot(kind);
        if old == actor {
            return true;
        }

        if let Some(old) = old {
            let mut losing = Event::focus(FocusEvent {
                kind,
                focused: false,
                related_actor: actor,
            });
            if self.fire(old, &mut losing) {
                log::debug!("{kind:?} focus kept by {old:?}, which refused to lose it");
                return false;
            }
        }

        *self.focus_slot(kind) = actor;
        let Some(new) = actor else {
            return true;
        };
        let mut gaining = Event::focus(FocusEvent {
            kind,
            focused: true,
            related_actor: old,
        });
        if !self.fire(new, &mut gaining) {
            return true;
        }
        if roll_back {
            log::debug!("{kind:?} focus refused by {new:?}, rolling back to {old:?}");
            self.transfer_focus_with(kind, old, false);
        } else {
            log::debug!("{kind:?} focus refused by {new:?} on rollback, clearing it");
            *self.focus_slot(kind) = None;
        }
        false
    }

    /// Release everything `actor` or its subtree holds: touch focus, scroll focus, and
    /// keyboard focus.
    pub fn unfocus(&mut self, actor: ActorId) {
        self.cancel_touch_focus(actor);
        if self
            .scroll_focus
            .is_some_and(|f| self.is_descendant_of(f, actor))
        {
            self.set_scroll_focus(None);
        }
        if self
            .keyboard_focus
            .is_some_and(|f| self.is_descendant_of(f, actor))
        {
            self.set_keyboard_focus(None);
        }
    }

    /// Clear scroll and keyboard focus and cancel all touch focus.
    pub fn unfocus_all(&mut self) {
        self.set_scroll_focus(None);
        self.set_keyboard_focus(None);
        self.cancel_all_touch_focus();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Size;

    use crate::{ActorId, Event, LocalActor, Stage};

    type Log = Rc<RefCell<Vec<(ActorId, bool)>>>;

    /// An on-stage actor that records focus events and cancels those matching `veto`.
    fn focusable(stage: &mut Stage, log: &Log, veto: Option<bool>) -> ActorId {
        let actor = stage.create_actor(LocalActor::default());
        stage.add_to_root(actor).unwrap();
        let log = log.clone();
        stage.add_listener(
            actor,
            Rc::new(move |_: &mut Stage, event: &mut Event| {
                let Some(focus) = event.as_focus() else {
                    return false;
                };
                let focused = focus.focused;
                log.borrow_mut().push((actor, focused));
                if veto == Some(focused) {
                    event.cancel();
                }
                false
            }),
        );
        actor
    }

    #[test]
    fn transfer_notifies_old_then_new() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let log = Log::default();
        let a = focusable(&mut stage, &log, None);
        let b = focusable(&mut stage, &log, None);
        assert!(stage.set_keyboard_focus(Some(a)));
        assert!(stage.set_keyboard_focus(Some(b)));
        assert_eq!(stage.keyboard_focus(), Some(b));
        assert_eq!(*log.borrow(), [(a, true), (a, false), (b, true)]);
        assert!(stage.set_keyboard_focus(Some(b)), "no-op transfer succeeds");
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn refusing_to_gain_rolls_back() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let log = Log::default();
        let a = focusable(&mut stage, &log, None);
        let b = focusable(&mut stage, &log, Some(true));
        stage.set_keyboard_focus(Some(a));
        assert!(!stage.set_keyboard_focus(Some(b)));
        assert_eq!(stage.keyboard_focus(), Some(a), "focus returns to A, not B or nobody");
        assert_eq!(
            *log.borrow(),
            [(a, true), (a, false), (b, true), (b, false), (a, true)]
        );
    }

    #[test]
    fn mutual_refusal_clears_focus() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let log = Log::default();
        let a = focusable(&mut stage, &log, Some(true));
        let b = focusable(&mut stage, &log, Some(true));
        stage.keyboard_focus = Some(a);

        assert!(!stage.set_keyboard_focus(Some(b)));
        assert_eq!(stage.keyboard_focus(), None);
        assert_eq!(*log.borrow(), [(a, false), (b, true), (b, false), (a, true)]);
    }

    #[test]
    fn refusing_to_lose_keeps_focus() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let log = Log::default();
        let modal = focusable(&mut stage, &log, Some(false));
        let other = focusable(&mut stage, &log, None);
        stage.set_scroll_focus(Some(modal));
        assert!(!stage.set_scroll_focus(Some(other)));
        assert!(!stage.set_scroll_focus(None));
        assert_eq!(stage.scroll_focus(), Some(modal));
    }

    #[test]
    fn removing_an_actor_clears_its_focus() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let log = Log::default();
        let group = focusable(&mut stage, &log, None);
        let child = stage.create_actor(LocalActor::default());
        stage.add_actor(group, child).unwrap();
        stage.set_keyboard_focus(Some(child));
        stage.set_scroll_focus(Some(group));

        let root = stage.root();
        assert!(stage.remove_actor(root, group));
        assert_eq!(stage.keyboard_focus(), None);
        assert_eq!(stage.scroll_focus(), None);
    }
}
