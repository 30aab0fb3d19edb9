// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capture and bubble propagation through an actor path.
//!
//! [`Stage::fire`] turns the path from the root to the target into a sequence:
//!
//! - capture listeners of every actor, root first, target included;
//! - the target's own listeners;
//! - listeners of the target's ancestors, parent first.
//!
//! The sequence is walked until an entry asks to stop. Each actor's listener list is
//! snapshotted before it runs, so listeners may add or remove listeners, or restructure
//! the tree, without disturbing the current notification.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::event::Listener;
use crate::{ActorId, Event, InputEventType, Stage};

/// Which listener set of an actor is being notified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Capture listeners, on the way from the root down to the target.
    Capture,
    /// The target's own listeners.
    Target,
    /// Listeners of the target's ancestors, on the way back up.
    Bubble,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Dispatch {
    pub(crate) actor: ActorId,
    pub(crate) phase: Phase,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Continue,
    Stop,
}

/// Build the dispatch sequence for `path`, ordered root to target.
pub(crate) fn sequence(path: &[ActorId]) -> Vec<Dispatch> {
    let mut out = Vec::with_capacity(path.len() * 2 + 1);
    let Some((&target, ancestors)) = path.split_last() else {
        return out;
    };
    for &actor in path {
        out.push(Dispatch {
            actor,
            phase: Phase::Capture,
        });
    }
    out.push(Dispatch {
        actor: target,
        phase: Phase::Target,
    });
    for &actor in ancestors.iter().rev() {
        out.push(Dispatch {
            actor,
            phase: Phase::Bubble,
        });
    }
    out
}

/// Walk `seq` until `handler` stops. Returns the entry that stopped, if any.
pub(crate) fn run<'a, E>(
    seq: &'a [Dispatch],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch, &mut E) -> Outcome,
) -> Option<&'a Dispatch> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

impl Stage {
    /// Fire `event` at `target` through capture, target, and bubble listeners.
    ///
    /// Returns whether the event was cancelled. A stale target receives nothing.
    pub fn fire(&mut self, target: ActorId, event: &mut Event) -> bool {
        if !self.is_alive(target) {
            log::warn!("event fired at destroyed actor {target:?}");
            return event.is_cancelled();
        }
        event.set_target(target);

        let mut path: SmallVec<[ActorId; 16]> = SmallVec::new();
        let mut cursor = Some(target);
        while let Some(actor) = cursor {
            path.push(actor);
            cursor = self.parent_of(actor);
        }
        path.reverse();

        let seq = sequence(&path);
        let stopped = run(&seq, event, |d, event| {
            self.notify(d.actor, d.phase, event);
            if event.is_stopped() || (d.phase == Phase::Target && !event.bubbles()) {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        if let Some(d) = stopped {
            log::trace!("propagation of {:?} ended at {:?}", event.kind(), d);
        }
        event.is_cancelled()
    }

    /// Run the listeners of one actor for one phase.
    fn notify(&mut self, actor: ActorId, phase: Phase, event: &mut Event) {
        let listeners: SmallVec<[Listener; 4]> = match self.node(actor) {
            Some(node) if phase == Phase::Capture => {
                node.capture_listeners.iter().cloned().collect()
            }
            Some(node) => node.listeners.iter().cloned().collect(),
            None => return,
        };
        if listeners.is_empty() {
            return;
        }
        event.set_listener(actor, phase);
        for listener in listeners {
            if !listener.handle(self, event) {
                continue;
            }
            event.handle();
            let Some(input) = event.as_input() else {
                continue;
            };
            if input.ty == InputEventType::TouchDown
                && input.touch_focus
                && let (Some(target), Some(pointer)) = (event.target(), input.pointer)
            {
                let button = input.button;
                self.add_touch_focus(listener, actor, target, pointer, button);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;

    use kurbo::Size;

    use crate::{InputEvent, LocalActor};

    fn ids() -> [ActorId; 3] {
        [ActorId::new(0, 1), ActorId::new(1, 1), ActorId::new(2, 1)]
    }

    #[test]
    fn sequence_is_capture_target_bubble() {
        let [a, b, c] = ids();
        let seq = sequence(&[a, b, c]);
        let seen: Vec<(Phase, ActorId)> = seq.iter().map(|d| (d.phase, d.actor)).collect();
        assert_eq!(
            seen,
            vec![
                (Phase::Capture, a),
                (Phase::Capture, b),
                (Phase::Capture, c),
                (Phase::Target, c),
                (Phase::Bubble, b),
                (Phase::Bubble, a),
            ]
        );
        assert!(sequence(&[]).is_empty());
    }

    #[test]
    fn stop_reports_where_propagation_ended() {
        let [a, b, c] = ids();
        let seq = sequence(&[a, b, c]);
        let mut seen = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push(d.phase);
            if d.phase == Phase::Target {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(
            stopped,
            Some(&Dispatch {
                actor: c,
                phase: Phase::Target
            })
        );
        assert_eq!(seen, vec![Phase::Capture, Phase::Capture, Phase::Capture, Phase::Target]);
    }

    #[test]
    fn run_visits_everything_without_stop() {
        let [a, b, _] = ids();
        let seq = sequence(&[a, b]);
        let mut count = 0;
        assert!(run(&seq, &mut count, |_, n| {
            *n += 1;
            Outcome::Continue
        })
        .is_none());
        assert_eq!(count, seq.len());
    }

    #[test]
    fn listeners_and_path_are_fixed_for_one_fire() {
        let mut stage = Stage::new(Size::new(10.0, 10.0));
        let group = stage.create_actor(LocalActor::default());
        let button = stage.create_actor(LocalActor::default());
        stage.add_to_root(group).unwrap();
        stage.add_actor(group, button).unwrap();

        let second_calls = Rc::new(Cell::new(0));
        let bubbled = Rc::new(Cell::new(0));
        let second: Listener = {
            let calls = second_calls.clone();
            Rc::new(move |_: &mut Stage, _: &mut Event| {
                calls.set(calls.get() + 1);
                false
            })
        };
        let first: Listener = {
            let second = second.clone();
            Rc::new(move |stage: &mut Stage, _: &mut Event| {
                stage.remove_listener(button, &second);
                stage.remove_actor(group, button);
                false
            })
        };
        stage.add_listener(button, first);
        stage.add_listener(button, second);
        let counter = bubbled.clone();
        stage.add_listener(
            group,
            Rc::new(move |_: &mut Stage, _: &mut Event| {
                counter.set(counter.get() + 1);
                false
            }),
        );

        let mut event = Event::input(InputEvent::new(InputEventType::KeyDown));
        stage.fire(button, &mut event);
        assert_eq!(second_calls.get(), 1, "removed during this fire, still notified");
        assert_eq!(bubbled.get(), 1, "the old parent is still on the path");
        assert_eq!(stage.parent_of(button), None);

        let mut event = Event::input(InputEvent::new(InputEventType::KeyDown));
        stage.fire(button, &mut event);
        assert_eq!(second_calls.get(), 1);
        assert_eq!(bubbled.get(), 1);
    }
}
