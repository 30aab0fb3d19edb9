// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events, their payloads, and the listener capability.

use alloc::rc::Rc;

use kurbo::{Point, Vec2};

use crate::{ActorId, Phase, Stage};

/// The kind of raw input an [`InputEvent`] carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputEventType {
    /// A pointer went down.
    TouchDown,
    /// A pointer went up.
    TouchUp,
    /// A pointer moved while down.
    TouchDragged,
    /// The mouse moved with no button down.
    MouseMoved,
    /// A pointer or the mouse entered an actor.
    Enter,
    /// A pointer or the mouse left an actor.
    Exit,
    /// The mouse wheel turned.
    Scrolled,
    /// A key went down.
    KeyDown,
    /// A key went up.
    KeyUp,
    /// A character was typed.
    KeyTyped,
}

/// Payload of pointer, mouse, and keyboard events.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    /// What happened.
    pub ty: InputEventType,
    /// Pointer position in stage coordinates.
    pub stage_position: Point,
    /// Pointer slot for touch events; `None` for the mouse and the keyboard.
    pub pointer: Option<usize>,
    /// Mouse button of a down or up event.
    pub button: u8,
    /// Key of a key event.
    pub key_code: u32,
    /// Character of a typed event.
    pub character: Option<char>,
    /// Wheel movement of a scroll event.
    pub scroll_amount: Vec2,
    /// For enter and exit, the actor on the other side of the crossing.
    pub related_actor: Option<ActorId>,
    /// Whether a listener handling this touch-down gains touch focus.
    pub touch_focus: bool,
}

impl InputEvent {
    /// An input event of the given type with every other field neutral.
    pub fn new(ty: InputEventType) -> Self {
        Self {
            ty,
            stage_position: Point::ZERO,
            pointer: None,
            button: 0,
            key_code: 0,
            character: None,
            scroll_amount: Vec2::ZERO,
            related_actor: None,
            touch_focus: true,
        }
    }

    /// The event position in `actor`'s local coordinates.
    pub fn local_position(&self, stage: &Stage, actor: ActorId) -> Option<Point> {
        stage.stage_to_local(actor, self.stage_position)
    }

    /// Whether this is a touch-up synthesized by touch-focus cancellation.
    pub fn is_touch_focus_cancel(&self) -> bool {
        self.ty == InputEventType::TouchUp && self.stage_position == Point::new(f64::MIN, f64::MIN)
    }
}

/// Which focus a [`FocusEvent`] is about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusKind {
    /// Keyboard focus.
    Keyboard,
    /// Scroll focus.
    Scroll,
}

/// Payload of focus transfer notifications.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusEvent {
    /// Which focus is moving.
    pub kind: FocusKind,
    /// True when the receiver is gaining focus, false when losing it.
    pub focused: bool,
    /// The other party of the transfer.
    pub related_actor: Option<ActorId>,
}

/// What an [`Event`] is about.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Pointer, mouse, or keyboard input.
    Input(InputEvent),
    /// Focus transfer.
    Focus(FocusEvent),
    /// An application-defined event.
    Custom(u32),
}

/// A mutable record threaded through one dispatch.
///
/// Listeners inspect the payload and the routing fields, and steer propagation:
/// - [`handle`](Self::handle) marks the event consumed.
/// - [`stop`](Self::stop) ends propagation after the current actor's listeners.
/// - [`cancel`](Self::cancel) does both and additionally asks the sender to skip its
///   default behavior, for example to veto a focus change.
#[derive(Clone, Debug)]
pub struct Event {
    kind: EventKind,
    target: Option<ActorId>,
    listener_actor: Option<ActorId>,
    phase: Phase,
    bubbles: bool,
    handled: bool,
    stopped: bool,
    cancelled: bool,
}

impl Event {
    /// A fresh, bubbling event.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            listener_actor: None,
            phase: Phase::Target,
            bubbles: true,
            handled: false,
            stopped: false,
            cancelled: false,
        }
    }

    /// A fresh input event.
    pub fn input(input: InputEvent) -> Self {
        Self::new(EventKind::Input(input))
    }

    /// A fresh focus event.
    pub fn focus(focus: FocusEvent) -> Self {
        Self::new(EventKind::Focus(focus))
    }

    /// The payload.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The payload, for senders that reuse an event across dispatches.
    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// The input payload, if this is an input event.
    pub fn as_input(&self) -> Option<&InputEvent> {
        match &self.kind {
            EventKind::Input(input) => Some(input),
            _ => None,
        }
    }

    /// The focus payload, if this is a focus event.
    pub fn as_focus(&self) -> Option<&FocusEvent> {
        match &self.kind {
            EventKind::Focus(focus) => Some(focus),
            _ => None,
        }
    }

    /// The actor the event was fired at.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// The actor whose listener is currently running.
    pub fn listener_actor(&self) -> Option<ActorId> {
        self.listener_actor
    }

    /// The propagation phase of the current notification.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the current notification goes to capture listeners.
    pub fn is_capture(&self) -> bool {
        self.phase == Phase::Capture
    }

    /// Whether the event continues to the target's ancestors after the target.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Set whether the event bubbles.
    pub fn set_bubbles(&mut self, bubbles: bool) {
        self.bubbles = bubbles;
    }

    /// Mark the event consumed.
    pub fn handle(&mut self) {
        self.handled = true;
    }

    /// End propagation once the current actor's listeners have run.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Stop and handle the event, and veto the sender's default behavior.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.stopped = true;
        self.handled = true;
    }

    /// Whether a listener consumed the event.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Whether propagation was stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether the event was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Clear routing and flags so the event can be fired again. The payload is kept.
    pub fn reset(&mut self) {
        self.target = None;
        self.listener_actor = None;
        self.phase = Phase::Target;
        self.bubbles = true;
        self.handled = false;
        self.stopped = false;
        self.cancelled = false;
    }

    pub(crate) fn set_target(&mut self, target: ActorId) {
        self.target = Some(target);
    }

    pub(crate) fn set_listener(&mut self, actor: ActorId, phase: Phase) {
        self.listener_actor = Some(actor);
        self.phase = phase;
    }
}

/// Something that reacts to events on an actor.
///
/// Returning true marks the event handled. A listener that handles a touch-down also
/// receives the matching drags and the touch-up through touch focus.
///
/// Listeners get the stage mutably, so they may restructure the tree, move focus, or
/// fire further events. Any `Fn(&mut Stage, &mut Event) -> bool` closure is a listener.
pub trait EventListener {
    /// React to `event`. Return true if it was consumed.
    fn handle(&self, stage: &mut Stage, event: &mut Event) -> bool;
}

impl<F> EventListener for F
where
    F: Fn(&mut Stage, &mut Event) -> bool,
{
    fn handle(&self, stage: &mut Stage, event: &mut Event) -> bool {
        self(stage, event)
    }
}

/// A shared listener handle. Listeners are compared by identity.
pub type Listener = Rc<dyn EventListener>;

pub(crate) fn same_listener(a: &Listener, b: &Listener) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
