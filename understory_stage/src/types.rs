// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the stage: actor identifiers, touchability, and local geometry.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Number of pointer slots the stage tracks. Pointer indices must be below this.
pub const MAX_POINTERS: usize = 20;

/// Identifier for an actor in a [`Stage`](crate::Stage) (generational).
///
/// Slots of destroyed actors are reused with a bumped generation, so an old id never
/// aliases a newer actor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActorId(pub(crate) u32, pub(crate) u32);

impl ActorId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Whether an actor takes part in hit testing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Touchable {
    /// The actor and its children can be hit.
    #[default]
    Enabled,
    /// Neither the actor nor its children can be hit.
    Disabled,
    /// Only the children can be hit.
    ChildrenOnly,
}

/// Local geometry and input flags of an actor.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalActor {
    /// Position of the actor's local origin in its parent's space.
    pub position: Point,
    /// Size of the actor's local box `[0, width) x [0, height)`.
    pub size: Size,
    /// Pivot for rotation and scale, in local coordinates.
    pub origin: Vec2,
    /// Rotation around `origin`, in radians.
    pub rotation: f64,
    /// Scale around `origin`.
    pub scale: Vec2,
    /// Hit-testing participation.
    pub touchable: Touchable,
    /// Invisible actors and their children are never hit.
    pub visible: bool,
}

impl Default for LocalActor {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            size: Size::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            touchable: Touchable::Enabled,
            visible: true,
        }
    }
}

impl LocalActor {
    /// Actor at `bounds` in its parent's space, otherwise default.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            position: bounds.origin(),
            size: bounds.size(),
            ..Self::default()
        }
    }

    /// Local to parent transform.
    pub fn transform(&self) -> Affine {
        if self.rotation == 0.0 && self.scale == Vec2::new(1.0, 1.0) {
            return Affine::translate(self.position.to_vec2());
        }
        Affine::translate(self.position.to_vec2() + self.origin)
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-self.origin)
    }

    /// Whether `point`, in local coordinates, lies inside the actor's box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x < self.size.width && point.y >= 0.0 && point.y < self.size.height
    }
}

/// Layout size hints an actor publishes for its container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SizeHints {
    /// Smallest usable size.
    pub min: Size,
    /// Preferred size.
    pub pref: Size,
    /// Largest useful size; zero means unbounded.
    pub max: Size,
}
