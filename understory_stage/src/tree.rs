// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actor storage and the group operations: structure, geometry, hit testing.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::event::{Listener, same_listener};
use crate::{ActorId, LocalActor, SizeHints, Stage, StageError, Touchable};

pub(crate) struct ActorNode {
    generation: u32,
    pub(crate) parent: Option<ActorId>,
    pub(crate) children: Vec<ActorId>,
    pub(crate) local: LocalActor,
    pub(crate) listeners: Vec<Listener>,
    pub(crate) capture_listeners: Vec<Listener>,
    pub(crate) on_stage: bool,
    pub(crate) size_hints: Option<SizeHints>,
    pub(crate) needs_layout: bool,
}

impl fmt::Debug for ActorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorNode")
            .field("generation", &self.generation)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("local", &self.local)
            .field("listeners", &self.listeners.len())
            .field("capture_listeners", &self.capture_listeners.len())
            .field("on_stage", &self.on_stage)
            .field("size_hints", &self.size_hints)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}

impl ActorNode {
    fn new(generation: u32, local: LocalActor) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            listeners: Vec::new(),
            capture_listeners: Vec::new(),
            on_stage: false,
            size_hints: None,
            needs_layout: true,
        }
    }
}

impl Stage {
    // --- storage ---

    /// Create a detached actor. It takes part in input once added under the root.
    pub fn create_actor(&mut self, local: LocalActor) -> ActorId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(ActorNode::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ActorId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(ActorNode::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ActorId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ActorId::new(idx, generation)
    }

    /// Destroy `actor` and its subtree, detaching it from its group first.
    ///
    /// Focus held inside the subtree is dropped, without notifying listeners when the
    /// actor was not on the stage.
    ///
    /// Returns false for stale ids and for the root, which cannot be destroyed.
    pub fn destroy_actor(&mut self, actor: ActorId) -> bool {
        if !self.is_alive(actor) || actor == self.root() {
            return false;
        }
        if let Some(parent) = self.parent_of(actor) {
            self.remove_actor(parent, actor);
        }
        // Detached actors may hold focus too.
        if self.keyboard_focus.is_some_and(|f| self.is_descendant_of(f, actor)) {
            self.keyboard_focus = None;
        }
        if self.scroll_focus.is_some_and(|f| self.is_descendant_of(f, actor)) {
            self.scroll_focus = None;
        }
        let mut claims = core::mem::take(&mut self.touch_focuses);
        claims.retain(|f| {
            !self.is_descendant_of(f.listener_actor, actor)
                && !self.is_descendant_of(f.target, actor)
        });
        self.touch_focuses = claims;
        self.free_subtree(actor);
        true
    }

    fn free_subtree(&mut self, actor: ActorId) {
        if !self.is_alive(actor) {
            return;
        }
        let Some(node) = self.nodes.get_mut(actor.idx()).and_then(Option::take) else {
            return;
        };
        self.free_list.push(actor.idx());
        for child in node.children {
            if self.node(child).is_some_and(|c| c.parent == Some(actor)) {
                self.free_subtree(child);
            }
        }
    }

    /// Returns true if `actor` refers to a live actor.
    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.node(actor).is_some()
    }

    pub(crate) fn node(&self, actor: ActorId) -> Option<&ActorNode> {
        let n = self.nodes.get(actor.idx())?.as_ref()?;
        (n.generation == actor.1).then_some(n)
    }

    pub(crate) fn node_mut(&mut self, actor: ActorId) -> Option<&mut ActorNode> {
        let n = self.nodes.get_mut(actor.idx())?.as_mut()?;
        if n.generation != actor.1 {
            return None;
        }
        Some(n)
    }

    fn live(&self, actor: ActorId) -> Result<&ActorNode, StageError> {
        self.node(actor).ok_or(StageError::StaleActor(actor))
    }

    // --- geometry ---

    /// Local geometry of a live actor.
    pub fn local(&self, actor: ActorId) -> Option<&LocalActor> {
        self.node(actor).map(|n| &n.local)
    }

    /// Replace the local geometry of a live actor.
    pub fn set_local(&mut self, actor: ActorId, local: LocalActor) {
        if let Some(n) = self.node_mut(actor) {
            n.needs_layout |= n.local.size != local.size;
            n.local = local;
        }
    }

    /// Move the actor's local origin in its parent's space.
    pub fn set_position(&mut self, actor: ActorId, position: Point) {
        if let Some(n) = self.node_mut(actor) {
            n.local.position = position;
        }
    }

    /// Resize the actor. A size change invalidates its own layout.
    pub fn set_size(&mut self, actor: ActorId, size: Size) {
        let Some(n) = self.node_mut(actor) else {
            return;
        };
        if n.local.size == size {
            return;
        }
        n.local.size = size;
        n.needs_layout = true;
    }

    /// Set position and size together.
    pub fn set_bounds(&mut self, actor: ActorId, bounds: Rect) {
        self.set_position(actor, bounds.origin());
        self.set_size(actor, bounds.size());
    }

    /// Set the pivot for rotation and scale.
    pub fn set_origin(&mut self, actor: ActorId, origin: Vec2) {
        if let Some(n) = self.node_mut(actor) {
            n.local.origin = origin;
        }
    }

    /// Set the rotation, in radians.
    pub fn set_rotation(&mut self, actor: ActorId, radians: f64) {
        if let Some(n) = self.node_mut(actor) {
            n.local.rotation = radians;
        }
    }

    /// Set the scale.
    pub fn set_scale(&mut self, actor: ActorId, scale: Vec2) {
        if let Some(n) = self.node_mut(actor) {
            n.local.scale = scale;
        }
    }

    /// Show or hide the actor. Hidden actors are never hit.
    pub fn set_visible(&mut self, actor: ActorId, visible: bool) {
        if let Some(n) = self.node_mut(actor) {
            n.local.visible = visible;
        }
    }

    /// Set hit-testing participation.
    pub fn set_touchable(&mut self, actor: ActorId, touchable: Touchable) {
        if let Some(n) = self.node_mut(actor) {
            n.local.touchable = touchable;
        }
    }

    /// Publish layout size hints for the actor's container.
    pub fn set_size_hints(&mut self, actor: ActorId, hints: Option<SizeHints>) {
        let Some(n) = self.node_mut(actor) else {
            return;
        };
        if n.size_hints == hints {
            return;
        }
        n.size_hints = hints;
        if let Some(parent) = self.parent_of(actor) {
            self.invalidate_hierarchy(parent);
        }
    }

    /// Layout size hints of a live actor.
    pub fn size_hints(&self, actor: ActorId) -> Option<SizeHints> {
        self.node(actor).and_then(|n| n.size_hints)
    }

    /// Position and size of a live actor in its parent's space, ignoring rotation and scale.
    pub fn bounds(&self, actor: ActorId) -> Option<Rect> {
        self.local(actor)
            .map(|l| Rect::from_origin_size(l.position, l.size))
    }

    /// Local to parent transform of a live actor.
    pub fn local_transform(&self, actor: ActorId) -> Option<Affine> {
        self.local(actor).map(LocalActor::transform)
    }

    /// Local to stage transform of a live actor.
    pub fn world_transform(&self, actor: ActorId) -> Option<Affine> {
        let mut tf = self.local_transform(actor)?;
        let mut cursor = self.parent_of(actor);
        while let Some(parent) = cursor {
            tf = self.local_transform(parent)? * tf;
            cursor = self.parent_of(parent);
        }
        Some(tf)
    }

    /// Map a stage point into `actor`'s local coordinates.
    pub fn stage_to_local(&self, actor: ActorId, point: Point) -> Option<Point> {
        self.world_transform(actor).map(|tf| tf.inverse() * point)
    }

    /// Map a point in `actor`'s local coordinates to the stage.
    pub fn local_to_stage(&self, actor: ActorId, point: Point) -> Option<Point> {
        self.world_transform(actor).map(|tf| tf * point)
    }

    // --- structure ---

    /// Add `actor` as the last child of `group`, detaching it from its current group.
    pub fn add_actor(&mut self, group: ActorId, actor: ActorId) -> Result<(), StageError> {
        self.insert_child(group, actor, <[ActorId]>::len)
    }

    /// Insert `actor` among `group`'s children at `index`, clamped to the child count.
    pub fn add_actor_at(
        &mut self,
        group: ActorId,
        index: usize,
        actor: ActorId,
    ) -> Result<(), StageError> {
        self.insert_child(group, actor, |children| index.min(children.len()))
    }

    /// Insert `actor` right before `before`, which must be a child of `group`.
    pub fn add_actor_before(
        &mut self,
        group: ActorId,
        before: ActorId,
        actor: ActorId,
    ) -> Result<(), StageError> {
        self.require_child(group, before)?;
        self.insert_child(group, actor, |children| {
            children
                .iter()
                .position(|&c| c == before)
                .unwrap_or(children.len())
        })
    }

    /// Insert `actor` right after `after`, which must be a child of `group`.
    pub fn add_actor_after(
        &mut self,
        group: ActorId,
        after: ActorId,
        actor: ActorId,
    ) -> Result<(), StageError> {
        self.require_child(group, after)?;
        self.insert_child(group, actor, |children| {
            children
                .iter()
                .position(|&c| c == after)
                .map_or(children.len(), |i| i + 1)
        })
    }

    fn require_child(&self, group: ActorId, child: ActorId) -> Result<(), StageError> {
        if self.live(group)?.children.contains(&child) {
            Ok(())
        } else {
            Err(StageError::NotAChild {
                group,
                actor: child,
            })
        }
    }

    fn insert_child(
        &mut self,
        group: ActorId,
        actor: ActorId,
        index: impl FnOnce(&[ActorId]) -> usize,
    ) -> Result<(), StageError> {
        self.live(group)?;
        self.live(actor)?;
        if actor == self.root() || self.is_descendant_of(group, actor) {
            return Err(StageError::Cycle { group, actor });
        }

        if let Some(old) = self.parent_of(actor) {
            self.unlink(old, actor);
            if old != group {
                self.children_changed(old);
            }
        }

        let on_stage = self.has_stage(group);
        let Some(g) = self.node_mut(group) else {
            return Err(StageError::StaleActor(group));
        };
        let at = index(g.children.as_slice());
        g.children.insert(at, actor);
        if let Some(a) = self.node_mut(actor) {
            a.parent = Some(group);
        }
        self.set_on_stage(actor, on_stage);
        self.children_changed(group);
        Ok(())
    }

    fn unlink(&mut self, group: ActorId, actor: ActorId) {
        if let Some(g) = self.node_mut(group) {
            g.children.retain(|&c| c != actor);
        }
        if let Some(a) = self.node_mut(actor) {
            a.parent = None;
        }
    }

    /// Remove `actor` from `group`, clearing any focus held inside its subtree first.
    ///
    /// Returns false if `actor` is not a child of `group`.
    pub fn remove_actor(&mut self, group: ActorId, actor: ActorId) -> bool {
        if !self
            .node(group)
            .is_some_and(|g| g.children.contains(&actor))
        {
            return false;
        }
        if self.has_stage(actor) {
            self.unfocus(actor);
        }
        // Unfocusing runs listeners, which may already have moved the actor.
        if self.parent_of(actor) != Some(group) {
            return true;
        }
        self.unlink(group, actor);
        self.set_on_stage(actor, false);
        self.children_changed(group);
        true
    }

    /// Remove every child of `group`, clearing focus held inside each one.
    ///
    /// Works from a snapshot of the children; actors added by listeners while the
    /// snapshot is processed stay in the group.
    pub fn clear_children(&mut self, group: ActorId) {
        let Some(snapshot) = self.node(group).map(|g| g.children.clone()) else {
            return;
        };
        for &child in &snapshot {
            if self.has_stage(child) {
                self.unfocus(child);
            }
            if self.parent_of(child) == Some(group) {
                if let Some(c) = self.node_mut(child) {
                    c.parent = None;
                }
                self.set_on_stage(child, false);
            }
        }
        if let Some(g) = self.node_mut(group) {
            g.children.retain(|c| !snapshot.contains(c));
        }
        self.children_changed(group);
    }

    pub(crate) fn set_on_stage(&mut self, actor: ActorId, on_stage: bool) {
        let Some(n) = self.node_mut(actor) else {
            return;
        };
        n.on_stage = on_stage;
        let children = n.children.clone();
        for child in children {
            self.set_on_stage(child, on_stage);
        }
    }

    /// Hook run after a group's child list changed: the group needs layout again.
    fn children_changed(&mut self, group: ActorId) {
        self.invalidate_hierarchy(group);
    }

    /// Mark `actor` and all its ancestors as needing layout.
    pub fn invalidate_hierarchy(&mut self, actor: ActorId) {
        let mut cursor = Some(actor);
        while let Some(a) = cursor {
            let Some(n) = self.node_mut(a) else {
                return;
            };
            n.needs_layout = true;
            cursor = n.parent;
        }
    }

    /// Whether `actor` needs layout, clearing the flag.
    pub fn take_needs_layout(&mut self, actor: ActorId) -> bool {
        self.node_mut(actor)
            .is_some_and(|n| core::mem::take(&mut n.needs_layout))
    }

    /// Children of a live actor in insertion order, or an empty slice for stale ids.
    pub fn children_of(&self, actor: ActorId) -> &[ActorId] {
        self.node(actor).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a live actor, or `None` for detached actors and stale ids.
    pub fn parent_of(&self, actor: ActorId) -> Option<ActorId> {
        self.node(actor).and_then(|n| n.parent)
    }

    /// Whether `actor` is `ancestor` or lies in its subtree.
    pub fn is_descendant_of(&self, actor: ActorId, ancestor: ActorId) -> bool {
        let mut cursor = Some(actor);
        while let Some(a) = cursor {
            if a == ancestor {
                return true;
            }
            cursor = self.parent_of(a);
        }
        false
    }

    /// Whether `actor` is `descendant` or one of its ancestors.
    pub fn is_ascendant_of(&self, actor: ActorId, descendant: ActorId) -> bool {
        self.is_descendant_of(descendant, actor)
    }

    /// Whether `actor` is attached under the root.
    pub fn has_stage(&self, actor: ActorId) -> bool {
        self.node(actor).is_some_and(|n| n.on_stage)
    }

    // --- hit testing ---

    /// The topmost actor at `point`, given in `actor`'s local coordinates.
    ///
    /// Children are tested last-added first, depth first, and the first hit wins. With
    /// `touchable` set, disabled actors and their subtrees are skipped, and
    /// children-only actors are never returned themselves.
    pub fn hit_actor(&self, actor: ActorId, point: Point, touchable: bool) -> Option<ActorId> {
        let node = self.node(actor)?;
        if touchable && node.local.touchable == Touchable::Disabled {
            return None;
        }
        if !node.local.visible {
            return None;
        }
        for &child in node.children.iter().rev() {
            let Some(c) = self.node(child) else {
                continue;
            };
            if !c.local.visible {
                continue;
            }
            let local = c.local.transform().inverse() * point;
            if let Some(hit) = self.hit_actor(child, local, touchable) {
                return Some(hit);
            }
        }
        if touchable && node.local.touchable != Touchable::Enabled {
            return None;
        }
        node.local.contains(point).then_some(actor)
    }

    // --- listeners ---

    /// Add a listener notified in the target and bubble phases.
    ///
    /// Returns false if the same listener is already registered on the actor.
    pub fn add_listener(&mut self, actor: ActorId, listener: Listener) -> bool {
        self.node_mut(actor)
            .is_some_and(|n| push_unique(&mut n.listeners, listener))
    }

    /// Add a listener notified in the capture phase.
    pub fn add_capture_listener(&mut self, actor: ActorId, listener: Listener) -> bool {
        self.node_mut(actor)
            .is_some_and(|n| push_unique(&mut n.capture_listeners, listener))
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&mut self, actor: ActorId, listener: &Listener) -> bool {
        self.node_mut(actor)
            .is_some_and(|n| remove_one(&mut n.listeners, listener))
    }

    /// Remove a capture listener. Returns whether it was registered.
    pub fn remove_capture_listener(&mut self, actor: ActorId, listener: &Listener) -> bool {
        self.node_mut(actor)
            .is_some_and(|n| remove_one(&mut n.capture_listeners, listener))
    }

    /// Remove every listener of the actor.
    pub fn clear_listeners(&mut self, actor: ActorId) {
        if let Some(n) = self.node_mut(actor) {
            n.listeners.clear();
            n.capture_listeners.clear();
        }
    }
}

fn push_unique(listeners: &mut Vec<Listener>, listener: Listener) -> bool {
    if listeners.iter().any(|l| same_listener(l, &listener)) {
        return false;
    }
    listeners.push(listener);
    true
}

fn remove_one(listeners: &mut Vec<Listener>, listener: &Listener) -> bool {
    let Some(i) = listeners.iter().position(|l| same_listener(l, listener)) else {
        return false;
    };
    listeners.remove(i);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;

    use crate::Event;

    fn stage_with(bounds: &[Rect]) -> (Stage, Vec<ActorId>) {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let ids = bounds
            .iter()
            .map(|&b| {
                let id = stage.create_actor(LocalActor::with_bounds(b));
                stage.add_to_root(id).unwrap();
                id
            })
            .collect();
        (stage, ids)
    }

    #[test]
    fn topmost_sibling_wins() {
        let (stage, ids) = stage_with(&[
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(50.0, 50.0, 150.0, 150.0),
        ]);
        assert_eq!(stage.hit(Point::new(75.0, 75.0), true), Some(ids[1]));
        assert_eq!(stage.hit(Point::new(25.0, 25.0), true), Some(ids[0]));
        assert_eq!(stage.hit(Point::new(175.0, 175.0), true), None);
    }

    #[test]
    fn touchability_and_visibility_filter_hits() {
        let (mut stage, ids) = stage_with(&[Rect::new(0.0, 0.0, 100.0, 100.0)]);
        let group = ids[0];
        let child = stage.create_actor(LocalActor::with_bounds(Rect::new(10.0, 10.0, 20.0, 20.0)));
        stage.add_actor(group, child).unwrap();

        stage.set_touchable(group, Touchable::ChildrenOnly);
        assert_eq!(stage.hit(Point::new(15.0, 15.0), true), Some(child));
        assert_eq!(stage.hit(Point::new(50.0, 50.0), true), None);
        assert_eq!(stage.hit(Point::new(50.0, 50.0), false), Some(group));

        stage.set_touchable(group, Touchable::Disabled);
        assert_eq!(stage.hit(Point::new(15.0, 15.0), true), None);

        stage.set_touchable(group, Touchable::Enabled);
        stage.set_visible(child, false);
        assert_eq!(stage.hit(Point::new(15.0, 15.0), true), Some(group));
    }

    #[test]
    fn hits_follow_transforms() {
        let (mut stage, ids) = stage_with(&[Rect::new(100.0, 100.0, 110.0, 120.0)]);
        let a = ids[0];
        stage.set_scale(a, Vec2::new(2.0, 2.0));
        assert_eq!(stage.hit(Point::new(115.0, 135.0), true), Some(a));
        assert_eq!(stage.stage_to_local(a, Point::new(110.0, 110.0)), Some(Point::new(5.0, 5.0)));
        assert_eq!(stage.local_to_stage(a, Point::new(1.0, 1.0)), Some(Point::new(102.0, 102.0)));
    }

    #[test]
    fn adding_reparents_and_propagates_stage() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO, Rect::ZERO]);
        let (a, b) = (ids[0], ids[1]);
        let leaf = stage.create_actor(LocalActor::default());
        assert!(!stage.has_stage(leaf));

        stage.add_actor(a, leaf).unwrap();
        assert!(stage.has_stage(leaf));
        stage.add_actor(b, leaf).unwrap();
        assert!(stage.children_of(a).is_empty());
        assert_eq!(stage.children_of(b), &[leaf]);
        assert_eq!(stage.parent_of(leaf), Some(b));

        let root = stage.root();
        assert!(stage.remove_actor(root, b));
        assert!(!stage.has_stage(b));
        assert!(!stage.has_stage(leaf), "stage is cleared for the whole subtree");
        assert!(!stage.remove_actor(root, b));
    }

    #[test]
    fn relative_insertion() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO, Rect::ZERO]);
        let root = stage.root();
        let c = stage.create_actor(LocalActor::default());
        stage.add_actor_before(root, ids[1], c).unwrap();
        assert_eq!(stage.children_of(root), &[ids[0], c, ids[1]]);
        stage.add_actor_after(root, ids[1], c).unwrap();
        assert_eq!(stage.children_of(root), &[ids[0], ids[1], c]);
        stage.add_actor_at(root, 0, c).unwrap();
        assert_eq!(stage.children_of(root), &[c, ids[0], ids[1]]);
        stage.add_actor_at(root, 99, ids[0]).unwrap();
        assert_eq!(stage.children_of(root), &[c, ids[1], ids[0]]);

        let stray = stage.create_actor(LocalActor::default());
        assert_eq!(
            stage.add_actor_before(root, stray, c),
            Err(StageError::NotAChild { group: root, actor: stray })
        );
    }

    #[test]
    fn cycles_and_stale_ids_are_rejected() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO]);
        let a = ids[0];
        let child = stage.create_actor(LocalActor::default());
        stage.add_actor(a, child).unwrap();
        assert_eq!(
            stage.add_actor(child, a),
            Err(StageError::Cycle { group: child, actor: a })
        );
        assert_eq!(stage.add_actor(a, a), Err(StageError::Cycle { group: a, actor: a }));

        assert!(stage.destroy_actor(a));
        assert!(!stage.is_alive(a));
        assert!(!stage.is_alive(child), "subtree is destroyed with its group");
        let root = stage.root();
        assert_eq!(stage.add_actor(root, a), Err(StageError::StaleActor(a)));
        assert!(!stage.destroy_actor(root));
    }

    #[test]
    fn slots_are_reused_with_new_generation() {
        let mut stage = Stage::new(Size::ZERO);
        let a = stage.create_actor(LocalActor::default());
        stage.destroy_actor(a);
        let b = stage.create_actor(LocalActor::default());
        assert_eq!(a.idx(), b.idx());
        assert!(b.1 > a.1, "generation must increase on reuse");
        assert!(stage.is_alive(b));
        assert!(!stage.is_alive(a));
    }

    #[test]
    fn structure_changes_invalidate_layout() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO]);
        let group = ids[0];
        let root = stage.root();
        stage.take_needs_layout(group);
        stage.take_needs_layout(root);

        let child = stage.create_actor(LocalActor::default());
        stage.add_actor(group, child).unwrap();
        assert!(stage.take_needs_layout(group));
        assert!(!stage.take_needs_layout(group));
        assert!(stage.take_needs_layout(root), "ancestors are invalidated too");

        stage.take_needs_layout(child);
        stage.set_size(child, Size::new(3.0, 3.0));
        assert!(stage.take_needs_layout(child));
        assert!(!stage.take_needs_layout(group), "resizing does not invalidate the parent");
    }

    #[test]
    fn clear_children_detaches_snapshot() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO, Rect::ZERO, Rect::ZERO]);
        let root = stage.root();
        stage.clear_children(root);
        assert!(stage.children_of(root).is_empty());
        for id in ids {
            assert_eq!(stage.parent_of(id), None);
            assert!(!stage.has_stage(id));
            assert!(stage.is_alive(id));
        }
    }

    #[test]
    fn listeners_are_registered_once() {
        let (mut stage, ids) = stage_with(&[Rect::ZERO]);
        let l: Listener = Rc::new(|_: &mut Stage, _: &mut Event| false);
        assert!(stage.add_listener(ids[0], l.clone()));
        assert!(!stage.add_listener(ids[0], l.clone()));
        assert!(stage.add_capture_listener(ids[0], l.clone()));
        assert!(stage.remove_listener(ids[0], &l));
        assert!(!stage.remove_listener(ids[0], &l));
        stage.clear_listeners(ids[0]);
        assert!(!stage.remove_capture_listener(ids[0], &l));
    }

    #[test]
    fn destroying_a_detached_actor_drops_its_focus() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let group = stage.create_actor(LocalActor::default());
        let child = stage.create_actor(LocalActor::default());
        stage.add_actor(group, child).unwrap();
        assert!(!stage.has_stage(child));

        let l: Listener = Rc::new(|_: &mut Stage, _: &mut Event| true);
        stage.set_keyboard_focus(Some(child));
        stage.set_scroll_focus(Some(group));
        stage.add_touch_focus(l, child, child, 0, 0);

        assert!(stage.destroy_actor(group));
        assert!(!stage.is_alive(child));
        assert_eq!(stage.keyboard_focus(), None);
        assert_eq!(stage.scroll_focus(), None);
        assert_eq!(stage.touch_focus_count(), 0);

        let reused = stage.create_actor(LocalActor::default());
        assert_ne!(stage.keyboard_focus(), Some(reused));
    }
}
