// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::ActorId;

/// Errors raised by structural operations on the actor tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageError {
    /// The id refers to a destroyed actor.
    StaleActor(ActorId),
    /// The reference actor of a relative insertion is not a child of the group.
    NotAChild {
        /// Group the insertion targeted.
        group: ActorId,
        /// Reference actor that was expected among its children.
        actor: ActorId,
    },
    /// Inserting the actor would make it its own ancestor.
    Cycle {
        /// Group the insertion targeted.
        group: ActorId,
        /// Actor being inserted.
        actor: ActorId,
    },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleActor(id) => write!(f, "actor {id:?} has been destroyed"),
            Self::NotAChild { group, actor } => {
                write!(f, "actor {actor:?} is not a child of {group:?}")
            }
            Self::Cycle { group, actor } => {
                write!(f, "adding {actor:?} to {group:?} would create a cycle")
            }
        }
    }
}

impl core::error::Error for StageError {}
