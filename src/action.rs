use crate::constants::*;
use crate::location::*;
use crate::unit::ResourceKind;
use serde::{Deserialize, Serialize};

/// A single primitive of a unit queue. `n` is how many times the host
/// executes the primitive before advancing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move {
        direction: Direction,
        n: u32,
    },
    Transfer {
        direction: Direction,
        resource: ResourceKind,
        amount: u32,
        n: u32,
    },
    Pickup {
        resource: ResourceKind,
        amount: u32,
        n: u32,
    },
    Dig {
        n: u32,
    },
}

impl Action {
    pub fn step(direction: Direction) -> Self {
        Action::Move { direction, n: 1 }
    }

    /// A move in place. Keeps the unit where it is without digging.
    pub fn stay() -> Self {
        Action::step(Direction::Center)
    }

    pub fn dig(n: u32) -> Self {
        Action::Dig { n }
    }

    pub fn pickup_power(amount: u32) -> Self {
        Action::Pickup {
            resource: ResourceKind::Power,
            amount,
            n: 1,
        }
    }

    pub fn transfer(direction: Direction, resource: ResourceKind, amount: u32) -> Self {
        Action::Transfer {
            direction,
            resource,
            amount,
            n: 1,
        }
    }

    /// Cell the unit occupies after the first execution of this primitive.
    pub fn destination(&self, from: Location) -> Option<Location> {
        match self {
            Action::Move { direction, .. } => from.step(*direction),
            _ => Some(from),
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

/// Ordered primitives bounded to [`MAX_QUEUE_LENGTH`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionQueue {
    actions: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        ActionQueue {
            actions: Vec::new(),
        }
    }

    /// Wraps host-provided actions, dropping anything past the bound.
    pub fn from_actions(mut actions: Vec<Action>) -> Self {
        actions.truncate(MAX_QUEUE_LENGTH);
        ActionQueue { actions }
    }

    pub fn single(action: Action) -> Self {
        ActionQueue {
            actions: vec![action],
        }
    }

    /// Joins the parts of a round trip. When the parts exceed the bound the
    /// inbound leg is trimmed first, then the gather loop. The prefix and the
    /// outbound leg are kept whole as long as they fit.
    pub fn assemble(
        prefix: &[Action],
        outbound: &[Action],
        gather: &[Action],
        inbound: &[Action],
    ) -> Self {
        let mut actions = Vec::with_capacity(MAX_QUEUE_LENGTH);
        actions.extend_from_slice(prefix);
        actions.extend_from_slice(outbound);
        actions.truncate(MAX_QUEUE_LENGTH);

        let room = MAX_QUEUE_LENGTH - actions.len();
        let gather_len = gather.len().min(room);
        actions.extend_from_slice(&gather[..gather_len]);

        let room = MAX_QUEUE_LENGTH - actions.len();
        let inbound_len = inbound.len().min(room);
        actions.extend_from_slice(&inbound[..inbound_len]);

        ActionQueue { actions }
    }

    /// Appends `action`, returning false when the queue is already full.
    pub fn push(&mut self, action: Action) -> bool {
        if self.actions.len() >= MAX_QUEUE_LENGTH {
            return false;
        }
        self.actions.push(action);
        true
    }

    pub fn first(&self) -> Option<&Action> {
        self.actions.first()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.actions.truncate(len);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Cell the unit will occupy after the first primitive, if any.
    pub fn first_step(&self, from: Location) -> Option<Location> {
        self.first().and_then(|action| action.destination(from))
    }
}

impl<'a> IntoIterator for &'a ActionQueue {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
