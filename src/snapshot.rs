//! Turn input and output exchanged with the host adapter.

use crate::action::ActionQueue;
use crate::base::{Base, BaseId};
use crate::terrain::Grid;
use crate::unit::{Unit, UnitId};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Decoded world state for one turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Turn index since the end of base placement.
    pub time: u32,
    pub grid: Grid,
    pub units: Vec<Unit>,
    pub bases: Vec<Base>,
    #[serde(default)]
    pub hostile_units: Vec<Unit>,
    #[serde(default)]
    pub hostile_bases: Vec<Base>,
}

impl WorldSnapshot {
    pub fn new(time: u32, grid: Grid) -> Self {
        WorldSnapshot {
            time,
            grid,
            units: Vec::new(),
            bases: Vec::new(),
            hostile_units: Vec::new(),
            hostile_bases: Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseCommand {
    BuildLight = 0,
    BuildHeavy = 1,
    Water = 2,
}

/// Everything submitted to the host for one turn. Only non-empty queues
/// appear in `unit_actions`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TurnOutput {
    pub unit_actions: FnvHashMap<UnitId, ActionQueue>,
    pub base_commands: FnvHashMap<BaseId, BaseCommand>,
}

impl TurnOutput {
    pub fn queue(&self, unit_id: &str) -> Option<&ActionQueue> {
        self.unit_actions.get(unit_id)
    }

    pub fn command(&self, base_id: &str) -> Option<BaseCommand> {
        self.base_commands.get(base_id).copied()
    }
}
