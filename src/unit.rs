use crate::action::Action;
use crate::location::*;
use serde::{Deserialize, Serialize};

pub type UnitId = String;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "LIGHT")]
    Light,
    #[serde(rename = "HEAVY")]
    Heavy,
}

/// Resource codes accepted by transfer and pickup primitives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Ice = 0,
    Ore = 1,
    Water = 2,
    Metal = 3,
    Power = 4,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    #[serde(default)]
    pub ice: u32,
    #[serde(default)]
    pub ore: u32,
}

impl Cargo {
    pub fn amount(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Ice => self.ice,
            ResourceKind::Ore => self.ore,
            _ => 0,
        }
    }
}

/// Per-type costs and capacities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProfile {
    pub move_cost: u32,
    /// Percent of a cell's rubble added to the move cost of entering it.
    pub rubble_move_percent: u32,
    /// Added to `move_cost` during the night band of the day cycle.
    pub night_surcharge: u32,
    pub dig_cost: u32,
    /// Power charged by the host whenever a new queue is submitted.
    pub queue_overhead: u32,
    pub cargo_capacity: u32,
    pub battery_capacity: u32,
    /// Power the budgeter never spends on gathering.
    pub power_reserve: u32,
}

impl UnitProfile {
    pub fn light() -> Self {
        UnitProfile {
            move_cost: 1,
            rubble_move_percent: 5,
            night_surcharge: 1,
            dig_cost: 5,
            queue_overhead: 1,
            cargo_capacity: 100,
            battery_capacity: 150,
            power_reserve: 30,
        }
    }

    pub fn heavy() -> Self {
        UnitProfile {
            move_cost: 20,
            rubble_move_percent: 100,
            night_surcharge: 10,
            dig_cost: 60,
            queue_overhead: 10,
            cargo_capacity: 1000,
            battery_capacity: 3000,
            power_reserve: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_id: UnitId,
    pub unit_type: UnitType,
    pub pos: Location,
    pub power: u32,
    #[serde(default)]
    pub cargo: Cargo,
    /// Queue the host is still executing for this unit.
    #[serde(default)]
    pub action_queue: Vec<Action>,
}

impl Unit {
    pub fn new(unit_id: impl Into<UnitId>, unit_type: UnitType, pos: Location, power: u32) -> Self {
        Unit {
            unit_id: unit_id.into(),
            unit_type,
            pos,
            power,
            cargo: Cargo::default(),
            action_queue: Vec::new(),
        }
    }

    pub fn with_cargo(mut self, ice: u32, ore: u32) -> Self {
        self.cargo = Cargo { ice, ore };
        self
    }
}
