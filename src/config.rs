use crate::unit::{UnitProfile, UnitType};
use serde::{Deserialize, Serialize};

/// Per-base role caps, applied in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCaps {
    pub homers: usize,
    pub miners: usize,
    pub helpers: usize,
    pub diggers: usize,
}

impl Default for RoleCaps {
    fn default() -> Self {
        RoleCaps {
            homers: 1,
            miners: 1,
            helpers: 2,
            diggers: 3,
        }
    }
}

/// Metal and power a base spends to build a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCost {
    pub metal: u32,
    pub power: u32,
}

/// Turn indices at which behaviors change phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// No power pickups are queued before this turn.
    pub pickup_after: u32,
    /// Heavies stop making ore trips at this turn.
    pub ore_trips_until: u32,
    /// Diggers may start raiding hostile lichen after this turn.
    pub digger_raid_after: u32,
    /// Every light switches to end-game raiding from this turn.
    pub endgame_from: u32,
    /// Bases start watering after this turn.
    pub water_after: u32,
    /// Bases build extra lights after this turn.
    pub late_build_after: u32,
    pub late_build_interval: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            pickup_after: 10,
            ore_trips_until: 700,
            digger_raid_after: 700,
            endgame_from: 900,
            water_after: 780,
            late_build_after: 800,
            late_build_interval: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub light: UnitProfile,
    pub heavy: UnitProfile,
    pub caps: RoleCaps,
    pub schedule: Schedule,
    pub light_cost: BuildCost,
    pub heavy_cost: BuildCost,
    /// Minimum water a base keeps before it waters lichen.
    pub water_floor: u32,
    /// Heavies below this power go home to recharge.
    pub heavy_recharge_below: u32,
    /// Heavies below this power away from base hold still.
    pub heavy_stranded_below: u32,
    /// Lights below this power go home to recharge.
    pub light_recharge_below: u32,
    pub light_stranded_below: u32,
    /// Lights on base below this power top up.
    pub light_topup_below: u32,
    /// Lights top up to this level.
    pub light_topup_target: u32,
    /// Heavies ignore threats below this power.
    pub heavy_evade_above: u32,
    /// Lights flee any threat below this power.
    pub light_flee_below: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            light: UnitProfile::light(),
            heavy: UnitProfile::heavy(),
            caps: RoleCaps::default(),
            schedule: Schedule::default(),
            light_cost: BuildCost {
                metal: 10,
                power: 50,
            },
            heavy_cost: BuildCost {
                metal: 100,
                power: 500,
            },
            water_floor: 50,
            heavy_recharge_below: 100,
            heavy_stranded_below: 30,
            light_recharge_below: 50,
            light_stranded_below: 8,
            light_topup_below: 100,
            light_topup_target: 150,
            heavy_evade_above: 40,
            light_flee_below: 20,
        }
    }
}

impl ControllerConfig {
    pub fn profile(&self, unit_type: UnitType) -> &UnitProfile {
        match unit_type {
            UnitType::Light => &self.light,
            UnitType::Heavy => &self.heavy,
        }
    }
}
