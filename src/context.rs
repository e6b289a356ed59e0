use crate::base::{Base, BaseId};
use crate::config::ControllerConfig;
use crate::snapshot::WorldSnapshot;
use crate::terrain::Grid;
use crate::unit::Unit;

/// Read-only view of the world shared by every planning call in a turn.
pub struct TurnContext<'a> {
    pub grid: &'a Grid,
    pub config: &'a ControllerConfig,
    pub time: u32,
    pub units: &'a [Unit],
    pub bases: &'a [Base],
    pub hostile_units: &'a [Unit],
    pub hostile_bases: &'a [Base],
    /// Lichen strains owned by the controlled side.
    pub strains: Vec<u16>,
    pub hostile_strains: Vec<u16>,
}

impl<'a> TurnContext<'a> {
    pub fn new(snapshot: &'a WorldSnapshot, config: &'a ControllerConfig) -> Self {
        TurnContext {
            grid: &snapshot.grid,
            config,
            time: snapshot.time,
            units: &snapshot.units,
            bases: &snapshot.bases,
            hostile_units: &snapshot.hostile_units,
            hostile_bases: &snapshot.hostile_bases,
            strains: snapshot.bases.iter().filter_map(|b| b.strain_id).collect(),
            hostile_strains: snapshot
                .hostile_bases
                .iter()
                .filter_map(|b| b.strain_id)
                .collect(),
        }
    }

    pub fn base(&self, base_id: &BaseId) -> Option<&'a Base> {
        self.bases.iter().find(|b| &b.base_id == base_id)
    }

    /// Closest controlled base to `unit` by squared distance.
    pub fn closest_base(&self, unit: &Unit) -> Option<&'a Base> {
        self.bases.iter().min_by_key(|b| b.pos.distance_sq(unit.pos))
    }

    pub fn on_hostile_base(&self, unit: &Unit) -> bool {
        self.hostile_bases.iter().any(|b| b.contains(unit.pos))
    }
}
