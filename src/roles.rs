//! Role assignment.
//!
//! A unit's home base is stored on its record; the per-base roster is an
//! index rebuilt from those records and is never edited independently.

use crate::base::{Base, BaseId};
use crate::config::RoleCaps;
use crate::unit::{Unit, UnitId, UnitType};
use fnv::{FnvHashMap, FnvHashSet};
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Heavy that keeps the base supplied with ice.
    Homer,
    /// Any further heavy at the base.
    Sentry,
    Miner,
    Helper,
    Digger,
    /// Light that found every cap full and was sent elsewhere.
    Newb,
}

/// Controller-side state kept for a unit across turns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub role: Role,
    pub home: BaseId,
}

#[derive(Clone, Debug, Default)]
pub struct BaseRoster {
    members: FnvHashMap<Role, FnvHashSet<UnitId>>,
}

impl BaseRoster {
    pub fn count(&self, role: Role) -> usize {
        self.members.get(&role).map(|m| m.len()).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.members.values().map(|m| m.len()).sum()
    }

    pub fn insert(&mut self, role: Role, unit_id: UnitId) {
        self.members.entry(role).or_default().insert(unit_id);
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.members.values().any(|m| m.contains(unit_id))
    }
}

/// Roster index keyed by base.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    bases: FnvHashMap<BaseId, BaseRoster>,
}

impl Roster {
    pub fn rebuild<'a>(records: impl IntoIterator<Item = (&'a UnitId, &'a UnitRecord)>) -> Self {
        let mut roster = Roster::default();
        for (unit_id, record) in records {
            roster.insert(&record.home, record.role, unit_id.clone());
        }
        roster
    }

    pub fn get(&self, base_id: &str) -> Option<&BaseRoster> {
        self.bases.get(base_id)
    }

    pub fn count(&self, base_id: &str, role: Role) -> usize {
        self.get(base_id).map(|r| r.count(role)).unwrap_or(0)
    }

    pub fn total(&self, base_id: &str) -> usize {
        self.get(base_id).map(|r| r.total()).unwrap_or(0)
    }

    pub fn insert(&mut self, base_id: &BaseId, role: Role, unit_id: UnitId) {
        self.bases
            .entry(base_id.clone())
            .or_default()
            .insert(role, unit_id);
    }

    /// Base with the fewest homed units; ties go to the earliest base.
    pub fn least_populated<'a>(&self, bases: &'a [Base]) -> Option<&'a Base> {
        bases
            .iter()
            .enumerate()
            .min_by_key(|(index, base)| (self.total(&base.base_id), *index))
            .map(|(_, base)| base)
    }
}

/// First role with space at a base, or `None` when every cap for the unit's
/// type is full. Heavies always get a role.
pub fn assign_role(roster: Option<&BaseRoster>, unit_type: UnitType, caps: &RoleCaps) -> Option<Role> {
    let count = |role| roster.map(|r| r.count(role)).unwrap_or(0);

    match unit_type {
        UnitType::Heavy => {
            if count(Role::Homer) < caps.homers {
                Some(Role::Homer)
            } else {
                Some(Role::Sentry)
            }
        }
        UnitType::Light => [
            (Role::Miner, caps.miners),
            (Role::Helper, caps.helpers),
            (Role::Digger, caps.diggers),
        ]
        .into_iter()
        .find(|(role, cap)| count(*role) < *cap)
        .map(|(role, _)| role),
    }
}

/// Decides a record for `unit` homed at `home`, rehoming overflow lights to
/// the least populated base. The roster is updated in place.
pub fn place_unit(roster: &mut Roster, bases: &[Base], unit: &Unit, home: &Base, caps: &RoleCaps) -> UnitRecord {
    let record = match assign_role(roster.get(&home.base_id), unit.unit_type, caps) {
        Some(role) => UnitRecord {
            role,
            home: home.base_id.clone(),
        },
        None => {
            let target = roster.least_populated(bases).unwrap_or(home);
            info!(
                "{}: caps full at {}, sent to {} as overflow",
                unit.unit_id, home.base_id, target.base_id
            );
            UnitRecord {
                role: Role::Newb,
                home: target.base_id.clone(),
            }
        }
    };

    roster.insert(&record.home, record.role, unit.unit_id.clone());
    record
}
