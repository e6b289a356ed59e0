//! Per-turn cell claims.
//!
//! Every unit moves simultaneously but is planned one after another. Once a
//! unit's first step is decided it claims the destination cell, and every unit
//! planned afterwards in the same turn treats that cell as blocked. Earlier
//! units therefore win contested cells.

use crate::base::Base;
use crate::location::*;
use crate::unit::Unit;
use fnv::FnvHashSet;
use log::*;

#[derive(Clone, Debug, Default)]
pub struct ReservationTable {
    /// Cells taken by a committed first step this turn.
    claimed: FnvHashSet<Location>,
    /// Cells that never accept a planned step: hostile bases and spawn cells.
    fixed: FnvHashSet<Location>,
    /// Controlled unit positions at the start of the turn.
    friendly: FnvHashSet<Location>,
    /// Visible hostile units. Ignored while evading.
    hostile: FnvHashSet<Location>,
}

impl ReservationTable {
    pub fn new() -> Self {
        ReservationTable::default()
    }

    /// Builds the table for a new turn.
    pub fn seeded(
        own_bases: &[Base],
        hostile_bases: &[Base],
        own_units: &[Unit],
        hostile_units: &[Unit],
    ) -> Self {
        let mut table = ReservationTable::new();

        for base in own_bases {
            table.fixed.insert(base.pos);
        }
        for base in hostile_bases {
            table.fixed.extend(base.footprint());
        }
        table.friendly.extend(own_units.iter().map(|u| u.pos));
        table.hostile.extend(hostile_units.iter().map(|u| u.pos));

        trace!(
            "Reservations seeded: fixed={}, friendly={}, hostile={}",
            table.fixed.len(),
            table.friendly.len(),
            table.hostile.len()
        );

        table
    }

    pub fn is_free(&self, loc: Location) -> bool {
        self.is_free_for(loc, false)
    }

    /// Like [`is_free`](Self::is_free), optionally ignoring hostile units.
    pub fn is_free_for(&self, loc: Location, evading: bool) -> bool {
        !self.claimed.contains(&loc)
            && !self.fixed.contains(&loc)
            && !self.friendly.contains(&loc)
            && (evading || !self.hostile.contains(&loc))
    }

    pub fn is_claimed(&self, loc: Location) -> bool {
        self.claimed.contains(&loc)
    }

    /// Claims `loc` for a committed step. Returns false and leaves the table
    /// unchanged when another unit already holds it.
    pub fn claim(&mut self, loc: Location) -> bool {
        self.claimed.insert(loc)
    }

    /// Drops a claim made for a queue that is being replaced.
    pub fn release(&mut self, loc: Location) {
        self.claimed.remove(&loc);
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// Predicate form consumed by the path planner.
    pub fn blocker(&self, evading: bool) -> impl Fn(Location) -> bool + '_ {
        move |loc| !self.is_free_for(loc, evading)
    }
}
