//! Public API for the turn controller.
//!
//! The `ControllerBuilder` provides a fluent, append-only API for configuring
//! a `Controller`. The controller is then fed one `WorldSnapshot` per turn and
//! answers with the queues and base commands to submit.

use crate::action::{Action, ActionQueue};
use crate::base::Base;
use crate::behaviors::{heavy, light, Decision, UnitInput};
use crate::budget::RouteBudget;
use crate::config::*;
use crate::context::TurnContext;
use crate::evasion::evade;
use crate::location::Location;
use crate::reservation::ReservationTable;
use crate::roles::*;
use crate::snapshot::*;
use crate::unit::{Unit, UnitId, UnitProfile, UnitType};
use fnv::{FnvHashMap, FnvHashSet};
use log::*;

/// Append-only builder for configuring the controller.
pub struct ControllerBuilder {
    config: ControllerConfig,
}

impl ControllerBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        ControllerBuilder {
            config: ControllerConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn role_caps(mut self, caps: RoleCaps) -> Self {
        self.config.caps = caps;
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.config.schedule = schedule;
        self
    }

    pub fn profile(mut self, unit_type: UnitType, profile: UnitProfile) -> Self {
        match unit_type {
            UnitType::Light => self.config.light = profile,
            UnitType::Heavy => self.config.heavy = profile,
        }
        self
    }

    pub fn build(self) -> Controller {
        Controller {
            config: self.config,
            inventory: Inventory::default(),
        }
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        ControllerBuilder::new()
    }
}

/// Units the controller has seen, in first-seen order, with their records.
#[derive(Clone, Debug, Default)]
struct Inventory {
    order: Vec<UnitId>,
    records: FnvHashMap<UnitId, UnitRecord>,
}

impl Inventory {
    /// Brings the inventory in line with this turn's units and bases and
    /// returns the roster index for the turn.
    fn sync(&mut self, snapshot: &WorldSnapshot, caps: &RoleCaps) -> Roster {
        let present: FnvHashSet<&str> = snapshot.units.iter().map(|u| u.unit_id.as_str()).collect();
        let lost = self.order.len();
        self.order.retain(|id| present.contains(id.as_str()));
        self.records.retain(|id, _| present.contains(id.as_str()));
        if self.order.len() < lost {
            debug!("{} units lost since last turn", lost - self.order.len());
        }

        for unit in &snapshot.units {
            if !self.order.contains(&unit.unit_id) {
                self.order.push(unit.unit_id.clone());
            }
        }

        let bases = &snapshot.bases;
        let base_exists = |id: &str| bases.iter().any(|b| b.base_id == id);
        let mut roster = Roster::rebuild(
            self.records
                .iter()
                .filter(|(_, record)| base_exists(&record.home)),
        );

        for unit_id in &self.order {
            let unit = match snapshot.units.iter().find(|u| &u.unit_id == unit_id) {
                Some(unit) => unit,
                None => continue,
            };

            let stale = match self.records.get(unit_id) {
                Some(record) if base_exists(&record.home) => continue,
                Some(record) => Some(record.home.clone()),
                None => None,
            };

            let home = match bases.iter().min_by_key(|b| b.pos.distance_sq(unit.pos)) {
                Some(home) => home,
                None => continue,
            };

            let record = place_unit(&mut roster, bases, unit, home, caps);
            match stale {
                Some(old) => info!(
                    "{}: home {} is gone, now {:?} at {}",
                    unit_id, old, record.role, record.home
                ),
                None => debug!("{}: new {:?} at {}", unit_id, record.role, record.home),
            }
            self.records.insert(unit_id.clone(), record);
        }

        roster
    }
}

pub struct Controller {
    config: ControllerConfig,
    inventory: Inventory,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        ControllerBuilder::new().config(config).build()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn record(&self, unit_id: &str) -> Option<&UnitRecord> {
        self.inventory.records.get(unit_id)
    }

    /// Unit ids in planning order.
    pub fn inventory(&self) -> &[UnitId] {
        &self.inventory.order
    }

    /// Plans one turn.
    pub fn act(&mut self, snapshot: &WorldSnapshot) -> TurnOutput {
        let roster = self.inventory.sync(snapshot, &self.config.caps);
        let ctx = TurnContext::new(snapshot, &self.config);
        let mut reservations =
            ReservationTable::seeded(ctx.bases, ctx.hostile_bases, ctx.units, ctx.hostile_units);

        let units: FnvHashMap<&str, &Unit> = snapshot
            .units
            .iter()
            .map(|u| (u.unit_id.as_str(), u))
            .collect();
        let ordered: Vec<&Unit> = self
            .inventory
            .order
            .iter()
            .filter_map(|id| units.get(id.as_str()).copied())
            .collect();

        let carried = claim_carried_queues(&ordered, &mut reservations);

        let mut output = TurnOutput::default();
        for unit in ordered {
            let record = match self.inventory.records.get(&unit.unit_id) {
                Some(record) => record,
                None => continue,
            };
            let home = match ctx.base(&record.home) {
                Some(home) => home,
                None => continue,
            };

            let input = UnitInput {
                unit,
                home,
                role: record.role,
                roster_size: roster.total(&home.base_id),
                has_queue: carried.contains_key(unit.unit_id.as_str()),
            };

            let decision = match evade(&ctx, unit, home, &reservations) {
                Some((_, queue)) => Decision::Submit(queue),
                None => match unit.unit_type {
                    UnitType::Heavy => heavy::plan(&ctx, &input, &reservations),
                    UnitType::Light => light::plan(&ctx, &input, &reservations),
                },
            };

            let previous = carried.get(unit.unit_id.as_str()).copied();
            let mut submitted = match decision {
                Decision::Submit(queue) => commit(&ctx, unit, queue, previous, &mut reservations),
                Decision::Continue => None,
            };

            // A contested host queue would otherwise keep running.
            if submitted.is_none() && previous.is_none() && !unit.action_queue.is_empty() {
                let stay = ActionQueue::single(Action::stay());
                submitted = commit(&ctx, unit, stay, None, &mut reservations);
                if submitted.is_none() {
                    warn!("{}: cannot afford to cancel a contested queue", unit.unit_id);
                }
            }

            if let Some(queue) = submitted {
                output.unit_actions.insert(unit.unit_id.clone(), queue);
            }
        }

        for base in ctx.bases {
            if let Some(command) = base_command(&self.config, &roster, base, ctx.time) {
                output.base_commands.insert(base.base_id.clone(), command);
            }
        }

        trace!(
            "Turn {}: {} queues, {} base commands, {} cells claimed",
            ctx.time,
            output.unit_actions.len(),
            output.base_commands.len(),
            reservations.claimed_count()
        );

        output
    }
}

/// Claims the next cell of every queue the host is still running, in
/// planning order. Units whose next cell is already taken, or would step
/// onto an occupied or fixed cell, are left out and get replanned.
fn claim_carried_queues<'a>(
    units: &[&'a Unit],
    reservations: &mut ReservationTable,
) -> FnvHashMap<&'a str, Location> {
    let mut carried = FnvHashMap::default();

    for unit in units {
        if unit.action_queue.is_empty() {
            continue;
        }
        let queue = ActionQueue::from_actions(unit.action_queue.clone());
        let next = queue.first_step(unit.pos);
        let open = next.filter(|&cell| cell == unit.pos || reservations.is_free(cell));
        match open {
            Some(cell) if reservations.claim(cell) => {
                carried.insert(unit.unit_id.as_str(), cell);
            }
            _ => debug!(
                "{}: running queue collides at {:?}, replanning",
                unit.unit_id, next
            ),
        }
    }

    carried
}

/// Checks a replacement queue against the power budget and the reservation
/// table. Returns the queue to submit, if any.
fn commit(
    ctx: &TurnContext,
    unit: &Unit,
    mut queue: ActionQueue,
    previous: Option<Location>,
    reservations: &mut ReservationTable,
) -> Option<ActionQueue> {
    let budget = RouteBudget::new(ctx.grid, ctx.config.profile(unit.unit_type));
    if budget.trim_to_budget(unit.pos, unit.power, &mut queue, ctx.time) {
        warn!("{}: queue cut to {} to stay within power", unit.unit_id, queue.len());
    }
    if queue.is_empty() {
        return None;
    }

    if let Some(previous) = previous {
        reservations.release(previous);
    }

    let claimed = queue
        .first_step(unit.pos)
        .map(|next| reservations.claim(next))
        .unwrap_or(false);
    if !claimed {
        debug!("{}: first step of new queue is taken, holding", unit.unit_id);
        if let Some(previous) = previous {
            reservations.claim(previous);
        }
        return None;
    }

    Some(queue)
}

/// What a base should do this turn.
pub fn base_command(config: &ControllerConfig, roster: &Roster, base: &Base, time: u32) -> Option<BaseCommand> {
    let can_afford = |cost: &BuildCost| base.metal >= cost.metal && base.power >= cost.power;
    let count = |role| roster.count(&base.base_id, role);
    let caps = &config.caps;
    let schedule = &config.schedule;

    if count(Role::Homer) < caps.homers {
        if can_afford(&config.heavy_cost) {
            return Some(BaseCommand::BuildHeavy);
        }
    } else if can_afford(&config.light_cost) {
        let understaffed = count(Role::Miner) < caps.miners
            || count(Role::Helper) < caps.helpers
            || count(Role::Digger) < caps.diggers;
        let late_build = time > schedule.late_build_after
            && schedule.late_build_interval > 0
            && time % schedule.late_build_interval == 0;

        if understaffed || late_build {
            return Some(BaseCommand::BuildLight);
        }
    }

    if base.water > config.water_floor && time > schedule.water_after {
        return Some(BaseCommand::Water);
    }

    None
}
