//! Per-role planning.
//!
//! Each behavior inspects one unit and either keeps the queue the host is
//! still running or submits a replacement. An empty replacement is a hold.

pub mod heavy;
pub mod light;

use crate::action::*;
use crate::base::Base;
use crate::constants::*;
use crate::context::TurnContext;
use crate::location::*;
use crate::pathing::move_toward;
use crate::queue_builder::recharge_amount;
use crate::reservation::ReservationTable;
use crate::roles::Role;
use crate::targeting::*;
use crate::unit::{ResourceKind, Unit};
use fnv::FnvHashSet;

/// Power a unit keeps back when digging in place.
const DIG_RESERVE: u32 = 20;
/// Extra power kept back when digging hostile lichen.
const RAID_RESERVE: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Leave the queue the host is executing untouched.
    Continue,
    /// Replace the unit's queue. Empty means hold this turn.
    Submit(ActionQueue),
}

impl Decision {
    pub fn hold() -> Self {
        Decision::Submit(ActionQueue::new())
    }
}

/// Everything a behavior knows about the unit being planned.
pub struct UnitInput<'a> {
    pub unit: &'a Unit,
    pub home: &'a Base,
    pub role: Role,
    /// Units currently homed at `home`.
    pub roster_size: usize,
    /// The host still runs an uncontested queue for this unit.
    pub has_queue: bool,
}

/// Cells a unit should not target: other units, hostile base footprints and
/// anything already claimed this turn.
pub fn excluded_cells<'r>(
    ctx: &TurnContext,
    unit: &Unit,
    include_hostiles: bool,
    reservations: &'r ReservationTable,
) -> impl Fn(Location) -> bool + 'r {
    let occupied: FnvHashSet<Location> = occupied_cells(ctx, &unit.unit_id, include_hostiles);
    move |loc| occupied.contains(&loc) || reservations.is_claimed(loc)
}

/// Pickup when standing on an unclaimed footprint tile, otherwise a step
/// toward the base.
pub fn power_recharge(
    ctx: &TurnContext,
    unit: &Unit,
    base: &Base,
    reservations: &ReservationTable,
) -> ActionQueue {
    if base.contains(unit.pos) && !reservations.is_claimed(unit.pos) {
        let amount = recharge_amount(ctx, unit, base);
        if amount == 0 {
            return ActionQueue::new();
        }
        return ActionQueue::single(Action::pickup_power(amount));
    }

    move_toward(ctx, unit, base.pos, reservations, false)
}

/// Transfers all carried `resource` into the base once in reach, otherwise
/// heads for it.
pub fn deliver_payload(
    ctx: &TurnContext,
    unit: &Unit,
    resource: ResourceKind,
    base: &Base,
    reservations: &ReservationTable,
) -> ActionQueue {
    let amount = unit.cargo.amount(resource);
    if amount == 0 {
        return ActionQueue::new();
    }

    match base.transfer_direction(unit.pos) {
        Some(direction) => ActionQueue::single(Action::transfer(direction, resource, amount)),
        None => move_toward(ctx, unit, base.pos, reservations, false),
    }
}

/// Number of digs a unit can pay for in place while keeping `reserve`.
fn affordable_digs(ctx: &TurnContext, unit: &Unit, reserve: u32) -> u32 {
    let profile = ctx.config.profile(unit.unit_type);
    if profile.dig_cost == 0 || unit.power < profile.dig_cost + profile.queue_overhead + DIG_RESERVE {
        return 0;
    }

    let spendable = unit.power.saturating_sub(profile.queue_overhead + reserve);
    (spendable / profile.dig_cost).min(MAX_QUEUE_LENGTH as u32)
}

/// Single-dig primitives on the current cell.
pub fn dig_underfoot(ctx: &TurnContext, unit: &Unit) -> ActionQueue {
    let digs = affordable_digs(ctx, unit, DIG_RESERVE);
    ActionQueue::from_actions(vec![Action::dig(1); digs as usize])
}

/// Digs rubble under the unit when it is the best target, otherwise moves
/// toward the best rubble near `origin`.
pub fn dig_rubble(
    ctx: &TurnContext,
    unit: &Unit,
    origin: Location,
    reservations: &ReservationTable,
) -> ActionQueue {
    let excluded = excluded_cells(ctx, unit, false, reservations);
    match rubble_target(ctx.grid, origin, excluded) {
        Some(target) if target == unit.pos => dig_underfoot(ctx, unit),
        Some(target) => move_toward(ctx, unit, target, reservations, false),
        None => ActionQueue::new(),
    }
}

/// Moves onto the nearest hostile lichen and digs it out with one repeated
/// dig.
pub fn attack_lichen(
    ctx: &TurnContext,
    unit: &Unit,
    reservations: &ReservationTable,
) -> ActionQueue {
    let target = match closest_hostile_lichen(ctx, &unit.unit_id, unit.pos) {
        Some(target) => target,
        None => return ActionQueue::new(),
    };

    if target != unit.pos {
        return move_toward(ctx, unit, target, reservations, false);
    }

    if affordable_digs(ctx, unit, DIG_RESERVE) == 0 {
        return ActionQueue::new();
    }
    let digs = affordable_digs(ctx, unit, RAID_RESERVE).max(1);
    ActionQueue::single(Action::dig(digs))
}
