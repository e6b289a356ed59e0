//! Round-trip queue assembly.
//!
//! A gather queue is, in order: a transfer of carried cargo when the unit is
//! at its base, a power pickup when the unit is on its base and low, the
//! outbound route, one single-dig primitive per affordable gather, and the
//! route back to the base. A trip that affords no gathers is discarded.

use crate::action::*;
use crate::base::Base;
use crate::budget::RouteBudget;
use crate::context::TurnContext;
use crate::error::PlanError;
use crate::location::*;
use crate::pathing::*;
use crate::reservation::ReservationTable;
use crate::unit::{ResourceKind, Unit, UnitType};
use log::*;

/// What to gather, where, and where to bring it.
pub struct GatherRequest<'a> {
    /// Cargo the trip produces. `None` when digging rubble.
    pub resource: Option<ResourceKind>,
    pub target: Location,
    pub base: &'a Base,
    /// Cell the inbound leg ends on.
    pub drop_off: Location,
}

impl<'a> GatherRequest<'a> {
    /// Trip to `target` returning to the base tile nearest it.
    pub fn to_base(resource: Option<ResourceKind>, target: Location, base: &'a Base) -> Self {
        GatherRequest {
            resource,
            target,
            base,
            drop_off: base.nearest_tile(target),
        }
    }
}

/// Power a unit standing on `base` should pick up before leaving.
pub fn pickup_amount(ctx: &TurnContext, unit: &Unit, base: &Base) -> u32 {
    if ctx.time <= ctx.config.schedule.pickup_after || !base.contains(unit.pos) {
        return 0;
    }
    if unit.unit_type == UnitType::Light && unit.power >= ctx.config.light_topup_below {
        return 0;
    }

    recharge_amount(ctx, unit, base)
}

/// Power a unit draws when recharging at `base`, limited by what the base
/// holds and what the battery can take.
pub fn recharge_amount(ctx: &TurnContext, unit: &Unit, base: &Base) -> u32 {
    let profile = ctx.config.profile(unit.unit_type);
    let wanted = match unit.unit_type {
        UnitType::Light => ctx.config.light_topup_target.saturating_sub(unit.power),
        UnitType::Heavy => heavy_pickup(base.power),
    };

    wanted
        .min(base.power)
        .min(profile.battery_capacity.saturating_sub(unit.power))
}

/// Share of a base's power a heavy draws, keeping more back as the base
/// runs low.
pub fn heavy_pickup(base_power: u32) -> u32 {
    if base_power < 1000 {
        base_power.saturating_sub(50)
    } else if base_power < 3000 {
        1000 + (base_power - 1000) / 2
    } else {
        2000 + base_power % 1000
    }
}

pub fn build_gather_queue(
    ctx: &TurnContext,
    unit: &Unit,
    request: &GatherRequest,
    reservations: &ReservationTable,
) -> Result<ActionQueue, PlanError> {
    let profile = ctx.config.profile(unit.unit_type);
    let mut prefix = Vec::new();

    if let Some(resource) = request.resource {
        let carried = unit.cargo.amount(resource);
        if carried > 0 {
            if let Some(direction) = request.base.transfer_direction(unit.pos) {
                prefix.push(Action::transfer(direction, resource, carried));
            }
        }
    }

    let pickup = pickup_amount(ctx, unit, request.base);
    if pickup > 0 {
        prefix.push(Action::pickup_power(pickup));
    }

    let outbound = if unit.pos == request.target {
        vec![unit.pos]
    } else {
        route(ctx, unit, request.target, reservations, false)?.cells
    };

    let inbound = match find_path(
        ctx.grid,
        request.target,
        request.drop_off,
        profile,
        ctx.time,
        reservations.blocker(false),
    ) {
        Ok(path) => path.cells,
        Err(err) => {
            debug!("{}: {}, budgeting a straight return", unit.unit_id, err);
            straight_path(request.target, request.drop_off)
        }
    };

    let budget = RouteBudget::new(ctx.grid, profile);
    let gathers = budget.afford(
        unit.power,
        &outbound,
        &inbound,
        ctx.time,
        prefix.len(),
        pickup,
    );
    if gathers < 1 {
        return Err(PlanError::Unaffordable { gathers });
    }

    trace!(
        "{}: trip to {:?}, out={} gathers={} back={}",
        unit.unit_id,
        request.target,
        outbound.len() - 1,
        gathers,
        inbound.len() - 1
    );

    let gather = vec![Action::dig(1); gathers as usize];
    Ok(ActionQueue::assemble(
        &prefix,
        &path_to_moves(&outbound),
        &gather,
        &path_to_moves(&inbound),
    ))
}
