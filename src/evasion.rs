//! Threat response.
//!
//! Before a unit follows its role it checks the hostile units around it. A
//! threat either sends it home (retreat, or a recharge flight for lights) or
//! has it step toward the hostile with the hostile-unit layer relaxed. Hostiles
//! are checked in snapshot order and the first one that triggers wins.

use crate::action::*;
use crate::base::Base;
use crate::behaviors::power_recharge;
use crate::context::TurnContext;
use crate::pathing::move_toward;
use crate::reservation::ReservationTable;
use crate::unit::{Unit, UnitType};
use log::*;

/// Manhattan radius inside which a hostile heavy threatens a heavy.
pub const HEAVY_THREAT_RADIUS: u32 = 2;
/// Manhattan radius inside which any hostile threatens a light.
pub const LIGHT_THREAT_RADIUS: u32 = 1;
/// Power a retreating heavy wants above the threat's.
const RETREAT_MARGIN: u32 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EvasionState {
    Normal,
    Retreating,
    CounterMoving,
}

/// A triggered threat and the hostile that caused it.
#[derive(Copy, Clone, Debug)]
pub struct Threat<'a> {
    pub state: EvasionState,
    pub hostile: &'a Unit,
}

pub fn assess<'a>(ctx: &TurnContext<'a>, unit: &Unit) -> Option<Threat<'a>> {
    let config = ctx.config;

    for hostile in ctx.hostile_units {
        let distance = unit.pos.distance_to(hostile.pos);
        let state = match unit.unit_type {
            UnitType::Heavy => {
                if unit.power < config.heavy_evade_above
                    || hostile.unit_type != UnitType::Heavy
                    || distance > HEAVY_THREAT_RADIUS
                    || ctx.on_hostile_base(hostile)
                {
                    continue;
                }
                if hostile.power >= unit.power {
                    EvasionState::Retreating
                } else {
                    EvasionState::CounterMoving
                }
            }
            UnitType::Light => {
                if distance > LIGHT_THREAT_RADIUS {
                    continue;
                }
                if unit.power <= hostile.power
                    || unit.power < config.light_flee_below
                    || hostile.unit_type == UnitType::Heavy
                {
                    EvasionState::Retreating
                } else if !ctx.on_hostile_base(hostile) {
                    EvasionState::CounterMoving
                } else {
                    continue;
                }
            }
        };

        return Some(Threat { state, hostile });
    }

    None
}

/// Evasion queue for `unit`, or `None` when nothing threatens it.
pub fn evade(
    ctx: &TurnContext,
    unit: &Unit,
    home: &Base,
    reservations: &ReservationTable,
) -> Option<(EvasionState, ActionQueue)> {
    let threat = assess(ctx, unit)?;

    debug!(
        "{}: {:?} from {} at {:?}",
        unit.unit_id, threat.state, threat.hostile.unit_id, threat.hostile.pos
    );

    let queue = match (threat.state, unit.unit_type) {
        (EvasionState::Retreating, UnitType::Heavy) => retreat(ctx, unit, threat.hostile, home, reservations),
        (EvasionState::Retreating, UnitType::Light) => power_recharge(ctx, unit, home, reservations),
        (EvasionState::CounterMoving, _) => move_toward(ctx, unit, threat.hostile.pos, reservations, true),
        (EvasionState::Normal, _) => return None,
    };

    Some((threat.state, queue))
}

/// Tops up enough to out-power the threat when next to home, otherwise heads
/// home.
pub fn retreat(
    ctx: &TurnContext,
    unit: &Unit,
    hostile: &Unit,
    home: &Base,
    reservations: &ReservationTable,
) -> ActionQueue {
    if unit.pos.distance_to(home.pos) > 1 {
        return move_toward(ctx, unit, home.pos, reservations, false);
    }

    let profile = ctx.config.profile(unit.unit_type);
    let wanted = (hostile.power + RETREAT_MARGIN)
        .saturating_sub(unit.power)
        .min(home.power)
        .min(profile.battery_capacity.saturating_sub(unit.power));

    if wanted == 0 {
        ActionQueue::new()
    } else {
        ActionQueue::single(Action::pickup_power(wanted))
    }
}
