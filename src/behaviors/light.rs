use super::*;
use crate::error::PlanError;
use crate::queue_builder::{build_gather_queue, recharge_amount, GatherRequest};
use log::*;

/// Miners deliver once carrying this much while the base is understaffed.
const EARLY_DELIVERY_ORE: u32 = 25;
const SMALL_ROSTER: usize = 4;
/// Miners deliver once carrying more than this.
const FULL_LOAD_ORE: u32 = 98;
/// Manhattan reach from the base for ore mining.
const ORE_REACH: u32 = 16;
/// Diggers only raid lichen this close before the end game.
const RAID_REACH: u32 = 12;

pub fn plan(ctx: &TurnContext, input: &UnitInput, reservations: &ReservationTable) -> Decision {
    let unit = input.unit;
    let home = input.home;
    let config = ctx.config;
    let endgame = ctx.time >= config.schedule.endgame_from;

    if unit.power < config.light_stranded_below && !home.contains(unit.pos) {
        debug!("{}: stranded with {} power", unit.unit_id, unit.power);
        return Decision::hold();
    }

    if unit.power < config.light_recharge_below {
        let base = if endgame {
            ctx.closest_base(unit).unwrap_or(home)
        } else {
            home
        };
        return Decision::Submit(power_recharge(ctx, unit, base, reservations));
    }

    if endgame {
        if home.contains(unit.pos) && unit.power < config.light_topup_below {
            let amount = recharge_amount(ctx, unit, home);
            if amount > 0 {
                return Decision::Submit(ActionQueue::single(Action::pickup_power(amount)));
            }
        }

        let (_, hostile_lichen) = lichen_balance(ctx);
        if !input.has_queue && hostile_lichen > 0 {
            return Decision::Submit(attack_lichen(ctx, unit, reservations));
        }
    }

    if unit.cargo.ore > 0 && input.role != Role::Miner {
        return Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ore, home, reservations));
    }

    if input.role == Role::Miner && !endgame {
        return miner(ctx, input, reservations);
    }

    if input.role == Role::Digger && ctx.time > config.schedule.digger_raid_after {
        if let Some(decision) = raid(ctx, input, reservations, endgame) {
            return decision;
        }
    }

    if input.has_queue {
        return Decision::Continue;
    }

    if ctx.grid.rubble_at(unit.pos) > 0 && !reservations.is_claimed(unit.pos) {
        let queue = dig_underfoot(ctx, unit);
        if !queue.is_empty() {
            return Decision::Submit(queue);
        }
    }

    let origin = match input.role {
        Role::Helper => home.pos,
        _ => unit.pos,
    };
    Decision::Submit(dig_rubble(ctx, unit, origin, reservations))
}

fn miner(ctx: &TurnContext, input: &UnitInput, reservations: &ReservationTable) -> Decision {
    let unit = input.unit;
    let home = input.home;
    let ore = unit.cargo.ore;

    if (ore >= EARLY_DELIVERY_ORE && input.roster_size < SMALL_ROSTER) || ore > FULL_LOAD_ORE {
        return Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ore, home, reservations));
    }

    let excluded = excluded_cells(ctx, unit, true, reservations);
    let target = closest_resource_tile(ctx.grid, ResourceKind::Ore, home.pos, excluded)
        .filter(|tile| tile.distance_to(home.pos) < ORE_REACH);
    let target = match target {
        Some(target) => target,
        None => return Decision::Continue,
    };

    if ctx.grid.rubble_at(unit.pos) > 0 {
        return Decision::Submit(dig_underfoot(ctx, unit));
    }
    if input.has_queue {
        return Decision::Continue;
    }

    let request = GatherRequest::to_base(Some(ResourceKind::Ore), target, home);
    match build_gather_queue(ctx, unit, &request, reservations) {
        Ok(queue) => Decision::Submit(queue),
        Err(err @ PlanError::Unreachable { .. }) => {
            debug!("{}: {}, clearing rubble instead", unit.unit_id, err);
            Decision::Submit(dig_rubble(ctx, unit, unit.pos, reservations))
        }
        Err(err) => {
            debug!("{}: no ore trip: {}", unit.unit_id, err);
            Decision::hold()
        }
    }
}

/// Lichen raid once the hostile side holds more than 40% of our lichen
/// count. Before the end game only nearby lichen is worth the trip.
fn raid(
    ctx: &TurnContext,
    input: &UnitInput,
    reservations: &ReservationTable,
    endgame: bool,
) -> Option<Decision> {
    let (own, hostile) = lichen_balance(ctx);
    if hostile * 10 <= own * 4 {
        return None;
    }

    let target = closest_hostile_lichen(ctx, &input.unit.unit_id, input.home.pos)?;
    if endgame || input.unit.pos.distance_to(target) < RAID_REACH {
        Some(Decision::Submit(attack_lichen(ctx, input.unit, reservations)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::snapshot::WorldSnapshot;
    use crate::terrain::{Grid, ResourceFlags};
    use crate::unit::UnitType;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    fn input<'a>(unit: &'a Unit, home: &'a Base, role: Role) -> UnitInput<'a> {
        UnitInput {
            unit,
            home,
            role,
            roster_size: 5,
            has_queue: false,
        }
    }

    fn submitted(decision: Decision) -> ActionQueue {
        match decision {
            Decision::Submit(queue) => queue,
            Decision::Continue => panic!("expected a new queue"),
        }
    }

    #[test]
    fn miner_builds_an_ore_trip() {
        let mut grid = Grid::new();
        grid.resources.set(loc(10, 14), ResourceFlags::ORE);
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(0, 0, 500);
        let unit = Unit::new("unit_1", UnitType::Light, loc(10, 11), 150);
        let mut snapshot = WorldSnapshot::new(100, grid);
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = submitted(plan(&ctx, &input(&unit, &home, Role::Miner), &ReservationTable::new()));
        assert_eq!(queue.first(), Some(&Action::step(Direction::Down)));
        assert!(queue.iter().any(|a| *a == Action::dig(1)));
    }

    #[test]
    fn charged_miner_takes_a_long_ore_trip() {
        let mut grid = Grid::new();
        grid.resources.set(loc(10, 22), ResourceFlags::ORE);
        let home = Base::new("factory_0", loc(10, 10));
        let unit = Unit::new("unit_1", UnitType::Light, loc(10, 11), 150);
        let mut snapshot = WorldSnapshot::new(100, grid);
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = submitted(plan(&ctx, &input(&unit, &home, Role::Miner), &ReservationTable::new()));
        assert_eq!(queue.first(), Some(&Action::step(Direction::Down)));
        assert!(queue.iter().filter(|a| a.is_move()).count() >= 11);
        assert!(queue.iter().any(|a| *a == Action::dig(1)));
    }

    #[test]
    fn miner_delivers_a_full_load() {
        let home = Base::new("factory_0", loc(10, 10));
        let unit = Unit::new("unit_1", UnitType::Light, loc(10, 11), 150).with_cargo(0, 99);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = submitted(plan(&ctx, &input(&unit, &home, Role::Miner), &ReservationTable::new()));
        assert_eq!(
            queue,
            ActionQueue::single(Action::transfer(Direction::Center, ResourceKind::Ore, 99))
        );
    }

    #[test]
    fn low_light_heads_home() {
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(0, 0, 500);
        let unit = Unit::new("unit_1", UnitType::Light, loc(10, 15), 30);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = submitted(plan(&ctx, &input(&unit, &home, Role::Helper), &ReservationTable::new()));
        assert_eq!(queue, ActionQueue::single(Action::step(Direction::Up)));
    }

    #[test]
    fn helper_clears_rubble_near_home() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(12, 10), 20);
        grid.rubble.set(loc(20, 21), 20);
        let home = Base::new("factory_0", loc(10, 10));
        let unit = Unit::new("unit_1", UnitType::Light, loc(20, 20), 150);
        let mut snapshot = WorldSnapshot::new(100, grid);
        snapshot.units = vec![unit.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);
        let reservations = ReservationTable::new();

        let helper = submitted(plan(&ctx, &input(&unit, &home, Role::Helper), &reservations));
        assert_ne!(helper, ActionQueue::single(Action::step(Direction::Down)));
        assert_eq!(helper.len(), 1);

        let newb = submitted(plan(&ctx, &input(&unit, &home, Role::Newb), &reservations));
        assert_eq!(newb, ActionQueue::single(Action::step(Direction::Down)));
    }

    #[test]
    fn digger_raids_when_behind_on_lichen() {
        let mut grid = Grid::new();
        grid.lichen_strains.set(loc(16, 10), Some(9));
        grid.lichen_strains.set(loc(17, 10), Some(9));
        grid.lichen_strains.set(loc(9, 12), Some(1));
        let home = Base::new("factory_0", loc(10, 10)).with_strain(1);
        let hostile = Base::new("factory_1", loc(30, 30)).with_strain(9);
        let unit = Unit::new("unit_1", UnitType::Light, loc(15, 10), 150);
        let mut snapshot = WorldSnapshot::new(750, grid);
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        snapshot.hostile_bases = vec![hostile];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = submitted(plan(&ctx, &input(&unit, &home, Role::Digger), &ReservationTable::new()));
        assert_eq!(queue, ActionQueue::single(Action::step(Direction::Right)));
    }
}
