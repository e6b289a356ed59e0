use super::*;
use crate::queue_builder::{build_gather_queue, GatherRequest};
use log::*;

/// Homers stop delivering ice early once the base is this dry.
const LOW_WATER: u32 = 100;
/// Ice carried before an early delivery is worth it.
const EARLY_DELIVERY_ICE: u32 = 100;
/// Homers only make ore trips while the base roster is this small.
const ORE_TRIP_ROSTER: usize = 3;
const ORE_TRIP_WATER: u32 = 500;
const ORE_TRIP_METAL: u32 = 40;
/// Manhattan reach from the base for heavy ore trips.
const ORE_REACH: u32 = 10;

pub fn plan(ctx: &TurnContext, input: &UnitInput, reservations: &ReservationTable) -> Decision {
    let unit = input.unit;
    let home = input.home;
    let config = ctx.config;
    let profile = config.profile(unit.unit_type);

    if unit.power < config.heavy_stranded_below && !home.contains(unit.pos) {
        debug!("{}: stranded with {} power", unit.unit_id, unit.power);
        return Decision::hold();
    }

    if unit.power < config.heavy_recharge_below {
        return Decision::Submit(power_recharge(ctx, unit, home, reservations));
    }

    if ctx.grid.rubble_at(unit.pos) > 0 {
        if unit.power >= profile.dig_cost + profile.queue_overhead {
            return Decision::Submit(ActionQueue::single(Action::dig(1)));
        }
        return Decision::hold();
    }

    match input.role {
        Role::Homer => homer(ctx, input, reservations),
        _ => sentry(ctx, input, reservations),
    }
}

fn homer(ctx: &TurnContext, input: &UnitInput, reservations: &ReservationTable) -> Decision {
    let unit = input.unit;
    let home = input.home;
    let profile = ctx.config.profile(unit.unit_type);

    let ore_trips_open = input.roster_size <= ORE_TRIP_ROSTER
        && home.water > ORE_TRIP_WATER
        && home.metal < ORE_TRIP_METAL
        && ctx.time < ctx.config.schedule.ore_trips_until;

    if ore_trips_open && !input.has_queue {
        if let Some(ore) = nearby_resource(ctx, input, ResourceKind::Ore, reservations) {
            return gather(ctx, input, ResourceKind::Ore, ore, reservations);
        }
    }

    if home.water < LOW_WATER && unit.cargo.ice > EARLY_DELIVERY_ICE {
        return Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ice, home, reservations));
    }

    if home.contains(unit.pos) && unit.cargo.ore > 0 {
        return Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ore, home, reservations));
    }

    if input.has_queue {
        return Decision::Continue;
    }

    if unit.cargo.ice < profile.cargo_capacity {
        let excluded = excluded_cells(ctx, unit, false, reservations);
        return match closest_resource_tile(ctx.grid, ResourceKind::Ice, home.pos, excluded) {
            Some(ice) => gather(ctx, input, ResourceKind::Ice, ice, reservations),
            None => Decision::hold(),
        };
    }

    Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ice, home, reservations))
}

fn sentry(ctx: &TurnContext, input: &UnitInput, reservations: &ReservationTable) -> Decision {
    let unit = input.unit;

    if unit.cargo.ore > 0 {
        return Decision::Submit(deliver_payload(ctx, unit, ResourceKind::Ore, input.home, reservations));
    }

    if input.has_queue {
        return Decision::Continue;
    }

    if let Some(ore) = nearby_resource(ctx, input, ResourceKind::Ore, reservations) {
        return gather(ctx, input, ResourceKind::Ore, ore, reservations);
    }

    Decision::Submit(dig_rubble(ctx, unit, input.home.pos, reservations))
}

/// Nearest free tile of `resource` within heavy reach of the home base.
fn nearby_resource(
    ctx: &TurnContext,
    input: &UnitInput,
    resource: ResourceKind,
    reservations: &ReservationTable,
) -> Option<Location> {
    let excluded = excluded_cells(ctx, input.unit, false, reservations);
    closest_resource_tile(ctx.grid, resource, input.home.pos, excluded)
        .filter(|tile| tile.distance_to(input.home.pos) < ORE_REACH)
}

fn gather(
    ctx: &TurnContext,
    input: &UnitInput,
    resource: ResourceKind,
    target: Location,
    reservations: &ReservationTable,
) -> Decision {
    let request = GatherRequest::to_base(Some(resource), target, input.home);
    match build_gather_queue(ctx, input.unit, &request, reservations) {
        Ok(queue) => Decision::Submit(queue),
        Err(err) => {
            debug!("{}: no {:?} trip: {}", input.unit.unit_id, resource, err);
            Decision::hold()
        }
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
            roster_size: 1,
            has_queue: false,
        }
    }

    #[test]
    fn low_power_heavy_recharges_on_base() {
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(200, 0, 800);
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(10, 11), 80);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let decision = plan(&ctx, &input(&unit, &home, Role::Homer), &ReservationTable::new());
        assert_eq!(decision, Decision::Submit(ActionQueue::single(Action::pickup_power(750))));
    }

    #[test]
    fn stranded_heavy_holds() {
        let home = Base::new("factory_0", loc(10, 10));
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(20, 20), 25);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let decision = plan(&ctx, &input(&unit, &home, Role::Sentry), &ReservationTable::new());
        assert_eq!(decision, Decision::hold());
    }

    #[test]
    fn homer_heads_out_for_ice() {
        let mut grid = Grid::new();
        grid.resources.set(loc(10, 15), ResourceFlags::ICE);
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(200, 0, 0);
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(10, 11), 1500);
        let mut snapshot = WorldSnapshot::new(100, grid);
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let decision = plan(&ctx, &input(&unit, &home, Role::Homer), &ReservationTable::new());
        let queue = match decision {
            Decision::Submit(queue) => queue,
            other => panic!("expected a trip, got {:?}", other),
        };
        assert_eq!(queue.first(), Some(&Action::step(Direction::Down)));
        assert!(queue.iter().any(|a| *a == Action::dig(1)));
    }

    #[test]
    fn full_homer_reaches_distant_ice() {
        let mut grid = Grid::new();
        grid.resources.set(loc(10, 21), ResourceFlags::ICE);
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(200, 0, 3000);
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(10, 11), 3000);
        let mut snapshot = WorldSnapshot::new(100, grid);
        snapshot.units = vec![unit.clone()];
        snapshot.bases = vec![home.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let queue = match plan(&ctx, &input(&unit, &home, Role::Homer), &ReservationTable::new()) {
            Decision::Submit(queue) => queue,
            other => panic!("expected a trip, got {:?}", other),
        };
        assert_eq!(&queue.as_slice()[..10], &[Action::step(Direction::Down); 10]);
        assert_eq!(queue.iter().filter(|a| **a == Action::dig(1)).count(), 10);
    }

    #[test]
    fn homer_with_running_queue_is_left_alone() {
        let home = Base::new("factory_0", loc(10, 10)).with_stocks(200, 0, 0);
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(10, 14), 1500);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let mut homer = input(&unit, &home, Role::Homer);
        homer.has_queue = true;
        assert_eq!(plan(&ctx, &homer, &ReservationTable::new()), Decision::Continue);
    }

    #[test]
    fn sentry_delivers_ore_first() {
        let home = Base::new("factory_0", loc(10, 10));
        let unit = Unit::new("unit_1", UnitType::Heavy, loc(10, 11), 1500).with_cargo(0, 200);
        let mut snapshot = WorldSnapshot::new(100, Grid::new());
        snapshot.units = vec![unit.clone()];
        let config = ControllerConfig::default();
        let ctx = TurnContext::new(&snapshot, &config);

        let decision = plan(&ctx, &input(&unit, &home, Role::Sentry), &ReservationTable::new());
        assert_eq!(
            decision,
            Decision::Submit(ActionQueue::single(Action::transfer(
                Direction::Center,
                ResourceKind::Ore,
                200
            )))
        );
    }
}
