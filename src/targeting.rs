//! Target selection for roles: nearest resource, rubble and hostile lichen.

use crate::base::footprint_around;
use crate::context::TurnContext;
use crate::location::*;
use crate::terrain::*;
use crate::unit::{ResourceKind, UnitType};
use fnv::FnvHashSet;
use itertools::*;

/// Rubble ceilings tried in order, with the squared distance below which the
/// nearest candidate of a tier is accepted.
const RUBBLE_TIERS: [(u32, u32); 3] = [(40, 40), (60, 100), (u32::MAX, u32::MAX)];

pub fn resource_flags(resource: ResourceKind) -> ResourceFlags {
    match resource {
        ResourceKind::Ice => ResourceFlags::ICE,
        ResourceKind::Ore => ResourceFlags::ORE,
        _ => ResourceFlags::NONE,
    }
}

/// Cells a unit should not pick as a target: other controlled units and
/// hostile base footprints.
pub fn occupied_cells(ctx: &TurnContext, unit_id: &str, include_hostiles: bool) -> FnvHashSet<Location> {
    let mut cells: FnvHashSet<Location> = ctx
        .units
        .iter()
        .filter(|u| u.unit_id != unit_id)
        .map(|u| u.pos)
        .collect();

    if include_hostiles {
        cells.extend(ctx.hostile_units.iter().map(|u| u.pos));
    }
    for base in ctx.hostile_bases {
        cells.extend(base.footprint());
    }

    cells
}

/// Nearest tile carrying `resource`, ranked by squared distance from
/// `origin` and then by grid order.
pub fn closest_resource_tile<F>(
    grid: &Grid,
    resource: ResourceKind,
    origin: Location,
    is_excluded: F,
) -> Option<Location>
where
    F: Fn(Location) -> bool,
{
    grid.tiles_with(resource_flags(resource))
        .filter(|tile| !is_excluded(*tile))
        .min_by_key(|tile| tile.distance_sq(origin))
}

/// Nearest rubble worth clearing. Light rubble is preferred; heavier rubble
/// is only considered when nothing light is close by.
pub fn rubble_target<F>(grid: &Grid, origin: Location, is_excluded: F) -> Option<Location>
where
    F: Fn(Location) -> bool,
{
    for (ceiling, accept_within) in RUBBLE_TIERS {
        let candidate = grid
            .rubble
            .iter()
            .filter(|(loc, rubble)| **rubble > 0 && **rubble <= ceiling && !is_excluded(*loc))
            .map(|(loc, _)| loc)
            .min_by_key(|loc| loc.distance_sq(origin));

        if let Some(loc) = candidate {
            if loc.distance_sq(origin) < accept_within {
                return Some(loc);
            }
        }
    }

    None
}

/// Nearest tile of hostile lichen. Tiles under hostile bases and next to
/// hostile heavies are skipped.
pub fn closest_hostile_lichen(ctx: &TurnContext, unit_id: &str, origin: Location) -> Option<Location> {
    if ctx.hostile_strains.is_empty() {
        return None;
    }

    let mut excluded = occupied_cells(ctx, unit_id, false);
    for heavy in ctx
        .hostile_units
        .iter()
        .filter(|u| u.unit_type == UnitType::Heavy)
    {
        excluded.extend(footprint_around(heavy.pos));
    }

    ctx.grid
        .lichen_strains
        .iter()
        .filter_map(|(loc, strain)| strain.map(|s| (loc, s)))
        .filter(|(loc, strain)| ctx.hostile_strains.contains(strain) && !excluded.contains(loc))
        .map(|(loc, _)| loc)
        .sorted_by_key(|loc| loc.distance_sq(origin))
        .next()
}

/// Counts lichen tiles per side: (own, hostile).
pub fn lichen_balance(ctx: &TurnContext) -> (usize, usize) {
    ctx.grid
        .lichen_strains
        .iter()
        .filter_map(|(_, strain)| *strain)
        .fold((0, 0), |(own, hostile), strain| {
            if ctx.strains.contains(&strain) {
                (own + 1, hostile)
            } else if ctx.hostile_strains.contains(&strain) {
                (own, hostile + 1)
            } else {
                (own, hostile)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    #[test]
    fn closest_resource_skips_excluded_tiles() {
        let mut grid = Grid::new();
        grid.resources.set(loc(6, 5), ResourceFlags::ICE);
        grid.resources.set(loc(9, 5), ResourceFlags::ICE);
        grid.resources.set(loc(5, 6), ResourceFlags::ORE);

        let origin = loc(5, 5);
        assert_eq!(
            closest_resource_tile(&grid, ResourceKind::Ice, origin, |_| false),
            Some(loc(6, 5))
        );
        assert_eq!(
            closest_resource_tile(&grid, ResourceKind::Ice, origin, |l| l == loc(6, 5)),
            Some(loc(9, 5))
        );
        assert_eq!(
            closest_resource_tile(&grid, ResourceKind::Ore, origin, |_| false),
            Some(loc(5, 6))
        );
    }

    #[test]
    fn rubble_prefers_light_piles_nearby() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(11, 10), 80);
        grid.rubble.set(loc(13, 10), 20);

        assert_eq!(rubble_target(&grid, loc(10, 10), |_| false), Some(loc(13, 10)));
    }

    #[test]
    fn rubble_widens_when_light_piles_are_far() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(11, 10), 55);
        grid.rubble.set(loc(30, 30), 10);

        assert_eq!(rubble_target(&grid, loc(10, 10), |_| false), Some(loc(11, 10)));
    }

    #[test]
    fn empty_board_has_no_rubble_target() {
        assert_eq!(rubble_target(&Grid::new(), loc(10, 10), |_| false), None);
    }
}
