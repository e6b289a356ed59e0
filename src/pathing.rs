//! Shortest-path planning over the cost grid.
//!
//! Routes are computed with Dijkstra over the four cardinal neighbors. The
//! weight of a step is the cost of entering the destination cell; the goal
//! cell's rubble is ignored so arrival is cheap once adjacent. Blocked cells
//! are pruned from expansion entirely. The goal itself is never blocked, so a
//! unit can always plan onto an occupied target (a base tile, a hostile).

use crate::action::*;
use crate::context::TurnContext;
use crate::error::PlanError;
use crate::location::*;
use crate::reservation::ReservationTable;
use crate::terrain::Grid;
use crate::unit::{Unit, UnitProfile};
use log::*;
use pathfinding::directed::dijkstra::dijkstra;

/// Cells from start to goal inclusive, with the planner's cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub cells: Vec<Location>,
    pub cost: u32,
}

impl Path {
    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn next_step(&self) -> Option<Location> {
        self.cells.get(1).copied()
    }
}

pub fn find_path<F>(
    grid: &Grid,
    start: Location,
    goal: Location,
    profile: &UnitProfile,
    time: u32,
    is_blocked: F,
) -> Result<Path, PlanError>
where
    F: Fn(Location) -> bool,
{
    let step_cost = Grid::base_move_cost(profile, time);

    let result = dijkstra(
        &start,
        |&loc| {
            loc.neighbors()
                .filter(|next| *next == goal || !is_blocked(*next))
                .map(|next| {
                    let cost = if next == goal {
                        step_cost
                    } else {
                        grid.cost(next, profile, time)
                    };
                    (next, cost)
                })
                .collect::<Vec<_>>()
        },
        |&loc| loc == goal,
    );

    match result {
        Some((cells, cost)) => Ok(Path { cells, cost }),
        None => {
            trace!("No path from {:?} to {:?}", start, goal);
            Err(PlanError::Unreachable {
                from: start,
                to: goal,
            })
        }
    }
}

/// Plans against the current reservations. A route whose only step lands on
/// a goal another unit already holds is reported as unreachable.
pub fn route(
    ctx: &TurnContext,
    unit: &Unit,
    goal: Location,
    reservations: &ReservationTable,
    evading: bool,
) -> Result<Path, PlanError> {
    let profile = ctx.config.profile(unit.unit_type);
    let path = find_path(
        ctx.grid,
        unit.pos,
        goal,
        profile,
        ctx.time,
        reservations.blocker(evading),
    )?;

    if path.steps() == 1 && !reservations.is_free_for(goal, evading) {
        debug!(
            "{}: single step to {:?} is contested",
            unit.unit_id, goal
        );
        return Err(PlanError::Unreachable {
            from: unit.pos,
            to: goal,
        });
    }

    Ok(path)
}

/// Vertical leg then horizontal leg, ignoring obstacles.
pub fn straight_path(start: Location, goal: Location) -> Vec<Location> {
    let mut cells = vec![start];
    let mut current = start;

    let vertical = if goal.y() < start.y() {
        Direction::Up
    } else {
        Direction::Down
    };
    while current.y() != goal.y() {
        match current.step(vertical) {
            Some(next) => current = next,
            None => break,
        }
        cells.push(current);
    }

    let horizontal = if goal.x() < start.x() {
        Direction::Left
    } else {
        Direction::Right
    };
    while current.x() != goal.x() {
        match current.step(horizontal) {
            Some(next) => current = next,
            None => break,
        }
        cells.push(current);
    }

    cells
}

/// Converts consecutive cells into single-step moves.
pub fn path_to_moves(cells: &[Location]) -> Vec<Action> {
    cells
        .windows(2)
        .filter_map(|pair| match pair[0].direction_between(pair[1]) {
            Ok(direction) => Some(Action::step(direction)),
            Err(err) => {
                warn!("Skipping path segment: {}", err);
                None
            }
        })
        .collect()
}

/// A single step toward `target`: the first step of a planned route, or
/// the first free cardinal when no route exists. Holds (empty queue) when the
/// unit cannot pay for the step.
pub fn move_toward(
    ctx: &TurnContext,
    unit: &Unit,
    target: Location,
    reservations: &ReservationTable,
    evading: bool,
) -> ActionQueue {
    if unit.pos == target {
        return ActionQueue::new();
    }

    let next = match route(ctx, unit, target, reservations, evading) {
        Ok(path) => path.next_step(),
        Err(_) => Direction::CARDINALS
            .into_iter()
            .filter_map(|direction| unit.pos.step(direction))
            .find(|loc| reservations.is_free_for(*loc, evading)),
    };

    let next = match next {
        Some(next) => next,
        None => return ActionQueue::new(),
    };

    let profile = ctx.config.profile(unit.unit_type);
    let cost = ctx.grid.cost(next, profile, ctx.time) + profile.queue_overhead;
    if unit.power < cost {
        debug!(
            "{}: cannot afford step to {:?} ({} < {})",
            unit.unit_id, next, unit.power, cost
        );
        return ActionQueue::new();
    }

    match unit.pos.direction_between(next) {
        Ok(direction) => ActionQueue::single(Action::step(direction)),
        Err(err) => {
            warn!("{}: {}", unit.unit_id, err);
            ActionQueue::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnv::FnvHashSet;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    #[test]
    fn start_equals_goal_is_a_single_cell() {
        let grid = Grid::new();
        let path = find_path(&grid, loc(3, 3), loc(3, 3), &UnitProfile::light(), 0, |_| false)
            .expect("path");
        assert_eq!(path.cells, vec![loc(3, 3)]);
        assert_eq!(path.steps(), 0);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn open_corridor_matches_manhattan_distance() {
        let grid = Grid::new();
        for profile in [UnitProfile::light(), UnitProfile::heavy()] {
            let path = find_path(&grid, loc(2, 10), loc(9, 10), &profile, 0, |_| false)
                .expect("path");
            assert_eq!(path.steps() as u32, loc(2, 10).distance_to(loc(9, 10)));
            assert_eq!(path.cost, 7 * profile.move_cost);
        }
    }

    #[test]
    fn night_raises_step_cost() {
        let grid = Grid::new();
        let profile = UnitProfile::heavy();
        let path = find_path(&grid, loc(0, 0), loc(0, 4), &profile, 30, |_| false).expect("path");
        assert_eq!(path.cost, 4 * (profile.move_cost + profile.night_surcharge));
    }

    #[test]
    fn rubble_detour_is_taken_when_cheaper() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(5, 5), 100);
        let profile = UnitProfile::heavy();

        let path = find_path(&grid, loc(4, 5), loc(6, 5), &profile, 0, |_| false).expect("path");

        assert!(!path.cells.contains(&loc(5, 5)));
        assert_eq!(path.steps(), 4);
    }

    #[test]
    fn goal_rubble_is_ignored() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(5, 8), 60);
        let profile = UnitProfile::heavy();

        let path = find_path(&grid, loc(5, 5), loc(5, 8), &profile, 0, |_| false).expect("path");
        assert_eq!(path.cost, 3 * profile.move_cost);
    }

    #[test]
    fn blocked_cells_are_never_expanded() {
        let grid = Grid::new();
        let wall: FnvHashSet<Location> = (0..48).filter(|y| *y != 47).map(|y| loc(10, y)).collect();

        let path = find_path(&grid, loc(5, 5), loc(15, 5), &UnitProfile::light(), 0, |l| {
            wall.contains(&l)
        })
        .expect("path around the wall");

        assert!(path.cells.iter().all(|c| !wall.contains(c)));
        assert!(path.cells.contains(&loc(10, 47)));
    }

    #[test]
    fn reserved_goal_is_still_reachable() {
        let grid = Grid::new();
        let goal = loc(8, 8);
        let path = find_path(&grid, loc(8, 2), goal, &UnitProfile::light(), 0, |l| l == goal)
            .expect("goal occupancy does not block");
        assert_eq!(path.cells.last(), Some(&goal));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let grid = Grid::new();
        let goal = loc(20, 20);
        let ring: FnvHashSet<Location> = goal.neighbors().collect();

        let result = find_path(&grid, loc(0, 0), goal, &UnitProfile::light(), 0, |l| {
            ring.contains(&l)
        });
        assert_eq!(
            result,
            Err(PlanError::Unreachable {
                from: loc(0, 0),
                to: goal
            })
        );
    }

    #[test]
    fn straight_path_goes_vertical_first() {
        let cells = straight_path(loc(2, 2), loc(4, 0));
        assert_eq!(
            cells,
            vec![loc(2, 2), loc(2, 1), loc(2, 0), loc(3, 0), loc(4, 0)]
        );
        assert_eq!(
            path_to_moves(&cells),
            vec![
                Action::step(Direction::Up),
                Action::step(Direction::Up),
                Action::step(Direction::Right),
                Action::step(Direction::Right),
            ]
        );
    }

    #[test]
    fn non_adjacent_segments_are_skipped() {
        let moves = path_to_moves(&[loc(1, 1), loc(3, 3), loc(3, 4)]);
        assert_eq!(moves, vec![Action::step(Direction::Down)]);
    }
}
