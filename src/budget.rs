//! Power budgeting for round trips.
//!
//! A gather trip costs the queue submission overhead plus the cost of every
//! cell entered on the way out and back. Whatever is left after keeping the
//! unit's reserve pays for dig actions.

use crate::action::*;
use crate::constants::*;
use crate::location::*;
use crate::terrain::Grid;
use crate::unit::{ResourceKind, UnitProfile};

pub struct RouteBudget<'a> {
    grid: &'a Grid,
    profile: &'a UnitProfile,
}

impl<'a> RouteBudget<'a> {
    pub fn new(grid: &'a Grid, profile: &'a UnitProfile) -> Self {
        RouteBudget { grid, profile }
    }

    /// Power spent entering each cell after the first, one step per turn
    /// starting at `time`. Returns the cost and the time after the last step.
    pub fn travel_cost(&self, cells: &[Location], time: u32) -> (u32, u32) {
        cells
            .iter()
            .skip(1)
            .fold((0, time), |(cost, t), cell| {
                (cost + self.grid.cost(*cell, self.profile, t), t + 1)
            })
    }

    /// Number of gather actions a unit can afford on this round trip.
    ///
    /// `queued` is the number of primitives already ahead of the outbound
    /// leg (transfers, pickups) and `pickup` the power about to be picked up,
    /// half of which is credited. The whole inbound leg is paid for, starting
    /// on the turn after the last gather. Only the prefix and the outbound leg
    /// limit queue space; the inbound leg is what gets trimmed to fit.
    pub fn afford(
        &self,
        power: u32,
        outbound: &[Location],
        inbound: &[Location],
        time: u32,
        queued: usize,
        pickup: u32,
    ) -> u32 {
        let (outbound_cost, arrival) = self.travel_cost(outbound, time + queued as u32);

        let funds = power as i64 + (pickup / 2) as i64
            - self.profile.queue_overhead as i64
            - outbound_cost as i64
            - self.profile.power_reserve as i64;

        if funds <= 0 || self.profile.dig_cost == 0 {
            return 0;
        }

        let slots = MAX_QUEUE_LENGTH
            .saturating_sub(queued)
            .saturating_sub(outbound.len().saturating_sub(1)) as u32;

        (1..=slots)
            .rev()
            .find(|&gathers| {
                let (inbound_cost, _) = self.travel_cost(inbound, arrival + gathers);
                funds - inbound_cost as i64 >= gathers as i64 * self.profile.dig_cost as i64
            })
            .unwrap_or(0)
    }

    /// Walks `queue` from `pos` and reports the projected power.
    pub fn simulate(&self, pos: Location, power: u32, queue: &ActionQueue, time: u32) -> PowerProjection {
        let mut projection = PowerProjection {
            lowest: power as i64,
            end: power as i64,
            affordable: 0,
        };
        if queue.is_empty() {
            return projection;
        }

        let mut pos = pos;
        let mut t = time;
        let mut current = power as i64 - self.profile.queue_overhead as i64;
        let mut broke = current < 0;
        projection.lowest = projection.lowest.min(current);

        for (index, action) in queue.iter().enumerate() {
            let repeats = match action {
                Action::Move { n, .. }
                | Action::Transfer { n, .. }
                | Action::Pickup { n, .. }
                | Action::Dig { n } => (*n).max(1),
            };

            for _ in 0..repeats {
                match action {
                    Action::Move { direction, .. } if *direction != Direction::Center => {
                        if let Some(next) = pos.step(*direction) {
                            pos = next;
                            current -= self.grid.cost(pos, self.profile, t) as i64;
                        }
                    }
                    Action::Dig { .. } => current -= self.profile.dig_cost as i64,
                    Action::Pickup {
                        resource: ResourceKind::Power,
                        amount,
                        ..
                    } => current += *amount as i64,
                    Action::Transfer {
                        resource: ResourceKind::Power,
                        amount,
                        ..
                    } => current -= *amount as i64,
                    _ => {}
                }
                t += 1;
                projection.lowest = projection.lowest.min(current);
            }

            if !broke && current < 0 {
                broke = true;
            }
            if !broke {
                projection.affordable = index + 1;
            }
        }

        projection.end = current;
        projection
    }

    /// Cuts `queue` to its longest prefix that never drives power negative.
    pub fn trim_to_budget(&self, pos: Location, power: u32, queue: &mut ActionQueue, time: u32) -> bool {
        let projection = self.simulate(pos, power, queue, time);
        if projection.affordable < queue.len() {
            queue.truncate(projection.affordable);
            true
        } else {
            false
        }
    }
}

/// Result of walking a queue under the cost model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PowerProjection {
    pub lowest: i64,
    pub end: i64,
    /// Length of the longest prefix with non-negative power throughout.
    pub affordable: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathing::straight_path;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    #[test]
    fn light_round_trip_leaves_reserve() {
        let grid = Grid::new();
        let profile = UnitProfile::light();
        let budget = RouteBudget::new(&grid, &profile);

        let outbound = straight_path(loc(5, 5), loc(5, 8));
        let inbound = straight_path(loc(5, 8), loc(5, 5));

        // 100 - 1 overhead - 6 travel - 30 reserve = 63 -> 12 digs
        assert_eq!(budget.afford(100, &outbound, &inbound, 0, 0, 0), 12);
    }

    #[test]
    fn pickup_is_half_credited() {
        let grid = Grid::new();
        let profile = UnitProfile::light();
        let budget = RouteBudget::new(&grid, &profile);
        let path = straight_path(loc(5, 5), loc(5, 6));

        assert_eq!(budget.afford(40, &path, &path, 0, 1, 0), 1);
        assert_eq!(budget.afford(40, &path, &path, 0, 1, 40), 5);
    }

    #[test]
    fn gathers_are_clamped_to_queue_space() {
        let grid = Grid::new();
        let profile = UnitProfile::heavy();
        let budget = RouteBudget::new(&grid, &profile);

        let outbound = straight_path(loc(0, 0), loc(0, 8));
        let inbound = straight_path(loc(0, 8), loc(0, 0));

        // 20 - 1 queued - 8 outbound; the return leg is left to trimming
        assert_eq!(budget.afford(3000, &outbound, &inbound, 0, 1, 0), 11);
    }

    #[test]
    fn far_target_still_affords_gathers() {
        let grid = Grid::new();
        let profile = UnitProfile::light();
        let budget = RouteBudget::new(&grid, &profile);

        let outbound = straight_path(loc(10, 11), loc(10, 22));
        let inbound = straight_path(loc(10, 22), loc(10, 11));

        assert_eq!(budget.afford(150, &outbound, &inbound, 0, 0, 0), 9);
    }

    #[test]
    fn return_leg_is_priced_after_the_gathers() {
        let grid = Grid::new();
        let profile = UnitProfile::heavy();
        let budget = RouteBudget::new(&grid, &profile);

        let outbound = straight_path(loc(0, 0), loc(0, 4));
        let inbound = straight_path(loc(0, 4), loc(0, 0));

        // Arrives at 24 with 500 to spend. Seven digs would fit a daytime
        // return, but the return then starts at 31 and costs 120.
        let gathers = budget.afford(650, &outbound, &inbound, 20, 0, 0);
        assert_eq!(gathers, 6);

        let queue = ActionQueue::assemble(
            &[],
            &crate::pathing::path_to_moves(&outbound),
            &vec![Action::dig(1); gathers as usize],
            &crate::pathing::path_to_moves(&inbound),
        );
        let projection = budget.simulate(loc(0, 0), 650, &queue, 20);
        assert_eq!(projection.affordable, queue.len());
        assert!(projection.end >= profile.power_reserve as i64);
    }

    #[test]
    fn exhausted_power_affords_nothing() {
        let grid = Grid::new();
        let profile = UnitProfile::heavy();
        let budget = RouteBudget::new(&grid, &profile);
        let path = straight_path(loc(0, 0), loc(0, 4));

        assert_eq!(budget.afford(150, &path, &path, 0, 0, 0), 0);
    }

    #[test]
    fn night_steps_cost_more() {
        let grid = Grid::new();
        let profile = UnitProfile::heavy();
        let budget = RouteBudget::new(&grid, &profile);
        let path = straight_path(loc(0, 0), loc(0, 4));

        assert_eq!(budget.travel_cost(&path, 0), (80, 4));
        assert_eq!(budget.travel_cost(&path, 28), (100, 32));
    }

    #[test]
    fn staying_put_costs_only_the_submission() {
        let mut grid = Grid::new();
        grid.rubble.set(loc(3, 3), 90);
        let profile = UnitProfile::heavy();
        let budget = RouteBudget::new(&grid, &profile);

        let queue = ActionQueue::single(Action::stay());
        let projection = budget.simulate(loc(3, 3), 10, &queue, 40);
        assert_eq!(projection.end, 0);
        assert_eq!(projection.affordable, 1);
    }

    #[test]
    fn simulation_finds_first_unaffordable_action() {
        let grid = Grid::new();
        let profile = UnitProfile::light();
        let budget = RouteBudget::new(&grid, &profile);

        let mut queue = ActionQueue::new();
        queue.push(Action::step(Direction::Down));
        for _ in 0..4 {
            queue.push(Action::dig(1));
        }

        let start = loc(3, 3);
        let projection = budget.simulate(start, 14, &queue, 0);
        // 14 - 1 - 1 = 12, then digs at 5 each: 7, 2, -3
        assert_eq!(projection.affordable, 3);
        assert_eq!(projection.end, 14 - 1 - 1 - 20);

        assert!(budget.trim_to_budget(start, 14, &mut queue, 0));
        assert_eq!(queue.len(), 3);
        assert!(!budget.trim_to_budget(start, 14, &mut queue, 0));
    }
}
