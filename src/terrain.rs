use crate::constants::*;
use crate::location::*;
use crate::unit::UnitProfile;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ResourceFlags: u8 {
        const NONE = 0;
        const ICE = 1;
        const ORE = 2;
    }
}

/// A 48x48 array for grid-sized data.
#[derive(Clone, Debug, PartialEq)]
pub struct GridDataArray<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> GridDataArray<T> {
    pub fn new(initial: T) -> Self {
        GridDataArray {
            data: vec![initial; (MAP_WIDTH as usize) * (MAP_HEIGHT as usize)],
        }
    }

    #[inline]
    pub fn get(&self, loc: Location) -> &T {
        &self.data[Self::index(loc)]
    }

    #[inline]
    pub fn get_mut(&mut self, loc: Location) -> &mut T {
        &mut self.data[Self::index(loc)]
    }

    #[inline]
    pub fn set(&mut self, loc: Location, value: T) {
        *self.get_mut(loc) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &T)> {
        self.data.iter().enumerate().map(|(i, v)| {
            let x = i % (MAP_WIDTH as usize);
            let y = i / (MAP_WIDTH as usize);
            (Location::from_coords(x as u32, y as u32), v)
        })
    }

    #[inline]
    fn index(loc: Location) -> usize {
        (loc.y() as usize) * (MAP_WIDTH as usize) + (loc.x() as usize)
    }
}

impl<T: Copy + Serialize> Serialize for GridDataArray<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Copy + Deserialize<'de>> Deserialize<'de> for GridDataArray<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<T>::deserialize(deserializer)?;
        if data.len() != (MAP_WIDTH as usize) * (MAP_HEIGHT as usize) {
            return Err(serde::de::Error::custom("Invalid grid data array size"));
        }
        Ok(GridDataArray { data })
    }
}

/// Per-turn board layers. Immutable while a turn is planned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub rubble: GridDataArray<u32>,
    pub resources: GridDataArray<ResourceFlags>,
    pub lichen_strains: GridDataArray<Option<u16>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            rubble: GridDataArray::new(0),
            resources: GridDataArray::new(ResourceFlags::NONE),
            lichen_strains: GridDataArray::new(None),
        }
    }

    pub fn rubble_at(&self, loc: Location) -> u32 {
        *self.rubble.get(loc)
    }

    pub fn has_resource(&self, loc: Location, flags: ResourceFlags) -> bool {
        self.resources.get(loc).intersects(flags)
    }

    pub fn strain_at(&self, loc: Location) -> Option<u16> {
        *self.lichen_strains.get(loc)
    }

    /// Extra cost of entering `loc` because of its rubble.
    pub fn terrain_penalty(&self, loc: Location, profile: &UnitProfile) -> u32 {
        self.rubble_at(loc) * profile.rubble_move_percent / 100
    }

    /// Type-dependent cost of any single step at `time`.
    pub fn base_move_cost(profile: &UnitProfile, time: u32) -> u32 {
        if is_night(time) {
            profile.move_cost + profile.night_surcharge
        } else {
            profile.move_cost
        }
    }

    /// Power needed to enter `loc` at `time`.
    pub fn cost(&self, loc: Location, profile: &UnitProfile, time: u32) -> u32 {
        self.terrain_penalty(loc, profile) + Self::base_move_cost(profile, time)
    }

    pub fn tiles_with(&self, flags: ResourceFlags) -> impl Iterator<Item = Location> + '_ {
        self.resources
            .iter()
            .filter(move |(_, cell)| cell.intersects(flags))
            .map(|(loc, _)| loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_adds_rubble_and_night_surcharge() {
        let mut grid = Grid::new();
        let loc = Location::from_coords(3, 4);
        grid.rubble.set(loc, 40);

        let light = UnitProfile::light();
        let heavy = UnitProfile::heavy();

        assert_eq!(grid.cost(loc, &light, 0), 1 + 2);
        assert_eq!(grid.cost(loc, &light, 35), 2 + 2);
        assert_eq!(grid.cost(loc, &heavy, 10), 20 + 40);
        assert_eq!(grid.cost(loc, &heavy, 40), 30 + 40);
    }

    #[test]
    fn resource_flags_are_queried_by_kind() {
        let mut grid = Grid::new();
        let ice = Location::from_coords(1, 1);
        let ore = Location::from_coords(2, 2);
        grid.resources.set(ice, ResourceFlags::ICE);
        grid.resources.set(ore, ResourceFlags::ORE);

        assert!(grid.has_resource(ice, ResourceFlags::ICE));
        assert!(!grid.has_resource(ice, ResourceFlags::ORE));
        assert_eq!(grid.tiles_with(ResourceFlags::ORE).collect::<Vec<_>>(), vec![ore]);
    }
}
