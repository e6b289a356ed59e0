use crate::constants::*;
use crate::location::*;
use serde::{Deserialize, Serialize};

pub type BaseId = String;

/// A stationary 3x3 structure that stores resources and anchors units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    pub base_id: BaseId,
    /// Center of the footprint.
    pub pos: Location,
    #[serde(default)]
    pub water: u32,
    #[serde(default)]
    pub metal: u32,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub strain_id: Option<u16>,
}

impl Base {
    pub fn new(base_id: impl Into<BaseId>, pos: Location) -> Self {
        Base {
            base_id: base_id.into(),
            pos,
            water: 0,
            metal: 0,
            power: 0,
            strain_id: None,
        }
    }

    pub fn with_stocks(mut self, water: u32, metal: u32, power: u32) -> Self {
        self.water = water;
        self.metal = metal;
        self.power = power;
        self
    }

    pub fn with_strain(mut self, strain_id: u16) -> Self {
        self.strain_id = Some(strain_id);
        self
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.pos.range_to(loc) <= BASE_FOOTPRINT_RADIUS as u32
    }

    /// Footprint cells, clipped to the grid.
    pub fn footprint(&self) -> impl Iterator<Item = Location> {
        footprint_around(self.pos)
    }

    /// Footprint cell closest to `target`.
    pub fn nearest_tile(&self, target: Location) -> Location {
        self.footprint()
            .min_by_key(|tile| tile.distance_sq(target))
            .unwrap_or(self.pos)
    }

    /// Direction a unit at `loc` would transfer in to reach this base:
    /// `Center` when standing on it, a cardinal when orthogonally adjacent.
    pub fn transfer_direction(&self, loc: Location) -> Option<Direction> {
        if self.contains(loc) {
            return Some(Direction::Center);
        }

        Direction::CARDINALS.into_iter().find(|direction| {
            loc.step(*direction)
                .map(|next| self.contains(next))
                .unwrap_or(false)
        })
    }
}

/// The 3x3 block centered on `center`, clipped to the grid.
pub fn footprint_around(center: Location) -> impl Iterator<Item = Location> {
    let radius = BASE_FOOTPRINT_RADIUS as i16;
    let cx = center.x() as i16;
    let cy = center.y() as i16;

    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius).filter_map(move |dx| Location::checked(cx + dx, cy + dy))
    })
}
