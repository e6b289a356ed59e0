use crate::constants::*;
use crate::error::PlanError;
use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    /// Builds a location from signed coordinates, returning `None` off the grid.
    pub fn checked(x: i16, y: i16) -> Option<Self> {
        if in_bounds(x, y) {
            Some(Location::from_coords(x as u32, y as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Manhattan distance. Units only move along the four cardinals.
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = (self.x() as i32) - (other.x() as i32);
        let dy = (self.y() as i32) - (other.y() as i32);

        dx.unsigned_abs() + dy.unsigned_abs()
    }

    /// Chebyshev distance, used for footprint membership.
    pub fn range_to(self, other: Self) -> u32 {
        let dx = (self.x() as i32) - (other.x() as i32);
        let dy = (self.y() as i32) - (other.y() as i32);

        dx.unsigned_abs().max(dy.unsigned_abs())
    }

    /// Squared euclidean distance, used to rank candidate targets.
    pub fn distance_sq(self, other: Self) -> u32 {
        let dx = (self.x() as i32) - (other.x() as i32);
        let dy = (self.y() as i32) - (other.y() as i32);

        (dx * dx + dy * dy) as u32
    }

    pub fn step(self, direction: Direction) -> Option<Location> {
        let (dx, dy) = direction.offset();
        Location::checked(self.x() as i16 + dx as i16, self.y() as i16 + dy as i16)
    }

    /// In-bounds cardinal neighbors in Up, Right, Down, Left order.
    pub fn neighbors(self) -> impl Iterator<Item = Location> {
        Direction::CARDINALS
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }

    /// Direction of the single cardinal step from `self` to `other`.
    pub fn direction_between(self, other: Self) -> Result<Direction, PlanError> {
        let dx = other.x() as i16 - self.x() as i16;
        let dy = other.y() as i16 - self.y() as i16;

        match (dx, dy) {
            (0, 0) => Ok(Direction::Center),
            (0, -1) => Ok(Direction::Up),
            (1, 0) => Ok(Direction::Right),
            (0, 1) => Ok(Direction::Down),
            (-1, 0) => Ok(Direction::Left),
            _ => Err(PlanError::NonAdjacent {
                from: self,
                to: other,
            }),
        }
    }
}

pub fn in_bounds(x: i16, y: i16) -> bool {
    x >= 0 && y >= 0 && x < MAP_WIDTH as i16 && y < MAP_HEIGHT as i16
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.x(), self.y()].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[u8; 2]>::deserialize(deserializer)?;
        Location::checked(x as i16, y as i16)
            .ok_or_else(|| de::Error::custom(format!("location ({}, {}) is off the grid", x, y)))
    }
}

/// Host direction codes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Center = 0,
    Up = 1,
    Right = 2,
    Down = 3,
    Left = 4,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Center => (0, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = PlanError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Center),
            1 => Ok(Direction::Up),
            2 => Ok(Direction::Right),
            3 => Ok(Direction::Down),
            4 => Ok(Direction::Left),
            other => Err(PlanError::InvalidDirection(other)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        direction as u8
    }
}
