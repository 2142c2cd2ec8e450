//! Tile and property definitions.

use serde::{Deserialize, Serialize};

/// Number of tiles on the board.
pub const BOARD_SIZE: u8 = 40;

/// Highest house count. Five houses is a hotel.
pub const HOTEL: u8 = 5;

/// Railroad rent by number of railroads the owner holds (1-4).
pub const RAILROAD_RENTS: [i64; 4] = [25, 50, 100, 200];

/// Utility rent multiplier on the dice sum by number of utilities held (1-2).
pub const UTILITY_MULTIPLIERS: [i64; 2] = [4, 10];

/// Board position, 0-39.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    pub const GO: TileId = TileId(0);
    pub const JAIL: TileId = TileId(10);
    pub const FREE_PARKING: TileId = TileId(20);
    pub const GO_TO_JAIL: TileId = TileId(30);

    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Move forward by `steps`, wrapping at the board edge.
    ///
    /// Returns the new position and whether GO was passed (or landed on).
    ///
    /// ```
    /// use monopoly_engine::board::TileId;
    ///
    /// assert_eq!(TileId::new(39).advance(3), (TileId::new(2), true));
    /// assert_eq!(TileId::new(5).advance(7), (TileId::new(12), false));
    /// ```
    #[must_use]
    pub const fn advance(self, steps: u8) -> (TileId, bool) {
        let raw = self.0 as u16 + steps as u16;
        let size = BOARD_SIZE as u16;
        (TileId((raw % size) as u8), raw >= size)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Property group. Owning a whole street group unlocks building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl Group {
    /// Whether houses can be built on this group.
    #[must_use]
    pub const fn is_street(self) -> bool {
        !matches!(self, Group::Railroad | Group::Utility)
    }
}

/// How a property charges rent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Buildable street. `rent[n]` is the rent with `n` houses.
    Street { rent: [i64; 6], house_cost: i64 },
    Railroad,
    Utility,
}

/// Purchasable tile data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub price: i64,
    pub group: Group,
    pub kind: PropertyKind,
}

impl PropertyInfo {
    /// Cash paid out by the bank for a mortgage: floor(price / 2).
    #[must_use]
    pub const fn mortgage_value(&self) -> i64 {
        self.price / 2
    }

    /// Cost to lift a mortgage: floor(mortgage value * 1.1).
    #[must_use]
    pub const fn unmortgage_cost(&self) -> i64 {
        self.mortgage_value() * 11 / 10
    }

    /// Refund for selling back to the bank: floor(price / 2).
    #[must_use]
    pub const fn sale_value(&self) -> i64 {
        self.price / 2
    }

    /// House cost for streets, `None` otherwise.
    #[must_use]
    pub const fn house_cost(&self) -> Option<i64> {
        match self.kind {
            PropertyKind::Street { house_cost, .. } => Some(house_cost),
            _ => None,
        }
    }
}

/// What a tile does when landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Go,
    Property(PropertyInfo),
    Tax { amount: i64 },
    Jail,
    FreeParking,
    GoToJail,
    Chance,
    CommunityChest,
}

/// One board position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    pub kind: TileKind,
}

impl Tile {
    /// Create a new tile.
    pub fn new(id: u8, name: impl Into<String>, kind: TileKind) -> Self {
        Self {
            id: TileId(id),
            name: name.into(),
            kind,
        }
    }

    /// Property data if this tile can be bought.
    #[must_use]
    pub fn property(&self) -> Option<&PropertyInfo> {
        match &self.kind {
            TileKind::Property(info) => Some(info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_without_wrap() {
        assert_eq!(TileId::new(0).advance(12), (TileId::new(12), false));
        assert_eq!(TileId::new(27).advance(12), (TileId::new(39), false));
    }

    #[test]
    fn test_advance_wraps_past_go() {
        assert_eq!(TileId::new(39).advance(3), (TileId::new(2), true));
        assert_eq!(TileId::new(38).advance(2), (TileId::GO, true));
    }

    #[test]
    fn test_mortgage_values() {
        let info = PropertyInfo {
            price: 60,
            group: Group::Brown,
            kind: PropertyKind::Street { rent: [2, 10, 30, 90, 160, 250], house_cost: 50 },
        };

        assert_eq!(info.mortgage_value(), 30);
        assert_eq!(info.unmortgage_cost(), 33);
        assert_eq!(info.sale_value(), 30);
        assert_eq!(info.house_cost(), Some(50));
    }

    #[test]
    fn test_unmortgage_cost_floors() {
        // half = 175, 175 * 1.1 = 192.5
        let info =
            PropertyInfo { price: 350, group: Group::Railroad, kind: PropertyKind::Railroad };
        assert_eq!(info.unmortgage_cost(), 192);
    }

    #[test]
    fn test_group_is_street() {
        assert!(Group::Brown.is_street());
        assert!(!Group::Railroad.is_street());
        assert!(!Group::Utility.is_street());
    }
}
