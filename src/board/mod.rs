//! Static board definition.
//!
//! The `Board` stores the 40 tiles of a game and answers group queries.
//! It is built once and shared immutably (usually behind an `Arc`);
//! game state refers to tiles only by `TileId`.

mod standard;
mod tile;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub use tile::{
    Group, PropertyInfo, PropertyKind, Tile, TileId, TileKind, BOARD_SIZE, HOTEL, RAILROAD_RENTS,
    UTILITY_MULTIPLIERS,
};

/// Tiles of one group, in board order.
pub type GroupMembers = SmallVec<[TileId; 4]>;

/// Immutable board of exactly `BOARD_SIZE` tiles.
///
/// ## Example
///
/// ```
/// use monopoly_engine::board::{Board, Group, TileId};
///
/// let board = Board::standard();
/// assert_eq!(board.tile(TileId::new(39)).name, "Boardwalk");
/// assert_eq!(board.group_members(Group::Brown).len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
    groups: FxHashMap<Group, GroupMembers>,
}

impl Board {
    /// Build a board from tiles.
    ///
    /// Panics unless there are exactly `BOARD_SIZE` tiles whose ids match
    /// their positions. A malformed board is a configuration error.
    #[must_use]
    pub fn new(tiles: Vec<Tile>) -> Self {
        assert_eq!(tiles.len(), BOARD_SIZE as usize, "Board must have {} tiles", BOARD_SIZE);
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.id.index(), i, "Tile {} is out of position", tile.name);
        }

        let mut groups: FxHashMap<Group, GroupMembers> = FxHashMap::default();
        for tile in &tiles {
            if let Some(info) = tile.property() {
                groups.entry(info.group).or_default().push(tile.id);
            }
        }

        Self { tiles, groups }
    }

    /// The classic 40-tile board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(standard::tiles())
    }

    /// Get a tile.
    #[must_use]
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    /// Get property data for a tile, if it is purchasable.
    #[must_use]
    pub fn property(&self, id: TileId) -> Option<&PropertyInfo> {
        self.tiles.get(id.index()).and_then(Tile::property)
    }

    /// All tiles of a group in board order.
    #[must_use]
    pub fn group_members(&self, group: Group) -> &[TileId] {
        self.groups.get(&group).map(|members| members.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all tiles.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate over all purchasable tiles.
    pub fn properties(&self) -> impl Iterator<Item = (TileId, &PropertyInfo)> {
        self.tiles.iter().filter_map(|t| t.property().map(|info| (t.id, info)))
    }
}
