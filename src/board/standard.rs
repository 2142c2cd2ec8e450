//! Classic board data.

use super::tile::{Group, PropertyInfo, PropertyKind, Tile, TileKind};

fn street(id: u8, name: &str, group: Group, price: i64, rent: [i64; 6], house_cost: i64) -> Tile {
    Tile::new(
        id,
        name,
        TileKind::Property(PropertyInfo {
            price,
            group,
            kind: PropertyKind::Street { rent, house_cost },
        }),
    )
}

fn railroad(id: u8, name: &str) -> Tile {
    Tile::new(
        id,
        name,
        TileKind::Property(PropertyInfo {
            price: 200,
            group: Group::Railroad,
            kind: PropertyKind::Railroad,
        }),
    )
}

fn utility(id: u8, name: &str) -> Tile {
    Tile::new(
        id,
        name,
        TileKind::Property(PropertyInfo {
            price: 150,
            group: Group::Utility,
            kind: PropertyKind::Utility,
        }),
    )
}

pub(super) fn tiles() -> Vec<Tile> {
    use Group::*;

    vec![
        Tile::new(0, "Go", TileKind::Go),
        street(1, "Mediterranean Avenue", Brown, 60, [2, 10, 30, 90, 160, 250], 50),
        Tile::new(2, "Community Chest", TileKind::CommunityChest),
        street(3, "Baltic Avenue", Brown, 60, [4, 20, 60, 180, 320, 450], 50),
        Tile::new(4, "Income Tax", TileKind::Tax { amount: 200 }),
        railroad(5, "Reading Railroad"),
        street(6, "Oriental Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        Tile::new(7, "Chance", TileKind::Chance),
        street(8, "Vermont Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        street(9, "Connecticut Avenue", LightBlue, 120, [8, 40, 100, 300, 450, 600], 50),
        Tile::new(10, "Jail", TileKind::Jail),
        street(11, "St. Charles Place", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        utility(12, "Electric Company"),
        street(13, "States Avenue", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        street(14, "Virginia Avenue", Pink, 160, [12, 60, 180, 500, 700, 900], 100),
        railroad(15, "Pennsylvania Railroad"),
        street(16, "St. James Place", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        Tile::new(17, "Community Chest", TileKind::CommunityChest),
        street(18, "Tennessee Avenue", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        street(19, "New York Avenue", Orange, 200, [16, 80, 220, 600, 800, 1000], 100),
        Tile::new(20, "Free Parking", TileKind::FreeParking),
        street(21, "Kentucky Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        Tile::new(22, "Chance", TileKind::Chance),
        street(23, "Indiana Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        street(24, "Illinois Avenue", Red, 240, [20, 100, 300, 750, 925, 1100], 150),
        railroad(25, "B. & O. Railroad"),
        street(26, "Atlantic Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        street(27, "Ventnor Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        utility(28, "Water Works"),
        street(29, "Marvin Gardens", Yellow, 280, [24, 120, 360, 850, 1025, 1200], 150),
        Tile::new(30, "Go To Jail", TileKind::GoToJail),
        street(31, "Pacific Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        street(32, "North Carolina Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        Tile::new(33, "Community Chest", TileKind::CommunityChest),
        street(34, "Pennsylvania Avenue", Green, 320, [28, 150, 450, 1000, 1200, 1400], 200),
        railroad(35, "Short Line"),
        Tile::new(36, "Chance", TileKind::Chance),
        street(37, "Park Place", DarkBlue, 350, [35, 175, 500, 1100, 1300, 1500], 200),
        Tile::new(38, "Luxury Tax", TileKind::Tax { amount: 100 }),
        street(39, "Boardwalk", DarkBlue, 400, [50, 200, 600, 1400, 1700, 2000], 200),
    ]
}
