use serde::{Deserialize, Serialize};

use crate::quest::Goal;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum BuildingKind {
    #[default]
    Empty,
    Road,
    Highway,
    Park,
    House,
    Apartment,
    Shop,
    Factory,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 8] = [
        BuildingKind::Empty,
        BuildingKind::Road,
        BuildingKind::Highway,
        BuildingKind::Park,
        BuildingKind::House,
        BuildingKind::Apartment,
        BuildingKind::Shop,
        BuildingKind::Factory,
    ];

    pub fn is_occupied(self) -> bool {
        !matches!(self, BuildingKind::Empty)
    }

    pub fn is_residential(self) -> bool {
        matches!(self, BuildingKind::House | BuildingKind::Apartment)
    }

    pub fn is_amenity(self) -> bool {
        matches!(self, BuildingKind::Park)
    }

    /// Agents may traverse open ground, carriageways, and park paths.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            BuildingKind::Empty | BuildingKind::Road | BuildingKind::Highway | BuildingKind::Park
        )
    }

    pub fn is_upgradable(self) -> bool {
        matches!(
            self,
            BuildingKind::House | BuildingKind::Apartment | BuildingKind::Shop | BuildingKind::Factory
        )
    }

    /// Facade colors a freshly placed building may take.
    pub fn palette(self) -> &'static [Rgb] {
        const EMPTY: &[Rgb] = &[Rgb::new(96, 108, 96)];
        const ROAD: &[Rgb] = &[Rgb::new(70, 70, 74)];
        const HIGHWAY: &[Rgb] = &[Rgb::new(52, 52, 58)];
        const PARK: &[Rgb] = &[Rgb::new(66, 138, 66), Rgb::new(84, 152, 74)];
        const HOUSE: &[Rgb] = &[
            Rgb::new(196, 160, 120),
            Rgb::new(178, 134, 108),
            Rgb::new(204, 180, 146),
        ];
        const APARTMENT: &[Rgb] = &[Rgb::new(150, 150, 160), Rgb::new(130, 136, 150)];
        const SHOP: &[Rgb] = &[Rgb::new(120, 160, 190), Rgb::new(110, 148, 176)];
        const FACTORY: &[Rgb] = &[Rgb::new(140, 120, 110), Rgb::new(124, 110, 104)];
        match self {
            BuildingKind::Empty => EMPTY,
            BuildingKind::Road => ROAD,
            BuildingKind::Highway => HIGHWAY,
            BuildingKind::Park => PARK,
            BuildingKind::House => HOUSE,
            BuildingKind::Apartment => APARTMENT,
            BuildingKind::Shop => SHOP,
            BuildingKind::Factory => FACTORY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Decoration {
    #[default]
    None,
    Trees,
    Garden,
    Plaza,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: Coord) -> u64 {
        self.x.abs_diff(other.x) as u64 + self.y.abs_diff(other.y) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub kind: BuildingKind,
    pub level: u32,
    pub decoration: Decoration,
    pub color: Rgb,
}

impl Tile {
    fn empty(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            kind: BuildingKind::Empty,
            level: 1,
            decoration: Decoration::None,
            color: BuildingKind::Empty.palette()[0],
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Square tile matrix with a mutation counter.
///
/// Every coordinate in `[0, side)` holds exactly one tile. Tiles are reset to
/// `Empty` rather than removed, so the matrix never changes shape after
/// construction. The `revision` counter is bumped by every mutation and keys
/// land-value memoization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    side: u32,
    revision: u64,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(side: u32) -> Self {
        let mut tiles = Vec::with_capacity((side * side) as usize);
        for y in 0..side {
            for x in 0..side {
                tiles.push(Tile::empty(x, y));
            }
        }
        Self {
            side,
            revision: 0,
            tiles,
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.side && coord.y < self.side
    }

    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.side + coord.x) as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    /// Row-major iteration; the order is part of the determinism contract.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn count_kind(&self, kind: BuildingKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    pub fn residential_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.kind.is_residential()).count()
    }

    /// In-bounds 4-connected neighbors of `coord`.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        const OFFSETS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let x = coord.x as i64 + dx;
            let y = coord.y as i64 + dy;
            if x >= 0 && y >= 0 && (x as u32) < self.side && (y as u32) < self.side {
                Some(Coord::new(x as u32, y as u32))
            } else {
                None
            }
        })
    }

    pub fn set_building(
        &mut self,
        coord: Coord,
        kind: BuildingKind,
        decoration: Decoration,
        color: Rgb,
    ) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        let tile = &mut self.tiles[index];
        tile.kind = kind;
        tile.level = 1;
        tile.decoration = decoration;
        tile.color = color;
        self.revision += 1;
        true
    }

    pub fn clear(&mut self, coord: Coord) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        self.tiles[index] = Tile::empty(coord.x, coord.y);
        self.revision += 1;
        true
    }

    pub fn raise_level(&mut self, coord: Coord) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        self.tiles[index].level += 1;
        self.revision += 1;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityStats {
    pub money: i64,
    pub population: u64,
    pub day: u64,
    pub happiness: i32,
}

impl Default for CityStats {
    fn default() -> Self {
        Self {
            money: 1_500,
            population: 0,
            day: 0,
            happiness: 50,
        }
    }
}

/// Per-tick scratch totals accumulated by the yield and upgrade systems and
/// applied by the treasury system. Reset at the start of every tick.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickLedger {
    pub income: i64,
    pub population_growth: i64,
}

/// The whole mutable simulation: owned explicitly by the host, no ambient
/// statics. Everything the undo history and the save boundary capture lives
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub grid: Grid,
    pub stats: CityStats,
    pub quests: Vec<Goal>,
    pub goal: Option<Goal>,
    #[serde(skip)]
    pub ledger: TickLedger,
}

impl SimulationState {
    pub fn new(grid_side: u32) -> Self {
        Self {
            grid: Grid::new(grid_side),
            stats: CityStats::default(),
            quests: Vec::new(),
            goal: None,
            ledger: TickLedger::default(),
        }
    }
}
