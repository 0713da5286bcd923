//! Toroidal tile storage owned by the world.

use tile_tactics_core::{
    Direction, GridDimensions, OccupantId, Terrain, TerrainCost, TerrainView, TileCoord,
};

use crate::{occupants::OccupantRegistry, selection::Selectable};

/// Per-cell state of the toroidal grid.
#[derive(Clone, Debug)]
pub(crate) struct Tile {
    terrain: Terrain,
    occupants: Vec<OccupantId>,
    highlighted: bool,
    pub(crate) selectable: Selectable,
}

impl Tile {
    fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            occupants: Vec::new(),
            highlighted: false,
            selectable: Selectable::default(),
        }
    }
}

/// Fixed-size grid of tiles whose edges wrap on both axes.
///
/// Tiles are stored densely in row-major order. Terrain costs live in a
/// parallel vector so systems can borrow them as a [`TerrainView`] without
/// seeing the rest of the tile state. Addressing a tile outside the grid is a
/// caller bug and panics; adjacency queries never fail because
/// [`ToroidalGrid::neighbor`] wraps.
#[derive(Clone, Debug)]
pub struct ToroidalGrid {
    dimensions: GridDimensions,
    tiles: Vec<Tile>,
    costs: Vec<TerrainCost>,
    highlighted: Vec<TileCoord>,
}

impl ToroidalGrid {
    pub(crate) fn new(dimensions: GridDimensions, terrain: Terrain, cost: TerrainCost) -> Self {
        let count = dimensions.tile_count();
        Self {
            dimensions,
            tiles: vec![Tile::new(terrain); count],
            costs: vec![cost; count],
            highlighted: Vec::new(),
        }
    }

    /// Number of columns and rows on the torus.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Adjacent tile in the provided direction, wrapping at the edges.
    #[must_use]
    pub const fn neighbor(&self, tile: TileCoord, direction: Direction) -> TileCoord {
        self.dimensions.neighbor(tile, direction)
    }

    /// Terrain kind covering the tile.
    #[must_use]
    #[track_caller]
    pub fn terrain(&self, tile: TileCoord) -> Terrain {
        self.tiles[self.slot(tile)].terrain
    }

    /// Traversal multiplier charged for entering the tile.
    #[must_use]
    #[track_caller]
    pub fn terrain_cost(&self, tile: TileCoord) -> TerrainCost {
        self.costs[self.slot(tile)]
    }

    /// Occupants stacked on the tile, bottom first.
    #[must_use]
    #[track_caller]
    pub fn occupants_of(&self, tile: TileCoord) -> &[OccupantId] {
        &self.tiles[self.slot(tile)].occupants
    }

    /// Reports whether the tile is part of the highlighted movement range.
    #[must_use]
    #[track_caller]
    pub fn is_highlighted(&self, tile: TileCoord) -> bool {
        self.tiles[self.slot(tile)].highlighted
    }

    /// Reports whether the tile itself holds the global selection.
    #[must_use]
    #[track_caller]
    pub fn is_selected(&self, tile: TileCoord) -> bool {
        self.tiles[self.slot(tile)].selectable.is_selected()
    }

    /// Tiles currently highlighted, in the order they were marked.
    #[must_use]
    pub fn highlighted_tiles(&self) -> &[TileCoord] {
        &self.highlighted
    }

    /// Read-only view of the traversal multipliers for pure systems.
    #[must_use]
    pub fn terrain_view(&self) -> TerrainView<'_> {
        TerrainView::new(&self.costs, self.dimensions)
    }

    /// Reports whether any occupant stacked on the tile is blocking.
    #[must_use]
    #[track_caller]
    pub(crate) fn contains_blocker(&self, tile: TileCoord, occupants: &OccupantRegistry) -> bool {
        self.occupants_of(tile)
            .iter()
            .filter_map(|id| occupants.get(*id))
            .any(|occupant| occupant.blocking)
    }

    #[track_caller]
    pub(crate) fn paint(&mut self, tile: TileCoord, terrain: Terrain, cost: TerrainCost) {
        let slot = self.slot(tile);
        self.tiles[slot].terrain = terrain;
        self.costs[slot] = cost;
    }

    #[track_caller]
    pub(crate) fn tile_mut(&mut self, tile: TileCoord) -> &mut Tile {
        let slot = self.slot(tile);
        &mut self.tiles[slot]
    }

    #[track_caller]
    pub(crate) fn add_occupant(&mut self, tile: TileCoord, occupant: OccupantId) {
        self.tile_mut(tile).occupants.push(occupant);
    }

    /// Removes the occupant from the tile's stack, preserving the order of the rest.
    ///
    /// # Panics
    ///
    /// Panics when the occupant is not stacked on the tile.
    #[track_caller]
    pub(crate) fn remove_occupant(&mut self, tile: TileCoord, occupant: OccupantId) {
        let stack = &mut self.tile_mut(tile).occupants;
        let Some(position) = stack.iter().position(|id| *id == occupant) else {
            panic!("occupant {occupant:?} is not stacked on tile {tile:?}");
        };
        let _ = stack.remove(position);
    }

    /// Marks the tiles as highlighted and returns how many are now highlighted.
    #[track_caller]
    pub(crate) fn highlight_all(&mut self, tiles: impl IntoIterator<Item = TileCoord>) -> usize {
        for tile in tiles {
            let slot = self.slot(tile);
            if !self.tiles[slot].highlighted {
                self.tiles[slot].highlighted = true;
                self.highlighted.push(tile);
            }
        }
        self.highlighted.len()
    }

    /// Clears every highlight and returns how many tiles lost one.
    pub(crate) fn clear_highlights(&mut self) -> usize {
        let cleared = self.highlighted.len();
        for tile in std::mem::take(&mut self.highlighted) {
            if let Some(slot) = self.dimensions.index(tile) {
                self.tiles[slot].highlighted = false;
            }
        }
        cleared
    }

    #[track_caller]
    fn slot(&self, tile: TileCoord) -> usize {
        match self.dimensions.index(tile) {
            Some(slot) => slot,
            None => panic!(
                "tile {tile:?} lies outside the {}x{} grid",
                self.dimensions.columns(),
                self.dimensions.rows()
            ),
        }
    }
}
