//! World generation settings loaded from TOML.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tile_tactics_core::{
    Command, GridDimensions, OccupantSpec, Terrain, TerrainCost, TileCoord, BASE_MOVEMENT_COST,
};

/// Errors raised while loading or expanding a [`WorldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read world config at {}", path.display())]
    Io {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration contents are not valid TOML for the schema.
    #[error("failed to parse world config")]
    Parse(#[from] toml::de::Error),
    /// A terrain band names a row the grid does not have.
    #[error("terrain band row {row} lies outside a grid of {rows} rows")]
    BandOutOfBounds {
        /// Offending row.
        row: u32,
        /// Number of rows in the configured grid.
        rows: u32,
    },
    /// An occupant placement lies outside the grid.
    #[error("occupant at column {column}, row {row} lies outside the {columns}x{rows} grid")]
    OccupantOutOfBounds {
        /// Column of the placement.
        column: u32,
        /// Row of the placement.
        row: u32,
        /// Number of columns in the configured grid.
        columns: u32,
        /// Number of rows in the configured grid.
        rows: u32,
    },
}

/// Describes the grid, its terrain and the occupants placed at start-up.
///
/// Missing keys fall back to [`WorldConfig::default`], which reproduces the
/// classic layout.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Terrain covering every tile before bands are painted.
    pub base_terrain: Terrain,
    /// Movement points charged for entering a tile of multiplier 1.
    pub base_movement_cost: u32,
    /// Traversal multipliers overriding the terrain defaults.
    pub terrain_costs: BTreeMap<Terrain, TerrainCost>,
    /// Full-width rows painted with a different terrain.
    pub bands: Vec<TerrainBand>,
    /// Occupants spawned in listing order.
    pub occupants: Vec<OccupantPlacement>,
}

/// Full-width horizontal strip of terrain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainBand {
    /// Terrain painted over the rows.
    pub terrain: Terrain,
    /// Rows receiving the terrain.
    pub rows: Vec<u32>,
}

/// Occupant placed on the grid at start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum OccupantPlacement {
    /// Movable character with a movement budget.
    Character {
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
        /// Movement budget.
        movement: u32,
    },
    /// Collectable item.
    Item {
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
        /// Carry weight.
        weight: u32,
        /// Trade value.
        #[serde(default)]
        value: u32,
        /// Whether the item prevents ending a move on its tile.
        #[serde(default)]
        blocking: bool,
    },
    /// Static terrain feature such as a tree.
    Scenery {
        /// Column of the tile.
        column: u32,
        /// Row of the tile.
        row: u32,
        /// Whether the feature prevents ending a move on its tile.
        #[serde(default = "scenery_blocks")]
        blocking: bool,
    },
}

const fn scenery_blocks() -> bool {
    true
}

impl OccupantPlacement {
    /// Tile on which the occupant is placed.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        match *self {
            Self::Character { column, row, .. }
            | Self::Item { column, row, .. }
            | Self::Scenery { column, row, .. } => TileCoord::new(column, row),
        }
    }

    /// Spawn description forwarded to the world.
    #[must_use]
    pub const fn spec(&self) -> OccupantSpec {
        match *self {
            Self::Character { movement, .. } => OccupantSpec::Character { movement },
            Self::Item {
                weight,
                value,
                blocking,
                ..
            } => OccupantSpec::Item {
                weight,
                value,
                blocking,
            },
            Self::Scenery { blocking, .. } => OccupantSpec::Scenery { blocking },
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 24,
            rows: 16,
            base_terrain: Terrain::Grassland,
            base_movement_cost: BASE_MOVEMENT_COST,
            terrain_costs: BTreeMap::new(),
            bands: vec![TerrainBand {
                terrain: Terrain::DirtRoad,
                rows: vec![7, 8, 9],
            }],
            occupants: vec![
                OccupantPlacement::Scenery {
                    column: 12,
                    row: 8,
                    blocking: true,
                },
                OccupantPlacement::Character {
                    column: 13,
                    row: 8,
                    movement: 30,
                },
            ],
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Grid dimensions described by the configuration.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.columns, self.rows)
    }

    /// Traversal multiplier configured for the terrain.
    #[must_use]
    pub fn cost_of(&self, terrain: Terrain) -> TerrainCost {
        self.terrain_costs
            .get(&terrain)
            .copied()
            .unwrap_or_else(|| terrain.default_cost())
    }

    /// Expands the configuration into the command batch that builds the world.
    pub fn generation_commands(&self) -> Result<Vec<Command>, ConfigError> {
        let dimensions = self.dimensions();
        let mut commands = vec![Command::ConfigureGrid {
            dimensions,
            terrain: self.base_terrain,
            cost: self.cost_of(self.base_terrain),
        }];

        for band in &self.bands {
            let cost = self.cost_of(band.terrain);
            for &row in &band.rows {
                if row >= dimensions.rows() {
                    return Err(ConfigError::BandOutOfBounds {
                        row,
                        rows: dimensions.rows(),
                    });
                }
                for column in 0..dimensions.columns() {
                    commands.push(Command::PaintTerrain {
                        tile: TileCoord::new(column, row),
                        terrain: band.terrain,
                        cost,
                    });
                }
            }
        }

        for placement in &self.occupants {
            let tile = placement.tile();
            if !dimensions.contains(tile) {
                return Err(ConfigError::OccupantOutOfBounds {
                    column: tile.column(),
                    row: tile.row(),
                    columns: dimensions.columns(),
                    rows: dimensions.rows(),
                });
            }
            commands.push(Command::SpawnOccupant {
                tile,
                spec: placement.spec(),
            });
        }

        Ok(commands)
    }
}
