#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually changed. Systems read the world through immutable
//! queries and views such as [`TerrainView`] and respond with new commands.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tile Tactics.";

/// Movement points charged for entering a tile whose terrain cost is `1.0`.
pub const BASE_MOVEMENT_COST: u32 = 5;

/// Top-level interaction modes reported to presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Nothing is armed; activations drive the selection cycle.
    Idle,
    /// A character is selected and its reachable tiles are highlighted.
    Moving,
    /// A character is armed to absorb the next activated item.
    PickingUp,
}

/// Interaction mode together with the character bound to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// Nothing is armed; activations drive the selection cycle.
    #[default]
    Idle,
    /// The character's reachable tiles are highlighted and await a destination.
    Moving {
        /// Character that will move once a destination is activated.
        character: OccupantId,
    },
    /// The actor waits for an item to retrieve.
    PickingUp {
        /// Character that receives the next activated item.
        actor: OccupantId,
    },
}

impl InteractionState {
    /// Mode discriminant without the bound character.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        match self {
            Self::Idle => InteractionMode::Idle,
            Self::Moving { .. } => InteractionMode::Moving,
            Self::PickingUp { .. } => InteractionMode::PickingUp,
        }
    }
}

/// Entries of the action menu offered while a character is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterAction {
    /// Highlight the character's reachable tiles and wait for a destination.
    Move,
    /// Arm the character to pick up the next activated item.
    Retrieve,
}

impl CharacterAction {
    /// Every action in menu order.
    pub const ALL: [CharacterAction; 2] = [CharacterAction::Move, CharacterAction::Retrieve];
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the tile grid, discarding every occupant and selection.
    ConfigureGrid {
        /// Number of columns and rows laid out on the torus.
        dimensions: GridDimensions,
        /// Terrain assigned to every tile.
        terrain: Terrain,
        /// Traversal multiplier applied to every tile.
        cost: TerrainCost,
    },
    /// Replaces the terrain of a single tile.
    PaintTerrain {
        /// Tile receiving the new terrain.
        tile: TileCoord,
        /// Terrain kind presented for the tile.
        terrain: Terrain,
        /// Traversal multiplier charged for entering the tile.
        cost: TerrainCost,
    },
    /// Places a new occupant on top of the tile's stack.
    SpawnOccupant {
        /// Tile that hosts the occupant.
        tile: TileCoord,
        /// Description of the occupant to create.
        spec: OccupantSpec,
    },
    /// Steps the tile's selection cycle.
    ActivateTile {
        /// Tile that was activated.
        tile: TileCoord,
    },
    /// Selects the provided target, deselecting the previous holder.
    Select {
        /// Tile or occupant that becomes the global selection.
        target: SelectionTarget,
    },
    /// Clears the global selection.
    ClearSelection,
    /// Highlights the character's reachable tiles and enters the moving mode.
    BeginMove {
        /// Character that will move.
        character: OccupantId,
        /// Tiles the character can reach within its budget.
        reachable: Vec<TileCoord>,
    },
    /// Arms the actor to retrieve the next activated item.
    BeginRetrieve {
        /// Character that will receive the item.
        actor: OccupantId,
    },
    /// Moves the character onto the destination if it is highlighted and free.
    CommitMove {
        /// Character bound to the moving mode.
        character: OccupantId,
        /// Tile activated as the destination.
        destination: TileCoord,
    },
    /// Moves the item from its tile into the actor's inventory.
    PickUpItem {
        /// Character bound to the picking-up mode.
        actor: OccupantId,
        /// Item occupant that was activated.
        item: OccupantId,
    },
    /// Abandons the active interaction, clearing highlights and selection.
    CancelInteraction,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt.
    GridConfigured {
        /// Dimensions of the new grid.
        dimensions: GridDimensions,
        /// Terrain applied to every tile.
        terrain: Terrain,
    },
    /// Confirms that a tile received new terrain.
    TerrainPainted {
        /// Tile that was repainted.
        tile: TileCoord,
        /// Terrain now covering the tile.
        terrain: Terrain,
    },
    /// Confirms that an occupant was created.
    OccupantSpawned {
        /// Identifier allocated to the occupant.
        occupant: OccupantId,
        /// Tile hosting the occupant.
        tile: TileCoord,
        /// Variant of the occupant.
        kind: OccupantKind,
    },
    /// Reports that the global selection moved.
    SelectionChanged {
        /// Target that held the selection before the change.
        previous: Option<SelectionTarget>,
        /// Target holding the selection after the change.
        current: Option<SelectionTarget>,
    },
    /// Announces that the interaction mode changed.
    InteractionModeChanged {
        /// Mode that became active.
        mode: InteractionMode,
    },
    /// Confirms that a character's movement range was highlighted.
    RangeHighlighted {
        /// Character whose range is shown.
        character: OccupantId,
        /// Number of highlighted tiles, the origin included.
        tiles: usize,
    },
    /// Confirms that every highlight was cleared.
    HighlightsCleared {
        /// Number of tiles that lost their highlight.
        tiles: usize,
    },
    /// Confirms that a character moved between two tiles.
    CharacterMoved {
        /// Character that moved.
        character: OccupantId,
        /// Tile the character left.
        from: TileCoord,
        /// Tile the character entered.
        to: TileCoord,
    },
    /// Reports that a move was refused and the interaction abandoned.
    MoveRejected {
        /// Character that attempted to move.
        character: OccupantId,
        /// Destination that was activated.
        destination: TileCoord,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Confirms that an item entered a character's inventory.
    ItemPickedUp {
        /// Character that received the item.
        actor: OccupantId,
        /// Item that left the grid.
        item: OccupantId,
        /// Tile the item was taken from.
        from: TileCoord,
    },
    /// Reports that a pickup was refused and the interaction abandoned.
    PickupRejected {
        /// Character that attempted the pickup.
        actor: OccupantId,
        /// Specific reason the pickup failed.
        reason: PickupRejection,
    },
    /// Reports that an action menu choice could not start.
    ActionRejected {
        /// Action that was requested.
        action: CharacterAction,
        /// Specific reason the action was refused.
        reason: ActionRejection,
    },
}

/// Reasons a move commit may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// The character is not bound to the moving mode.
    NotMoving,
    /// The destination lies outside the highlighted range.
    NotHighlighted,
    /// The destination hosts a blocking occupant.
    Blocked,
}

/// Reasons a pickup may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupRejection {
    /// The actor is not bound to the picking-up mode.
    NotPickingUp,
    /// The activated occupant is not an item.
    NotAnItem,
    /// No occupant with the provided identifier rests on the grid.
    MissingItem,
}

/// Reasons an action menu choice may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionRejection {
    /// Another interaction is already active.
    NotIdle,
    /// The character is not the current selection.
    NotSelected,
    /// The occupant is not a character.
    NotACharacter,
}

/// Description of an occupant requested through [`Command::SpawnOccupant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantSpec {
    /// Movable character; characters always block.
    Character {
        /// Movement budget spent per move action, in cost units.
        movement: u32,
    },
    /// Collectable item.
    Item {
        /// Carry weight of the item.
        weight: u32,
        /// Trade value of the item.
        value: u32,
        /// Whether the item prevents characters from ending a move on its tile.
        blocking: bool,
    },
    /// Static scenery such as trees.
    Scenery {
        /// Whether the scenery prevents characters from ending a move on its tile.
        blocking: bool,
    },
}

impl OccupantSpec {
    /// Variant discriminant of the described occupant.
    #[must_use]
    pub const fn kind(&self) -> OccupantKind {
        match self {
            Self::Character { .. } => OccupantKind::Character,
            Self::Item { .. } => OccupantKind::Item,
            Self::Scenery { .. } => OccupantKind::Scenery,
        }
    }
}

/// Discriminant of the occupant variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantKind {
    /// Movable character.
    Character,
    /// Collectable item.
    Item,
    /// Static scenery.
    Scenery,
}

/// Entity that can hold the global selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionTarget {
    /// A tile itself, independent of its occupants.
    Tile(TileCoord),
    /// An occupant resting on a tile.
    Occupant(OccupantId),
}

/// Position of a tile's selection cycle, derived from the global selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionCursor {
    /// Neither the tile nor any of its occupants is selected.
    Vacant,
    /// The occupant at the provided stack index is selected.
    Occupant(usize),
    /// The tile itself is selected.
    Tile,
}

/// Cardinal directions on the torus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing column indices.
    Left,
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing column indices.
    Right,
    /// Toward increasing row indices.
    Down,
}

impl Direction {
    /// Every direction in clockwise order starting from the left.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
}

/// Unique identifier assigned to an occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(u32);

impl OccupantId {
    /// Creates a new occupant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Size of the toroidal tile grid.
///
/// The grid wraps on both axes: the last column is adjacent to the first and
/// the last row is adjacent to the first. Both dimensions are at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Creates a grid description; zero dimensions are raised to one.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        let columns = if columns == 0 { 1 } else { columns };
        let rows = if rows == 0 { 1 } else { rows };
        Self { columns, rows }
    }

    /// Number of columns on the torus.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the torus.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the coordinate addresses a tile without wrapping.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column < self.columns && tile.row < self.rows
    }

    /// Row-major offset of the tile, if it lies within the grid.
    #[must_use]
    pub fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }

        let row = usize::try_from(tile.row).ok()?;
        let column = usize::try_from(tile.column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Tile stored at the provided row-major offset.
    #[must_use]
    pub fn tile_at(&self, index: usize) -> Option<TileCoord> {
        if index >= self.tile_count() {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(TileCoord::new(column, row))
    }

    /// Iterator over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> {
        let dimensions = *self;
        (0..dimensions.tile_count())
            .filter_map(move |index| dimensions.tile_at(index))
    }

    /// Adjacent tile in the provided direction, wrapping at the edges.
    ///
    /// Coordinates outside the grid are folded onto it first, so the call
    /// never fails.
    #[must_use]
    pub const fn neighbor(&self, tile: TileCoord, direction: Direction) -> TileCoord {
        let column = tile.column % self.columns;
        let row = tile.row % self.rows;

        match direction {
            Direction::Left => {
                let column = if column == 0 {
                    self.columns - 1
                } else {
                    column - 1
                };
                TileCoord::new(column, row)
            }
            Direction::Right => {
                let column = if column + 1 >= self.columns {
                    0
                } else {
                    column + 1
                };
                TileCoord::new(column, row)
            }
            Direction::Up => {
                let row = if row == 0 { self.rows - 1 } else { row - 1 };
                TileCoord::new(column, row)
            }
            Direction::Down => {
                let row = if row + 1 >= self.rows { 0 } else { row + 1 };
                TileCoord::new(column, row)
            }
        }
    }

    /// Folds arbitrary signed coordinates onto the torus.
    ///
    /// Input collaborators derive tile positions from camera offsets that can
    /// run past either edge; this is the only sanctioned way to turn them into
    /// a [`TileCoord`].
    #[must_use]
    pub fn wrap(&self, column: i64, row: i64) -> TileCoord {
        let column = column.rem_euclid(i64::from(self.columns));
        let row = row.rem_euclid(i64::from(self.rows));
        TileCoord::new(
            u32::try_from(column).unwrap_or(0),
            u32::try_from(row).unwrap_or(0),
        )
    }

    /// Manhattan distance between two tiles, taking the shorter way round on
    /// each axis.
    #[must_use]
    pub fn toroidal_distance(&self, from: TileCoord, to: TileCoord) -> u32 {
        let from_column = from.column % self.columns;
        let from_row = from.row % self.rows;
        let column_diff = from_column.abs_diff(to.column % self.columns);
        let row_diff = from_row.abs_diff(to.row % self.rows);
        column_diff.min(self.columns - column_diff) + row_diff.min(self.rows - row_diff)
    }
}

/// Terrain kinds available to world generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Open grassland.
    Grassland,
    /// Packed dirt road, cheaper to cross than grass.
    DirtRoad,
}

impl Terrain {
    /// Traversal multiplier used when configuration does not override it.
    #[must_use]
    pub const fn default_cost(self) -> TerrainCost {
        match self {
            Self::Grassland => TerrainCost(1.0),
            Self::DirtRoad => TerrainCost(0.75),
        }
    }
}

/// Positive, finite traversal multiplier of a tile.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct TerrainCost(f32);

impl TerrainCost {
    /// Multiplier of plain terrain.
    pub const UNIT: TerrainCost = TerrainCost(1.0);

    /// Creates a terrain cost, rejecting zero, negative and non-finite values.
    pub fn new(value: f32) -> Result<Self, TerrainCostError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(TerrainCostError { value })
        }
    }

    /// Raw multiplier.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for TerrainCost {
    type Error = TerrainCostError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TerrainCost> for f32 {
    fn from(cost: TerrainCost) -> Self {
        cost.0
    }
}

/// Error returned when a terrain cost is not a positive finite number.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("terrain cost must be positive and finite, got {value}")]
pub struct TerrainCostError {
    value: f32,
}

/// Read-only view of the per-tile traversal multipliers.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    costs: &'a [TerrainCost],
    dimensions: GridDimensions,
}

impl<'a> TerrainView<'a> {
    /// Captures a view over row-major costs laid out for the dimensions.
    #[must_use]
    pub fn new(costs: &'a [TerrainCost], dimensions: GridDimensions) -> Self {
        debug_assert_eq!(costs.len(), dimensions.tile_count());
        Self { costs, dimensions }
    }

    /// Traversal multiplier of the tile, if it lies within the grid.
    #[must_use]
    pub fn cost(&self, tile: TileCoord) -> Option<TerrainCost> {
        self.dimensions
            .index(tile)
            .and_then(|index| self.costs.get(index).copied())
    }

    /// Dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }
}
