#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tile Tactics.

pub mod config;
mod grid;
mod occupants;
mod selection;

use tile_tactics_core::{
    ActionRejection, CharacterAction, Command, Event, GridDimensions, InteractionState,
    MoveRejection, OccupantId, OccupantKind, PickupRejection, SelectionTarget, Terrain,
    TerrainCost, TileCoord, WELCOME_BANNER,
};
use tracing::{debug, warn};

pub use grid::ToroidalGrid;

use occupants::OccupantRegistry;
use selection::SelectionController;

const DEFAULT_GRID: GridDimensions = GridDimensions::new(24, 16);

/// Represents the authoritative Tile Tactics world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: ToroidalGrid,
    occupants: OccupantRegistry,
    selection: SelectionController,
    interaction: InteractionState,
}

impl World {
    /// Creates a new world covered in grassland, ready for generation commands.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: ToroidalGrid::new(DEFAULT_GRID, Terrain::Grassland, TerrainCost::UNIT),
            occupants: OccupantRegistry::new(),
            selection: SelectionController::default(),
            interaction: InteractionState::Idle,
        }
    }

    fn select(&mut self, target: SelectionTarget, out_events: &mut Vec<Event>) {
        let previous = self
            .selection
            .select(target, &mut self.grid, &mut self.occupants);
        if previous != Some(target) {
            debug!(?previous, current = ?target, "selection changed");
            out_events.push(Event::SelectionChanged {
                previous,
                current: Some(target),
            });
        }
    }

    fn deselect(&mut self, out_events: &mut Vec<Event>) {
        if let Some(previous) = self.selection.deselect(&mut self.grid, &mut self.occupants) {
            debug!(?previous, "selection cleared");
            out_events.push(Event::SelectionChanged {
                previous: Some(previous),
                current: None,
            });
        }
    }

    fn enter(&mut self, state: InteractionState, out_events: &mut Vec<Event>) {
        let previous = std::mem::replace(&mut self.interaction, state);
        if previous.mode() != state.mode() {
            debug!(from = ?previous.mode(), to = ?state.mode(), "interaction mode changed");
            out_events.push(Event::InteractionModeChanged { mode: state.mode() });
        }
    }

    /// Clears highlights and selection, then returns to the idle mode.
    fn finish_interaction(&mut self, out_events: &mut Vec<Event>) {
        let cleared = self.grid.clear_highlights();
        if cleared > 0 {
            out_events.push(Event::HighlightsCleared { tiles: cleared });
        }
        self.deselect(out_events);
        self.enter(InteractionState::Idle, out_events);
    }

    /// Abandons a non-idle interaction ahead of a direct selection change.
    fn abandon_interaction(&mut self, out_events: &mut Vec<Event>) {
        if self.interaction != InteractionState::Idle {
            debug!(state = ?self.interaction, "interaction abandoned");
            self.finish_interaction(out_events);
        }
    }

    fn contains_blocker(&self, tile: TileCoord) -> bool {
        self.grid.contains_blocker(tile, &self.occupants)
    }

    fn validate_action(&self, character: OccupantId) -> Option<ActionRejection> {
        if self.interaction != InteractionState::Idle {
            return Some(ActionRejection::NotIdle);
        }

        match self.occupants.get(character).map(occupants::Occupant::kind) {
            Some(OccupantKind::Character) => {}
            Some(_) => return Some(ActionRejection::NotACharacter),
            None => {
                warn!(?character, "action requested for unknown occupant");
                return Some(ActionRejection::NotACharacter);
            }
        }

        if self.selection.current() != Some(SelectionTarget::Occupant(character)) {
            return Some(ActionRejection::NotSelected);
        }

        None
    }

    fn commit_move(
        &mut self,
        character: OccupantId,
        destination: TileCoord,
        out_events: &mut Vec<Event>,
    ) {
        if self.interaction != (InteractionState::Moving { character }) {
            out_events.push(Event::MoveRejected {
                character,
                destination,
                reason: MoveRejection::NotMoving,
            });
            return;
        }

        let rejection = if !self.grid.is_highlighted(destination) {
            Some(MoveRejection::NotHighlighted)
        } else if self.contains_blocker(destination) {
            Some(MoveRejection::Blocked)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(?character, ?destination, ?reason, "move rejected");
            out_events.push(Event::MoveRejected {
                character,
                destination,
                reason,
            });
            self.finish_interaction(out_events);
            return;
        }

        let Some(from) = self.occupants.get(character).map(|occupant| occupant.tile) else {
            warn!(?character, "moving character vanished from the registry");
            self.finish_interaction(out_events);
            return;
        };

        self.grid.remove_occupant(from, character);
        self.grid.add_occupant(destination, character);
        if let Some(occupant) = self.occupants.get_mut(character) {
            occupant.tile = destination;
        }
        debug!(?character, ?from, to = ?destination, "character moved");
        out_events.push(Event::CharacterMoved {
            character,
            from,
            to: destination,
        });
        self.finish_interaction(out_events);
    }

    fn pick_up(&mut self, actor: OccupantId, item: OccupantId, out_events: &mut Vec<Event>) {
        if self.interaction != (InteractionState::PickingUp { actor }) {
            out_events.push(Event::PickupRejected {
                actor,
                reason: PickupRejection::NotPickingUp,
            });
            return;
        }

        if self.selection.current() == Some(SelectionTarget::Occupant(item)) {
            self.deselect(out_events);
        }

        let (from, mut carried) = match self.occupants.take_item(item) {
            Ok(taken) => taken,
            Err(reason) => {
                debug!(?actor, ?item, ?reason, "pickup rejected");
                out_events.push(Event::PickupRejected { actor, reason });
                self.finish_interaction(out_events);
                return;
            }
        };

        self.grid.remove_occupant(from, item);
        carried.in_inventory = true;
        match self.occupants.character_mut(actor) {
            Some(character) => character.carried.push(carried),
            None => warn!(?actor, ?item, "retrieving character vanished; item discarded"),
        }
        debug!(?actor, ?item, ?from, "item picked up");
        out_events.push(Event::ItemPickedUp { actor, item, from });
        self.finish_interaction(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when a command addresses a tile outside the grid. Input layers must
/// fold raw coordinates with [`GridDimensions::wrap`] first.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            dimensions,
            terrain,
            cost,
        } => {
            if let Some(previous) = world.selection.reset() {
                out_events.push(Event::SelectionChanged {
                    previous: Some(previous),
                    current: None,
                });
            }
            world.enter(InteractionState::Idle, out_events);
            world.grid = ToroidalGrid::new(dimensions, terrain, cost);
            world.occupants = OccupantRegistry::new();
            debug!(
                columns = dimensions.columns(),
                rows = dimensions.rows(),
                ?terrain,
                "grid configured"
            );
            out_events.push(Event::GridConfigured {
                dimensions,
                terrain,
            });
        }
        Command::PaintTerrain {
            tile,
            terrain,
            cost,
        } => {
            world.grid.paint(tile, terrain, cost);
            out_events.push(Event::TerrainPainted { tile, terrain });
        }
        Command::SpawnOccupant { tile, spec } => {
            assert!(
                world.grid.dimensions().contains(tile),
                "cannot spawn an occupant on tile {tile:?} outside the grid"
            );
            let occupant = world.occupants.spawn(tile, spec);
            world.grid.add_occupant(tile, occupant);
            out_events.push(Event::OccupantSpawned {
                occupant,
                tile,
                kind: spec.kind(),
            });
        }
        Command::ActivateTile { tile } => {
            world.abandon_interaction(out_events);
            let previous = world
                .selection
                .activate(tile, &mut world.grid, &mut world.occupants);
            let current = world.selection.current();
            if previous != current {
                debug!(?tile, ?previous, ?current, "tile activated");
                out_events.push(Event::SelectionChanged { previous, current });
            }
        }
        Command::Select { target } => {
            if let SelectionTarget::Occupant(id) = target {
                if world.occupants.get(id).is_none() {
                    warn!(occupant = ?id, "ignoring selection of unknown occupant");
                    return;
                }
            }
            world.abandon_interaction(out_events);
            world.select(target, out_events);
        }
        Command::ClearSelection => {
            world.abandon_interaction(out_events);
            world.deselect(out_events);
        }
        Command::BeginMove {
            character,
            reachable,
        } => {
            if let Some(reason) = world.validate_action(character) {
                debug!(?character, ?reason, "move action rejected");
                out_events.push(Event::ActionRejected {
                    action: CharacterAction::Move,
                    reason,
                });
                return;
            }

            let _ = world.grid.clear_highlights();
            let tiles = world.grid.highlight_all(reachable);
            out_events.push(Event::RangeHighlighted { character, tiles });
            world.enter(InteractionState::Moving { character }, out_events);
        }
        Command::BeginRetrieve { actor } => {
            if let Some(reason) = world.validate_action(actor) {
                debug!(?actor, ?reason, "retrieve action rejected");
                out_events.push(Event::ActionRejected {
                    action: CharacterAction::Retrieve,
                    reason,
                });
                return;
            }

            world.enter(InteractionState::PickingUp { actor }, out_events);
        }
        Command::CommitMove {
            character,
            destination,
        } => world.commit_move(character, destination, out_events),
        Command::PickUpItem { actor, item } => world.pick_up(actor, item, out_events),
        Command::CancelInteraction => world.finish_interaction(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{
        occupants::{Body, Item},
        World,
    };
    use crate::ToroidalGrid;
    use tile_tactics_core::{
        CharacterAction, GridDimensions, InteractionMode, InteractionState, OccupantId,
        OccupantKind, SelectionCursor, SelectionTarget, TerrainView, TileCoord,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the toroidal grid.
    #[must_use]
    pub fn grid(world: &World) -> &ToroidalGrid {
        &world.grid
    }

    /// Dimensions of the toroidal grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }

    /// Read-only view of the per-tile traversal multipliers.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        world.grid.terrain_view()
    }

    /// Reports whether the tile is part of the highlighted movement range.
    #[must_use]
    pub fn is_highlighted(world: &World, tile: TileCoord) -> bool {
        world.grid.is_highlighted(tile)
    }

    /// Tiles currently highlighted.
    #[must_use]
    pub fn highlighted_tiles(world: &World) -> &[TileCoord] {
        world.grid.highlighted_tiles()
    }

    /// Reports whether the tile itself holds the selection.
    #[must_use]
    pub fn is_tile_selected(world: &World, tile: TileCoord) -> bool {
        world.grid.is_selected(tile)
    }

    /// Reports whether the occupant holds the selection.
    #[must_use]
    pub fn is_occupant_selected(world: &World, occupant: OccupantId) -> bool {
        world
            .occupants
            .get(occupant)
            .is_some_and(|entry| entry.selectable.is_selected())
    }

    /// Current holder of the global selection.
    #[must_use]
    pub fn selection(world: &World) -> Option<SelectionTarget> {
        world.selection.current()
    }

    /// Position of the tile's selection cycle.
    #[must_use]
    pub fn selection_cursor(world: &World, tile: TileCoord) -> SelectionCursor {
        world.selection.cursor(tile, &world.grid)
    }

    /// Reports whether any occupant on the tile prevents ending a move there.
    #[must_use]
    pub fn contains_blocker(world: &World, tile: TileCoord) -> bool {
        world.contains_blocker(tile)
    }

    /// Interaction mode together with its bound character.
    #[must_use]
    pub fn interaction_state(world: &World) -> InteractionState {
        world.interaction
    }

    /// Current interaction mode.
    #[must_use]
    pub fn interaction_mode(world: &World) -> InteractionMode {
        world.interaction.mode()
    }

    /// Actions the button bar should offer.
    ///
    /// The menu is offered while idle with a character selected.
    #[must_use]
    pub fn offered_actions(world: &World) -> &'static [CharacterAction] {
        if world.interaction != InteractionState::Idle {
            return &[];
        }

        match world.selection.current() {
            Some(SelectionTarget::Occupant(id))
                if occupant(world, id).map(|snapshot| snapshot.kind)
                    == Some(OccupantKind::Character) =>
            {
                &CharacterAction::ALL
            }
            _ => &[],
        }
    }

    /// Snapshots of the occupants stacked on the tile, bottom first.
    #[must_use]
    pub fn occupants_of(world: &World, tile: TileCoord) -> Vec<OccupantSnapshot> {
        world
            .grid
            .occupants_of(tile)
            .iter()
            .filter_map(|id| occupant(world, *id))
            .collect()
    }

    /// Snapshot of the occupant, if it rests on the grid.
    #[must_use]
    pub fn occupant(world: &World, id: OccupantId) -> Option<OccupantSnapshot> {
        world.occupants.get(id).map(|entry| OccupantSnapshot {
            id,
            kind: entry.kind(),
            tile: entry.tile,
            blocking: entry.blocking,
            selected: entry.selectable.is_selected(),
        })
    }

    /// Snapshots of every occupant on the grid in identifier order.
    #[must_use]
    pub fn occupants(world: &World) -> Vec<OccupantSnapshot> {
        world
            .occupants
            .iter()
            .filter_map(|(id, _)| occupant(world, id))
            .collect()
    }

    /// Snapshot of the character, if the occupant is one.
    #[must_use]
    pub fn character(world: &World, id: OccupantId) -> Option<CharacterSnapshot> {
        let entry = world.occupants.get(id)?;
        match &entry.body {
            Body::Character(character) => Some(CharacterSnapshot {
                id,
                tile: entry.tile,
                movement: character.movement,
                carried: character.carried.iter().map(item_snapshot).collect(),
            }),
            Body::Item(_) | Body::Scenery => None,
        }
    }

    /// Items carried by the character in pickup order.
    #[must_use]
    pub fn carried_items(world: &World, id: OccupantId) -> Vec<ItemSnapshot> {
        character(world, id).map_or_else(Vec::new, |snapshot| snapshot.carried)
    }

    /// Snapshot of an item resting on the grid.
    #[must_use]
    pub fn item(world: &World, id: OccupantId) -> Option<ItemSnapshot> {
        match &world.occupants.get(id)?.body {
            Body::Item(item) => Some(item_snapshot(item)),
            Body::Character(_) | Body::Scenery => None,
        }
    }

    /// Immutable representation of an occupant used for drawing and routing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OccupantSnapshot {
        /// Identifier allocated to the occupant.
        pub id: OccupantId,
        /// Variant of the occupant.
        pub kind: OccupantKind,
        /// Tile whose stack lists the occupant.
        pub tile: TileCoord,
        /// Whether characters may not end a move on the occupant's tile.
        pub blocking: bool,
        /// Whether the occupant holds the selection.
        pub selected: bool,
    }

    /// Immutable representation of a character.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CharacterSnapshot {
        /// Identifier allocated to the character.
        pub id: OccupantId,
        /// Tile the character stands on.
        pub tile: TileCoord,
        /// Movement budget available to a move action.
        pub movement: u32,
        /// Items held by the character in pickup order.
        pub carried: Vec<ItemSnapshot>,
    }

    /// Immutable representation of an item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ItemSnapshot {
        /// Identifier allocated to the item.
        pub id: OccupantId,
        /// Carry weight of the item.
        pub weight: u32,
        /// Trade value of the item.
        pub value: u32,
        /// Whether a character holds the item.
        pub in_inventory: bool,
    }

    fn item_snapshot(item: &Item) -> ItemSnapshot {
        ItemSnapshot {
            id: item.id,
            weight: item.weight,
            value: item.value,
            in_inventory: item.in_inventory,
        }
    }
}
