#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that routes player input to world commands by interaction mode.

use tile_tactics_core::{
    CharacterAction, Command, InteractionState, OccupantId, OccupantKind, SelectionTarget,
    TileCoord,
};
use tile_tactics_system_movement_range::{Config, MovementRange};
use tile_tactics_world::{query, World};
use tracing::debug;

/// Player input already resolved to grid coordinates by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionInput {
    /// The player clicked a tile.
    ActivateTile(TileCoord),
    /// The player clicked an occupant drawn on a tile.
    ActivateOccupant(OccupantId),
    /// The player pressed one of the character action buttons.
    ChooseAction(CharacterAction),
}

/// Translates inputs into commands according to the world's interaction state.
#[derive(Debug, Default)]
pub struct Interaction {
    solver: MovementRange,
}

impl Interaction {
    /// Creates the system with the provided movement range configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            solver: MovementRange::new(config),
        }
    }

    /// Emits the commands the input maps to in the current interaction state.
    ///
    /// Inputs that mean nothing in the current state produce no commands.
    pub fn handle(&mut self, input: InteractionInput, world: &World, out: &mut Vec<Command>) {
        match query::interaction_state(world) {
            InteractionState::Idle => self.handle_idle(input, world, out),
            InteractionState::Moving { character } => handle_moving(character, input, world, out),
            InteractionState::PickingUp { actor } => handle_picking_up(actor, input, world, out),
        }
    }

    fn handle_idle(&mut self, input: InteractionInput, world: &World, out: &mut Vec<Command>) {
        match input {
            InteractionInput::ActivateTile(tile) => out.push(Command::ActivateTile { tile }),
            InteractionInput::ActivateOccupant(occupant) => out.push(Command::Select {
                target: SelectionTarget::Occupant(occupant),
            }),
            InteractionInput::ChooseAction(action) => {
                if !query::offered_actions(world).contains(&action) {
                    debug!(?action, "ignoring action that is not on offer");
                    return;
                }
                let Some(SelectionTarget::Occupant(character)) = query::selection(world) else {
                    return;
                };

                match action {
                    CharacterAction::Move => {
                        let Some(snapshot) = query::character(world, character) else {
                            return;
                        };
                        let reachable = self.solver.compute(
                            snapshot.tile,
                            snapshot.movement,
                            query::terrain_view(world),
                        );
                        out.push(Command::BeginMove {
                            character,
                            reachable: reachable.tiles(),
                        });
                    }
                    CharacterAction::Retrieve => {
                        out.push(Command::BeginRetrieve { actor: character });
                    }
                }
            }
        }
    }
}

fn handle_moving(
    character: OccupantId,
    input: InteractionInput,
    world: &World,
    out: &mut Vec<Command>,
) {
    let destination = match input {
        InteractionInput::ActivateTile(tile) => tile,
        InteractionInput::ActivateOccupant(occupant) => match query::occupant(world, occupant) {
            Some(snapshot) => snapshot.tile,
            None => {
                out.push(Command::CancelInteraction);
                return;
            }
        },
        InteractionInput::ChooseAction(action) => {
            debug!(?action, "ignoring action while moving");
            return;
        }
    };

    out.push(Command::CommitMove {
        character,
        destination,
    });
}

fn handle_picking_up(
    actor: OccupantId,
    input: InteractionInput,
    world: &World,
    out: &mut Vec<Command>,
) {
    let item = match input {
        InteractionInput::ActivateOccupant(occupant) => Some(occupant),
        InteractionInput::ActivateTile(tile) => {
            let stack = query::occupants_of(world, tile);
            stack
                .iter()
                .find(|snapshot| snapshot.kind == OccupantKind::Item)
                .or_else(|| stack.first())
                .map(|snapshot| snapshot.id)
        }
        InteractionInput::ChooseAction(action) => {
            debug!(?action, "ignoring action while picking up");
            return;
        }
    };

    match item {
        Some(item) => out.push(Command::PickUpItem { actor, item }),
        None => out.push(Command::CancelInteraction),
    }
}
