use tile_tactics_core::{
    CharacterAction, Command, Event, GridDimensions, InteractionMode, MoveRejection, OccupantId,
    OccupantSpec, PickupRejection, SelectionCursor, SelectionTarget, Terrain, TerrainCost,
    TileCoord,
};
use tile_tactics_system_interaction::{Interaction, InteractionInput};
use tile_tactics_world::{self as world, config::WorldConfig, query, World};

struct Harness {
    world: World,
    interaction: Interaction,
}

impl Harness {
    fn classic() -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        for command in WorldConfig::default()
            .generation_commands()
            .expect("classic layout is valid")
        {
            world::apply(&mut world, command, &mut events);
        }
        Self {
            world,
            interaction: Interaction::default(),
        }
    }

    fn blank(columns: u32, rows: u32) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                dimensions: GridDimensions::new(columns, rows),
                terrain: Terrain::Grassland,
                cost: TerrainCost::UNIT,
            },
            &mut events,
        );
        Self {
            world,
            interaction: Interaction::default(),
        }
    }

    fn spawn(&mut self, tile: TileCoord, spec: OccupantSpec) -> OccupantId {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SpawnOccupant { tile, spec },
            &mut events,
        );
        events
            .iter()
            .find_map(|event| match event {
                Event::OccupantSpawned { occupant, .. } => Some(*occupant),
                _ => None,
            })
            .expect("occupant spawned")
    }

    fn input(&mut self, input: InteractionInput) -> Vec<Event> {
        let mut commands = Vec::new();
        self.interaction.handle(input, &self.world, &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    fn click(&mut self, tile: TileCoord) -> Vec<Event> {
        self.input(InteractionInput::ActivateTile(tile))
    }

    fn choose(&mut self, action: CharacterAction) -> Vec<Event> {
        self.input(InteractionInput::ChooseAction(action))
    }

    fn mode(&self) -> InteractionMode {
        query::interaction_mode(&self.world)
    }

    fn selection(&self) -> Option<SelectionTarget> {
        query::selection(&self.world)
    }

    fn selected_entities(&self) -> usize {
        let tiles = query::dimensions(&self.world)
            .tiles()
            .filter(|tile| query::is_tile_selected(&self.world, *tile))
            .count();
        let occupants = query::occupants(&self.world)
            .iter()
            .filter(|snapshot| snapshot.selected)
            .count();
        tiles + occupants
    }

    fn assert_idle_and_clear(&self) {
        assert_eq!(self.mode(), InteractionMode::Idle);
        assert!(query::highlighted_tiles(&self.world).is_empty());
        assert_eq!(self.selection(), None);
        assert_eq!(self.selected_entities(), 0);
    }
}

const TREE: OccupantId = OccupantId::new(0);
const HERO: OccupantId = OccupantId::new(1);
const TREE_TILE: TileCoord = TileCoord::new(12, 8);
const HERO_TILE: TileCoord = TileCoord::new(13, 8);

#[test]
fn move_highlights_range_including_origin() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    assert_eq!(harness.selection(), Some(SelectionTarget::Occupant(HERO)));
    assert_eq!(
        query::offered_actions(&harness.world),
        &CharacterAction::ALL
    );

    let events = harness.choose(CharacterAction::Move);

    assert_eq!(harness.mode(), InteractionMode::Moving);
    assert!(query::is_highlighted(&harness.world, HERO_TILE));
    assert!(query::is_highlighted(&harness.world, TREE_TILE));
    assert!(events.contains(&Event::InteractionModeChanged {
        mode: InteractionMode::Moving,
    }));
    assert!(query::offered_actions(&harness.world).is_empty());
}

#[test]
fn moving_onto_highlighted_tile_commits() {
    let mut harness = Harness::classic();
    let destination = TileCoord::new(16, 8);

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);
    assert!(query::is_highlighted(&harness.world, destination));

    let events = harness.click(destination);

    assert!(events.contains(&Event::CharacterMoved {
        character: HERO,
        from: HERO_TILE,
        to: destination,
    }));
    assert!(query::occupants_of(&harness.world, HERO_TILE).is_empty());
    let arrived = query::occupants_of(&harness.world, destination);
    assert_eq!(arrived.len(), 1);
    assert_eq!(arrived[0].id, HERO);
    assert_eq!(
        query::character(&harness.world, HERO).map(|snapshot| snapshot.tile),
        Some(destination)
    );
    harness.assert_idle_and_clear();
}

#[test]
fn moving_onto_blocked_tile_is_rejected() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);
    let events = harness.click(TREE_TILE);

    assert!(events.contains(&Event::MoveRejected {
        character: HERO,
        destination: TREE_TILE,
        reason: MoveRejection::Blocked,
    }));
    let tree_stack: Vec<_> = query::occupants_of(&harness.world, TREE_TILE)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    let hero_stack: Vec<_> = query::occupants_of(&harness.world, HERO_TILE)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    assert_eq!(tree_stack, vec![TREE]);
    assert_eq!(hero_stack, vec![HERO]);
    harness.assert_idle_and_clear();
}

#[test]
fn moving_onto_tile_outside_range_is_rejected() {
    let mut harness = Harness::classic();
    let far = TileCoord::new(13, 0);

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);
    assert!(!query::is_highlighted(&harness.world, far));

    let events = harness.click(far);

    assert!(events.contains(&Event::MoveRejected {
        character: HERO,
        destination: far,
        reason: MoveRejection::NotHighlighted,
    }));
    assert_eq!(
        query::character(&harness.world, HERO).map(|snapshot| snapshot.tile),
        Some(HERO_TILE)
    );
    harness.assert_idle_and_clear();
}

#[test]
fn character_on_top_row_moves_across_the_seam() {
    let mut harness = Harness::blank(4, 6);
    let start = TileCoord::new(2, 0);
    let hero = harness.spawn(start, OccupantSpec::Character { movement: 5 });

    let _ = harness.click(start);
    let _ = harness.choose(CharacterAction::Move);
    assert!(query::is_highlighted(&harness.world, TileCoord::new(2, 5)));

    let events = harness.click(TileCoord::new(2, 5));

    assert!(events.contains(&Event::CharacterMoved {
        character: hero,
        from: start,
        to: TileCoord::new(2, 5),
    }));
}

#[test]
fn actions_are_ignored_without_a_selected_character() {
    let mut harness = Harness::classic();

    assert!(harness.choose(CharacterAction::Move).is_empty());

    let _ = harness.click(TREE_TILE);
    assert_eq!(harness.selection(), Some(SelectionTarget::Occupant(TREE)));
    assert!(harness.choose(CharacterAction::Retrieve).is_empty());
    assert_eq!(harness.mode(), InteractionMode::Idle);
}

#[test]
fn actions_are_ignored_while_moving() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);

    assert!(harness.choose(CharacterAction::Retrieve).is_empty());
    assert_eq!(harness.mode(), InteractionMode::Moving);
}

#[test]
fn retrieve_picks_up_the_item_on_a_clicked_tile() {
    let mut harness = Harness::blank(5, 5);
    let hero = harness.spawn(
        TileCoord::new(0, 0),
        OccupantSpec::Character { movement: 10 },
    );
    let pile = TileCoord::new(3, 3);
    let rock = harness.spawn(pile, OccupantSpec::Scenery { blocking: false });
    let coin = harness.spawn(
        pile,
        OccupantSpec::Item {
            weight: 1,
            value: 10,
            blocking: false,
        },
    );

    let _ = harness.input(InteractionInput::ActivateOccupant(hero));
    let _ = harness.choose(CharacterAction::Retrieve);
    assert_eq!(harness.mode(), InteractionMode::PickingUp);

    let events = harness.click(pile);

    assert!(events.contains(&Event::ItemPickedUp {
        actor: hero,
        item: coin,
        from: pile,
    }));
    let carried = query::carried_items(&harness.world, hero);
    assert_eq!(carried.len(), 1);
    assert_eq!(carried[0].id, coin);
    assert_eq!(carried[0].value, 10);
    assert!(carried[0].in_inventory);
    assert_eq!(query::item(&harness.world, coin), None);
    let remaining: Vec<_> = query::occupants_of(&harness.world, pile)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    assert_eq!(remaining, vec![rock]);
    harness.assert_idle_and_clear();
}

#[test]
fn retrieving_scenery_is_rejected() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Retrieve);
    let events = harness.input(InteractionInput::ActivateOccupant(TREE));

    assert!(events.contains(&Event::PickupRejected {
        actor: HERO,
        reason: PickupRejection::NotAnItem,
    }));
    assert_eq!(query::occupants_of(&harness.world, TREE_TILE).len(), 1);
    assert!(query::carried_items(&harness.world, HERO).is_empty());
    harness.assert_idle_and_clear();
}

#[test]
fn retrieving_from_an_empty_tile_returns_to_idle() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Retrieve);
    let _ = harness.click(TileCoord::new(0, 0));

    harness.assert_idle_and_clear();
}

#[test]
fn three_occupants_cycle_through_four_states() {
    let mut harness = Harness::blank(3, 3);
    let tile = TileCoord::new(1, 1);
    let pebble = OccupantSpec::Scenery { blocking: false };
    let stack: Vec<_> = (0..3).map(|_| harness.spawn(tile, pebble)).collect();

    let mut observed = Vec::new();
    for _ in 0..8 {
        let _ = harness.click(tile);
        observed.push(harness.selection());
    }

    let cycle = [
        Some(SelectionTarget::Occupant(stack[0])),
        Some(SelectionTarget::Occupant(stack[1])),
        Some(SelectionTarget::Occupant(stack[2])),
        Some(SelectionTarget::Tile(tile)),
    ];
    assert_eq!(observed[..4], cycle);
    assert_eq!(observed[4..], cycle);
    assert!(!observed.contains(&None));
}

#[test]
fn cursor_follows_the_cycle_position() {
    let mut harness = Harness::blank(3, 3);
    let tile = TileCoord::new(0, 2);
    let pebble = OccupantSpec::Scenery { blocking: false };
    for _ in 0..3 {
        let _ = harness.spawn(tile, pebble);
    }

    let mut cursors = vec![query::selection_cursor(&harness.world, tile)];
    for _ in 0..4 {
        let _ = harness.click(tile);
        cursors.push(query::selection_cursor(&harness.world, tile));
    }

    assert_eq!(
        cursors,
        vec![
            SelectionCursor::Vacant,
            SelectionCursor::Occupant(0),
            SelectionCursor::Occupant(1),
            SelectionCursor::Occupant(2),
            SelectionCursor::Tile,
        ]
    );
    let _ = harness.click(tile);
    assert_eq!(
        query::selection_cursor(&harness.world, tile),
        SelectionCursor::Occupant(0)
    );
    assert_eq!(
        query::selection_cursor(&harness.world, TileCoord::new(1, 1)),
        SelectionCursor::Vacant
    );
}

#[test]
fn empty_tile_toggles_back_after_even_activations() {
    let mut harness = Harness::blank(3, 3);
    let tile = TileCoord::new(2, 0);

    for _ in 0..3 {
        let _ = harness.click(tile);
        assert!(query::is_tile_selected(&harness.world, tile));
        let _ = harness.click(tile);
        assert!(!query::is_tile_selected(&harness.world, tile));
    }
}

#[test]
fn at_most_one_entity_is_ever_selected() {
    let mut harness = Harness::classic();
    let script = [
        HERO_TILE,
        TREE_TILE,
        TREE_TILE,
        TileCoord::new(0, 0),
        HERO_TILE,
        TileCoord::new(23, 15),
        TileCoord::new(23, 15),
        TREE_TILE,
        HERO_TILE,
        HERO_TILE,
    ];

    for tile in script {
        let _ = harness.click(tile);
        assert!(harness.selected_entities() <= 1);
    }

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);
    assert_eq!(harness.selected_entities(), 1);
    let _ = harness.click(TileCoord::new(14, 8));
    assert_eq!(harness.selected_entities(), 0);
}

#[test]
fn direct_selection_abandons_a_pending_move() {
    let mut harness = Harness::classic();

    let _ = harness.click(HERO_TILE);
    let _ = harness.choose(CharacterAction::Move);

    let mut events = Vec::new();
    world::apply(
        &mut harness.world,
        Command::Select {
            target: SelectionTarget::Occupant(TREE),
        },
        &mut events,
    );

    assert_eq!(harness.mode(), InteractionMode::Idle);
    assert!(query::highlighted_tiles(&harness.world).is_empty());
    assert_eq!(harness.selection(), Some(SelectionTarget::Occupant(TREE)));
    assert_eq!(
        query::character(&harness.world, HERO).map(|snapshot| snapshot.tile),
        Some(HERO_TILE)
    );
}
