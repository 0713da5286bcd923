//! Plain-text presentation of the world for terminals.

use std::fmt::Write as _;

use tile_tactics_core::{OccupantKind, SelectionTarget, Terrain, TileCoord};
use tile_tactics_world::{
    query,
    query::{ItemSnapshot, OccupantSnapshot},
    World,
};

/// Draws the grid one row per line followed by the interaction status.
///
/// A selected tile shows `#` even when occupied. Otherwise each tile shows
/// its topmost occupant, then a highlight marker, then its terrain. A
/// selected occupant is drawn uppercase and its carried items are listed
/// when it is a character.
pub(crate) fn render(world: &World) -> String {
    let dimensions = query::dimensions(world);
    let grid = query::grid(world);
    let mut output = String::new();

    for row in 0..dimensions.rows() {
        for column in 0..dimensions.columns() {
            let tile = TileCoord::new(column, row);
            let stack = query::occupants_of(world, tile);
            let glyph = match stack.last() {
                _ if query::is_tile_selected(world, tile) => '#',
                Some(top) => occupant_glyph(top),
                None if query::is_highlighted(world, tile) => '+',
                None => terrain_glyph(grid.terrain(tile)),
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    let selection = query::selection(world);
    let described = match selection {
        Some(SelectionTarget::Tile(tile)) => {
            format!("tile {} {}", tile.column(), tile.row())
        }
        Some(SelectionTarget::Occupant(id)) => format!("occupant {}", id.get()),
        None => "none".to_owned(),
    };
    let _ = writeln!(output, "mode: {:?}", query::interaction_mode(world));
    let _ = writeln!(output, "selection: {described}");

    let character = match selection {
        Some(SelectionTarget::Occupant(id)) => query::character(world, id),
        _ => None,
    };
    if let Some(character) = character {
        let _ = writeln!(output, "carried: {}", carried(&character.carried));
    }

    let actions = query::offered_actions(world);
    if !actions.is_empty() {
        let _ = writeln!(output, "actions: {actions:?}");
    }
    output
}

fn carried(items: &[ItemSnapshot]) -> String {
    if items.is_empty() {
        return "nothing".to_owned();
    }

    items
        .iter()
        .map(|item| {
            let id = item.id.get();
            format!("#{id} weight {} value {}", item.weight, item.value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn occupant_glyph(occupant: &OccupantSnapshot) -> char {
    let glyph = match occupant.kind {
        OccupantKind::Character => 'c',
        OccupantKind::Item => 'i',
        OccupantKind::Scenery => 't',
    };
    if occupant.selected {
        glyph.to_ascii_uppercase()
    } else {
        glyph
    }
}

const fn terrain_glyph(terrain: Terrain) -> char {
    match terrain {
        Terrain::Grassland => '.',
        Terrain::DirtRoad => '=',
    }
}
