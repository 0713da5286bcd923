//! Single global selection shared by tiles and occupants.

use tile_tactics_core::{SelectionCursor, SelectionTarget, TileCoord};

use crate::{grid::ToroidalGrid, occupants::OccupantRegistry};

/// Selection capability embedded in every selectable entity.
///
/// Only [`SelectionController`] flips the flag, which keeps at most one flag
/// raised across the whole world.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Selectable {
    selected: bool,
}

impl Selectable {
    pub(crate) const fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Owner of the single selection slot.
#[derive(Debug, Default)]
pub(crate) struct SelectionController {
    slot: Option<SelectionTarget>,
}

impl SelectionController {
    pub(crate) const fn current(&self) -> Option<SelectionTarget> {
        self.slot
    }

    /// Selects the target after deselecting the previous holder.
    ///
    /// Returns the previous holder. Callers must ensure occupant targets exist.
    pub(crate) fn select(
        &mut self,
        target: SelectionTarget,
        grid: &mut ToroidalGrid,
        occupants: &mut OccupantRegistry,
    ) -> Option<SelectionTarget> {
        let previous = self.slot;
        if previous == Some(target) {
            return previous;
        }

        if let Some(holder) = previous {
            mark(holder, false, grid, occupants);
        }
        mark(target, true, grid, occupants);
        self.slot = Some(target);
        previous
    }

    /// Clears the slot and returns the previous holder.
    pub(crate) fn deselect(
        &mut self,
        grid: &mut ToroidalGrid,
        occupants: &mut OccupantRegistry,
    ) -> Option<SelectionTarget> {
        let previous = self.slot.take();
        if let Some(holder) = previous {
            mark(holder, false, grid, occupants);
        }
        previous
    }

    /// Forgets the slot without touching flags; used when the grid is rebuilt.
    pub(crate) fn reset(&mut self) -> Option<SelectionTarget> {
        self.slot.take()
    }

    /// Position of the tile's selection cycle.
    #[track_caller]
    pub(crate) fn cursor(&self, tile: TileCoord, grid: &ToroidalGrid) -> SelectionCursor {
        match self.slot {
            Some(SelectionTarget::Tile(selected)) if selected == tile => SelectionCursor::Tile,
            Some(SelectionTarget::Occupant(id)) => grid
                .occupants_of(tile)
                .iter()
                .position(|candidate| *candidate == id)
                .map_or(SelectionCursor::Vacant, SelectionCursor::Occupant),
            _ => SelectionCursor::Vacant,
        }
    }

    /// Steps the tile's selection cycle and returns the previous holder.
    ///
    /// Tiles with occupants cycle `Vacant → occupant[0] → … → occupant[N-1] →
    /// Tile → occupant[0]`. Empty tiles toggle between selected and nothing.
    #[track_caller]
    pub(crate) fn activate(
        &mut self,
        tile: TileCoord,
        grid: &mut ToroidalGrid,
        occupants: &mut OccupantRegistry,
    ) -> Option<SelectionTarget> {
        let stack = grid.occupants_of(tile);

        let next = if stack.is_empty() {
            match self.cursor(tile, grid) {
                SelectionCursor::Tile => None,
                _ => Some(SelectionTarget::Tile(tile)),
            }
        } else {
            let next = match self.cursor(tile, grid) {
                SelectionCursor::Vacant | SelectionCursor::Tile => {
                    SelectionTarget::Occupant(stack[0])
                }
                SelectionCursor::Occupant(index) => match stack.get(index + 1) {
                    Some(id) => SelectionTarget::Occupant(*id),
                    None => SelectionTarget::Tile(tile),
                },
            };
            Some(next)
        };

        match next {
            Some(target) => self.select(target, grid, occupants),
            None => self.deselect(grid, occupants),
        }
    }
}

fn mark(
    target: SelectionTarget,
    selected: bool,
    grid: &mut ToroidalGrid,
    occupants: &mut OccupantRegistry,
) {
    match target {
        SelectionTarget::Tile(tile) => grid.tile_mut(tile).selectable.selected = selected,
        SelectionTarget::Occupant(id) => {
            if let Some(occupant) = occupants.get_mut(id) {
                occupant.selectable.selected = selected;
            }
        }
    }
}
