//! Authoritative occupant state management utilities.

use std::collections::BTreeMap;

use tile_tactics_core::{OccupantId, OccupantKind, OccupantSpec, PickupRejection, TileCoord};

use crate::selection::Selectable;

/// Occupant resting on a tile of the grid.
#[derive(Clone, Debug)]
pub(crate) struct Occupant {
    /// Tile whose stack lists the occupant.
    pub(crate) tile: TileCoord,
    /// Whether characters may end a move on the occupant's tile.
    pub(crate) blocking: bool,
    /// Selection capability shared with tiles.
    pub(crate) selectable: Selectable,
    /// Variant-specific state.
    pub(crate) body: Body,
}

impl Occupant {
    pub(crate) const fn kind(&self) -> OccupantKind {
        match self.body {
            Body::Character(_) => OccupantKind::Character,
            Body::Item(_) => OccupantKind::Item,
            Body::Scenery => OccupantKind::Scenery,
        }
    }
}

/// Variant-specific occupant state.
#[derive(Clone, Debug)]
pub(crate) enum Body {
    Character(Character),
    Item(Item),
    Scenery,
}

/// State carried by movable characters.
#[derive(Clone, Debug)]
pub(crate) struct Character {
    pub(crate) movement: u32,
    pub(crate) carried: Vec<Item>,
}

/// State carried by collectable items, on a tile or inside an inventory.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Item {
    pub(crate) id: OccupantId,
    pub(crate) weight: u32,
    pub(crate) value: u32,
    pub(crate) in_inventory: bool,
}

/// Registry that stores occupants and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct OccupantRegistry {
    entries: BTreeMap<OccupantId, Occupant>,
    next_id: OccupantId,
}

impl OccupantRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: OccupantId::new(0),
        }
    }

    /// Stores a new occupant built from the spawn description and returns its identifier.
    pub(crate) fn spawn(&mut self, tile: TileCoord, spec: OccupantSpec) -> OccupantId {
        let id = self.next_id;
        self.next_id = OccupantId::new(id.get().saturating_add(1));

        let (blocking, body) = match spec {
            OccupantSpec::Character { movement } => (
                true,
                Body::Character(Character {
                    movement,
                    carried: Vec::new(),
                }),
            ),
            OccupantSpec::Item {
                weight,
                value,
                blocking,
            } => (
                blocking,
                Body::Item(Item {
                    id,
                    weight,
                    value,
                    in_inventory: false,
                }),
            ),
            OccupantSpec::Scenery { blocking } => (blocking, Body::Scenery),
        };

        let previous = self.entries.insert(
            id,
            Occupant {
                tile,
                blocking,
                selectable: Selectable::default(),
                body,
            },
        );
        debug_assert!(previous.is_none(), "occupant identifier {id:?} reused");
        id
    }

    pub(crate) fn get(&self, id: OccupantId) -> Option<&Occupant> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: OccupantId) -> Option<&mut Occupant> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn character_mut(&mut self, id: OccupantId) -> Option<&mut Character> {
        match self.entries.get_mut(&id).map(|occupant| &mut occupant.body) {
            Some(Body::Character(character)) => Some(character),
            _ => None,
        }
    }

    /// Removes an item from the registry, returning the tile it rested on.
    pub(crate) fn take_item(
        &mut self,
        id: OccupantId,
    ) -> Result<(TileCoord, Item), PickupRejection> {
        match self.entries.get(&id).map(|occupant| &occupant.body) {
            None => return Err(PickupRejection::MissingItem),
            Some(Body::Item(_)) => {}
            Some(_) => return Err(PickupRejection::NotAnItem),
        }

        match self.entries.remove(&id) {
            Some(Occupant {
                tile,
                body: Body::Item(item),
                ..
            }) => Ok((tile, item)),
            _ => Err(PickupRejection::MissingItem),
        }
    }

    /// Iterator over every occupant in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (OccupantId, &Occupant)> {
        self.entries.iter().map(|(id, occupant)| (*id, occupant))
    }
}
