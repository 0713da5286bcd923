#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes the tiles a character can reach with its budget.

use std::collections::VecDeque;

use tile_tactics_core::{Direction, TerrainCost, TerrainView, TileCoord, BASE_MOVEMENT_COST};
use tracing::trace;

/// Movement points are tracked in thousandths so that budgets and entry costs
/// add up exactly.
const UNITS_PER_POINT: u32 = 1_000;

/// Tunable parameters of the movement range solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Movement points charged for entering a tile whose multiplier is 1.
    pub base_movement_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_movement_cost: BASE_MOVEMENT_COST,
        }
    }
}

/// Cost-bounded breadth expansion over the toroidal grid.
///
/// The solver keeps its memo and frontier between queries so repeated move
/// actions reuse the same allocations.
#[derive(Debug, Default)]
pub struct MovementRange {
    config: Config,
    best: Vec<Option<u64>>,
    frontier: VecDeque<(TileCoord, u64)>,
}

impl MovementRange {
    /// Creates a solver with the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            best: Vec::new(),
            frontier: VecDeque::new(),
        }
    }

    /// Computes every tile reachable from `origin` without exceeding `budget`.
    ///
    /// Entering a tile costs its terrain multiplier times the base movement
    /// cost, rounded to a thousandth of a point. The origin is always reachable
    /// with the full budget. A neighbour's record is only replaced by a
    /// strictly greater leftover, which bounds the expansion even when the
    /// budget wraps around the torus.
    ///
    /// # Panics
    ///
    /// Panics when `origin` lies outside the terrain view.
    #[track_caller]
    pub fn compute(
        &mut self,
        origin: TileCoord,
        budget: u32,
        terrain: TerrainView<'_>,
    ) -> ReachableTiles {
        let dimensions = terrain.dimensions();
        let Some(origin_index) = dimensions.index(origin) else {
            panic!(
                "movement origin {origin:?} lies outside the {}x{} grid",
                dimensions.columns(),
                dimensions.rows()
            );
        };

        self.best.clear();
        self.best.resize(dimensions.tile_count(), None);
        self.frontier.clear();

        let budget_units = u64::from(budget) * u64::from(UNITS_PER_POINT);
        self.best[origin_index] = Some(budget_units);
        self.frontier.push_back((origin, budget_units));

        let mut expansions = 0_usize;
        while let Some((tile, remaining)) = self.frontier.pop_front() {
            expansions += 1;
            for direction in Direction::ALL {
                let neighbor = dimensions.neighbor(tile, direction);
                let Some(index) = dimensions.index(neighbor) else {
                    continue;
                };
                let Some(cost) = terrain.cost(neighbor) else {
                    continue;
                };
                let entry = entry_units(cost, self.config.base_movement_cost);
                let Some(candidate) = remaining.checked_sub(entry) else {
                    continue;
                };

                if !matches!(self.best[index], Some(recorded) if recorded >= candidate) {
                    self.best[index] = Some(candidate);
                    self.frontier.push_back((neighbor, candidate));
                }
            }
        }

        let tiles: Vec<ReachableTile> = self
            .best
            .iter()
            .enumerate()
            .filter_map(|(index, leftover)| {
                let units = (*leftover)?;
                let tile = dimensions.tile_at(index)?;
                Some(ReachableTile {
                    tile,
                    leftover: units as f64 / f64::from(UNITS_PER_POINT),
                })
            })
            .collect();

        trace!(
            ?origin,
            budget,
            reachable = tiles.len(),
            expansions,
            "movement range computed"
        );

        ReachableTiles { tiles }
    }
}

fn entry_units(cost: TerrainCost, base_movement_cost: u32) -> u64 {
    let points = f64::from(cost.get()) * f64::from(base_movement_cost);
    (points * f64::from(UNITS_PER_POINT)).round() as u64
}

/// Tile reached by the solver together with the budget left on arrival.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReachableTile {
    /// Reached tile.
    pub tile: TileCoord,
    /// Budget remaining after the cheapest known route into the tile.
    pub leftover: f64,
}

/// Result of a movement range query, in row-major tile order.
#[derive(Clone, Debug, PartialEq)]
pub struct ReachableTiles {
    tiles: Vec<ReachableTile>,
}

impl ReachableTiles {
    /// Number of reachable tiles, origin included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether nothing is reachable. Never true for a computed range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether the tile is reachable.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.leftover(tile).is_some()
    }

    /// Budget left on arrival at the tile, if it is reachable.
    #[must_use]
    pub fn leftover(&self, tile: TileCoord) -> Option<f64> {
        self.tiles
            .iter()
            .find(|reached| reached.tile == tile)
            .map(|reached| reached.leftover)
    }

    /// Iterator over the reachable tiles and their leftovers.
    pub fn iter(&self) -> impl Iterator<Item = ReachableTile> + '_ {
        self.tiles.iter().copied()
    }

    /// Reachable tiles without their leftovers.
    #[must_use]
    pub fn tiles(&self) -> Vec<TileCoord> {
        self.tiles.iter().map(|reached| reached.tile).collect()
    }
}
