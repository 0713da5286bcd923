use tile_tactics_core::{
    Command, GridDimensions, OccupantSpec, Terrain, TerrainCost, TerrainView, TileCoord,
};
use tile_tactics_system_movement_range::{Config, MovementRange};
use tile_tactics_world::{self as world, query, World};

fn uniform(dimensions: GridDimensions) -> Vec<TerrainCost> {
    vec![TerrainCost::UNIT; dimensions.tile_count()]
}

#[test]
fn five_by_five_budget_ten_reaches_the_diamond() {
    let dimensions = GridDimensions::new(5, 5);
    let costs = uniform(dimensions);
    let origin = TileCoord::new(2, 2);
    let mut solver = MovementRange::new(Config {
        base_movement_cost: 5,
    });

    let reachable = solver.compute(origin, 10, TerrainView::new(&costs, dimensions));

    let with_leftover = |value: f64| {
        reachable
            .iter()
            .filter(|reached| reached.leftover == value)
            .count()
    };
    assert_eq!(reachable.len(), 13);
    assert_eq!(reachable.leftover(origin), Some(10.0));
    assert_eq!(with_leftover(5.0), 4);
    assert_eq!(with_leftover(0.0), 8);
    assert!(!reachable.contains(TileCoord::new(0, 0)));
}

#[test]
fn uniform_grid_matches_toroidal_distance() {
    let dimensions = GridDimensions::new(7, 6);
    let costs = uniform(dimensions);
    let view = TerrainView::new(&costs, dimensions);
    let mut solver = MovementRange::default();

    let origins = [
        TileCoord::new(0, 0),
        TileCoord::new(3, 2),
        TileCoord::new(6, 5),
    ];
    for origin in origins {
        for budget in [0, 5, 12, 20, 35] {
            let reachable = solver.compute(origin, budget, view);
            for tile in dimensions.tiles() {
                let cost = dimensions.toroidal_distance(origin, tile) * 5;
                let expected = (cost <= budget).then(|| f64::from(budget - cost));
                assert_eq!(
                    reachable.leftover(tile),
                    expected,
                    "origin {origin:?} budget {budget} tile {tile:?}"
                );
            }
        }
    }
}

#[test]
fn exact_budget_reaches_fractional_cost_tiles() {
    let dimensions = GridDimensions::new(12, 1);
    let cost = TerrainCost::new(0.72).expect("positive cost");
    let costs = vec![cost; dimensions.tile_count()];
    let mut solver = MovementRange::new(Config {
        base_movement_cost: 5,
    });

    let view = TerrainView::new(&costs, dimensions);
    let reachable = solver.compute(TileCoord::new(0, 0), 18, view);

    assert_eq!(reachable.leftover(TileCoord::new(5, 0)), Some(0.0));
    assert_eq!(reachable.leftover(TileCoord::new(7, 0)), Some(0.0));
    let one_step = reachable
        .leftover(TileCoord::new(4, 0))
        .expect("one step short of the budget");
    assert!((one_step - 3.6).abs() < 1e-9, "leftover {one_step}");
    assert!(!reachable.contains(TileCoord::new(6, 0)));
}

#[test]
fn range_wraps_from_top_row_to_bottom_row() {
    let dimensions = GridDimensions::new(4, 9);
    let costs = uniform(dimensions);
    let mut solver = MovementRange::default();

    let view = TerrainView::new(&costs, dimensions);
    let reachable = solver.compute(TileCoord::new(1, 0), 5, view);

    assert_eq!(reachable.leftover(TileCoord::new(1, 8)), Some(0.0));
    assert_eq!(reachable.leftover(TileCoord::new(1, 1)), Some(0.0));
    assert!(!reachable.contains(TileCoord::new(1, 7)));
}

#[test]
fn tile_costlier_than_budget_is_never_reached() {
    let dimensions = GridDimensions::new(3, 1);
    let mut costs = uniform(dimensions);
    costs[2] = TerrainCost::new(3.0).expect("positive cost");
    let mut solver = MovementRange::default();

    let view = TerrainView::new(&costs, dimensions);
    let reachable = solver.compute(TileCoord::new(0, 0), 14, view);

    assert!(reachable.contains(TileCoord::new(1, 0)));
    assert!(!reachable.contains(TileCoord::new(2, 0)));
}

#[test]
fn road_stretches_the_budget() {
    let dimensions = GridDimensions::new(10, 3);
    let mut costs = uniform(dimensions);
    for column in 0..10 {
        costs[(10 + column) as usize] = Terrain::DirtRoad.default_cost();
    }
    let mut solver = MovementRange::default();

    let view = TerrainView::new(&costs, dimensions);
    let reachable = solver.compute(TileCoord::new(0, 1), 15, view);

    assert_eq!(reachable.leftover(TileCoord::new(4, 1)), Some(0.0));
    assert_eq!(reachable.leftover(TileCoord::new(6, 1)), Some(0.0));
    assert_eq!(reachable.leftover(TileCoord::new(2, 0)), Some(2.5));
    assert!(!reachable.contains(TileCoord::new(3, 0)));
    assert!(!reachable.contains(TileCoord::new(5, 1)));
}

#[test]
fn blocking_occupants_do_not_stop_traversal() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            dimensions: GridDimensions::new(5, 1),
            terrain: Terrain::Grassland,
            cost: TerrainCost::UNIT,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnOccupant {
            tile: TileCoord::new(1, 0),
            spec: OccupantSpec::Scenery { blocking: true },
        },
        &mut events,
    );

    let mut solver = MovementRange::default();
    let reachable = solver.compute(TileCoord::new(0, 0), 10, query::terrain_view(&world));

    assert!(query::contains_blocker(&world, TileCoord::new(1, 0)));
    assert!(reachable.contains(TileCoord::new(1, 0)));
    assert!(reachable.contains(TileCoord::new(2, 0)));
}
