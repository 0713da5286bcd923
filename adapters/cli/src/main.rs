#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Tile Tactics and replays input scripts.

mod render;
mod script;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tile_tactics_core::Event;
use tile_tactics_system_interaction::Interaction;
use tile_tactics_system_movement_range::Config;
use tile_tactics_world::{self as world, config::WorldConfig, query, World};
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Tactics on a wrapping tile grid")]
struct Args {
    /// World generation settings in TOML; the classic layout when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input script replayed against the world
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print only the final grid
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the Tile Tactics command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => WorldConfig::from_path(path)
            .with_context(|| format!("failed to load world config {}", path.display()))?,
        None => WorldConfig::default(),
    };
    let steps = match &args.script {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read script at {}", path.display()))?;
            script::parse(&contents)
                .with_context(|| format!("failed to parse script {}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut world = World::new();
    let mut events = Vec::new();
    for command in config
        .generation_commands()
        .context("world config does not fit its grid")?
    {
        world::apply(&mut world, command, &mut events);
    }
    info!(
        columns = config.columns,
        rows = config.rows,
        occupants = query::occupants(&world).len(),
        "world generated"
    );

    if !args.quiet {
        println!("{}", query::welcome_banner(&world));
    }

    let mut interaction = Interaction::new(Config {
        base_movement_cost: config.base_movement_cost,
    });
    for step in steps {
        let Some(input) = step.input(query::dimensions(&world)) else {
            if !args.quiet {
                print!("{}", render::render(&world));
            }
            continue;
        };

        let mut commands = Vec::new();
        interaction.handle(input, &world, &mut commands);
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if !args.quiet {
            events.iter().for_each(report);
        }
    }

    print!("{}", render::render(&world));
    Ok(())
}

fn report(event: &Event) {
    println!("> {event:?}");
}
