//! Arc Anatomy - Demo Entry Point
//!
//! Spawns one creature, throws random hits at it while ticking the world,
//! and prints how its capacities degrade.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arc_anatomy::body::TemplateRegistry;
use arc_anatomy::core::error::Result;
use arc_anatomy::core::SimulationConfig;
use arc_anatomy::health::{CanBeDamaged, Damage, DamageType};
use arc_anatomy::simulation::World;

#[derive(Parser, Debug)]
#[command(name = "anatomy_sim", about = "Body damage and capacity simulation demo")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Frame length in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Seed for the attacker's choices
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Body type to spawn
    #[arg(long, default_value = "humanoid")]
    body: String,

    /// Body definitions file (TOML); bundled definitions when omitted
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Simulation config file (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every hit as JSON
    #[arg(long)]
    json: bool,
}

const DAMAGE_TYPES: [DamageType; 6] = [
    DamageType::Slashing,
    DamageType::Piercing,
    DamageType::Blunt,
    DamageType::Fire,
    DamageType::Cold,
    DamageType::Poison,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arc_anatomy=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let registry = match &args.definitions {
        Some(path) => TemplateRegistry::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => TemplateRegistry::with_defaults()?,
    };

    let mut world = World::new(config, registry)?;
    let id = world.spawn(&args.body, "Subject")?;

    world.events.capacity_changed.subscribe(|change| {
        tracing::info!(
            movement = change.current.movement,
            manipulation = change.current.manipulation,
            cognition = change.current.cognition,
            pain = change.current.pain,
            "Capacities changed"
        );
        Ok(true)
    });

    let mut attacker = ChaCha8Rng::seed_from_u64(args.seed);

    for frame in 0..args.ticks {
        if attacker.gen_bool(0.1) {
            let damage = Damage::new(
                DAMAGE_TYPES[attacker.gen_range(0..DAMAGE_TYPES.len())],
                attacker.gen_range(2.0..25.0),
                attacker.gen_range(0.2..0.8),
                attacker.gen_range(0.0..0.5),
            );
            let event = world.damage(id, &damage)?;

            if args.json {
                match serde_json::to_string(&event) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!("Could not serialize event: {}", e),
                }
            } else {
                println!(
                    "[{frame:>4}] {} {:.1} -> {} part(s) hit",
                    damage.damage_type().display_name(),
                    damage.amount(),
                    event.parts.len()
                );
            }
        }

        world.tick(args.dt);

        if world.creature(id)?.is_destroyed() {
            println!("Subject reached a terminal state at frame {frame}");
            break;
        }
    }

    let creature = world.creature(id)?;
    let capacities = creature.current_capacities();
    println!();
    println!("=== {} ({}) ===", creature.name, creature.body().body_type());
    println!("Overall health: {:.2}", creature.body().overall_health());
    println!("Damage state:   {}", creature.damage_state().display_name());
    println!("Pain:           {:.2}", capacities.pain);
    println!("Cognition:      {:.2}", capacities.cognition);
    println!("Movement:       {:.2}", capacities.movement);
    println!("Manipulation:   {:.2}", capacities.manipulation);
    println!("Communication:  {:.2}", capacities.communication);
    println!("Healing:        {:.2}", capacities.healing);
    println!();

    for (_, part) in creature.body().tree().parts() {
        println!(
            "  {:<16} {:>3}/{:<3} {}",
            part.display_name(),
            part.hp.hp(),
            part.hp.hp_base(),
            part.damage_state().display_name()
        );
    }

    Ok(())
}
