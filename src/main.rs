//! Runs a battle between two prefab teams driven by the scoring AI.

use anyhow::{Context, Result};
use clap::Parser;
use creature_battle::{
    BattleRules, BattleState, Catalog, CombatEngine, NullView, PrefabTeam, ScoringAI, TextView, TurnRng,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "creature-battle", about = "Simulate a creature battle between two prefab teams")]
struct Args {
    /// Seed for every random draw. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Rules file in RON. Missing fields keep their defaults.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Two active creatures per side.
    #[arg(long)]
    doubles: bool,

    /// Print the event log as JSON instead of battle text.
    #[arg(long)]
    json: bool,

    /// Declare a draw after this many turns.
    #[arg(long)]
    max_turns: Option<u32>,

    #[arg(long, default_value = "rain")]
    player_team: PrefabTeam,

    #[arg(long, default_value = "sun")]
    enemy_team: PrefabTeam,

    #[arg(long, default_value_t = 50)]
    level: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let mut rules = match &args.rules {
        Some(path) => BattleRules::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => BattleRules::default(),
    };
    if args.doubles {
        rules.format = creature_battle::BattleFormat::Doubles;
    }
    if args.max_turns.is_some() {
        rules.max_turns = args.max_turns;
    }

    let catalog = Catalog::standard();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, player = %args.player_team, enemy = %args.enemy_team, "starting battle");

    let state = BattleState::new(
        format!("battle-{}", seed),
        format!("{} team", args.player_team),
        args.player_team.build(args.level, catalog)?,
        format!("{} team", args.enemy_team),
        args.enemy_team.build(args.level, catalog)?,
        rules,
    );
    let mut player = ScoringAI::seeded(seed.wrapping_add(1));
    let mut enemy = ScoringAI::seeded(seed.wrapping_add(2));

    if args.json {
        let mut engine = CombatEngine::with_view(state, catalog, TurnRng::seeded(seed), NullView);
        let outcome = engine.run_battle(&mut player, &mut enemy)?;
        tracing::info!(?outcome, "battle finished");
        serde_json::to_writer_pretty(io::stdout().lock(), engine.events())?;
        println!();
    } else {
        let view = TextView::new(io::stdout());
        let mut engine = CombatEngine::with_view(state, catalog, TurnRng::seeded(seed), view);
        let outcome = engine.run_battle(&mut player, &mut enemy)?;
        let mut out = engine.into_view().into_inner();
        writeln!(out, "Result: {:?}", outcome)?;
    }
    Ok(())
}

/// Logs go to stderr so they never mix with battle output. `RUST_LOG` overrides the level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
