use skirmish::battle::ai::RandomBehavior;
use skirmish::{load_battle_config, run_battle, BattleEngineError, BattleState, GameState};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_BATTLE_FILE: &str = "data/battle.ron";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info")),
        )
        .init();

    let mut path = PathBuf::from(DEFAULT_BATTLE_FILE);
    let mut print_json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => print_json = true,
            _ => path = PathBuf::from(arg),
        }
    }

    match run(&path, print_json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, print_json: bool) -> Result<(), BattleEngineError> {
    let config = load_battle_config(path)?;
    let mut battle_state = BattleState::from_config(&config)?;
    let events = run_battle(&mut battle_state, &RandomBehavior::new())?;

    match battle_state.game_state {
        GameState::TeamWin(team) => info!(team, turns = battle_state.turn_number, "team won"),
        _ => info!(turns = battle_state.turn_number, "battle drawn"),
    }
    for character in battle_state.roster.iter() {
        info!(
            name = %character.name,
            team = character.team,
            health = character.current_health(),
            max_health = character.max_health(),
            "final state"
        );
    }
    info!(events = events.len(), history = battle_state.history.len(), "battle finished");

    if print_json {
        match serde_json::to_string_pretty(battle_state.history.entries()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("could not serialise the history: {}", e),
        }
    }
    Ok(())
}
