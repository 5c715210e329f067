//! Bubble Arena headless runner
//!
//! Plays one session at a fixed timestep with scripted input and prints the
//! result as JSON. Useful for soak-testing the simulation.
//!
//! Usage: `bubble-arena [scavenger|battle] [seed] [settings.json]`

use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bubble_arena::Settings;
use bubble_arena::sim::{
    Ability, Archetype, BattleSession, Facing, GameEvent, PlayerSlot, ScavengerSession, Session,
    SessionPhase,
};

/// Fixed frame length (ms)
const FRAME_MS: u64 = 16;
/// Give up on a session that has not finished after this long (ms)
const MAX_SESSION_MS: u64 = 10 * 60 * 1000;

fn load_settings(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Settings::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(Settings::default()),
    }
}

/// Mash buttons: wander and fire whatever is ready
fn scripted_input(session: &mut dyn Session, slots: &[PlayerSlot], rng: &mut Pcg32) {
    for &slot in slots {
        if rng.random_bool(0.05) {
            let dir = if rng.random_bool(0.2) {
                None
            } else {
                Some(Facing::ALL[rng.random_range(0..Facing::ALL.len())])
            };
            session.set_movement_intent(slot, dir);
        }
        let Some(status) = session.player_status(slot) else {
            continue;
        };
        for ability in [Ability::Blue, Ability::Red, Ability::Green] {
            if status.cooldowns.is_ready(ability) {
                session.trigger_ability(slot, ability);
                break;
            }
        }
    }
}

fn run(session: &mut dyn Session, slots: &[PlayerSlot], seed: u64) -> Option<GameEvent> {
    let mut input_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut elapsed = 0;
    let mut result = None;
    session.launch();
    while session.phase() != SessionPhase::Done {
        if elapsed >= MAX_SESSION_MS {
            log::warn!("Session still running after {} s, quitting", elapsed / 1000);
            session.quit();
        }
        scripted_input(session, slots, &mut input_rng);
        session.advance(FRAME_MS);
        elapsed += FRAME_MS;

        for event in session.drain_events() {
            match &event {
                GameEvent::WaveSpawned { wave, boxes } => {
                    log::info!("[{:>6} ms] wave {wave}: {boxes} boxes", elapsed);
                }
                GameEvent::LifeChanged { id, life } => {
                    log::debug!("[{:>6} ms] {id:?} life {life}", elapsed);
                }
                GameEvent::Done(_) => result = Some(event.clone()),
                _ => {}
            }
        }
    }
    result
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = args.first().map(String::as_str).unwrap_or("scavenger");
    let seed = match args.get(1).map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Bad seed: {e}");
            return ExitCode::FAILURE;
        }
        None => 42,
    };
    let settings = match load_settings(args.get(2).map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Could not load settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Bubble Arena ({mode}) starting with seed {seed}");
    let result = match mode {
        "scavenger" => {
            let mut session = ScavengerSession::new(settings, seed, Archetype::Boy);
            run(&mut session, &[PlayerSlot::One], seed)
        }
        "battle" => {
            let mut session =
                BattleSession::new(settings, seed, [Archetype::BlueBoy, Archetype::Girl]);
            run(&mut session, &[PlayerSlot::One, PlayerSlot::Two], seed)
        }
        other => {
            log::error!("Unknown mode {other:?}, expected scavenger or battle");
            return ExitCode::FAILURE;
        }
    };

    match result.map(|event| serde_json::to_string(&event)) {
        Some(Ok(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Some(Err(e)) => {
            log::error!("Could not encode result: {e}");
            ExitCode::FAILURE
        }
        None => ExitCode::FAILURE,
    }
}
