//! Square Siege - headless entry point
//!
//! Runs one session against the two-timer scheduler, optionally driven by
//! the autopilot, then records the final score on the leaderboard.
//!
//! Usage: `square-siege [settings.json]`

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;

use square_siege::autopilot::Autopilot;
use square_siege::clock::Scheduler;
use square_siege::consts::TICK_INTERVAL_MS;
use square_siege::leaderboard::{self, Leaderboard};
use square_siege::settings::{SETTINGS_FILE, Settings};
use square_siege::sim::{Arena, GameEvent, apply_input};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Square Siege (headless) starting...");

    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&settings_path);

    let seed = settings.effective_seed();
    let mut arena = Arena::new(seed);
    arena.release_stops_both_axes = settings.release_stops_both_axes;
    arena.toggle_active();
    log::info!("Game initialized with seed: {}", seed);

    run(&mut arena, &settings);

    let hud = serde_json::to_string(&arena.hud()).context("serializing final HUD")?;
    log::info!(
        "Session over after {} ticks ({} shots, {} kills): {}",
        arena.ticks,
        arena.shots_fired,
        arena.kills,
        hud
    );

    // A broken leaderboard never fails the session
    if let Err(e) = record_score(&arena, &settings) {
        log::warn!("Leaderboard not updated: {:#}", e);
    }
    Ok(())
}

/// Drive the scheduler until the player dies or the tick cap is reached
fn run(arena: &mut Arena, settings: &Settings) {
    let mut clock = Scheduler::new();
    let mut pilot = settings.autopilot.then(Autopilot::new);
    let frame = Duration::from_millis(TICK_INTERVAL_MS);
    let mut last = Instant::now();

    while clock.is_running() {
        if let Some(pilot) = pilot.as_mut() {
            for event in pilot.plan(arena) {
                apply_input(arena, event);
            }
        }

        let elapsed_ms = if settings.realtime {
            std::thread::sleep(frame);
            let now = Instant::now();
            let ms = now.duration_since(last).as_millis() as u64;
            last = now;
            ms
        } else {
            TICK_INTERVAL_MS
        };
        clock.advance(arena, elapsed_ms);

        for event in arena.drain_events() {
            log_event(&event);
        }

        if arena.is_game_over() {
            clock.stop();
        } else if arena.ticks >= settings.max_ticks {
            log::info!("Tick cap of {} reached", settings.max_ticks);
            clock.stop();
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Repaint => {}
        GameEvent::WaveStarted { wave, level } => log::info!("Level {} wave {}", level, wave),
        GameEvent::EnemyKilled { kind, reward } => log::debug!("{:?} down (+{})", kind, reward),
        GameEvent::WaveCleared { time_bonus } => log::info!("Wave cleared, time bonus {}", time_bonus),
        GameEvent::PlayerHit { damage, hp } => log::debug!("Player hit for {} ({} hp left)", damage, hp),
        GameEvent::GameOver { score, level } => log::info!("Game over: score {} at level {}", score, level),
    }
}

fn record_score(arena: &Arena, settings: &Settings) -> anyhow::Result<()> {
    let path = &settings.leaderboard_path;
    let mut board =
        Leaderboard::load(path).with_context(|| format!("loading {}", path.display()))?;

    let rank = board
        .add_score(&settings.player_name, arena.score, arena.level, &leaderboard::today())
        .context("recording score")?;
    match rank {
        Some(rank) => {
            board
                .save(path)
                .with_context(|| format!("saving {}", path.display()))?;
            log::info!("New high score! Rank #{} with {}", rank, arena.score);
        }
        None => log::info!("Score {} did not make the leaderboard", arena.score),
    }
    Ok(())
}
