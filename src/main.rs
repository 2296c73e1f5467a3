//! Brick Breaker headless entry point
//!
//! Runs the simulation without a window: loads settings, plays with the
//! autopilot and logs the event stream.

use std::path::Path;

use brick_breaker::consts::*;
use brick_breaker::sim::{BlockKind, GameEvent, GamePhase, GameState, TickInput};
use brick_breaker::{LayoutEntry, LevelLayout, Runner, Settings, persistence};

/// Simulated display refresh driving the accumulator
const FRAME_DT: f64 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let level = settings.start_level.clamp(1, FINAL_LEVEL);
    let layout = practice_layout(level, settings.rows);
    if let Err(err) = layout.validate() {
        log::error!("Bad layout for level {}: {}", level, err);
        std::process::exit(1);
    }

    let mut state = GameState::new(settings.seed);
    state.load_level(level, &layout);

    let mut runner = Runner::new(state, &settings);
    runner.set_input(TickInput {
        idle_mode: settings.autopilot,
        ..Default::default()
    });

    loop {
        runner.update(FRAME_DT);

        for event in runner.drain_events() {
            log_event(&event);
        }

        match runner.state().phase {
            GamePhase::GameOver => break,
            GamePhase::LevelComplete if runner.state().is_final_level() => break,
            GamePhase::LevelComplete => {
                let next = runner.state().level + 1;
                runner.next_level(&practice_layout(next, settings.rows));
            }
            _ => {}
        }

        if settings.max_ticks > 0 && runner.ticks() >= settings.max_ticks {
            log::info!("Tick limit {} reached", settings.max_ticks);
            break;
        }
    }

    let snapshot = runner.reader().latest();
    log::info!(
        "Finished: level {}, score {}, hearts {}, {} ticks",
        snapshot.level,
        snapshot.score,
        snapshot.hearts,
        runner.ticks()
    );

    if let Some(path) = &settings.save_path {
        if let Err(err) = persistence::save_to(Path::new(path), runner.state()) {
            log::error!("Could not save game: {}", err);
        }
    }
}

/// Demo layout: deeper with each level, special blocks sprinkled through it
fn practice_layout(level: u32, rows: u32) -> LevelLayout {
    const SPECIALS: [BlockKind; 8] = [
        BlockKind::Choco,
        BlockKind::Star,
        BlockKind::Heart,
        BlockKind::Freeze,
        BlockKind::Mystery,
        BlockKind::Ghost,
        BlockKind::Wall,
        BlockKind::CountBreaker,
    ];

    let rows = (rows + level - 1).min(GRID_ROWS - 4);
    let entries = LevelLayout::uniform(rows, BlockKind::Normal)
        .entries
        .into_iter()
        .map(|entry| {
            let cell = entry.row * GRID_COLUMNS + entry.column + level;
            if cell % 5 != 0 {
                return entry;
            }
            match SPECIALS[(cell / 5) as usize % SPECIALS.len()] {
                BlockKind::CountBreaker => LayoutEntry::count_breaker(entry.row, entry.column, 3),
                kind => LayoutEntry::new(entry.row, entry.column, kind),
            }
        })
        .collect();
    LevelLayout::from_entries(entries)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LevelComplete { .. }
        | GameEvent::GameWon
        | GameEvent::GameOver { .. }
        | GameEvent::HeartLost { .. } => log::info!("{:?}", event),
        GameEvent::PaddleHit => log::trace!("{:?}", event),
        _ => log::debug!("{:?}", event),
    }
}
