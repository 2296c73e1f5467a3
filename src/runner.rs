//! Fixed-timestep driver
//!
//! Owns the game state, turns frame time into whole ticks and publishes a
//! snapshot after each one. Observers on other threads read snapshots
//! through a `SnapshotReader`; they never touch the live state.

use std::sync::{Arc, RwLock};

use crate::level::LevelLayout;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Snapshot, TickInput, tick};

/// Longest frame time fed to the accumulator, in seconds
const MAX_FRAME_DT: f64 = 0.1;

/// Read-only handle to the most recently published snapshot
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    shared: Arc<RwLock<Snapshot>>,
}

impl SnapshotReader {
    /// Copy of the latest snapshot
    pub fn latest(&self) -> Snapshot {
        match self.shared.read() {
            Ok(guard) => guard.clone(),
            // A panicked writer still left a whole snapshot behind
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Game loop state
pub struct Runner {
    state: GameState,
    input: TickInput,
    accumulator: f64,
    tick_dt: f64,
    max_substeps: u32,
    suspended: bool,
    ticks: u64,
    shared: Arc<RwLock<Snapshot>>,
}

impl Runner {
    pub fn new(state: GameState, settings: &Settings) -> Self {
        let shared = Arc::new(RwLock::new(state.snapshot()));
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            tick_dt: 1.0 / settings.sim_hz.max(1) as f64,
            max_substeps: settings.max_substeps.max(1),
            suspended: false,
            ticks: 0,
            shared,
        }
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Total ticks run since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Held input sampled by every following tick
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Stop ticking until `resume`; nothing runs partially
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.accumulator = 0.0;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Feed elapsed frame time; returns the number of ticks run
    pub fn update(&mut self, dt: f64) -> u32 {
        if self.suspended {
            return 0;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.tick_dt && substeps < self.max_substeps {
            self.step();
            self.accumulator -= self.tick_dt;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick and publish the result
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input);
        self.ticks += 1;

        // Clear one-shot inputs after processing
        self.input.pause = false;

        self.publish();
    }

    /// Load the layout for the next level
    pub fn next_level(&mut self, layout: &LevelLayout) {
        let level = self.state.level + 1;
        self.state.load_level(level, layout);
        self.publish();
    }

    /// Start a new game from level 1
    pub fn restart(&mut self, layout: &LevelLayout) {
        self.state.restart(layout);
        self.accumulator = 0.0;
        self.publish();
    }

    /// Replace the running game, e.g. with a loaded save
    pub fn replace_state(&mut self, state: GameState) {
        self.state = state;
        self.accumulator = 0.0;
        self.publish();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn publish(&self) {
        let snapshot = self.state.snapshot();
        match self.shared.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}
