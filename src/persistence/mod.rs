//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope around the flat `SaveState`
//! - Validation before a save is turned back into a running game
//! - Backup rotation (tmp → save, old save → backup)
//! - Falls back to the backup when the primary save is corrupt

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::{LayoutEntry, LevelError, LevelLayout};
use crate::sim::{BlockKind, GameState, SaveState};

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

/// Save file error type
#[derive(Debug, Error)]
pub enum SaveError {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by a different format version
    #[error("unsupported save version {found}, expected {expected}", expected = SAVE_VERSION)]
    UnsupportedVersion { found: u32 },

    /// Saved blocks do not form a valid layout
    #[error("invalid block layout: {0}")]
    InvalidLayout(#[from] LevelError),

    /// Values a running game can never hold
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    state: SaveState,
}

/// Encode a game as a versioned JSON document
pub fn encode(state: &GameState) -> Result<String, SaveError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        state: state.to_save(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Decode and validate a save document
pub fn decode(json: &str) -> Result<GameState, SaveError> {
    let envelope: SaveEnvelope = serde_json::from_str(json)?;
    if envelope.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    validate(&envelope.state)?;
    Ok(GameState::from_save(&envelope.state))
}

/// Reject saves that would break simulation invariants once restored
pub fn validate(save: &SaveState) -> Result<(), SaveError> {
    let dims = [save.ball_radius, save.paddle_width, save.paddle_height];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return Err(SaveError::InvalidState("non-positive ball or paddle dimensions"));
    }

    let coords = [
        save.ball_x,
        save.ball_y,
        save.ball_prev_x,
        save.ball_prev_y,
        save.ball_speed_x,
        save.ball_speed_y,
        save.paddle_x,
        save.paddle_y,
    ];
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(SaveError::InvalidState("non-finite ball or paddle value"));
    }

    let live = save
        .blocks
        .iter()
        .filter(|b| !b.destroyed)
        .map(|b| match b.kind {
            BlockKind::CountBreaker => LayoutEntry::count_breaker(b.row, b.column, b.hits_remaining),
            kind => LayoutEntry::new(b.row, b.column, kind),
        })
        .collect();
    LevelLayout::from_entries(live).validate()?;

    Ok(())
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Write a save, keeping the previous one as a backup
pub fn save_to(path: &Path, state: &GameState) -> Result<(), SaveError> {
    let json = encode(state)?;

    let tmp = sibling(path, "tmp");
    fs::write(&tmp, json)?;
    if path.exists() {
        fs::rename(path, sibling(path, "bak"))?;
    }
    fs::rename(&tmp, path)?;

    log::info!("Saved level {} (score {}) to {}", state.level, state.score, path.display());
    Ok(())
}

/// Load a save, falling back to the backup if the primary is unreadable
pub fn load_from(path: &Path) -> Result<GameState, SaveError> {
    let primary = fs::read_to_string(path)
        .map_err(SaveError::from)
        .and_then(|json| decode(&json));

    match primary {
        Ok(state) => {
            log::info!("Loaded save from {}", path.display());
            Ok(state)
        }
        Err(err) => {
            let backup = sibling(path, "bak");
            if !backup.exists() {
                return Err(err);
            }
            log::warn!("Save {} unusable ({}), trying backup", path.display(), err);
            let state = decode(&fs::read_to_string(&backup)?)?;
            log::info!("Recovered save from {}", backup.display());
            Ok(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn sample_game() -> GameState {
        let mut state = GameState::new(77);
        state.load_level(2, &LevelLayout::uniform(3, BlockKind::Normal));
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &idle);
        }
        state
    }

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("brick-breaker-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir.join("save.json")
    }

    #[test]
    fn test_encode_decode() {
        let state = sample_game();
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored.to_save(), state.to_save());
    }

    #[test]
    fn test_rejects_other_versions() {
        let json = encode(&sample_game()).unwrap().replacen(
            &format!("\"version\": {SAVE_VERSION}"),
            "\"version\": 99",
            1,
        );
        assert!(matches!(
            decode(&json),
            Err(SaveError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn test_rejects_blocks_outside_grid() {
        let mut save = sample_game().to_save();
        save.blocks[0].column = 9;
        assert!(matches!(
            validate(&save),
            Err(SaveError::InvalidLayout(LevelError::OutOfGrid { .. }))
        ));
    }

    #[test]
    fn test_rejects_zero_width_paddle() {
        let mut save = sample_game().to_save();
        save.paddle_width = 0.0;
        assert!(matches!(validate(&save), Err(SaveError::InvalidState(_))));
    }

    #[test]
    fn test_garbage_is_json_error() {
        assert!(matches!(decode("not a save"), Err(SaveError::Json(_))));
    }

    #[test]
    fn test_save_rotation_and_backup_recovery() {
        let path = temp_path("rotation");
        let first = sample_game();
        save_to(&path, &first).unwrap();

        let mut second = first.clone();
        tick(&mut second, &TickInput::default());
        save_to(&path, &second).unwrap();
        assert!(sibling(&path, "bak").exists());
        assert!(!sibling(&path, "tmp").exists());

        assert_eq!(load_from(&path).unwrap().time, second.time);

        // Corrupt primary: the previous save comes back
        fs::write(&path, "{ truncated").unwrap();
        assert_eq!(load_from(&path).unwrap().time, first.time);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = temp_path("missing").join("nope.json");
        assert!(matches!(load_from(&path), Err(SaveError::Io(_))));
    }
}
