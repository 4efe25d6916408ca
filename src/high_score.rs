//! Persistent high score.
//!
//! Stored as a one-key TOML file (`best = 123`) at
//! [`crate::config::GameConfig::high_score_path`].  Storage is best-effort: a
//! missing, unreadable or corrupt file reads as 0, and failed writes are
//! logged and otherwise ignored, so the in-memory value always wins.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{SuikaError, SuikaResult};
use crate::state::GameState;

/// Best score seen so far, across sessions.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HighScore {
    pub best: u32,
}

#[derive(Serialize, Deserialize, Debug)]
struct HighScoreRecord {
    best: u32,
}

/// Read the stored best score.
pub fn read_high_score(path: &Path) -> SuikaResult<u32> {
    let contents = fs::read_to_string(path).map_err(|source| SuikaError::HighScoreIo {
        path: path.to_path_buf(),
        source,
    })?;
    let record: HighScoreRecord =
        toml::from_str(&contents).map_err(|err| SuikaError::HighScoreFormat {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(record.best)
}

/// Write `best`, creating the parent directory if needed.
pub fn write_high_score(path: &Path, best: u32) -> SuikaResult<()> {
    let io_err = |source| SuikaError::HighScoreIo {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let contents = toml::to_string(&HighScoreRecord { best }).map_err(|err| {
        SuikaError::HighScoreFormat {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    fs::write(path, contents).map_err(io_err)
}

/// Stored best score, or 0 when storage is unavailable.
pub fn load_or_default(path: &Path) -> u32 {
    match read_high_score(path) {
        Ok(best) => best,
        Err(SuikaError::HighScoreIo { source, .. }) if source.kind() == ErrorKind::NotFound => 0,
        Err(err) => {
            warn!("{err}; starting from 0");
            0
        }
    }
}

/// Startup system: load the stored best into [`HighScore`].
pub fn load_high_score_system(mut commands: Commands, config: Res<GameConfig>) {
    let best = load_or_default(&config.high_score_path);
    commands.insert_resource(HighScore { best });
    info!("High score: {best}");
}

/// Raise and persist the best score whenever the running score beats it.
pub fn track_high_score_system(
    state: Res<GameState>,
    config: Res<GameConfig>,
    mut high: ResMut<HighScore>,
) {
    if !state.is_changed() || state.score <= high.best {
        return;
    }
    high.best = state.score;
    if let Err(err) = write_high_score(&config.high_score_path, high.best) {
        warn!("{err}");
    }
}
