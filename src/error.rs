//! Game-specific error types.
//!
//! Nothing here ever escapes a Bevy system: every caller turns these into a log
//! line and a fallback (compiled defaults, a zero high score, an ignored input).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error enum for the game.
#[derive(Debug, Error)]
pub enum SuikaError {
    /// `assets/suika.toml` exists but is not valid TOML for [`crate::config::GameConfig`].
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A tuneable value is outside the range the game logic can work with.
    #[error("constant '{name}' = {value} is outside safe range {safe_range}")]
    UnsafeConstant {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// Reading or writing the high-score file failed.
    #[error("high score I/O on {path}: {source}")]
    HighScoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The high-score file exists but does not contain a valid record.
    #[error("high score file {path} is malformed: {message}")]
    HighScoreFormat { path: PathBuf, message: String },
}

/// Convenience alias: a `Result` using `SuikaError` as the error type.
pub type SuikaResult<T> = Result<T, SuikaError>;

/// Returns an error unless `value` lies in `(min, max]`.
pub(crate) fn ensure_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
    safe_range: &'static str,
) -> SuikaResult<()> {
    if value > min && value <= max {
        Ok(())
    } else {
        Err(SuikaError::UnsafeConstant {
            name,
            value,
            safe_range,
        })
    }
}
