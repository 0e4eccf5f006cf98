use std::fs;
use std::path::Path;

use globe::GlobeConfig;
use quiz::ScoringConfig;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Everything tunable from the `--config` JSON file. Missing keys keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub globe: GlobeConfig,
    pub scoring: ScoringConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time allowed per question before it counts as a timeout.
    pub round_time_ms: f64,
    /// Pause between scoring an answer and rotating to the target.
    pub results_delay_ms: f64,
    /// Host frame interval used while waiting on animations.
    pub frame_ms: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_time_ms: 15_000.0,
            results_delay_ms: 300.0,
            frame_ms: 16.0,
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let payload = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&payload).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use pretty_assertions::assert_eq;
    use quiz::ProximityCurve;

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"globe": {"width": 800}, "scoring": {"curve": "quadratic"}, "session": {"round_time_ms": 5000}}"#,
        )
        .expect("parse");
        assert_eq!(cfg.globe.width, 800.0);
        assert_eq!(cfg.globe.height, 720.0);
        assert_eq!(cfg.scoring.curve, ProximityCurve::Quadratic);
        assert_eq!(cfg.session.round_time_ms, 5000.0);
        assert_eq!(cfg.session.results_delay_ms, 300.0);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(AppConfig::load(None).expect("defaults"), AppConfig::default());
    }
}
