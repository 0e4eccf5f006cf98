use std::path::PathBuf;

use formats::LoadError;
use globe::GlobeError;
use quiz::QuizError;

#[derive(Debug)]
pub enum AppError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    Load(LoadError),
    Quiz(QuizError),
    Globe(GlobeError),
    Output(serde_json::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            AppError::Config { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            AppError::Load(e) => write!(f, "dataset: {e}"),
            AppError::Quiz(e) => write!(f, "quiz: {e}"),
            AppError::Globe(e) => write!(f, "globe: {e}"),
            AppError::Output(e) => write!(f, "output: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Load(e)
    }
}

impl From<QuizError> for AppError {
    fn from(e: QuizError) -> Self {
        AppError::Quiz(e)
    }
}

impl From<GlobeError> for AppError {
    fn from(e: GlobeError) -> Self {
        AppError::Globe(e)
    }
}
