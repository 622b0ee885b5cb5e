use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("question bank could not be loaded: {0}")]
    LoadFailure(String),
    #[error("no questions for the selected category and lesson")]
    InvalidSelection,
    #[error("question has no answer letters to capture")]
    InvalidQuestion,
    #[error("not enough free cells to place the tile batch")]
    GridSaturated,
    #[error("quiz already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
