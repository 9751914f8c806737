use finder_engine::content::ResourceError;
use finder_engine::render::ProgramError;

use crate::levels::LevelTableError;

/// Startup failures of the game.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("invalid level table")]
    Levels(#[from] LevelTableError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Program(#[from] ProgramError),
}
