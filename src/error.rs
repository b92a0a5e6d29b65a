use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError
{
    #[error("The dimension of the board must be an even number (got {dimension}).")]
    OddDimension
    {
        dimension: usize,
    },
    #[error("The board needs at least one pair of cards.")]
    EmptyBoard,
    #[error("Catalog has {available} entries but {needed} are required.")]
    CatalogTooSmall
    {
        needed: usize,
        available: usize,
    },
    #[error("Record storage failed: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Record file is malformed: {0}")]
    Records(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
