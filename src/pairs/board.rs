use crate::error::{GameError, GameResult};
use crate::shuffle::{pick_random, shuffle};
use rand::Rng;

pub const DEFAULT_DIMENSION: usize = 4;

pub const FLAG_IMAGES: [&str; 10] = [
    "image/mal.png",
    "image/brunei.png",
    "image/cambodia.png",
    "image/china.png",
    "image/indon.png",
    "image/japan.png",
    "image/korea.png",
    "image/laos.png",
    "image/thai.png",
    "image/singapore.png",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState
{
    FaceDown,
    FaceUp,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card
{
    pub image: &'static str,
    pub state: CardState,
}

pub fn validate_dimension(dimension: usize, catalog_len: usize) -> GameResult<usize>
{
    if dimension % 2 != 0 {
        return Err(GameError::OddDimension { dimension });
    }
    if dimension == 0 {
        return Err(GameError::EmptyBoard);
    }
    let pairs = dimension * dimension / 2;
    if pairs > catalog_len {
        return Err(GameError::CatalogTooSmall {
            needed: pairs,
            available: catalog_len,
        });
    }
    Ok(pairs)
}

/// A `dimension` x `dimension` board, every picked image placed twice.
pub fn generate_board(
    rng: &mut impl Rng,
    dimension: usize,
    catalog: &[&'static str],
) -> GameResult<Vec<Card>>
{
    let pairs = validate_dimension(dimension, catalog.len())?;
    let picks = pick_random(rng, catalog, pairs);

    let mut images: Vec<&'static str> = picks.iter().chain(picks.iter()).copied().collect();
    shuffle(rng, &mut images);

    Ok(images
        .into_iter()
        .map(|image| Card {
            image,
            state: CardState::FaceDown,
        })
        .collect())
}
