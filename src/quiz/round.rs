use crate::error::{GameError, GameResult};
use crate::shuffle::{draw_distinct, shuffle};
use rand::Rng;

pub const ITEMS_PER_ROUND: usize = 3;

pub const COUNTRIES: [&str; 20] = [
    "malaysia",
    "indonesia",
    "thailand",
    "vietnam",
    "laos",
    "china",
    "japan",
    "korea",
    "bangladesh",
    "pakistan",
    "india",
    "myanmar",
    "singapore",
    "brunei",
    "cambodia",
    "philipines",
    "iraq",
    "saudi-arabia",
    "syria",
    "yemen",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagItem
{
    pub id: &'static str,
    pub placed: bool,
}

impl FlagItem
{
    pub fn asset(&self) -> String
    {
        format!("images/{}.png", self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropTarget
{
    pub id: &'static str,
    pub label: String,
    pub filled: bool,
    pub flashing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round
{
    pub items: Vec<FlagItem>,
    pub targets: Vec<DropTarget>,
    pub correct: u8,
}

impl Round
{
    pub fn is_complete(&self) -> bool
    {
        self.correct as usize >= ITEMS_PER_ROUND
    }

    pub fn target_for(&self, id: &str) -> Option<usize>
    {
        self.targets.iter().position(|target| target.id == id)
    }
}

/// `saudi-arabia` -> `Saudi arabia`. Only the first dash is replaced.
pub fn display_name(id: &str) -> String
{
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().replacen('-', " ", 1);
    format!("{}{}", first.to_uppercase(), rest)
}

pub fn check_catalog(catalog: &[&'static str]) -> GameResult<()>
{
    if catalog.len() < ITEMS_PER_ROUND {
        return Err(GameError::CatalogTooSmall {
            needed: ITEMS_PER_ROUND,
            available: catalog.len(),
        });
    }
    Ok(())
}

pub fn generate_round(rng: &mut impl Rng, catalog: &[&'static str]) -> GameResult<Round>
{
    check_catalog(catalog)?;
    let picks = draw_distinct(rng, catalog, ITEMS_PER_ROUND);

    let items = picks
        .iter()
        .map(|&id| FlagItem { id, placed: false })
        .collect();

    let mut order = picks;
    shuffle(rng, &mut order);
    let targets = order
        .into_iter()
        .map(|id| DropTarget {
            id,
            label: display_name(id),
            filled: false,
            flashing: false,
        })
        .collect();

    Ok(Round {
        items,
        targets,
        correct: 0,
    })
}
