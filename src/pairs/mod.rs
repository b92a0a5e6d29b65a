//! Matching-pairs controller: flip two cards, keep them if the flags match.

pub mod board;

#[cfg(test)]
mod tests;

use crate::error::GameResult;
use crate::records::{BestRecords, RecordUpdate};
use crate::schedule::{Scheduler, TaskId};
use board::{Card, CardState, generate_board};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task
{
    Tick,
    Resolve
    {
        session: u64,
    },
    Win
    {
        session: u64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase
{
    Playing,
    Won
    {
        moves: u32,
        seconds: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome
{
    Ignored,
    /// Counted as a move, but the card stays down until the pending pair
    /// resolves.
    Waiting,
    Flipped,
    Pair
    {
        matched: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinReport
{
    pub moves: u32,
    pub seconds: u32,
    pub update: RecordUpdate,
}

#[derive(Clone, Debug)]
pub struct PairsSnapshot
{
    pub dimension: usize,
    pub cards: Vec<Card>,
    pub moves: u32,
    pub elapsed_seconds: u32,
    pub started: bool,
    pub paused: bool,
    pub phase: Phase,
    pub records: BestRecords,
}

pub struct PairsGame<R: Rng>
{
    rng: R,
    dimension: usize,
    catalog: &'static [&'static str],
    cards: Vec<Card>,
    flipped_count: u8,
    total_moves: u32,
    elapsed_seconds: u32,
    started: bool,
    paused: bool,
    phase: Phase,
    session: u64,
    clock: Option<TaskId>,
    scheduler: Scheduler<Task>,
    records: BestRecords,
}

impl<R: Rng> PairsGame<R>
{
    pub fn new(rng: R, dimension: usize, records: BestRecords) -> GameResult<Self>
    {
        Self::with_catalog(rng, dimension, &board::FLAG_IMAGES, records)
    }

    pub fn with_catalog(
        mut rng: R,
        dimension: usize,
        catalog: &'static [&'static str],
        records: BestRecords,
    ) -> GameResult<Self>
    {
        let cards = generate_board(&mut rng, dimension, catalog)?;
        Ok(Self {
            rng,
            dimension,
            catalog,
            cards,
            flipped_count: 0,
            total_moves: 0,
            elapsed_seconds: 0,
            started: false,
            paused: false,
            phase: Phase::Playing,
            session: 0,
            clock: None,
            scheduler: Scheduler::new(),
            records,
        })
    }

    pub fn new_game(&mut self) -> GameResult<()>
    {
        let cards = generate_board(&mut self.rng, self.dimension, self.catalog)?;
        self.stop_clock();
        self.cards = cards;
        self.flipped_count = 0;
        self.total_moves = 0;
        self.elapsed_seconds = 0;
        self.started = false;
        self.paused = false;
        self.phase = Phase::Playing;
        self.session += 1;
        info!(session = self.session, dimension = self.dimension, "pairs board dealt");
        Ok(())
    }

    /// The Start button. Flipping the first card also starts the clock.
    pub fn start(&mut self)
    {
        if self.started || self.phase != Phase::Playing {
            return;
        }
        self.started = true;
        self.restart_clock();
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome
    {
        if self.paused || self.phase != Phase::Playing {
            return FlipOutcome::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if card.state == CardState::FaceDown => {}
            _ => return FlipOutcome::Ignored,
        }

        self.total_moves += 1;
        if !self.started {
            self.start();
        }
        if self.flipped_count >= 2 {
            return FlipOutcome::Waiting;
        }
        self.flipped_count += 1;
        self.cards[index].state = CardState::FaceUp;

        let mut outcome = FlipOutcome::Flipped;
        if self.flipped_count == 2 {
            let face_up: Vec<usize> = self
                .cards
                .iter()
                .enumerate()
                .filter(|(_, card)| card.state == CardState::FaceUp)
                .map(|(position, _)| position)
                .collect();
            let matched = face_up.len() == 2
                && self.cards[face_up[0]].image == self.cards[face_up[1]].image;
            if matched {
                for position in face_up {
                    self.cards[position].state = CardState::Matched;
                }
            }
            self.scheduler.once(REVEAL_DELAY, Task::Resolve { session: self.session });
            outcome = FlipOutcome::Pair { matched };
        }

        if self.unmatched() == 0 {
            self.scheduler.once(REVEAL_DELAY, Task::Win { session: self.session });
        }
        outcome
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool
    {
        if self.phase != Phase::Playing {
            return self.paused;
        }
        self.paused = !self.paused;
        if self.paused {
            self.stop_clock();
        } else if self.started {
            self.restart_clock();
        }
        self.paused
    }

    pub fn advance(&mut self, dt: Duration) -> Option<WinReport>
    {
        let until = self.scheduler.now() + dt;
        let mut report = None;
        while let Some(task) = self.scheduler.pop_due(until) {
            if let Some(win) = self.run(task) {
                report = Some(win);
            }
        }
        self.scheduler.settle(until);
        report
    }

    pub fn snapshot(&self) -> PairsSnapshot
    {
        PairsSnapshot {
            dimension: self.dimension,
            cards: self.cards.clone(),
            moves: self.total_moves,
            elapsed_seconds: self.elapsed_seconds,
            started: self.started,
            paused: self.paused,
            phase: self.phase,
            records: self.records,
        }
    }

    pub fn cards(&self) -> &[Card]
    {
        &self.cards
    }

    pub fn flipped_count(&self) -> u8
    {
        self.flipped_count
    }

    pub fn total_moves(&self) -> u32
    {
        self.total_moves
    }

    pub fn elapsed_seconds(&self) -> u32
    {
        self.elapsed_seconds
    }

    pub fn is_paused(&self) -> bool
    {
        self.paused
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn records(&self) -> BestRecords
    {
        self.records
    }

    fn run(&mut self, task: Task) -> Option<WinReport>
    {
        match task {
            Task::Tick => {
                if !self.paused {
                    self.elapsed_seconds += 1;
                }
                None
            }
            Task::Resolve { session } if session == self.session => {
                for card in &mut self.cards {
                    if card.state == CardState::FaceUp {
                        card.state = CardState::FaceDown;
                    }
                }
                self.flipped_count = 0;
                None
            }
            Task::Win { session } if session == self.session => Some(self.finish()),
            stale => {
                debug!(?stale, current = self.session, "dropping task from an old session");
                None
            }
        }
    }

    fn finish(&mut self) -> WinReport
    {
        self.stop_clock();
        self.paused = false;
        let moves = self.total_moves;
        let seconds = self.elapsed_seconds;
        self.phase = Phase::Won { moves, seconds };
        let update = self.records.submit(seconds, moves);
        info!(moves, seconds, improved = update.any(), "pairs board cleared");
        WinReport {
            moves,
            seconds,
            update,
        }
    }

    fn unmatched(&self) -> usize
    {
        self.cards
            .iter()
            .filter(|card| card.state != CardState::Matched)
            .count()
    }

    fn restart_clock(&mut self)
    {
        self.stop_clock();
        self.clock = Some(self.scheduler.every(CLOCK_PERIOD, Task::Tick));
    }

    fn stop_clock(&mut self)
    {
        if let Some(id) = self.clock.take() {
            self.scheduler.cancel(id);
        }
    }
}
