//! Flag quiz controller: seven rounds of three flags dragged onto country
//! names against a shared countdown.

pub mod round;
pub mod touch;


use crate::error::GameResult;
use crate::schedule::{Scheduler, TaskId};
use rand::Rng;
use round::{DropTarget, FlagItem, Round, check_catalog, generate_round};
use std::time::Duration;
use touch::{Point, TargetLayout, TouchDrag};
use tracing::{debug, info};

pub const START_TIME: u32 = 120;
pub const ROUNDS: u32 = 7;
pub const POINTS_PER_DROP: u32 = 10;
pub const WRONG_DROP_PENALTY: u32 = 5;
pub const WARNING_EVERY: u32 = 5;

pub const TIMER_PERIOD: Duration = Duration::from_secs(1);
pub const ERROR_FLASH: Duration = Duration::from_millis(500);
pub const WARNING_FLASH: Duration = Duration::from_millis(400);
pub const ROUND_MESSAGE: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modality
{
    Pointer,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum InputSession
{
    Pointer,
    Touch
    {
        drag: Option<TouchDrag>,
    },
}

impl InputSession
{
    fn for_modality(modality: Modality) -> Self
    {
        match modality {
            Modality::Pointer => InputSession::Pointer,
            Modality::Touch => InputSession::Touch { drag: None },
        }
    }

    fn modality(&self) -> Modality
    {
        match self {
            InputSession::Pointer => Modality::Pointer,
            InputSession::Touch { .. } => Modality::Touch,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizRules
{
    /// Touch placements score nothing unless this is set.
    pub touch_awards_score: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason
{
    Timeout,
    RoundsExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase
{
    Idle,
    Playing,
    RoundCompleted
    {
        round: u32,
    },
    Over
    {
        reason: EndReason,
        score: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement
{
    Ignored,
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task
{
    Tick,
    ClearError
    {
        round: u64,
        target: usize,
    },
    ClearWarning
    {
        game: u64,
    },
    NextRound
    {
        game: u64,
    },
}

#[derive(Clone, Debug)]
pub struct QuizSnapshot
{
    pub phase: Phase,
    pub round: u32,
    pub score: u32,
    pub time_left: u32,
    pub paused: bool,
    pub timer_warning: bool,
    pub modality: Modality,
    pub items: Vec<FlagItem>,
    pub targets: Vec<DropTarget>,
    pub drag: Option<TouchDrag>,
}

pub struct QuizGame<R: Rng>
{
    rng: R,
    catalog: &'static [&'static str],
    rules: QuizRules,
    input: InputSession,
    phase: Phase,
    round_number: u32,
    round: Round,
    score: u32,
    time_left: u32,
    paused: bool,
    timer_warning: bool,
    game_token: u64,
    round_token: u64,
    timer: Option<TaskId>,
    flashes: Vec<(usize, TaskId)>,
    scheduler: Scheduler<Task>,
}

impl<R: Rng> QuizGame<R>
{
    pub fn new(rng: R, modality: Modality, rules: QuizRules) -> GameResult<Self>
    {
        Self::with_catalog(rng, &round::COUNTRIES, modality, rules)
    }

    pub fn with_catalog(
        rng: R,
        catalog: &'static [&'static str],
        modality: Modality,
        rules: QuizRules,
    ) -> GameResult<Self>
    {
        check_catalog(catalog)?;
        Ok(Self {
            rng,
            catalog,
            rules,
            input: InputSession::for_modality(modality),
            phase: Phase::Idle,
            round_number: 1,
            round: Round {
                items: Vec::new(),
                targets: Vec::new(),
                correct: 0,
            },
            score: 0,
            time_left: START_TIME,
            paused: false,
            timer_warning: false,
            game_token: 0,
            round_token: 0,
            timer: None,
            flashes: Vec::new(),
            scheduler: Scheduler::new(),
        })
    }

    /// The Start button: also restarts a finished or running game.
    pub fn start_game(&mut self) -> GameResult<()>
    {
        self.game_token += 1;
        self.round_number = 1;
        self.time_left = START_TIME;
        self.score = 0;
        self.paused = false;
        self.timer_warning = false;
        info!(game = self.game_token, modality = ?self.input.modality(), "quiz started");
        self.start_round()
    }

    pub fn drop_item(&mut self, item: usize, target: usize) -> Placement
    {
        if self.input != InputSession::Pointer || !self.accepts_placement(item, target) {
            return Placement::Ignored;
        }
        if self.round.items[item].id == self.round.targets[target].id {
            self.place(item, target, true);
            Placement::Correct
        } else {
            self.reject(Some(target));
            Placement::Wrong
        }
    }

    pub fn touch_start(&mut self, item: usize, at: Point)
    {
        let available = self.phase == Phase::Playing
            && !self.paused
            && self.round.items.get(item).is_some_and(|flag| !flag.placed);
        if let InputSession::Touch { drag } = &mut self.input {
            if available {
                *drag = Some(TouchDrag::begin(item, at));
            }
        }
    }

    pub fn touch_move(&mut self, at: Point)
    {
        if let InputSession::Touch { drag: Some(drag) } = &mut self.input {
            drag.move_to(at);
        }
    }

    /// Releases the dragged item. It counts when the release point lies in
    /// the bounds of the item's own target.
    pub fn touch_end<L: TargetLayout + ?Sized>(&mut self, layout: &L) -> Placement
    {
        let drag = match &mut self.input {
            InputSession::Touch { drag } => drag.take(),
            InputSession::Pointer => None,
        };
        let Some(drag) = drag else {
            return Placement::Ignored;
        };
        let Some(item_id) = self.round.items.get(drag.item).map(|flag| flag.id) else {
            return Placement::Ignored;
        };
        let Some(target) = self.round.target_for(item_id) else {
            return Placement::Ignored;
        };
        if !self.accepts_placement(drag.item, target) {
            return Placement::Ignored;
        }

        let inside = layout
            .bounds(target)
            .is_some_and(|bounds| bounds.contains(drag.position));
        if inside {
            self.place(drag.item, target, self.rules.touch_awards_score);
            Placement::Correct
        } else {
            let under = (0..self.round.targets.len()).find(|&index| {
                layout
                    .bounds(index)
                    .is_some_and(|bounds| bounds.contains(drag.position))
            });
            self.reject(under);
            Placement::Wrong
        }
    }

    pub fn pause(&mut self)
    {
        if self.paused || !self.in_progress() {
            return;
        }
        self.paused = true;
        self.stop_timer();
        if let InputSession::Touch { drag } = &mut self.input {
            *drag = None;
        }
    }

    pub fn resume(&mut self)
    {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.restart_timer();
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool
    {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    pub fn advance(&mut self, dt: Duration)
    {
        let until = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run(task);
        }
        self.scheduler.settle(until);
    }

    pub fn snapshot(&self) -> QuizSnapshot
    {
        let drag = match self.input {
            InputSession::Touch { drag } => drag,
            InputSession::Pointer => None,
        };
        QuizSnapshot {
            phase: self.phase,
            round: self.round_number,
            score: self.score,
            time_left: self.time_left,
            paused: self.paused,
            timer_warning: self.timer_warning,
            modality: self.input.modality(),
            items: self.round.items.clone(),
            targets: self.round.targets.clone(),
            drag,
        }
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn modality(&self) -> Modality
    {
        self.input.modality()
    }

    pub fn round_number(&self) -> u32
    {
        self.round_number
    }

    pub fn round(&self) -> &Round
    {
        &self.round
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn time_left(&self) -> u32
    {
        self.time_left
    }

    pub fn is_paused(&self) -> bool
    {
        self.paused
    }

    fn in_progress(&self) -> bool
    {
        matches!(self.phase, Phase::Playing | Phase::RoundCompleted { .. })
    }

    fn accepts_placement(&self, item: usize, target: usize) -> bool
    {
        self.phase == Phase::Playing
            && !self.paused
            && self.round.items.get(item).is_some_and(|flag| !flag.placed)
            && self.round.targets.get(target).is_some_and(|slot| !slot.filled)
    }

    fn start_round(&mut self) -> GameResult<()>
    {
        self.round = generate_round(&mut self.rng, self.catalog)?;
        self.round_token += 1;
        self.flashes.clear();
        if let InputSession::Touch { drag } = &mut self.input {
            *drag = None;
        }
        self.phase = Phase::Playing;
        if !self.paused {
            self.restart_timer();
        }
        debug!(round = self.round_number, token = self.round_token, "quiz round dealt");
        Ok(())
    }

    fn place(&mut self, item: usize, target: usize, award: bool)
    {
        self.round.items[item].placed = true;
        self.round.targets[target].filled = true;
        self.round.targets[target].flashing = false;
        self.round.correct += 1;
        if award {
            self.score += POINTS_PER_DROP;
        }
        if self.round.is_complete() {
            self.complete_round();
        }
    }

    fn reject(&mut self, target: Option<usize>)
    {
        if let Some(target) = target {
            // A repeat miss restarts the flash.
            if let Some(pos) = self.flashes.iter().position(|&(slot, _)| slot == target) {
                let (_, id) = self.flashes.swap_remove(pos);
                self.scheduler.cancel(id);
            }
            self.round.targets[target].flashing = true;
            let id = self.scheduler.once(
                ERROR_FLASH,
                Task::ClearError {
                    round: self.round_token,
                    target,
                },
            );
            self.flashes.push((target, id));
        }
        self.time_left = self.time_left.saturating_sub(WRONG_DROP_PENALTY);
        if self.time_left == 0 {
            self.end(EndReason::Timeout);
        }
    }

    fn complete_round(&mut self)
    {
        if self.time_left == 0 {
            self.end(EndReason::Timeout);
            return;
        }
        if self.round_number >= ROUNDS {
            self.end(EndReason::RoundsExhausted);
            return;
        }
        let completed = self.round_number;
        self.round_number += 1;
        self.phase = Phase::RoundCompleted { round: completed };
        self.scheduler.once(ROUND_MESSAGE, Task::NextRound { game: self.game_token });
        info!(round = completed, score = self.score, "quiz round completed");
    }

    fn end(&mut self, reason: EndReason)
    {
        self.stop_timer();
        self.paused = false;
        if let InputSession::Touch { drag } = &mut self.input {
            *drag = None;
        }
        self.phase = Phase::Over {
            reason,
            score: self.score,
        };
        info!(?reason, score = self.score, round = self.round_number, "quiz over");
    }

    fn run(&mut self, task: Task)
    {
        match task {
            Task::Tick => self.tick(),
            Task::ClearError { round, target } if round == self.round_token => {
                self.flashes.retain(|&(slot, _)| slot != target);
                if let Some(slot) = self.round.targets.get_mut(target) {
                    slot.flashing = false;
                }
            }
            Task::ClearWarning { game } if game == self.game_token => {
                self.timer_warning = false;
            }
            Task::NextRound { game }
                if game == self.game_token && matches!(self.phase, Phase::RoundCompleted { .. }) =>
            {
                if let Err(err) = self.start_round() {
                    debug!(%err, "next round could not be dealt");
                    self.end(EndReason::RoundsExhausted);
                }
            }
            stale => debug!(?stale, "dropping stale quiz task"),
        }
    }

    fn tick(&mut self)
    {
        if self.paused || !self.in_progress() {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.end(EndReason::Timeout);
        } else if self.time_left % WARNING_EVERY == 0 {
            self.timer_warning = true;
            self.scheduler.once(WARNING_FLASH, Task::ClearWarning { game: self.game_token });
        }
    }

    fn restart_timer(&mut self)
    {
        self.stop_timer();
        self.timer = Some(self.scheduler.every(TIMER_PERIOD, Task::Tick));
    }

    fn stop_timer(&mut self)
    {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}
