use super::*;
use crate::error::GameError;
use rand::SeedableRng;
use rand::rngs::StdRng;

const SECOND: Duration = Duration::from_secs(1);

fn game(seed: u64, records: BestRecords) -> PairsGame<StdRng>
{
    PairsGame::new(StdRng::seed_from_u64(seed), 4, records).unwrap()
}

/// Index pairs sharing an image, in board order of their first card.
fn pairs_of(game: &PairsGame<StdRng>) -> Vec<(usize, usize)>
{
    let cards = game.cards();
    let mut pairs = Vec::new();
    for first in 0..cards.len() {
        for second in first + 1..cards.len() {
            if cards[first].image == cards[second].image {
                pairs.push((first, second));
            }
        }
    }
    pairs
}

fn mismatch(game: &PairsGame<StdRng>) -> (usize, usize)
{
    let cards = game.cards();
    let other = (1..cards.len())
        .find(|&position| cards[position].image != cards[0].image)
        .unwrap();
    (0, other)
}

fn solve(game: &mut PairsGame<StdRng>, step: Duration) -> Option<WinReport>
{
    let mut report = None;
    for (first, second) in pairs_of(game) {
        game.flip(first);
        assert_eq!(game.flip(second), FlipOutcome::Pair { matched: true });
        if let Some(win) = game.advance(step) {
            report = Some(win);
        }
    }
    report
}

#[test]
fn odd_dimension_fails_setup()
{
    let result = PairsGame::new(StdRng::seed_from_u64(0), 3, BestRecords::default());
    assert!(matches!(result, Err(GameError::OddDimension { dimension: 3 })));
}

#[test]
fn first_flip_starts_the_clock()
{
    let mut game = game(1, BestRecords::default());
    game.advance(SECOND * 3);
    assert_eq!(game.elapsed_seconds(), 0);

    assert_eq!(game.flip(0), FlipOutcome::Flipped);
    assert!(game.snapshot().started);
    game.advance(SECOND * 3);
    assert_eq!(game.elapsed_seconds(), 3);
    assert_eq!(game.total_moves(), 1);
}

#[test]
fn start_button_runs_a_single_clock()
{
    let mut game = game(1, BestRecords::default());
    game.start();
    game.start();
    game.flip(0);
    game.advance(SECOND * 5);
    assert_eq!(game.elapsed_seconds(), 5);
}

#[test]
fn mismatched_pair_flips_back_after_the_delay()
{
    let mut game = game(2, BestRecords::default());
    let (first, second) = mismatch(&game);

    game.flip(first);
    assert_eq!(game.flip(second), FlipOutcome::Pair { matched: false });
    assert_eq!(game.cards()[first].state, CardState::FaceUp);

    game.advance(Duration::from_millis(999));
    assert_eq!(game.cards()[second].state, CardState::FaceUp);
    assert_eq!(game.flipped_count(), 2);

    game.advance(Duration::from_millis(1));
    assert_eq!(game.cards()[first].state, CardState::FaceDown);
    assert_eq!(game.cards()[second].state, CardState::FaceDown);
    assert_eq!(game.flipped_count(), 0);
}

#[test]
fn matched_pair_stays_matched()
{
    let mut game = game(3, BestRecords::default());
    let (first, second) = pairs_of(&game)[0];

    game.flip(first);
    assert_eq!(game.flip(second), FlipOutcome::Pair { matched: true });
    game.advance(SECOND);

    assert_eq!(game.cards()[first].state, CardState::Matched);
    assert_eq!(game.cards()[second].state, CardState::Matched);
    assert_eq!(game.flip(first), FlipOutcome::Ignored);
    assert_eq!(game.total_moves(), 2);
}

#[test]
fn third_flip_waits_for_the_pair_to_resolve()
{
    let mut game = game(4, BestRecords::default());
    let (first, second) = mismatch(&game);
    let third = (0..16).find(|&i| i != first && i != second).unwrap();

    game.flip(first);
    game.flip(second);
    assert_eq!(game.flip(third), FlipOutcome::Waiting);
    assert_eq!(game.flipped_count(), 2);
    assert_eq!(game.total_moves(), 3);
    assert_eq!(game.cards()[third].state, CardState::FaceDown);

    game.advance(SECOND);
    assert_eq!(game.flipped_count(), 0);
    assert_eq!(game.flip(third), FlipOutcome::Flipped);
    assert_eq!(game.flipped_count(), 1);
    assert_eq!(game.total_moves(), 4);
}

#[test]
fn flipped_count_never_exceeds_two()
{
    let mut game = game(5, BestRecords::default());
    for round in 0..40usize {
        game.flip(round % 16);
        assert!(game.flipped_count() <= 2);
        if round % 3 == 0 {
            game.advance(Duration::from_millis(400));
        }
    }
}

#[test]
fn face_up_card_cannot_be_flipped_again()
{
    let mut game = game(6, BestRecords::default());
    game.flip(0);
    assert_eq!(game.flip(0), FlipOutcome::Ignored);
    assert_eq!(game.total_moves(), 1);
    assert_eq!(game.flip(99), FlipOutcome::Ignored);
}

#[test]
fn pause_freezes_moves_and_time()
{
    let mut game = game(7, BestRecords::default());
    game.flip(0);
    game.advance(SECOND * 3);
    assert_eq!(game.elapsed_seconds(), 3);

    assert!(game.toggle_pause());
    assert_eq!(game.flip(1), FlipOutcome::Ignored);
    game.advance(SECOND * 10);
    assert_eq!(game.elapsed_seconds(), 3);
    assert_eq!(game.total_moves(), 1);

    assert!(!game.toggle_pause());
    assert_eq!(game.elapsed_seconds(), 3);
    assert_eq!(game.total_moves(), 1);
    game.advance(SECOND);
    assert_eq!(game.elapsed_seconds(), 4);
}

#[test]
fn clearing_the_board_wins_after_the_delay()
{
    let mut game = game(8, BestRecords::default());
    let pairs = pairs_of(&game);
    assert_eq!(pairs.len(), 8);

    for (first, second) in &pairs[..7] {
        game.flip(*first);
        game.flip(*second);
        assert!(game.advance(SECOND).is_none());
    }
    let (first, second) = pairs[7];
    game.flip(first);
    game.flip(second);
    assert_eq!(game.phase(), Phase::Playing);

    let report = game.advance(SECOND).unwrap();
    assert_eq!(report.moves, 16);
    assert_eq!(report.seconds, 8);
    assert_eq!(game.phase(), Phase::Won { moves: 16, seconds: 8 });
    assert!(report.update.time_improved && report.update.moves_improved);
    assert_eq!(game.records().best_time, Some(8));
    assert_eq!(game.records().best_moves, Some(16));

    game.advance(SECOND * 5);
    assert_eq!(game.elapsed_seconds(), 8);
}

#[test]
fn faster_finish_beats_the_best_time()
{
    let prior = BestRecords {
        best_time: Some(40),
        best_moves: Some(100),
    };
    let mut game = game(9, prior);
    let report = solve(&mut game, SECOND * 4).unwrap();

    assert_eq!(report.seconds, 29);
    assert!(report.update.time_improved);
    assert_eq!(game.records().best_time, Some(29));
    assert_eq!(game.records().best_moves, Some(16));
}

#[test]
fn slower_finish_keeps_the_best_time()
{
    let prior = BestRecords {
        best_time: Some(20),
        best_moves: Some(12),
    };
    let mut game = game(10, prior);
    let report = solve(&mut game, SECOND * 4).unwrap();

    assert_eq!(report.seconds, 29);
    assert!(!report.update.time_improved);
    assert!(!report.update.moves_improved);
    assert_eq!(game.records(), prior);
}

#[test]
fn new_game_discards_pending_resolution()
{
    let mut game = game(11, BestRecords::default());
    let (first, second) = mismatch(&game);
    game.flip(first);
    game.flip(second);

    game.new_game().unwrap();
    assert_eq!(game.total_moves(), 0);
    assert!(!game.snapshot().started);

    game.advance(Duration::from_millis(500));
    game.flip(5);
    game.advance(Duration::from_millis(600));
    assert_eq!(game.cards()[5].state, CardState::FaceUp);
    assert_eq!(game.flipped_count(), 1);
}

#[test]
fn win_from_an_abandoned_board_is_discarded()
{
    let mut game = game(12, BestRecords::default());
    let pairs = pairs_of(&game);
    for (first, second) in &pairs[..7] {
        game.flip(*first);
        game.flip(*second);
        game.advance(SECOND);
    }
    let (first, second) = pairs[7];
    game.flip(first);
    game.flip(second);

    game.new_game().unwrap();
    assert!(game.advance(SECOND * 2).is_none());
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.records(), BestRecords::default());
}

#[test]
fn pause_is_locked_after_the_win()
{
    let mut game = game(13, BestRecords::default());
    solve(&mut game, SECOND).unwrap();
    assert!(!game.toggle_pause());
    assert!(!game.is_paused());
}

#[test]
fn pausing_before_the_win_lands_leaves_the_game_unpaused()
{
    let mut game = game(14, BestRecords::default());
    let pairs = pairs_of(&game);
    for (first, second) in &pairs[..7] {
        game.flip(*first);
        game.flip(*second);
        game.advance(SECOND);
    }
    let (first, second) = pairs[7];
    game.flip(first);
    game.flip(second);
    assert!(game.toggle_pause());

    let report = game.advance(SECOND).unwrap();
    assert_eq!(report.seconds, 7);
    assert_eq!(game.phase(), Phase::Won { moves: 16, seconds: 7 });
    assert!(!game.is_paused());
    assert!(!game.snapshot().paused);
    assert!(!game.toggle_pause());
}
