use crate::games::option_value;
use crate::quiz::round::ITEMS_PER_ROUND;
use crate::quiz::touch::{Point, Rect, TouchDrag};
use crate::quiz::{Modality, Phase, QuizGame, QuizRules, QuizSnapshot, ROUNDS};
use crate::terminal::{self, TerminalGuard, paint};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::Rng;
use rand::thread_rng;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::info;

const TITLE: &str = "Flag Games - Flag Quiz";
const TICK_MS: u64 = 33;
const CELL_WIDTH: usize = 30;
const ITEM_ROW: usize = 4;
const TARGET_ROW: usize = 7;

pub struct QuizConfig
{
    modality: Modality,
    rules: QuizRules,
    player: Option<String>,
}

impl QuizConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--touch" {
                config.modality = Modality::Touch;
            } else if arg == "--touch-score" {
                config.rules.touch_awards_score = true;
            } else if let Some(value) = option_value(arg, "--name", &mut iter)? {
                config.player = Some(value);
            } else {
                return Err(format!("Unknown quiz option '{arg}'"));
            }
        }
        Ok(config)
    }
}

impl Default for QuizConfig
{
    fn default() -> Self
    {
        Self {
            modality: Modality::Pointer,
            rules: QuizRules::default(),
            player: None,
        }
    }
}

enum Command
{
    Continue,
    Exit,
}

pub fn run_with_config(config: QuizConfig) -> Result<(), String>
{
    let mut game = QuizGame::new(thread_rng(), config.modality, config.rules)
        .map_err(|err| err.to_string())?;
    info!(modality = ?config.modality, "quiz opened");

    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut held: Option<usize> = None;
    let mut last_frame = Instant::now();
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        let now = Instant::now();
        game.advance(now.saturating_duration_since(last_frame));
        last_frame = now;

        match handle_input(&mut game, &mut held)? {
            Command::Continue => {}
            Command::Exit => {
                if terminal::confirm_exit(term.stdout(), TITLE, config.player.as_deref())? {
                    break;
                }
                last_frame = Instant::now();
                dirty = true;
            }
        }

        if dirty || last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &game.snapshot(), held, config.player.as_deref())?;
            last_tick = Instant::now();
            dirty = false;
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    Ok(())
}

fn handle_input(game: &mut QuizGame<impl Rng>, held: &mut Option<usize>) -> Result<Command, String>
{
    let touch = game.modality() == Modality::Touch;
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(Command::Exit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Command::Exit)
                }
                KeyCode::Char('s') => {
                    if matches!(game.phase(), Phase::Idle | Phase::Over { .. }) {
                        game.start_game().map_err(|err| err.to_string())?;
                        *held = None;
                    }
                }
                KeyCode::Char('p') => {
                    game.toggle_pause();
                }
                KeyCode::Char(ch @ '1'..='3') if !touch => {
                    *held = Some(ch as usize - '1' as usize);
                }
                KeyCode::Char(ch @ 'a'..='c') if !touch => {
                    if let Some(item) = held.take() {
                        game.drop_item(item, ch as usize - 'a' as usize);
                    }
                }
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                ..
            }) => {
                let at = point(column, row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        if let Some(item) = slot_at(column, row, ITEM_ROW) {
                            if touch {
                                game.touch_start(item, at);
                            } else {
                                *held = Some(item);
                            }
                        }
                    }
                    MouseEventKind::Drag(MouseButton::Left) if touch => game.touch_move(at),
                    MouseEventKind::Up(MouseButton::Left) => {
                        if touch {
                            game.touch_move(at);
                            game.touch_end(&target_layout());
                        } else if let Some(target) = slot_at(column, row, TARGET_ROW) {
                            if let Some(item) = held.take() {
                                game.drop_item(item, target);
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(Command::Continue)
}

fn point(column: u16, row: u16) -> Point
{
    Point {
        x: column as f32,
        y: row as f32,
    }
}

fn slot_at(column: u16, row: u16, slot_row: usize) -> Option<usize>
{
    if row as usize != slot_row {
        return None;
    }
    let slot = column as usize / CELL_WIDTH;
    let inside = (column as usize % CELL_WIDTH) < CELL_WIDTH - 2;
    (slot < ITEMS_PER_ROUND && inside).then_some(slot)
}

/// Where `draw_ui` puts the drop targets, in terminal cells.
fn target_layout() -> Vec<Rect>
{
    (0..ITEMS_PER_ROUND)
        .map(|slot| Rect {
            left: (slot * CELL_WIDTH) as f32,
            top: TARGET_ROW as f32,
            right: (slot * CELL_WIDTH + CELL_WIDTH - 3) as f32,
            bottom: TARGET_ROW as f32,
        })
        .collect()
}

fn drag_line(drag: &TouchDrag) -> String
{
    let (across, down) = drag.offset();
    format!(
        "Dragging flag {} at column {}, row {} ({across:+} across, {down:+} down)",
        drag.item + 1,
        drag.position.x,
        drag.position.y
    )
}

fn draw_ui(
    stdout: &mut Stdout,
    snapshot: &QuizSnapshot,
    held: Option<usize>,
    player: Option<&str>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push(TITLE.to_string());
    lines.push(player.map(|name| format!("Player : {name}")).unwrap_or_default());

    let time = format!("Time: {}", snapshot.time_left);
    let time = if snapshot.timer_warning {
        paint(&time, (170, 20, 20))
    } else {
        time
    };
    lines.push(format!(
        "Round {}/{}  Score: {}  {}  ({} mode)",
        snapshot.round,
        ROUNDS,
        snapshot.score,
        time,
        match snapshot.modality {
            Modality::Pointer => "pointer",
            Modality::Touch => "touch",
        }
    ));
    lines.push("Flags:".to_string());

    let dragging = snapshot.drag.map(|drag| drag.item);
    let mut items = String::new();
    for (index, item) in snapshot.items.iter().enumerate() {
        let text = if item.placed {
            String::new()
        } else {
            format!("[{}] {}", index + 1, item.asset())
        };
        let cell = format!("{:<width$}", text, width = CELL_WIDTH - 2);
        if !item.placed && (held == Some(index) || dragging == Some(index)) {
            items.push_str(&paint(&cell, (0, 90, 160)));
        } else {
            items.push_str(&cell);
        }
        items.push_str("  ");
    }
    lines.push(items);
    lines.push(String::new());
    lines.push("Countries:".to_string());

    let mut targets = String::new();
    for (index, target) in snapshot.targets.iter().enumerate() {
        let letter = (b'a' + index as u8) as char;
        let mark = if target.filled { " [x]" } else { "" };
        let cell = format!(
            "{:<width$}",
            format!("[{letter}] {}{mark}", target.label),
            width = CELL_WIDTH - 2
        );
        if target.flashing {
            targets.push_str(&paint(&cell, (170, 20, 20)));
        } else if target.filled {
            targets.push_str(&paint(&cell, (0, 150, 70)));
        } else {
            targets.push_str(&cell);
        }
        targets.push_str("  ");
    }
    lines.push(targets);
    lines.push(String::new());

    lines.push(match snapshot.phase {
        Phase::Idle => "Press S to start the game.".to_string(),
        Phase::Playing if snapshot.paused => "Paused. Press P to resume.".to_string(),
        Phase::Playing => String::new(),
        Phase::RoundCompleted { round } => {
            format!("Round {round} completed! Your score is {}", snapshot.score)
        }
        Phase::Over { score, .. } => {
            format!("Game Over! Your final score is {score}. Press S to play again.")
        }
    });
    if let Some(drag) = snapshot.drag {
        lines.push(drag_line(&drag));
    } else if let Some(item) = held {
        lines.push(format!("Holding flag {}", item + 1));
    } else {
        lines.push(String::new());
    }
    lines.push(match snapshot.modality {
        Modality::Pointer => {
            "Drag a flag onto its country, or press 1-3 then a-c.".to_string()
        }
        Modality::Touch => "Drag a flag and release it over its country.".to_string(),
    });
    lines.push("S start, P pause/resume, Esc exit.".to_string());

    terminal::draw_lines(stdout, &lines)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::quiz::touch::TargetLayout;

    fn args(values: &[&str]) -> Vec<String>
    {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn options_select_the_session_kind()
    {
        let config = QuizConfig::from_args(&[]).unwrap();
        assert_eq!(config.modality, Modality::Pointer);
        assert!(!config.rules.touch_awards_score);

        let config =
            QuizConfig::from_args(&args(&["--touch", "--touch-score", "--name", "Rin"])).unwrap();
        assert_eq!(config.modality, Modality::Touch);
        assert!(config.rules.touch_awards_score);
        assert_eq!(config.player.as_deref(), Some("Rin"));

        assert!(QuizConfig::from_args(&args(&["--mouse"])).is_err());
    }

    #[test]
    fn slots_are_found_on_their_row_only()
    {
        assert_eq!(slot_at(0, ITEM_ROW as u16, ITEM_ROW), Some(0));
        assert_eq!(slot_at((CELL_WIDTH * 2 + 1) as u16, TARGET_ROW as u16, TARGET_ROW), Some(2));
        assert_eq!(slot_at((CELL_WIDTH - 1) as u16, TARGET_ROW as u16, TARGET_ROW), None);
        assert_eq!(slot_at(0, (TARGET_ROW + 1) as u16, TARGET_ROW), None);
        assert_eq!(slot_at((CELL_WIDTH * 3) as u16, TARGET_ROW as u16, TARGET_ROW), None);
    }

    #[test]
    fn drag_line_reports_how_far_the_flag_moved()
    {
        let mut drag = TouchDrag::begin(0, point(4, ITEM_ROW as u16));
        drag.move_to(point(35, TARGET_ROW as u16));
        assert_eq!(
            drag_line(&drag),
            "Dragging flag 1 at column 35, row 7 (+31 across, +3 down)"
        );
    }

    #[test]
    fn touch_layout_agrees_with_click_slots()
    {
        let layout = target_layout();
        for column in 0..(CELL_WIDTH * ITEMS_PER_ROUND) as u16 {
            let at = point(column, TARGET_ROW as u16);
            let hit = (0..ITEMS_PER_ROUND)
                .find(|&slot| layout.bounds(slot).is_some_and(|rect| rect.contains(at)));
            assert_eq!(hit, slot_at(column, TARGET_ROW as u16, TARGET_ROW), "column {column}");
        }
    }
}
