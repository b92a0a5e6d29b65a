use crate::games::option_value;
use crate::pairs::board::{Card, CardState, DEFAULT_DIMENSION};
use crate::pairs::{PairsGame, PairsSnapshot, Phase, WinReport};
use crate::records::{self, BestRecords, RecordStore};
use crate::terminal::{self, TerminalGuard, paint};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::thread_rng;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const TITLE: &str = "Flag Games - Matching Pairs";
const TICK_MS: u64 = 33;
const CELL_WIDTH: usize = 9;
const BOARD_TOP: usize = 5;

pub struct PairsConfig
{
    dimension: usize,
    player: Option<String>,
}

impl PairsConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = option_value(arg, "--size", &mut iter)? {
                config.dimension = value
                    .parse::<usize>()
                    .map_err(|_| "Board size must be a whole number".to_string())?;
            } else if let Some(value) = option_value(arg, "--name", &mut iter)? {
                config.player = Some(value);
            } else {
                return Err(format!("Unknown pairs option '{arg}'"));
            }
        }
        Ok(config)
    }
}

impl Default for PairsConfig
{
    fn default() -> Self
    {
        Self {
            dimension: DEFAULT_DIMENSION,
            player: None,
        }
    }
}

enum Command
{
    Continue,
    NewGame,
    Exit,
}

pub fn run_with_config(config: PairsConfig) -> Result<(), String>
{
    let store = RecordStore::in_dir(&records::data_dir());
    let records = load_records(&store);
    let mut game = PairsGame::new(thread_rng(), config.dimension, records)
        .map_err(|err| err.to_string())?;
    info!(dimension = config.dimension, "pairs game opened");

    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut cursor = 0usize;
    let mut message: Option<String> = None;
    let mut last_frame = Instant::now();
    let mut last_tick = Instant::now();
    let mut dirty = true;

    loop {
        let now = Instant::now();
        if let Some(win) = game.advance(now.saturating_duration_since(last_frame)) {
            message = record_message(&store, &game.records(), &win);
        }
        last_frame = now;

        match handle_input(&mut game, &mut cursor, config.dimension)? {
            Command::Continue => {}
            Command::NewGame => {
                game.new_game().map_err(|err| err.to_string())?;
                cursor = 0;
                message = None;
            }
            Command::Exit => {
                if terminal::confirm_exit(term.stdout(), TITLE, config.player.as_deref())? {
                    break;
                }
                last_frame = Instant::now();
                dirty = true;
            }
        }

        if dirty || last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(
                term.stdout(),
                &game.snapshot(),
                cursor,
                config.player.as_deref(),
                &message,
            )?;
            last_tick = Instant::now();
            dirty = false;
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    Ok(())
}

fn load_records(store: &RecordStore) -> BestRecords
{
    match store.load() {
        Ok(records) => records,
        Err(err) => {
            warn!(%err, path = %store.path().display(), "starting without saved records");
            BestRecords::default()
        }
    }
}

fn record_message(store: &RecordStore, records: &BestRecords, win: &WinReport) -> Option<String>
{
    if !win.update.any() {
        return None;
    }
    match store.save(records) {
        Ok(()) => {
            info!(best_time = ?records.best_time, best_moves = ?records.best_moves, "records saved");
            Some("New record!".to_string())
        }
        Err(err) => {
            warn!(%err, path = %store.path().display(), "could not save records");
            Some(format!("New record, but it could not be saved: {err}"))
        }
    }
}

fn handle_input(
    game: &mut PairsGame<impl rand::Rng>,
    cursor: &mut usize,
    dimension: usize,
) -> Result<Command, String>
{
    let total = dimension * dimension;
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(Command::Exit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Command::Exit)
                }
                KeyCode::Left => {
                    if *cursor % dimension > 0 {
                        *cursor -= 1;
                    }
                }
                KeyCode::Right => {
                    if *cursor % dimension + 1 < dimension {
                        *cursor += 1;
                    }
                }
                KeyCode::Up => {
                    if *cursor >= dimension {
                        *cursor -= dimension;
                    }
                }
                KeyCode::Down => {
                    if *cursor + dimension < total {
                        *cursor += dimension;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    game.flip(*cursor);
                }
                KeyCode::Char('s') => game.start(),
                KeyCode::Char('p') => {
                    game.toggle_pause();
                }
                KeyCode::Char('n') => return Ok(Command::NewGame),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some(index) = card_at(column, row, dimension) {
                    *cursor = index;
                    game.flip(index);
                }
            }
            _ => {}
        }
    }

    Ok(Command::Continue)
}

fn card_at(column: u16, row: u16, dimension: usize) -> Option<usize>
{
    let board_row = (row as usize).checked_sub(BOARD_TOP)?;
    let board_col = column as usize / CELL_WIDTH;
    (board_row < dimension && board_col < dimension).then(|| board_row * dimension + board_col)
}

fn draw_ui(
    stdout: &mut Stdout,
    snapshot: &PairsSnapshot,
    cursor: usize,
    player: Option<&str>,
    message: &Option<String>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push(TITLE.to_string());
    lines.push(player.map(|name| format!("Player : {name}")).unwrap_or_default());

    let mut status = format!("{} moves  Time: {} sec", snapshot.moves, snapshot.elapsed_seconds);
    if snapshot.paused {
        status.push_str("  [Paused]");
    } else if !snapshot.started {
        status.push_str("  (press S or flip a card to start)");
    }
    lines.push(status);
    lines.push(format!(
        "Fastest time: {}  Least moves: {}",
        show_record(snapshot.records.best_time),
        show_record(snapshot.records.best_moves)
    ));
    lines.push(String::new());

    for (row_index, row) in snapshot.cards.chunks(snapshot.dimension.max(1)).enumerate() {
        let mut line = String::new();
        for (col_index, card) in row.iter().enumerate() {
            let index = row_index * snapshot.dimension + col_index;
            line.push_str(&render_card(card, index == cursor));
            line.push(' ');
        }
        lines.push(line);
    }

    lines.push(String::new());
    if let Phase::Won { moves, seconds } = snapshot.phase {
        lines.push(format!("Congratulations! with {moves} moves under {seconds} seconds"));
    }
    if let Some(msg) = message {
        lines.push(msg.clone());
    }
    lines.push("Arrows or mouse pick a card, Enter flips.".to_string());
    lines.push("S start, P pause/resume, N new game, Esc exit.".to_string());

    terminal::draw_lines(stdout, &lines)
}

fn show_record(value: Option<u32>) -> String
{
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render_card(card: &Card, selected: bool) -> String
{
    let label = match card.state {
        CardState::FaceDown => "?".to_string(),
        CardState::FaceUp | CardState::Matched => card_label(card.image),
    };
    let label = if selected { format!(">{label}<") } else { label };
    let text = format!("{:^width$}", label, width = CELL_WIDTH - 1);
    let background = match card.state {
        CardState::FaceDown => (40, 40, 40),
        CardState::FaceUp => (0, 90, 160),
        CardState::Matched => (0, 150, 70),
    };
    paint(&text, background)
}

fn card_label(image: &str) -> String
{
    let file = image.rsplit('/').next().unwrap_or(image);
    let stem = file.split('.').next().unwrap_or(file);
    stem.to_ascii_uppercase().chars().take(6).collect()
}
