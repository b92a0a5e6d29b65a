use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    pub fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide, EnableMouseCapture)?;
        Ok(Self { stdout })
    }

    pub fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, DisableMouseCapture, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn draw_lines(stdout: &mut Stdout, lines: &[String]) -> Result<(), String>
{
    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All)).map_err(|err| err.to_string())?;
    stdout.write_all(output.as_bytes()).map_err(|err| err.to_string())?;
    stdout.flush().map_err(|err| err.to_string())?;
    Ok(())
}

pub fn farewell(player: Option<&str>) -> Option<String>
{
    player
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!("Thank you for playing, {name}!"))
}

/// Asks before leaving a game. A named player gets a thank-you screen
/// before control returns to the menu.
pub fn confirm_exit(stdout: &mut Stdout, title: &str, player: Option<&str>) -> Result<bool, String>
{
    draw_lines(
        stdout,
        &[
            title.to_string(),
            String::new(),
            "Are you sure you want to exit? (y/n)".to_string(),
        ],
    )?;

    let confirmed = loop {
        if let Event::Key(KeyEvent { code, modifiers, .. }) = event::read().map_err(|err| err.to_string())? {
            match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => break true,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => break false,
                _ => {}
            }
        }
    };

    if confirmed {
        if let Some(message) = farewell(player) {
            draw_lines(
                stdout,
                &[message, String::new(), "Press SPACE to continue.".to_string()],
            )?;
            wait_for_space()?;
        }
    }
    Ok(confirmed)
}

pub fn wait_for_space() -> Result<(), String>
{
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        let _ = event::read().map_err(|err| err.to_string())?;
    }

    loop {
        if event::poll(Duration::from_millis(50)).map_err(|err| err.to_string())? {
            if let Event::Key(KeyEvent { code: KeyCode::Char(' '), .. }) =
                event::read().map_err(|err| err.to_string())?
            {
                break;
            }
        }
    }
    Ok(())
}

pub fn paint(text: &str, background: (u8, u8, u8)) -> String
{
    let (r, g, b) = background;
    format!("\x1b[48;2;{r};{g};{b}m{text}\x1b[0m")
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn named_players_are_thanked()
    {
        assert_eq!(
            farewell(Some("Aiko")),
            Some("Thank you for playing, Aiko!".to_string())
        );
    }

    #[test]
    fn anonymous_players_leave_quietly()
    {
        assert_eq!(farewell(None), None);
        assert_eq!(farewell(Some("   ")), None);
    }

    #[test]
    fn paint_wraps_text_in_a_background_colour()
    {
        assert_eq!(paint("x", (1, 2, 3)), "\x1b[48;2;1;2;3mx\x1b[0m");
    }
}
