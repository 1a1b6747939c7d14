//! Terminal display and input handling

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, stdout, BufWriter, Stdout, Write};
use std::time::Duration;

/// Alternate-screen display with buffered output. Restores the terminal on drop.
pub struct TerminalDisplay {
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        // Raw mode delivers key presses without waiting for Enter
        terminal::enable_raw_mode()?;
        // Start from a blank alternate screen
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        Ok(Self {
            buffer: BufWriter::new(stdout),
        })
    }

    /// Terminal size in character cells
    pub fn size() -> io::Result<(usize, usize)> {
        let (width, height) = terminal::size()?;
        Ok((width as usize, height as usize))
    }

    /// Draw a frame from the top-left corner, then a status line below it.
    ///
    /// Each line is positioned explicitly so a frame wider than the terminal cannot
    /// push later rows out of place.
    pub fn render(&mut self, content: &str, status: &str) -> io::Result<()> {
        // \x1b[?25l = hide cursor, \x1b[?7l = disable line wrap
        write!(self.buffer, "\x1b[?25l\x1b[?7l")?;

        let mut rows = 0;
        for (i, line) in content.lines().enumerate() {
            // Move to row i+1, column 1
            write!(self.buffer, "\x1b[{};1H{}", i + 1, line)?;
            rows = i + 1;
        }

        // Clear to end of screen, removing leftovers from a larger frame
        write!(self.buffer, "\x1b[J")?;
        // Status line goes directly under the frame; \x1b[K clears the line first
        write!(self.buffer, "\x1b[{};1H\x1b[K{}", rows + 1, status)?;

        // \x1b[?25h = show cursor, \x1b[?7h = enable line wrap
        write!(self.buffer, "\x1b[?25h\x1b[?7h")?;
        self.buffer.flush()
    }

    /// Wait up to `timeout` for a key press
    pub fn poll_input(&self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some(key_event));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        // Flush before leaving the alternate screen so nothing lands on the main one
        let _ = self.buffer.flush();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Key actions for the spinning planet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Quit,
    Pause,
}

/// Parse keyboard input into actions
pub fn parse_key_event(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        // raw mode swallows SIGINT
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char(' ') => Action::Pause,
        _ => Action::None,
    }
}
