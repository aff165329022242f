use crate::exit_hook::ExitHook;
use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write};

/// the terminal primitives the live renderer draws with
///
/// Implementations may buffer; the renderer calls [`Terminal::flush`] once at
/// the end of every redraw.
pub trait Terminal {
    /// column count, `None` when the terminal cannot report one
    fn width(&self) -> Option<u16>;

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// clear the row the cursor is on
    fn erase_line(&mut self) -> io::Result<()>;

    fn move_to_column(&mut self, column: u16) -> io::Result<()>;

    fn write(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// cleanup to run if the process dies while the cursor is hidden
    fn exit_hook(&self) -> Option<ExitHook> {
        None
    }
}

/// [`Terminal`] over stdout, drawing with crossterm commands
pub struct CrosstermTerminal {
    out: Stdout,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn width(&self) -> Option<u16> {
        match terminal::size() {
            Ok((width, _)) if width > 0 => Some(width),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Cannot query terminal size: {}", e);
                None
            }
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, Show)
        } else {
            queue!(self.out, Hide)
        }
    }

    fn erase_line(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::CurrentLine))
    }

    fn move_to_column(&mut self, column: u16) -> io::Result<()> {
        queue!(self.out, MoveToColumn(column))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn exit_hook(&self) -> Option<ExitHook> {
        Some(Box::new(|| {
            let mut stdout = io::stdout();
            let _ = execute!(stdout, Show);
        }))
    }
}
