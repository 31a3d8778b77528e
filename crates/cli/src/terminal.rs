use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{self, Clear, ClearType},
    tty::IsTty,
};

/// What the menu may assume about where its output goes.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    interactive: bool,
}

impl Screen {
    pub fn detect() -> Self {
        Self {
            interactive: io::stdout().is_tty(),
        }
    }

    pub fn plain() -> Self {
        Self { interactive: false }
    }

    pub fn clear<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.interactive {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    pub fn wrap_width(&self) -> Option<usize> {
        if !self.interactive {
            return None;
        }
        terminal::size().ok().map(|(w, _)| w.max(20) as usize)
    }
}

pub fn wrap(text: &str, width: Option<usize>) -> String {
    match width {
        Some(w) => textwrap::fill(text, w),
        None => text.to_string(),
    }
}
