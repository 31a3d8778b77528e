use std::io::{BufRead, Write};

use lmchat_core::llm::{ChatError, ModelClient};
use tracing::{error, info};

use crate::strings::*;
use crate::terminal::Screen;

pub mod chat;
pub mod models;

#[cfg(test)]
mod testing;

/// Menu state carried between actions.
#[derive(Clone, Debug)]
pub struct Session {
    pub selected_model: String,
    pub available_models: Vec<String>,
}

impl Session {
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            selected_model: model.into(),
            available_models: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    ListModels,
    SelectModel,
    SimpleChat,
    DetailedChat,
    InteractiveChat,
    Exit,
}

impl MenuChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Self::ListModels),
            "2" => Some(Self::SelectModel),
            "3" => Some(Self::SimpleChat),
            "4" => Some(Self::DetailedChat),
            "5" => Some(Self::InteractiveChat),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct App<C, R, W> {
    client: C,
    input: R,
    out: W,
    screen: Screen,
    pub session: Session,
}

impl<C: ModelClient, R: BufRead, W: Write> App<C, R, W> {
    pub fn new<S: Into<String>>(client: C, input: R, out: W, model: S) -> Self {
        Self {
            client,
            input,
            out,
            screen: Screen::plain(),
            session: Session::new(model),
        }
    }

    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.draw_menu()?;
            let Some(line) = self.read_line()? else {
                info!(target: "cli", "input closed");
                break;
            };
            let choice = MenuChoice::parse(&line);
            info!(target: "cli", "menu choice={:?}", choice);
            let res = match choice {
                Some(MenuChoice::ListModels) => self.show_models().await,
                Some(MenuChoice::SelectModel) => self.select_model().await,
                Some(MenuChoice::SimpleChat) => self.simple_chat().await,
                Some(MenuChoice::DetailedChat) => self.detailed_chat().await,
                Some(MenuChoice::InteractiveChat) => self.interactive_chat().await,
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "{}", GOODBYE)?;
                    break;
                }
                None => {
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                    Ok(())
                }
            };
            if let Err(e) = res {
                self.report(&e)?;
            }
            writeln!(self.out, "\n{}", PRESS_ENTER)?;
            self.out.flush()?;
            if self.read_line()?.is_none() {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn draw_menu(&mut self) -> std::io::Result<()> {
        self.screen.clear(&mut self.out)?;
        writeln!(self.out, "{}", TITLE_MENU)?;
        writeln!(self.out, "{}", current_model(&self.session.selected_model))?;
        writeln!(self.out, "{}", RULE)?;
        for item in MENU_ITEMS {
            writeln!(self.out, "{}", item)?;
        }
        writeln!(self.out, "{}", RULE_DOUBLE)?;
        write!(self.out, "{}", PROMPT_CHOICE)?;
        self.out.flush()
    }

    fn report(&mut self, e: &anyhow::Error) -> std::io::Result<()> {
        error!(target: "cli", "action failed: {:#}", e);
        match e.downcast_ref::<ChatError>() {
            Some(api) => writeln!(self.out, "\n{}", api_error(api)),
            None => writeln!(self.out, "\n{}", other_error(e)),
        }
    }

    fn title(&mut self, title: &str) -> std::io::Result<()> {
        self.screen.clear(&mut self.out)?;
        writeln!(self.out, "{}", title)
    }

    /// One line without its terminator; `None` at end of input.
    /// Bytes that are not UTF-8 are replaced rather than failing the read.
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&buf);
        Ok(Some(text.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> std::io::Result<String> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }
}
