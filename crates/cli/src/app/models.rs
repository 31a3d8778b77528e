use std::io::{BufRead, Write};

use lmchat_core::llm::ModelClient;
use tracing::info;

use crate::strings::*;

use super::App;

impl<C: ModelClient, R: BufRead, W: Write> App<C, R, W> {
    pub async fn show_models(&mut self) -> anyhow::Result<()> {
        self.title(TITLE_MODELS)?;
        let list = self.client.list_models().await?;
        if list.data.is_empty() {
            writeln!(self.out, "{}", NO_MODELS)?;
            return Ok(());
        }
        for m in &list.data {
            writeln!(self.out, "{}", model_entry(&m.id, &m.owned_by))?;
        }
        self.session.available_models = list.ids();
        info!(target: "cli", "cached {} models", self.session.available_models.len());
        Ok(())
    }

    pub async fn select_model(&mut self) -> anyhow::Result<()> {
        self.title(TITLE_SELECT)?;
        if self.session.available_models.is_empty() {
            writeln!(self.out, "{}", FETCHING_MODELS)?;
            let list = self.client.list_models().await?;
            if !list.data.is_empty() {
                self.session.available_models = list.ids();
            }
        }

        if self.session.available_models.is_empty() {
            let name = self.prompt(PROMPT_MODEL_NAME_FALLBACK)?;
            self.set_model(&name)?;
            return Ok(());
        }

        writeln!(self.out)?;
        for (i, id) in self.session.available_models.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, id)?;
        }
        writeln!(self.out, "\n{}", MANUAL_ENTRY)?;
        let selection = self.prompt(PROMPT_SELECTION)?;
        let selection = selection.trim();
        if selection == "0" {
            let name = self.prompt(PROMPT_MODEL_NAME)?;
            self.set_model(&name)?;
            return Ok(());
        }
        match selection.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.session.available_models.len() => {
                let id = self.session.available_models[n - 1].clone();
                self.set_model(&id)?;
            }
            _ => writeln!(self.out, "{}", INVALID_SELECTION)?,
        }
        Ok(())
    }

    /// Blank names leave the current model in place.
    fn set_model(&mut self, name: &str) -> std::io::Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.session.selected_model = name.to_string();
        info!(target: "cli", "model selected {}", name);
        writeln!(self.out, "\n{}", model_set(name))
    }
}
