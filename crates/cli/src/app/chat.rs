use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use lmchat_core::llm::{ChatCompletionRequest, ChatMessage, ModelClient};
use lmchat_core::Conversation;
use tracing::{info, warn};

use crate::strings::*;
use crate::terminal::wrap;

use super::App;

pub const DETAILED_MAX_TOKENS: u32 = 300;
pub const DETAILED_TEMPERATURE: f32 = 0.7;
pub const INTERACTIVE_MAX_TOKENS: u32 = 500;

fn parse_max_tokens(raw: &str) -> anyhow::Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DETAILED_MAX_TOKENS);
    }
    let n: u32 = raw
        .parse()
        .with_context(|| format!("invalid max tokens {raw:?}"))?;
    if n == 0 {
        bail!("max tokens must be positive");
    }
    Ok(n)
}

fn parse_temperature(raw: &str) -> anyhow::Result<f32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DETAILED_TEMPERATURE);
    }
    let t: f32 = raw
        .parse()
        .with_context(|| format!("invalid temperature {raw:?}"))?;
    if !(0.0..=2.0).contains(&t) {
        bail!("temperature must be between 0.0 and 2.0, got {t}");
    }
    Ok(t)
}

impl<C: ModelClient, R: BufRead, W: Write> App<C, R, W> {
    pub async fn simple_chat(&mut self) -> anyhow::Result<()> {
        self.title(TITLE_SIMPLE)?;
        let message = self.prompt(PROMPT_MESSAGE)?;
        if message.trim().is_empty() {
            writeln!(self.out, "{}", NO_MESSAGE)?;
            return Ok(());
        }
        writeln!(self.out, "\n{}", WAITING)?;
        self.out.flush()?;
        let reply = self
            .client
            .simple_chat(&message, &self.session.selected_model)
            .await?;
        writeln!(self.out, "\n--- Response ---")?;
        writeln!(self.out, "{}", wrap(&reply, self.screen.wrap_width()))?;
        Ok(())
    }

    pub async fn detailed_chat(&mut self) -> anyhow::Result<()> {
        self.title(TITLE_DETAILED)?;
        let system = self.prompt(PROMPT_SYSTEM)?;
        let user = self.prompt(PROMPT_USER)?;
        if user.trim().is_empty() {
            writeln!(self.out, "{}", USER_MESSAGE_REQUIRED)?;
            return Ok(());
        }
        let max_tokens = parse_max_tokens(&self.prompt(PROMPT_MAX_TOKENS)?)?;
        let temperature = parse_temperature(&self.prompt(PROMPT_TEMPERATURE)?)?;

        let mut messages = Vec::with_capacity(2);
        if !system.trim().is_empty() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user));
        let req = ChatCompletionRequest::new(self.session.selected_model.clone(), messages)
            .max_tokens(max_tokens)
            .temperature(temperature);

        writeln!(self.out, "\n{}", WAITING)?;
        self.out.flush()?;
        let resp = self.client.create_chat_completion(&req).await?;

        writeln!(self.out, "\n--- Details ---")?;
        writeln!(self.out, "Model: {}", resp.model)?;
        writeln!(self.out, "Response ID: {}", resp.id)?;
        if let Some(choice) = resp.first_choice() {
            writeln!(self.out, "\n--- Response ---")?;
            writeln!(self.out, "{}", wrap(&choice.message.content, self.screen.wrap_width()))?;
            writeln!(
                self.out,
                "\nFinish reason: {}",
                choice.finish_reason.as_deref().unwrap_or("-")
            )?;
        }
        if let Some(u) = resp.usage {
            writeln!(self.out, "\n--- Token usage ---")?;
            writeln!(self.out, "Prompt: {}", u.prompt_tokens)?;
            writeln!(self.out, "Completion: {}", u.completion_tokens)?;
            writeln!(self.out, "Total: {}", u.total_tokens)?;
        }
        Ok(())
    }

    pub async fn interactive_chat(&mut self) -> anyhow::Result<()> {
        self.title(TITLE_INTERACTIVE)?;
        writeln!(self.out, "{}", CHAT_HELP)?;
        let mut conv = Conversation::new();

        loop {
            write!(self.out, "\n{}", PROMPT_YOU)?;
            self.out.flush()?;
            let input = self.read_line()?.unwrap_or_default();
            let command = input.trim().to_lowercase();
            if input.is_empty() || command == "exit" {
                writeln!(self.out, "{}", CHAT_ENDED)?;
                break;
            }
            if command == "clear" {
                conv.clear();
                writeln!(self.out, "{}", CHAT_CLEARED)?;
                continue;
            }

            writeln!(self.out, "{}", WAITING)?;
            self.out.flush()?;
            let model = self.session.selected_model.clone();
            match conv
                .turn(&self.client, &model, &input, Some(INTERACTIVE_MAX_TOKENS))
                .await
            {
                Ok(Some(reply)) => {
                    let text = wrap(&reply.content, self.screen.wrap_width());
                    writeln!(self.out, "\nAssistant: {}", text)?;
                }
                Ok(None) => writeln!(self.out, "{}", NO_REPLY)?,
                Err(e) => {
                    warn!(target: "cli", "chat turn failed: {}", e);
                    writeln!(self.out, "{}", other_error(&e))?;
                    let again = self.prompt(PROMPT_CONTINUE)?;
                    if !again.trim().eq_ignore_ascii_case("y") {
                        break;
                    }
                }
            }
        }
        info!(target: "cli", "interactive chat ended with {} messages", conv.len());
        Ok(())
    }
}
