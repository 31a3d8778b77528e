mod app;
mod logging;
mod strings;
mod terminal;

use anyhow::{Context, Result};
use lmchat_providers::openai::{OpenAiClient, OpenAiConfig};
use tracing::info;

use terminal::Screen;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init();
    let cfg = OpenAiConfig::from_env_and_file().context("load configuration")?;
    let model = cfg.model.clone();
    let client = OpenAiClient::new(cfg).context("build http client")?;
    info!(
        target: "cli",
        "starting base_url={} model={} timeout={:?} auth={}",
        client.base_url(),
        model,
        client.config().timeout,
        client.config().api_key.is_some()
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut app = app::App::new(client, stdin.lock(), stdout.lock(), model)
        .with_screen(Screen::detect());
    app.run().await
}
