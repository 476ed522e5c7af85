use anyhow::Context;
use clap::Parser;
use tracing::info;

use envtop::config::{Cli, Config};
use envtop::dao::KubeClient;
use envtop::logging;
use envtop::session::Session;
use envtop::ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli).context("loading configuration")?;

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;
    logging::setup_logger(&config.log_dir).context("setting up logging")?;
    info!(
        reveal_disabled = config.session.reveal_disabled,
        reveal_timeout = ?config.session.reveal_timeout,
        "starting envtop"
    );

    let client = KubeClient::connect(config.context.clone())
        .await
        .context("connecting to the cluster")?;
    let (session, effects) = Session::new(client.context(), config.session);

    let result = {
        let mut guard = ui::TerminalGuard::new().context("initialising terminal")?;
        ui::run(&mut guard, client, session, effects).await
    };

    logging::shutdown();
    result.context("running the UI")
}
