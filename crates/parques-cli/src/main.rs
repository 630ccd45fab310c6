//! Parqués terminal client.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod prompt;
mod render;
mod session;

use config::CliConfig;
use prompt::Prompter;
use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so they stay out of the game text
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CliConfig::from_env()?;
    info!(?config, "Starting Parqués...");

    let io = Rc::new(RefCell::new(Prompter::new(io::stdin().lock(), io::stdout())));
    let mut session = Session::new(io, config);
    session.run()?;

    info!(
        turns = session.record().history.len(),
        finished = session.game().is_finished(),
        "Session ended"
    );
    Ok(())
}
