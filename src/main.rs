use std::fs::File;
use std::sync::Arc;

use anyhow::Result;
use log::info;
use rsn_bot::models::Event;
use rsn_bot::settings::Settings;
use rsn_bot::startup::Context;
use rsn_bot::{discord, purge, registration, startup};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use tokio::sync::mpsc::{self, Sender};
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading .env file
    dotenv::dotenv().ok();

    let settings = Settings::new().await?;
    init_logger(&settings)?;

    info!("Starting ...");

    let (tx, mut rx) = mpsc::channel(64);
    discord::start(&settings.discord, tx.clone()).await?;

    let http = Arc::new(discord::new_client(&settings.discord));
    let mut ctx: Option<Arc<Context>> = None;

    while let Some(event) = rx.recv().await {
        match event {
            Event::Ready(user) => {
                // A later Ready is a resumed session, everything is wired up
                // already.
                if ctx.is_some() {
                    continue;
                }

                if let Some(new_ctx) =
                    startup::initialize(Arc::clone(&http), &settings.discord, &user).await?
                {
                    arm_purge_timer(tx.clone());
                    info!("Bot started");
                    ctx = Some(new_ctx);
                }
            }
            Event::NewMessage(msg) => {
                if let Some(ctx) = &ctx {
                    let ctx = Arc::clone(ctx);
                    tokio::spawn(async move { registration::handle_message(&ctx, &msg).await });
                }
            }
            Event::PurgeTick => {
                if let Some(ctx) = &ctx {
                    let ctx = Arc::clone(ctx);
                    tokio::spawn(async move { purge::run(&ctx).await });
                }
            }
            Event::Shutdown => break,
        }
    }

    Ok(())
}

/// Set up a combined logger with the backends enabled in the settings.
fn init_logger(settings: &Settings) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(terminal) = &settings.logging.terminal {
        loggers.push(TermLogger::new(
            terminal.filter,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    if let Some(file) = &settings.logging.file {
        loggers.push(WriteLogger::new(
            file.base.filter,
            Config::default(),
            File::create(&file.path)?,
        ));
    }

    CombinedLogger::init(loggers)?;

    Ok(())
}

/// Feed a purge tick into the event queue once per period. The first tick
/// fires one full period after startup.
fn arm_purge_timer(tx: Sender<Event>) {
    tokio::spawn(async move {
        let mut timer = time::interval(purge::PURGE_PERIOD);
        // An interval yields immediately at first, skip that one.
        timer.tick().await;

        loop {
            timer.tick().await;

            if tx.send(Event::PurgeTick).await.is_err() {
                return;
            }
        }
    });
}
