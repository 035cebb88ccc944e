//! npscache - browse national park sites by state and the places around them.
//!
//! A plain-text prompt loop over the core session. Every page and search
//! result is kept in a local cache file, so revisiting a state or site
//! works without another network call.

mod config;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use npscache_core::{
    CacheStore, MapQuestClient, NpsClient, PlacesLookup, Resolver, Screen, Session, SiteDirectory,
};

use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("npscache starting");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let (store, status) = CacheStore::load(config.cache_path());
    debug!(?status, path = %store.path().display(), "Cache opened");

    let resolver = Resolver::new(
        NpsClient::new().context("Failed to create NPS client")?,
        MapQuestClient::new(Config::api_key()).context("Failed to create places client")?,
        config.search_params(),
    );
    let mut session = Session::new(store, resolver);

    print_lines(&session.start().await)?;
    run(&mut session).await?;

    info!("npscache shutting down");
    Ok(())
}

async fn run<D: SiteDirectory, P: PlacesLookup>(session: &mut Session<D, P>) -> Result<()> {
    let stdin = io::stdin();

    while let Some(prompt) = session.screen().prompt() {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = match stdin.lock().read_line(&mut line) {
            Ok(read) => read,
            Err(e) => {
                print_lines(&session.finish().lines)?;
                return Err(e).context("Failed to read input");
            }
        };

        let transition = if read == 0 {
            println!();
            session.finish()
        } else {
            session.handle(&line).await
        };

        print_lines(&transition.lines)?;
        if transition.screen == Screen::Exited {
            break;
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{}", line)?;
    }
    Ok(())
}
