mod error;
mod routes;
mod state;

use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use log::{info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::load();
    let state = AppState::from_settings(&settings);
    info!(
        "season {}, detail fetches: {} at a time, {:?} timeout",
        state.season(),
        state.scoreboard.concurrency(),
        state.scoreboard.detail_timeout()
    );

    let listener = TcpListener::bind(&settings.bind).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("nba-scor {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "nba-scor - JSON relay for live NBA scores and league stats

Usage:
  nba-scor
  nba-scor --help
  nba-scor --version

Environment:
  NBA_SCOR_BIND                 Listen address (default 127.0.0.1:8000)
  NBA_SCOR_SEASON               Season for stats queries, e.g. 2025-26 (default: current)
  NBA_SCOR_HTTP_TIMEOUT_SECS    Upstream request timeout (default 10)
  NBA_SCOR_DETAIL_TIMEOUT_MS    Per-game boxscore timeout (default 5000)
  NBA_SCOR_DETAIL_CONCURRENCY   Boxscores fetched at once (default 4)
  NBA_SCOR_LIVE_BASE            Live data base URL
  NBA_SCOR_STATS_BASE           Stats base URL
  RUST_LOG                      Log filter (default info)"
}
