use crate::state::app_settings::AppSettings;
use chrono::Local;
use nba_api::client::current_season;
use nba_api::{LiveScoreboard, NbaApi};

/// Shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub api: NbaApi,
    pub scoreboard: LiveScoreboard,
    season: Option<String>,
}

impl AppState {
    pub fn new(api: NbaApi, scoreboard: LiveScoreboard, season: Option<String>) -> Self {
        Self { api, scoreboard, season }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let api = NbaApi::new()
            .with_base_urls(&settings.live_base, &settings.stats_base)
            .with_timeout(settings.http_timeout);
        let scoreboard = LiveScoreboard::new(settings.detail_concurrency, settings.detail_timeout);
        Self::new(api, scoreboard, settings.season.clone())
    }

    /// Season used for stats queries: the configured one, else the one in
    /// progress today.
    pub fn season(&self) -> String {
        self.season
            .clone()
            .unwrap_or_else(|| current_season(Local::now().date_naive()))
    }
}
