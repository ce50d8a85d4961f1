//! Live scoreboard aggregation.
//!
//! The summary feed decides which games exist and in what order. Live games
//! are then topped up from the per-game boxscore feed; a boxscore that fails
//! or times out only costs that one game its fresher numbers.
use crate::client::{ApiError, ApiResult};
use crate::live::{GameDetail, GameSummary};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use log::{debug, warn};
use std::time::Duration;

pub const DEFAULT_DETAIL_CONCURRENCY: usize = 4;
pub const DEFAULT_DETAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// The two upstream feeds the aggregator reads from.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Today's games, in the feed's own order.
    async fn fetch_scoreboard(&self) -> ApiResult<Vec<GameSummary>>;

    /// Boxscore snapshot for a single game.
    async fn fetch_game_detail(&self, game_id: &str) -> ApiResult<GameDetail>;
}

#[derive(Debug, Clone, Copy)]
pub struct LiveScoreboard {
    concurrency: usize,
    detail_timeout: Duration,
}

impl Default for LiveScoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_CONCURRENCY, DEFAULT_DETAIL_TIMEOUT)
    }
}

impl LiveScoreboard {
    pub fn new(concurrency: usize, detail_timeout: Duration) -> Self {
        Self { concurrency: concurrency.max(1), detail_timeout }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn detail_timeout(&self) -> Duration {
        self.detail_timeout
    }

    /// Today's scoreboard with live games refreshed from their boxscores.
    ///
    /// Only a failed summary fetch is an error. The result always has one
    /// entry per summary game, in summary order.
    pub async fn aggregate<F>(&self, feed: &F) -> ApiResult<Vec<GameSummary>>
    where
        F: LiveFeed + ?Sized,
    {
        let games = feed.fetch_scoreboard().await?;
        debug!(
            "scoreboard has {} games, {} live",
            games.len(),
            games.iter().filter(|g| g.is_live()).count()
        );

        let games: Vec<GameSummary> = stream::iter(games)
            .map(|game| self.enrich(feed, game))
            .buffered(self.concurrency)
            .collect()
            .await;
        Ok(games)
    }

    /// Final (or current) home/away scores for each game id, in input order.
    /// `None` marks a game whose boxscore couldn't be read.
    pub async fn scores<F>(&self, feed: &F, game_ids: &[String]) -> Vec<Option<(u32, u32)>>
    where
        F: LiveFeed + ?Sized,
    {
        stream::iter(game_ids.to_vec())
            .map(|game_id| async move {
                match self.fetch_detail(feed, &game_id).await {
                    Ok(detail) => Some((
                        detail.home_team.and_then(|t| t.score).unwrap_or_default(),
                        detail.away_team.and_then(|t| t.score).unwrap_or_default(),
                    )),
                    Err(e) => {
                        debug!("no boxscore score for game {game_id}: {e}");
                        None
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// One detail fetch under the per-game timeout.
    pub async fn fetch_detail<F>(&self, feed: &F, game_id: &str) -> ApiResult<GameDetail>
    where
        F: LiveFeed + ?Sized,
    {
        tokio::time::timeout(self.detail_timeout, feed.fetch_game_detail(game_id))
            .await
            .map_err(|_| {
                ApiError::Timeout(format!(
                    "boxscore for game {game_id} took longer than {:?}",
                    self.detail_timeout
                ))
            })?
    }

    async fn enrich<F>(&self, feed: &F, mut game: GameSummary) -> GameSummary
    where
        F: LiveFeed + ?Sized,
    {
        if !game.is_live() || game.game_id().is_empty() {
            return game;
        }
        match self.fetch_detail(feed, game.game_id()).await {
            Ok(detail) => game.merge_detail(detail),
            Err(e) => warn!("keeping scoreboard data for game {}: {e}", game.game_id()),
        }
        game
    }
}
