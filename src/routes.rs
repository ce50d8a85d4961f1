use crate::error::AppError;
use crate::state::app_state::AppState;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use nba_api::teams::all_teams;
use nba_api::{
    DateGame, GameBoxscore, GameSummary, LeaderCategory, LeaderEntry, PlayerProfile,
    PlayerSeasonAverages, Record, RosterEntry, Standings, TeamAverages, TeamInfo, TeamRecord,
};

type JsonResult<T> = Result<Json<T>, AppError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/live/", get(live_scoreboard))
        .route("/api/games/{game_id}/", get(game_boxscore))
        .route("/api/games/date/{date}/", get(games_on_date))
        .route("/api/teams/", get(teams))
        .route("/api/teams/{team_id}/stats/", get(team_stats))
        .route("/api/teams/{team_id}/averages/", get(team_averages))
        .route("/api/teams/{team_id}/roster/", get(team_roster))
        .route("/api/teams/{team_id}/gamelog/", get(team_game_log))
        .route("/api/players/", get(players))
        .route("/api/players/{player_id}/", get(player_profile))
        .route("/api/players/{player_id}/current/", get(player_current))
        .route("/api/players/{player_id}/gamelog/", get(player_game_log))
        .route("/api/leaders/{category}/", get(leaders))
        .route("/api/standings/", get(standings))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

async fn live_scoreboard(State(state): State<AppState>) -> JsonResult<Vec<GameSummary>> {
    let games = state.scoreboard.aggregate(&state.api).await?;
    Ok(Json(games))
}

async fn game_boxscore(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> JsonResult<GameBoxscore> {
    Ok(Json(state.api.fetch_boxscore(&game_id).await?))
}

async fn games_on_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> JsonResult<Vec<DateGame>> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format. Use YYYY-MM-DD".into()))?;
    Ok(Json(state.api.fetch_games_on(date, &state.scoreboard).await?))
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

async fn teams() -> JsonResult<Vec<TeamInfo>> {
    Ok(Json(all_teams()?))
}

async fn team_stats(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> JsonResult<TeamRecord> {
    let team_id = parse_id(&team_id, "team")?;
    Ok(Json(state.api.fetch_team_record(team_id, &state.season()).await?))
}

async fn team_averages(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> JsonResult<TeamAverages> {
    let team_id = parse_id(&team_id, "team")?;
    Ok(Json(state.api.fetch_team_averages(team_id, &state.season()).await?))
}

async fn team_roster(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> JsonResult<Vec<RosterEntry>> {
    let team_id = parse_id(&team_id, "team")?;
    Ok(Json(state.api.fetch_roster(team_id, &state.season()).await?))
}

async fn team_game_log(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> JsonResult<Vec<Record>> {
    let team_id = parse_id(&team_id, "team")?;
    Ok(Json(state.api.fetch_team_game_log(team_id, &state.season()).await?))
}

// ---------------------------------------------------------------------------
// Players and league
// ---------------------------------------------------------------------------

async fn players(State(state): State<AppState>) -> JsonResult<Vec<Record>> {
    Ok(Json(state.api.fetch_players(&state.season()).await?))
}

async fn player_profile(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> JsonResult<PlayerProfile> {
    let player_id = parse_id(&player_id, "player")?;
    Ok(Json(state.api.fetch_player_profile(player_id, &state.season()).await?))
}

async fn player_current(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> JsonResult<PlayerSeasonAverages> {
    let player_id = parse_id(&player_id, "player")?;
    Ok(Json(state.api.fetch_player_season_averages(player_id, &state.season()).await?))
}

async fn player_game_log(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> JsonResult<Vec<Record>> {
    let player_id = parse_id(&player_id, "player")?;
    Ok(Json(state.api.fetch_player_game_log(player_id, &state.season()).await?))
}

async fn leaders(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> JsonResult<Vec<LeaderEntry>> {
    let category = LeaderCategory::from_slug(&category)
        .ok_or_else(|| AppError::NotFound(format!("Unknown leader category: {category}")))?;
    Ok(Json(state.api.fetch_leaders(category, &state.season()).await?))
}

async fn standings(State(state): State<AppState>) -> JsonResult<Standings> {
    Ok(Json(state.api.fetch_standings(&state.season()).await?))
}

fn parse_id(raw: &str, kind: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {kind} id: {raw}")))
}
