use crate::live::{BoxscoreResponse, BoxscoreTeam, GameDetail, GameSummary, ScoreboardResponse};
use crate::scoreboard::{LiveFeed, LiveScoreboard};
use crate::stats::{ResultSet, Row, StatsResponse};
use crate::{
    BoxscoreSide, DateGame, DateGameSide, GameBoxscore, LeaderCategory, LeaderEntry, PlayerInfo,
    PlayerProfile, PlayerSeasonAverages, PlayerStatLine, PlayerTeam, Record, RosterEntry,
    Standings, StandingsEntry, TeamAverages, TeamRecord, TeamStatLine, teams,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const LIVE_DATA_BASE: &str = "https://cdn.nba.com/static/json/liveData";
pub const STATS_BASE: &str = "https://stats.nba.com/stats";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const LEAGUE_ID: &str = "00";
const REGULAR_SEASON: &str = "Regular%20Season";
const LEADERS_SHOWN: usize = 10;
/// Blank filter set the dashboard endpoints insist on receiving.
const DASHBOARD_FILTERS: &str = "DateFrom=&DateTo=&GameSegment=&LastNGames=0&Location=&MeasureType=Base&Month=0&OpponentTeamID=0&Outcome=&PORound=0&PaceAdjust=N&Period=0&PlusMinus=N&Rank=N&SeasonSegment=&ShotClockRange=&VsConference=&VsDivision=";

/// Columns kept from `teamgamelogs`, renamed where the frontend expects it.
const TEAM_GAME_LOG_COLUMNS: [(&str, &str); 20] = [
    ("GAME_ID", "Game_ID"),
    ("GAME_DATE", "GAME_DATE"),
    ("MATCHUP", "MATCHUP"),
    ("WL", "WL"),
    ("MIN", "MIN"),
    ("PTS", "PTS"),
    ("REB", "REB"),
    ("AST", "AST"),
    ("STL", "STL"),
    ("BLK", "BLK"),
    ("FGM", "FGM"),
    ("FGA", "FGA"),
    ("FG_PCT", "FG_PCT"),
    ("FG3M", "FG3M"),
    ("FG3A", "FG3A"),
    ("FG3_PCT", "FG3_PCT"),
    ("FTM", "FTM"),
    ("FTA", "FTA"),
    ("FT_PCT", "FT_PCT"),
    ("TOV", "TOV"),
];

/// Client for the NBA live-data CDN and the stats service.
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    timeout: Duration,
    live_base: String,
    stats_base: String,
}

impl Default for NbaApi {
    fn default() -> Self {
        // stats.nba.com drops requests that don't look like they come from nba.com.
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));

        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (X11; Linux x86_64) nba-scor/0.1")
                .default_headers(headers)
                .build()
                .unwrap_or_default(),
            timeout: DEFAULT_TIMEOUT,
            live_base: LIVE_DATA_BASE.to_owned(),
            stats_base: STATS_BASE.to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Schema(String),
    Timeout(String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Schema(msg) => write!(f, "Unexpected response shape: {msg}"),
            ApiError::Timeout(msg) => write!(f, "Timed out: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// One row of the `scoreboardv2` game header table.
#[derive(Debug, Clone, PartialEq)]
pub struct GameHeader {
    pub game_id: String,
    pub home_team_id: u64,
    pub visitor_team_id: u64,
}

impl NbaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at different hosts, e.g. a local mock server.
    pub fn with_base_urls(mut self, live_base: &str, stats_base: &str) -> Self {
        self.live_base = live_base.trim_end_matches('/').to_owned();
        self.stats_base = stats_base.trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // -----------------------------------------------------------------------
    // Live data
    // -----------------------------------------------------------------------

    /// Today's games as published by the live scoreboard.
    pub async fn fetch_scoreboard(&self) -> ApiResult<Vec<GameSummary>> {
        let url = format!("{}/scoreboard/todaysScoreboard_00.json", self.live_base);
        let raw: ScoreboardResponse = self.get(&url).await?;
        let scoreboard = raw
            .scoreboard
            .ok_or_else(|| ApiError::Schema(format!("no scoreboard object in {url}")))?;
        Ok(scoreboard.games)
    }

    /// Raw boxscore snapshot for one game.
    pub async fn fetch_game_detail(&self, game_id: &str) -> ApiResult<GameDetail> {
        let url = format!("{}/boxscore/boxscore_{game_id}.json", self.live_base);
        let raw: BoxscoreResponse = self.get(&url).await?;
        raw.game
            .ok_or_else(|| ApiError::Schema(format!("no game object in {url}")))
    }

    /// Boxscore reshaped for the game page.
    pub async fn fetch_boxscore(&self, game_id: &str) -> ApiResult<GameBoxscore> {
        let detail = self.fetch_game_detail(game_id).await?;
        Ok(map_boxscore(game_id, detail))
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// Games scheduled on `date`, with scores read from each game's boxscore.
    pub async fn fetch_games_on(
        &self,
        date: NaiveDate,
        board: &LiveScoreboard,
    ) -> ApiResult<Vec<DateGame>> {
        let game_date = date.format("%m/%d/%Y");
        let raw = self
            .get_stats("scoreboardv2", &format!("DayOffset=0&GameDate={game_date}&LeagueID={LEAGUE_ID}"))
            .await?;
        let headers = map_game_headers(raw.primary()?)?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = headers.iter().map(|h| h.game_id.clone()).collect();
        let scores = board.scores(self, &ids).await;
        build_date_games(headers, scores)
    }

    pub async fn fetch_leaders(
        &self,
        category: LeaderCategory,
        season: &str,
    ) -> ApiResult<Vec<LeaderEntry>> {
        let query = format!(
            "LeagueID={LEAGUE_ID}&PerMode=PerGame&Scope=S&Season={season}&SeasonType={REGULAR_SEASON}&StatCategory={}",
            category.stat_column()
        );
        let raw = self.get_stats("leagueleaders", &query).await?;
        map_leaders(category, raw.primary()?)
    }

    pub async fn fetch_standings(&self, season: &str) -> ApiResult<Standings> {
        let set = self.standings_table(season).await?;
        map_standings(&set, season)
    }

    /// A team's record plus its rank in the conference and in the league.
    pub async fn fetch_team_record(&self, team_id: u64, season: &str) -> ApiResult<TeamRecord> {
        let set = self.standings_table(season).await?;
        map_team_record(&set, team_id)
    }

    pub async fn fetch_roster(&self, team_id: u64, season: &str) -> ApiResult<Vec<RosterEntry>> {
        let query = format!("LeagueID={LEAGUE_ID}&Season={season}&TeamID={team_id}");
        let raw = self.get_stats("commonteamroster", &query).await?;
        map_roster(raw.primary()?)
    }

    /// Regular-season games, newest first.
    pub async fn fetch_team_game_log(&self, team_id: u64, season: &str) -> ApiResult<Vec<Record>> {
        let query = format!("Season={season}&SeasonType={REGULAR_SEASON}&TeamID={team_id}");
        let raw = self.get_stats("teamgamelogs", &query).await?;
        Ok(map_team_game_log(raw.primary()?))
    }

    /// Everyone on a roster this season, one object per upstream row.
    pub async fn fetch_players(&self, season: &str) -> ApiResult<Vec<Record>> {
        let query = format!("IsOnlyCurrentSeason=1&LeagueID={LEAGUE_ID}&Season={season}");
        let raw = self.get_stats("commonallplayers", &query).await?;
        Ok(raw.primary()?.records())
    }

    pub async fn fetch_player_game_log(&self, player_id: u64, season: &str) -> ApiResult<Vec<Record>> {
        let query = format!("PlayerID={player_id}&Season={season}&SeasonType={REGULAR_SEASON}");
        let raw = self.get_stats("playergamelog", &query).await?;
        Ok(raw.primary()?.records())
    }

    /// Bio, current team and full career tables for one player.
    pub async fn fetch_player_profile(&self, player_id: u64, season: &str) -> ApiResult<PlayerProfile> {
        let career_url = format!(
            "{}/playercareerstats?LeagueID={LEAGUE_ID}&PerMode=Totals&PlayerID={player_id}",
            self.stats_base
        );
        let everyone_query = format!("IsOnlyCurrentSeason=0&LeagueID={LEAGUE_ID}&Season={season}");
        let current_query = format!("IsOnlyCurrentSeason=1&LeagueID={LEAGUE_ID}&Season={season}");
        let (career, everyone, current) = futures_util::try_join!(
            self.get::<Value>(&career_url),
            self.get_stats("commonallplayers", &everyone_query),
            self.get_stats("commonallplayers", &current_query),
        )?;
        map_player_profile(player_id, career, everyone.primary()?, current.primary()?)
    }

    /// Per-game averages for `season`, zeroed when the player hasn't appeared.
    pub async fn fetch_player_season_averages(
        &self,
        player_id: u64,
        season: &str,
    ) -> ApiResult<PlayerSeasonAverages> {
        let query = format!(
            "{DASHBOARD_FILTERS}&LeagueID={LEAGUE_ID}&PerMode=PerGame&PlayerID={player_id}&Season={season}&SeasonType={REGULAR_SEASON}"
        );
        let raw = self.get_stats("playerdashboardbyyearoveryear", &query).await?;
        map_player_season_averages(raw.table("ByYearPlayerDashboard")?, season)
    }

    /// A team's per-game averages and where its scoring ranks in the league.
    pub async fn fetch_team_averages(&self, team_id: u64, season: &str) -> ApiResult<TeamAverages> {
        let common = format!(
            "{DASHBOARD_FILTERS}&LeagueID={LEAGUE_ID}&PerMode=PerGame&Season={season}&SeasonType={REGULAR_SEASON}"
        );
        let league_query = format!("{common}&Conference=&Division=&TeamID=0");
        let team_query = format!("{common}&TeamID={team_id}");
        let (league, team) = futures_util::try_join!(
            self.get_stats("leaguedashteamstats", &league_query),
            self.get_stats("teamdashboardbygeneralsplits", &team_query),
        )?;
        map_team_averages(league.primary()?, team.primary()?, team_id)
    }

    async fn standings_table(&self, season: &str) -> ApiResult<ResultSet> {
        let query = format!("LeagueID={LEAGUE_ID}&Season={season}&SeasonType={REGULAR_SEASON}");
        let raw = self.get_stats("leaguestandingsv3", &query).await?;
        raw.primary().cloned()
    }

    async fn get_stats(&self, endpoint: &str, query: &str) -> ApiResult<StatsResponse> {
        let url = format!("{}/{endpoint}?{query}", self.stats_base);
        self.get(&url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(url.to_owned())
                } else {
                    ApiError::Network(e, url.to_owned())
                }
            })?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

#[async_trait]
impl LiveFeed for NbaApi {
    async fn fetch_scoreboard(&self) -> ApiResult<Vec<GameSummary>> {
        NbaApi::fetch_scoreboard(self).await
    }

    async fn fetch_game_detail(&self, game_id: &str) -> ApiResult<GameDetail> {
        NbaApi::fetch_game_detail(self, game_id).await
    }
}

/// Season string (e.g. "2025-26") in progress on `today`. Seasons tip off in
/// October.
pub fn current_season(today: NaiveDate) -> String {
    let start = if today.month() >= 10 { today.year() } else { today.year() - 1 };
    format!("{start}-{:02}", (start + 1).rem_euclid(100))
}

// ---------------------------------------------------------------------------
// Mapping: live boxscore → game page
// ---------------------------------------------------------------------------

fn map_boxscore(game_id: &str, detail: GameDetail) -> GameBoxscore {
    GameBoxscore {
        game_id: game_id.to_owned(),
        game_status: detail.game_status,
        game_status_text: detail.game_status_text.unwrap_or_default(),
        period: detail.period.unwrap_or_default(),
        game_clock: detail.game_clock.unwrap_or_default(),
        home_team: detail.home_team.map(map_boxscore_side).unwrap_or_default(),
        away_team: detail.away_team.map(map_boxscore_side).unwrap_or_default(),
    }
}

fn map_boxscore_side(team: BoxscoreTeam) -> BoxscoreSide {
    let s = team.statistics.unwrap_or_default();
    BoxscoreSide {
        team_id: team.team_id,
        team_name: team.team_name.unwrap_or_default(),
        team_city: team.team_city.unwrap_or_default(),
        team_tricode: team.team_tricode.unwrap_or_default(),
        score: team.score.unwrap_or_default(),
        periods: team
            .periods
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default(),
        statistics: TeamStatLine {
            points: s.points,
            fg_made: s.field_goals_made,
            fg_attempted: s.field_goals_attempted,
            fg_percentage: s.field_goals_percentage,
            three_pt_made: s.three_pointers_made,
            three_pt_attempted: s.three_pointers_attempted,
            three_pt_percentage: s.three_pointers_percentage,
            ft_made: s.free_throws_made,
            ft_attempted: s.free_throws_attempted,
            ft_percentage: s.free_throws_percentage,
            rebounds_total: s.rebounds_total,
            rebounds_offensive: s.rebounds_offensive,
            rebounds_defensive: s.rebounds_defensive,
            assists: s.assists,
            steals: s.steals,
            blocks: s.blocks,
            turnovers: s.turnovers,
            fouls: s.fouls_personal,
        },
        players: team.players.into_iter().map(map_player_line).collect(),
    }
}

fn map_player_line(player: crate::live::BoxscorePlayer) -> PlayerStatLine {
    let s = player.statistics.unwrap_or_default();
    PlayerStatLine {
        player_id: player.person_id,
        name: player.name.unwrap_or_default(),
        jersey_num: player.jersey_num.unwrap_or_default(),
        position: player.position.unwrap_or_default(),
        starter: player.starter.as_deref() == Some("1"),
        minutes: s.minutes,
        points: s.points,
        rebounds: s.rebounds_total,
        assists: s.assists,
        steals: s.steals,
        blocks: s.blocks,
        turnovers: s.turnovers,
        fouls: s.fouls_personal,
        fg_made: s.field_goals_made,
        fg_attempted: s.field_goals_attempted,
        fg_percentage: s.field_goals_percentage,
        three_pt_made: s.three_pointers_made,
        three_pt_attempted: s.three_pointers_attempted,
        three_pt_percentage: s.three_pointers_percentage,
        ft_made: s.free_throws_made,
        ft_attempted: s.free_throws_attempted,
        ft_percentage: s.free_throws_percentage,
        plus_minus: s.plus_minus_points,
    }
}

// ---------------------------------------------------------------------------
// Mapping: stats tables → response types
// ---------------------------------------------------------------------------

fn map_game_headers(set: &ResultSet) -> ApiResult<Vec<GameHeader>> {
    set.rows()
        .map(|row| {
            Ok(GameHeader {
                game_id: row.string("GAME_ID")?,
                home_team_id: id_column(&row, "HOME_TEAM_ID")?,
                visitor_team_id: id_column(&row, "VISITOR_TEAM_ID")?,
            })
        })
        .collect()
}

fn build_date_games(
    headers: Vec<GameHeader>,
    scores: Vec<Option<(u32, u32)>>,
) -> ApiResult<Vec<DateGame>> {
    let teams = teams::all_teams()?;
    let tricode = |team_id: u64| {
        teams
            .iter()
            .find(|t| t.id == team_id)
            .map(|t| teams::frontend_tricode(&t.abbreviation))
            .unwrap_or_default()
    };

    Ok(headers
        .into_iter()
        .zip(scores.into_iter().chain(std::iter::repeat(None)))
        .map(|(header, score)| {
            let (home_score, away_score) = score.unwrap_or_default();
            DateGame {
                game_id: header.game_id,
                home_team: DateGameSide {
                    team_id: header.home_team_id,
                    team_tricode: tricode(header.home_team_id),
                    score: home_score,
                },
                away_team: DateGameSide {
                    team_id: header.visitor_team_id,
                    team_tricode: tricode(header.visitor_team_id),
                    score: away_score,
                },
            }
        })
        .collect())
}

fn map_leaders(category: LeaderCategory, set: &ResultSet) -> ApiResult<Vec<LeaderEntry>> {
    set.rows()
        .take(LEADERS_SHOWN)
        .map(|row| {
            let team = if row.has("TEAM_ABBREVIATION") {
                row.string_or("TEAM_ABBREVIATION", "N/A")
            } else {
                row.string_or("TEAM", "N/A")
            };
            Ok(LeaderEntry {
                category,
                rank: row.i64("RANK")?,
                player_id: row.i64("PLAYER_ID")?,
                player_name: row.string("PLAYER")?,
                team,
                games_played: row.i64("GP")?,
                value: row.f64(category.stat_column())?,
            })
        })
        .collect()
}

fn map_standings(set: &ResultSet, season: &str) -> ApiResult<Standings> {
    let conference = |name: &str| -> ApiResult<Vec<StandingsEntry>> {
        let mut entries = set
            .rows()
            .filter(|row| row.string_or("Conference", "") == name)
            .map(|row| map_standings_entry(&row, name))
            .collect::<ApiResult<Vec<_>>>()?;
        entries.sort_by(|a, b| b.win_pct.total_cmp(&a.win_pct));
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        Ok(entries)
    };

    Ok(Standings {
        eastern_conference: conference("East")?,
        western_conference: conference("West")?,
        season: season.to_owned(),
    })
}

fn map_standings_entry(row: &Row<'_>, conference: &str) -> ApiResult<StandingsEntry> {
    Ok(StandingsEntry {
        rank: 0,
        team_id: row.i64("TeamID")?,
        team_name: row.string("TeamName")?,
        team_city: row.string("TeamCity")?,
        team_abbreviation: row.string_or("TeamSlug", "N/A"),
        wins: row.i64("WINS")?,
        losses: row.i64("LOSSES")?,
        win_pct: row.f64("WinPCT")?,
        games_back: row.value_or("ConferenceGamesBack", Value::from("0")),
        conference: conference.to_owned(),
        division: row.string_or("Division", "N/A"),
        home_record: row.string_or("HOME", "N/A"),
        road_record: row.string_or("ROAD", "N/A"),
        last_10: row.string_or("L10", "N/A"),
        streak: row.string_or("strCurrentStreak", "N/A"),
    })
}

fn map_team_record(set: &ResultSet, team_id: u64) -> ApiResult<TeamRecord> {
    let team_id = team_id as i64;
    let row = set
        .rows()
        .find(|row| row.i64("TeamID").ok() == Some(team_id))
        .ok_or_else(|| ApiError::NotFound("Team not found in standings".into()))?;
    let conference = row.string("Conference")?;

    // (team id, win pct) for every team, best record first; ties keep table order.
    let mut table = set
        .rows()
        .map(|r| Ok((r.i64("TeamID")?, r.string_or("Conference", ""), r.f64("WinPCT")?)))
        .collect::<ApiResult<Vec<_>>>()?;
    table.sort_by(|a, b| b.2.total_cmp(&a.2));

    let rank_in = |same_conference: bool| {
        table
            .iter()
            .filter(|(_, conf, _)| !same_conference || *conf == conference)
            .position(|(id, _, _)| *id == team_id)
            .map(|i| i + 1)
            .unwrap_or_default()
    };

    Ok(TeamRecord {
        team_id,
        team_name: row.string("TeamName")?,
        team_city: row.string("TeamCity")?,
        wins: row.i64("WINS")?,
        losses: row.i64("LOSSES")?,
        win_percentage: row.f64("WinPCT")?,
        conference_rank: rank_in(true),
        league_rank: rank_in(false),
        conference,
        home_record: row.string_or("HOME", "N/A"),
        road_record: row.string_or("ROAD", "N/A"),
        last_10: row.string_or("L10", "N/A"),
    })
}

fn map_roster(set: &ResultSet) -> ApiResult<Vec<RosterEntry>> {
    if set.is_empty() {
        return Err(ApiError::NotFound("No roster found for this team".into()));
    }
    let na = || Value::from("N/A");
    set.rows()
        .map(|row| {
            Ok(RosterEntry {
                player_id: row.i64("PLAYER_ID")?,
                player_name: row.string("PLAYER")?,
                jersey_number: row.value_or("NUM", na()),
                position: row.value_or("POSITION", na()),
                height: row.value_or("HEIGHT", na()),
                weight: row.value_or("WEIGHT", na()),
                birth_date: row.value_or("BIRTH_DATE", na()),
                age: row.value_or("AGE", na()),
            })
        })
        .collect()
}

fn map_team_game_log(set: &ResultSet) -> Vec<Record> {
    let mut games: Vec<(String, Record)> = set
        .rows()
        .filter_map(|row| {
            let game_id = row.string_or("GAME_ID", "");
            if is_preseason(&game_id) {
                return None;
            }
            let record = TEAM_GAME_LOG_COLUMNS
                .iter()
                .map(|(column, key)| ((*key).to_owned(), row.value_or(column, Value::Null)))
                .collect();
            Some((game_id, record))
        })
        .collect();
    games.sort_by(|a, b| b.0.cmp(&a.0));
    games.into_iter().map(|(_, record)| record).collect()
}

fn map_player_profile(
    player_id: u64,
    career_stats: Value,
    everyone: &ResultSet,
    current: &ResultSet,
) -> ApiResult<PlayerProfile> {
    let person_id = Some(player_id as i64);
    let row = everyone
        .rows()
        .find(|row| row.i64("PERSON_ID").ok() == person_id)
        .ok_or_else(|| ApiError::NotFound("Player not found".into()))?;

    let full_name = row.string("DISPLAY_FIRST_LAST")?;
    let (first_name, last_name) = match row.string_or("DISPLAY_LAST_COMMA_FIRST", "").split_once(", ") {
        Some((last, first)) => (first.to_owned(), last.to_owned()),
        None => (String::new(), full_name.clone()),
    };
    let player_info = PlayerInfo {
        id: player_id,
        full_name,
        first_name,
        last_name,
        is_active: row.i64_or("ROSTERSTATUS", 0) == 1,
    };

    let team_info = current
        .rows()
        .find(|row| row.i64("PERSON_ID").ok() == person_id)
        .map(|row| PlayerTeam {
            team_id: row.i64("TEAM_ID").ok().filter(|id| *id != 0),
            team_abbreviation: non_empty(&row, "TEAM_ABBREVIATION"),
            team_name: non_empty(&row, "TEAM_NAME"),
            team_city: non_empty(&row, "TEAM_CITY"),
        });

    Ok(PlayerProfile { player_info, team_info, career_stats })
}

fn non_empty(row: &Row<'_>, column: &str) -> Option<String> {
    Some(row.string_or(column, "")).filter(|s| !s.is_empty())
}

fn map_player_season_averages(set: &ResultSet, season: &str) -> ApiResult<PlayerSeasonAverages> {
    if set.is_empty() {
        return Err(ApiError::NotFound("No stats found for this player".into()));
    }
    let Some(row) = set.rows().find(|row| row.string_or("GROUP_VALUE", "") == season) else {
        return Ok(PlayerSeasonAverages::not_played(season));
    };

    Ok(PlayerSeasonAverages {
        points: row.f64_or("PTS", 0.0),
        rebounds: row.f64_or("REB", 0.0),
        assists: row.f64_or("AST", 0.0),
        steals: row.f64_or("STL", 0.0),
        blocks: row.f64_or("BLK", 0.0),
        games_played: row.i64_or("GP", 0),
        field_goal_pct: row.f64_or("FG_PCT", 0.0),
        three_point_pct: row.f64_or("FG3_PCT", 0.0),
        free_throw_pct: row.f64_or("FT_PCT", 0.0),
        season: season.to_owned(),
        has_played: true,
    })
}

fn map_team_averages(league: &ResultSet, team: &ResultSet, team_id: u64) -> ApiResult<TeamAverages> {
    let Some(row) = team.rows().next() else {
        return Err(ApiError::NotFound("No stats found for this team".into()));
    };

    // Highest scoring team first; ties keep table order.
    let mut scoring = league
        .rows()
        .map(|r| Ok((r.i64("TEAM_ID")?, r.f64("PTS")?)))
        .collect::<ApiResult<Vec<_>>>()?;
    scoring.sort_by(|a, b| b.1.total_cmp(&a.1));
    let points_rank = scoring
        .iter()
        .position(|(id, _)| *id == team_id as i64)
        .map(|i| i + 1)
        .ok_or_else(|| ApiError::Schema(format!("team {team_id} missing from league team stats")))?;

    Ok(TeamAverages {
        team_id,
        games_played: row.i64_or("GP", 0),
        wins: row.i64_or("W", 0),
        losses: row.i64_or("L", 0),
        points: row.f64_or("PTS", 0.0),
        points_rank,
        field_goals_made: row.f64_or("FGM", 0.0),
        field_goals_attempted: row.f64_or("FGA", 0.0),
        field_goal_pct: row.f64_or("FG_PCT", 0.0),
        three_point_pct: row.f64_or("FG3_PCT", 0.0),
        free_throw_pct: row.f64_or("FT_PCT", 0.0),
        total_rebounds: row.f64_or("REB", 0.0),
        assists: row.f64_or("AST", 0.0),
        turnovers: row.f64_or("TOV", 0.0),
        steals: row.f64_or("STL", 0.0),
        blocks: row.f64_or("BLK", 0.0),
    })
}

/// League game ids encode the season type right after the leading zeros:
/// 1 = preseason, 2 = regular season, 4 = playoffs, ...
fn is_preseason(game_id: &str) -> bool {
    game_id.trim_start_matches('0').starts_with('1')
}

fn id_column(row: &Row<'_>, column: &str) -> ApiResult<u64> {
    let id = row.i64(column)?;
    u64::try_from(id).map_err(|_| ApiError::Schema(format!("negative id in column {column}: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn table(headers: &[&str], rows: Value) -> ResultSet {
        serde_json::from_value(json!({"name": "t", "headers": headers, "rowSet": rows})).unwrap()
    }

    fn standings_table() -> ResultSet {
        table(
            &["TeamID", "TeamCity", "TeamName", "TeamSlug", "Conference", "Division", "WINS", "LOSSES", "WinPCT", "ConferenceGamesBack", "HOME", "ROAD", "L10", "strCurrentStreak"],
            json!([
                [1610612752, "New York", "Knicks", "knicks", "East", "Atlantic", 5, 5, 0.5, 3.0, "3-2", "2-3", "5-5", "W 1"],
                [1610612738, "Boston", "Celtics", "celtics", "East", "Atlantic", 8, 2, 0.8, "-", "4-1", "4-1", "8-2", "W 4"],
                [1610612760, "Oklahoma City", "Thunder", "thunder", "West", "Northwest", 9, 1, 0.9, "-", "5-0", "4-1", "9-1", "W 6"],
                [1610612747, "Los Angeles", "Lakers", "lakers", "West", "Pacific", 6, 4, 0.6, 3.0, "3-2", "3-2", "6-4", "L 1"],
                [1610612741, "Chicago", "Bulls", "bulls", "East", "Central", 7, 3, 0.7, 1.0, "4-1", "3-2", "7-3", "L 2"]
            ]),
        )
    }

    #[test]
    fn season_starts_in_october() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(current_season(day(2025, 10, 1)), "2025-26");
        assert_eq!(current_season(day(2025, 9, 30)), "2024-25");
        assert_eq!(current_season(day(2026, 2, 24)), "2025-26");
        assert_eq!(current_season(day(1999, 12, 1)), "1999-00");
    }

    #[test]
    fn standings_split_and_rank_by_win_pct() {
        let standings = map_standings(&standings_table(), "2025-26").unwrap();

        let east: Vec<(&str, usize)> = standings
            .eastern_conference
            .iter()
            .map(|e| (e.team_name.as_str(), e.rank))
            .collect();
        assert_eq!(east, [("Celtics", 1), ("Bulls", 2), ("Knicks", 3)]);
        assert_eq!(standings.western_conference[0].team_name, "Thunder");
        assert_eq!(standings.western_conference[0].conference, "West");
        assert_eq!(standings.eastern_conference[0].games_back, json!("-"));
        assert_eq!(standings.eastern_conference[0].streak, "W 4");
        assert_eq!(standings.season, "2025-26");
    }

    #[test]
    fn standings_missing_optional_columns_fall_back() {
        let set = table(
            &["TeamID", "TeamCity", "TeamName", "Conference", "WINS", "LOSSES", "WinPCT"],
            json!([[1, "Here", "Them", "East", 1, 0, 1.0]]),
        );
        let standings = map_standings(&set, "2025-26").unwrap();
        let entry = &standings.eastern_conference[0];
        assert_eq!(entry.team_abbreviation, "N/A");
        assert_eq!(entry.games_back, json!("0"));
        assert_eq!(entry.last_10, "N/A");
    }

    #[test]
    fn team_record_ranks_in_conference_and_league() {
        let record = map_team_record(&standings_table(), 1610612741).unwrap();
        assert_eq!(record.team_name, "Bulls");
        assert_eq!(record.conference, "East");
        assert_eq!(record.conference_rank, 2);
        assert_eq!(record.league_rank, 3);
        assert_eq!(record.last_10, "7-3");
    }

    #[test]
    fn team_record_for_unknown_team_is_not_found() {
        let err = map_team_record(&standings_table(), 99).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Team not found in standings"));
    }

    #[test]
    fn leaders_keep_top_ten_and_fall_back_to_team_column() {
        let rows: Vec<Value> = (1..=12)
            .map(|i| json!([i, 200 + i, format!("Player {i}"), 1610612738, "BOS", 10, 30.5 - i as f64]))
            .collect();
        let set = table(&["RANK", "PLAYER_ID", "PLAYER", "TEAM_ID", "TEAM", "GP", "PTS"], Value::from(rows));

        let leaders = map_leaders(LeaderCategory::Points, &set).unwrap();

        assert_eq!(leaders.len(), 10);
        assert_eq!(leaders[0].team, "BOS");
        assert_eq!(leaders[0].player_name, "Player 1");
        assert_eq!(leaders[0].value, 29.5);
    }

    #[test]
    fn leader_entries_publish_the_category_key() {
        let set = table(
            &["RANK", "PLAYER_ID", "PLAYER", "TEAM_ABBREVIATION", "GP", "FGM"],
            json!([[1, 2544, "LeBron James", "LAL", 20, 10.2]]),
        );
        let leaders = map_leaders(LeaderCategory::FieldGoalsMade, &set).unwrap();
        assert_eq!(
            serde_json::to_value(&leaders[0]).unwrap(),
            json!({
                "rank": 1,
                "player_id": 2544,
                "player_name": "LeBron James",
                "team": "LAL",
                "games_played": 20,
                "field_goals": 10.2
            })
        );
    }

    #[test]
    fn leaders_missing_stat_column_is_an_error() {
        let set = table(&["RANK", "PLAYER_ID", "PLAYER", "GP"], json!([[1, 2, "X", 3]]));
        assert!(map_leaders(LeaderCategory::Steals, &set).is_err());
    }

    #[test]
    fn roster_fills_missing_columns_with_na() {
        let set = table(
            &["PLAYER_ID", "PLAYER", "NUM", "POSITION", "AGE"],
            json!([[1628983, "Shai Gilgeous-Alexander", "2", "G", 27.0]]),
        );
        let roster = map_roster(&set).unwrap();
        assert_eq!(roster[0].jersey_number, json!("2"));
        assert_eq!(roster[0].height, json!("N/A"));
        assert_eq!(roster[0].age, json!(27.0));
    }

    #[test]
    fn empty_roster_is_not_found() {
        let set = table(&["PLAYER_ID", "PLAYER"], json!([]));
        assert!(matches!(map_roster(&set), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn team_game_log_is_newest_first_without_preseason() {
        let set = table(
            &["GAME_ID", "GAME_DATE", "MATCHUP", "WL", "PTS", "SEASON_YEAR"],
            json!([
                ["0022500010", "2025-10-22T00:00:00", "NYK vs. CLE", "W", 119, "2025-26"],
                ["0012500003", "2025-10-05T00:00:00", "NYK @ PHI", "L", 99, "2025-26"],
                ["0022500031", "2025-10-24T00:00:00", "NYK @ BOS", "W", 105, "2025-26"]
            ]),
        );

        let log = map_team_game_log(&set);

        assert_eq!(log.len(), 2);
        assert_eq!(log[0]["Game_ID"], json!("0022500031"));
        assert_eq!(log[1]["Game_ID"], json!("0022500010"));
        assert_eq!(log[0]["PTS"], json!(105));
        // Projected columns missing upstream come through as null; extras are dropped.
        assert_eq!(log[0]["TOV"], Value::Null);
        assert!(!log[0].contains_key("SEASON_YEAR"));
        assert_eq!(log[0].len(), TEAM_GAME_LOG_COLUMNS.len());
    }

    #[test]
    fn preseason_ids() {
        assert!(is_preseason("0012500003"));
        assert!(!is_preseason("0022500003"));
        assert!(!is_preseason("0042400401"));
    }

    #[test]
    fn date_games_use_frontend_tricodes_and_default_scores() {
        let headers = vec![
            GameHeader { game_id: "g1".into(), home_team_id: 1610612762, visitor_team_id: 1610612740 },
            GameHeader { game_id: "g2".into(), home_team_id: 1610612738, visitor_team_id: 1610612752 },
        ];
        let games = build_date_games(headers, vec![None, Some((101, 97))]).unwrap();

        assert_eq!(games[0].home_team.team_tricode, "UTAH");
        assert_eq!(games[0].away_team.team_tricode, "NO");
        assert_eq!((games[0].home_team.score, games[0].away_team.score), (0, 0));
        assert_eq!((games[1].home_team.score, games[1].away_team.score), (101, 97));
        assert_eq!(games[1].away_team.team_tricode, "NYK");
    }

    #[test]
    fn game_headers_parse_string_and_numeric_ids() {
        let set = table(
            &["GAME_ID", "HOME_TEAM_ID", "VISITOR_TEAM_ID"],
            json!([["0022500200", 1610612738, "1610612752"]]),
        );
        let headers = map_game_headers(&set).unwrap();
        assert_eq!(
            headers,
            vec![GameHeader {
                game_id: "0022500200".into(),
                home_team_id: 1610612738,
                visitor_team_id: 1610612752,
            }]
        );
    }

    #[test]
    fn boxscore_maps_vendor_keys_to_frontend_keys() {
        let detail: GameDetail = serde_json::from_value(json!({
            "gameId": "0022500101",
            "gameStatus": 3,
            "gameStatusText": "Final",
            "period": 4,
            "gameClock": "PT00M00.00S",
            "homeTeam": {
                "teamId": 1610612752,
                "teamName": "Knicks",
                "teamCity": "New York",
                "teamTricode": "NYK",
                "score": 112,
                "periods": [{"period": 1, "periodType": "REGULAR", "score": 30}],
                "statistics": {"points": 112, "reboundsTotal": 44, "reboundsOffensive": 10, "foulsPersonal": 18},
                "players": [{
                    "personId": 1628973,
                    "name": "Jalen Brunson",
                    "jerseyNum": "11",
                    "position": "G",
                    "starter": "1",
                    "statistics": {
                        "minutes": "PT36M12.00S",
                        "points": 31,
                        "reboundsTotal": 4,
                        "fieldGoalsMade": 11,
                        "fieldGoalsAttempted": 22,
                        "fieldGoalsPercentage": 0.5,
                        "foulsPersonal": 2,
                        "plusMinusPoints": -3.0
                    }
                }]
            }
        }))
        .unwrap();

        let boxscore = map_boxscore("0022500101", detail);
        let value = serde_json::to_value(&boxscore).unwrap();

        assert_eq!(value["game_status"], json!(3));
        assert_eq!(value["home_team"]["statistics"]["rebounds_total"], json!(44));
        assert_eq!(value["home_team"]["periods"][0]["score"], json!(30));
        assert_eq!(value["home_team"]["statistics"]["fouls"], json!(18));
        let brunson = &value["home_team"]["players"][0];
        assert_eq!(brunson["player_id"], json!(1628973));
        assert_eq!(brunson["starter"], json!(true));
        assert_eq!(brunson["rebounds"], json!(4));
        assert_eq!(brunson["fg_made"], json!(11));
        assert_eq!(brunson["fg_percentage"], json!(0.5));
        assert_eq!(brunson["plus_minus"], json!(-3.0));
        assert_eq!(brunson["three_pt_made"], json!(0));
        // The away side was absent entirely.
        assert_eq!(value["away_team"]["score"], json!(0));
        assert_eq!(value["away_team"]["team_name"], json!(""));
        assert_eq!(value["away_team"]["players"], json!([]));
    }

    // -----------------------------------------------------------------------
    // Against a mock upstream
    // -----------------------------------------------------------------------

    fn api_for(server: &mockito::ServerGuard) -> NbaApi {
        NbaApi::new().with_base_urls(&server.url(), &format!("{}/stats", server.url()))
    }

    const SCOREBOARD: &str = r#"{
        "meta": {"version": 1},
        "scoreboard": {
            "gameDate": "2025-11-15",
            "games": [
                {"gameId": "0022500201", "gameStatus": 3, "gameStatusText": "Final",
                 "homeTeam": {"teamId": 1610612738, "teamTricode": "BOS", "score": 101},
                 "awayTeam": {"teamId": 1610612752, "teamTricode": "NYK", "score": 99}},
                {"gameId": "0022500202", "gameStatus": 2, "gameStatusText": "Q2 4:00",
                 "period": 2, "gameClock": "PT04M00.00S",
                 "homeTeam": {"teamId": 1610612747, "teamTricode": "LAL", "score": 40},
                 "awayTeam": {"teamId": 1610612744, "teamTricode": "GSW", "score": 38}}
            ]
        }
    }"#;

    #[tokio::test]
    async fn live_scoreboard_merges_boxscore_over_http() {
        let mut server = mockito::Server::new_async().await;
        let _summary = server
            .mock("GET", "/scoreboard/todaysScoreboard_00.json")
            .with_header("content-type", "application/json")
            .with_body(SCOREBOARD)
            .create_async()
            .await;
        let detail = server
            .mock("GET", "/boxscore/boxscore_0022500202.json")
            .with_header("content-type", "application/json")
            .with_body(r#"{"game": {"gameId": "0022500202", "period": 3, "homeTeam": {"score": 55}, "awayTeam": {"score": 50}}}"#)
            .expect(1)
            .create_async()
            .await;

        let games = LiveScoreboard::default().aggregate(&api_for(&server)).await.unwrap();

        detail.assert_async().await;
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].score("homeTeam"), Some(101));
        assert_eq!(games[1].score("homeTeam"), Some(55));
        assert_eq!(games[1].score("awayTeam"), Some(50));
        assert_eq!(games[1].get("period"), Some(&json!(3)));
        assert_eq!(games[1].get("gameStatusText"), Some(&json!("Q2 4:00")));
        assert_eq!(games[1].get("homeTeam").unwrap()["teamTricode"], json!("LAL"));
    }

    #[tokio::test]
    async fn boxscore_server_error_keeps_summary_values() {
        let mut server = mockito::Server::new_async().await;
        let _summary = server
            .mock("GET", "/scoreboard/todaysScoreboard_00.json")
            .with_body(SCOREBOARD)
            .create_async()
            .await;
        let _detail = server
            .mock("GET", "/boxscore/boxscore_0022500202.json")
            .with_status(500)
            .create_async()
            .await;

        let games = LiveScoreboard::default().aggregate(&api_for(&server)).await.unwrap();

        assert_eq!(games[1].score("homeTeam"), Some(40));
        assert_eq!(games[1].get("gameClock"), Some(&json!("PT04M00.00S")));
    }

    #[tokio::test]
    async fn scoreboard_failure_surfaces_as_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _summary = server
            .mock("GET", "/scoreboard/todaysScoreboard_00.json")
            .with_status(503)
            .create_async()
            .await;

        let err = LiveScoreboard::default().aggregate(&api_for(&server)).await.unwrap_err();

        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn missing_boxscore_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _detail = server
            .mock("GET", "/boxscore/boxscore_nope.json")
            .with_status(404)
            .create_async()
            .await;

        let err = api_for(&server).fetch_boxscore("nope").await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _summary = server
            .mock("GET", "/scoreboard/todaysScoreboard_00.json")
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = api_for(&server).fetch_scoreboard().await.unwrap_err();

        assert!(matches!(err, ApiError::Parsing(_, _)));
    }

    #[tokio::test]
    async fn leaders_request_the_category_column() {
        let mut server = mockito::Server::new_async().await;
        let leaders = server
            .mock("GET", "/stats/leagueleaders")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("StatCategory".into(), "BLK".into()),
                Matcher::UrlEncoded("Season".into(), "2025-26".into()),
                Matcher::UrlEncoded("SeasonType".into(), "Regular Season".into()),
            ]))
            .with_body(
                r#"{"resultSet": {"name": "LeagueLeaders",
                    "headers": ["RANK", "PLAYER_ID", "PLAYER", "TEAM", "GP", "BLK"],
                    "rowSet": [[1, 1641705, "Victor Wembanyama", "SAS", 12, 3.6]]}}"#,
            )
            .create_async()
            .await;

        let entries = api_for(&server)
            .fetch_leaders(LeaderCategory::Blocks, "2025-26")
            .await
            .unwrap();

        leaders.assert_async().await;
        assert_eq!(entries[0].player_name, "Victor Wembanyama");
        assert_eq!(entries[0].team, "SAS");
        assert_eq!(entries[0].value, 3.6);
    }

    #[tokio::test]
    async fn games_on_date_default_missing_scores_to_zero() {
        let mut server = mockito::Server::new_async().await;
        let _headers = server
            .mock("GET", "/stats/scoreboardv2")
            .match_query(Matcher::UrlEncoded("GameDate".into(), "11/15/2025".into()))
            .with_body(
                r#"{"resultSets": [{"name": "GameHeader",
                    "headers": ["GAME_ID", "HOME_TEAM_ID", "VISITOR_TEAM_ID"],
                    "rowSet": [["0022500201", 1610612738, 1610612752],
                               ["0022500202", 1610612762, 1610612740]]}]}"#,
            )
            .create_async()
            .await;
        let _first = server
            .mock("GET", "/boxscore/boxscore_0022500201.json")
            .with_body(r#"{"game": {"gameId": "0022500201", "homeTeam": {"score": 101}, "awayTeam": {"score": 99}}}"#)
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/boxscore/boxscore_0022500202.json")
            .with_status(403)
            .create_async()
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let games = api_for(&server)
            .fetch_games_on(date, &LiveScoreboard::default())
            .await
            .unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!((games[0].home_team.score, games[0].away_team.score), (101, 99));
        assert_eq!(games[1].home_team.team_tricode, "UTAH");
        assert_eq!((games[1].home_team.score, games[1].away_team.score), (0, 0));
    }

    #[tokio::test]
    async fn no_games_on_date_skips_boxscores() {
        let mut server = mockito::Server::new_async().await;
        let _headers = server
            .mock("GET", "/stats/scoreboardv2")
            .match_query(Matcher::Any)
            .with_body(r#"{"resultSets": [{"name": "GameHeader", "headers": ["GAME_ID"], "rowSet": []}]}"#)
            .create_async()
            .await;
        let boxscores = server
            .mock("GET", Matcher::Regex("^/boxscore/".into()))
            .expect(0)
            .create_async()
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let games = api_for(&server)
            .fetch_games_on(date, &LiveScoreboard::default())
            .await
            .unwrap();

        assert!(games.is_empty());
        boxscores.assert_async().await;
    }

    fn all_players_table() -> ResultSet {
        table(
            &["PERSON_ID", "DISPLAY_LAST_COMMA_FIRST", "DISPLAY_FIRST_LAST", "ROSTERSTATUS", "TEAM_ID", "TEAM_CITY", "TEAM_NAME", "TEAM_ABBREVIATION"],
            json!([
                [2544, "James, LeBron", "LeBron James", 1, 1610612747, "Los Angeles", "Lakers", "LAL"],
                [76375, "Jordan, Michael", "Michael Jordan", 0, 0, "", "", ""],
                [1630173, "Nene", "Nene", 0, 0, "", "", ""]
            ]),
        )
    }

    #[test]
    fn player_profile_joins_bio_team_and_career() {
        let current = table(
            &["PERSON_ID", "TEAM_ID", "TEAM_CITY", "TEAM_NAME", "TEAM_ABBREVIATION"],
            json!([[2544, 1610612747, "Los Angeles", "Lakers", "LAL"]]),
        );
        let career = json!({"resource": "playercareerstats", "resultSets": []});

        let profile = map_player_profile(2544, career.clone(), &all_players_table(), &current).unwrap();

        assert_eq!(profile.player_info.full_name, "LeBron James");
        assert_eq!(profile.player_info.first_name, "LeBron");
        assert_eq!(profile.player_info.last_name, "James");
        assert!(profile.player_info.is_active);
        let team = profile.team_info.unwrap();
        assert_eq!(team.team_id, Some(1610612747));
        assert_eq!(team.team_abbreviation.as_deref(), Some("LAL"));
        assert_eq!(profile.career_stats, career);
    }

    #[test]
    fn retired_player_has_no_team() {
        let current = table(&["PERSON_ID", "TEAM_ID"], json!([[2544, 1610612747]]));

        let profile = map_player_profile(76375, Value::Null, &all_players_table(), &current).unwrap();

        assert!(!profile.player_info.is_active);
        assert_eq!(profile.team_info, None);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["team_info"], Value::Null);
    }

    #[test]
    fn single_name_players_keep_the_whole_name_as_last_name() {
        let empty = table(&["PERSON_ID"], json!([]));
        let profile = map_player_profile(1630173, Value::Null, &all_players_table(), &empty).unwrap();
        assert_eq!(profile.player_info.first_name, "");
        assert_eq!(profile.player_info.last_name, "Nene");
    }

    #[test]
    fn unknown_player_is_not_found() {
        let empty = table(&["PERSON_ID"], json!([]));
        let err = map_player_profile(1, Value::Null, &all_players_table(), &empty).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Player not found"));
    }

    fn by_year_table() -> ResultSet {
        table(
            &["GROUP_VALUE", "GP", "PTS", "REB", "AST", "STL", "BLK", "FG_PCT", "FG3_PCT", "FT_PCT"],
            json!([
                ["2025-26", 12, 24.5, 7.8, 8.9, 1.1, 0.6, 0.512, 0.371, 0.75],
                ["2024-25", 70, 24.4, 7.8, 8.2, 1.0, 0.6, 0.513, 0.376, 0.782]
            ]),
        )
    }

    #[test]
    fn season_averages_pick_the_requested_season() {
        let averages = map_player_season_averages(&by_year_table(), "2024-25").unwrap();
        assert!(averages.has_played);
        assert_eq!(averages.games_played, 70);
        assert_eq!(averages.assists, 8.2);
        assert_eq!(averages.free_throw_pct, 0.782);
        assert_eq!(averages.season, "2024-25");
    }

    #[test]
    fn season_without_games_is_zeroed() {
        let averages = map_player_season_averages(&by_year_table(), "2026-27").unwrap();
        assert_eq!(averages, PlayerSeasonAverages::not_played("2026-27"));
        assert_eq!(
            serde_json::to_value(&averages).unwrap(),
            json!({
                "points": 0.0, "rebounds": 0.0, "assists": 0.0, "steals": 0.0, "blocks": 0.0,
                "games_played": 0, "field_goal_pct": 0.0, "three_point_pct": 0.0,
                "free_throw_pct": 0.0, "season": "2026-27", "has_played": false
            })
        );
    }

    #[test]
    fn player_without_any_seasons_is_not_found() {
        let set = table(&["GROUP_VALUE", "GP"], json!([]));
        let err = map_player_season_averages(&set, "2025-26").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "No stats found for this player"));
    }

    fn league_team_stats() -> ResultSet {
        table(
            &["TEAM_ID", "TEAM_NAME", "PTS"],
            json!([
                [1610612738, "Boston Celtics", 115.2],
                [1610612760, "Oklahoma City Thunder", 121.0],
                [1610612752, "New York Knicks", 117.9]
            ]),
        )
    }

    #[test]
    fn team_averages_rank_points_across_the_league() {
        let team = table(
            &["GROUP_VALUE", "GP", "W", "L", "PTS", "FGM", "FGA", "FG_PCT", "REB", "TOV"],
            json!([["2025-26", 12, 8, 4, 117.9, 43.1, 88.0, 0.49, 44.2, 12.5]]),
        );

        let averages = map_team_averages(&league_team_stats(), &team, 1610612752).unwrap();

        assert_eq!(averages.points_rank, 2);
        assert_eq!((averages.games_played, averages.wins, averages.losses), (12, 8, 4));
        assert_eq!(averages.total_rebounds, 44.2);
        assert_eq!(averages.steals, 0.0);
    }

    #[test]
    fn team_averages_without_rows_is_not_found() {
        let team = table(&["GP"], json!([]));
        let err = map_team_averages(&league_team_stats(), &team, 1610612752).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "No stats found for this team"));
    }

    #[test]
    fn team_missing_from_league_table_is_an_error() {
        let team = table(&["GP", "PTS"], json!([[1, 100.0]]));
        assert!(matches!(
            map_team_averages(&league_team_stats(), &team, 42),
            Err(ApiError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn team_averages_query_both_dashboards() {
        let mut server = mockito::Server::new_async().await;
        let league = server
            .mock("GET", "/stats/leaguedashteamstats")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("PerMode".into(), "PerGame".into()),
                Matcher::UrlEncoded("Season".into(), "2025-26".into()),
            ]))
            .with_body(
                r#"{"resultSets": [{"name": "LeagueDashTeamStats", "headers": ["TEAM_ID", "PTS"],
                    "rowSet": [[1610612738, 115.2], [1610612752, 117.9]]}]}"#,
            )
            .create_async()
            .await;
        let team = server
            .mock("GET", "/stats/teamdashboardbygeneralsplits")
            .match_query(Matcher::UrlEncoded("TeamID".into(), "1610612738".into()))
            .with_body(
                r#"{"resultSets": [{"name": "OverallTeamDashboard", "headers": ["GP", "W", "L", "PTS"],
                    "rowSet": [[12, 9, 3, 115.2]]}]}"#,
            )
            .create_async()
            .await;

        let averages = api_for(&server)
            .fetch_team_averages(1610612738, "2025-26")
            .await
            .unwrap();

        league.assert_async().await;
        team.assert_async().await;
        assert_eq!(averages.team_id, 1610612738);
        assert_eq!(averages.points_rank, 2);
        assert_eq!(averages.wins, 9);
    }

    #[tokio::test]
    async fn season_averages_read_the_by_year_table() {
        let mut server = mockito::Server::new_async().await;
        let _dashboard = server
            .mock("GET", "/stats/playerdashboardbyyearoveryear")
            .match_query(Matcher::UrlEncoded("PlayerID".into(), "1628983".into()))
            .with_body(
                r#"{"resultSets": [
                    {"name": "OverallPlayerDashboard", "headers": ["GROUP_VALUE", "PTS"], "rowSet": [["2025-26", 99.0]]},
                    {"name": "ByYearPlayerDashboard", "headers": ["GROUP_VALUE", "GP", "PTS"], "rowSet": [["2025-26", 11, 32.4]]}
                ]}"#,
            )
            .create_async()
            .await;

        let averages = api_for(&server)
            .fetch_player_season_averages(1628983, "2025-26")
            .await
            .unwrap();

        assert_eq!(averages.points, 32.4);
        assert_eq!(averages.games_played, 11);
    }
}
