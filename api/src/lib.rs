pub mod client;
pub mod live;
pub mod scoreboard;
pub mod stats;
pub mod teams;

pub use client::{ApiError, ApiResult, NbaApi};
pub use live::{GameDetail, GameStatus, GameSummary};
pub use scoreboard::{LiveFeed, LiveScoreboard};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Response types: the JSON shapes the frontend consumes. Key names are a
// contract, so update the frontend along with any rename.
// ---------------------------------------------------------------------------

/// Static franchise record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: u64,
    pub full_name: String,
    pub abbreviation: String,
    pub nickname: String,
    pub city: String,
    pub state: String,
    pub year_founded: u16,
}

// ---------------------------------------------------------------------------
// Boxscore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GameBoxscore {
    pub game_id: String,
    pub game_status: Option<GameStatus>,
    pub game_status_text: String,
    pub period: u32,
    pub game_clock: String,
    pub home_team: BoxscoreSide,
    pub away_team: BoxscoreSide,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BoxscoreSide {
    pub team_id: Option<u64>,
    pub team_name: String,
    pub team_city: String,
    pub team_tricode: String,
    pub score: u32,
    pub periods: Vec<live::PeriodScore>,
    pub statistics: TeamStatLine,
    pub players: Vec<PlayerStatLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStatLine {
    pub points: u32,
    pub fg_made: u32,
    pub fg_attempted: u32,
    pub fg_percentage: f64,
    pub three_pt_made: u32,
    pub three_pt_attempted: u32,
    pub three_pt_percentage: f64,
    pub ft_made: u32,
    pub ft_attempted: u32,
    pub ft_percentage: f64,
    pub rebounds_total: u32,
    pub rebounds_offensive: u32,
    pub rebounds_defensive: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStatLine {
    pub player_id: Option<u64>,
    pub name: String,
    pub jersey_num: String,
    pub position: String,
    pub starter: bool,
    pub minutes: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
    pub fg_made: u32,
    pub fg_attempted: u32,
    pub fg_percentage: f64,
    pub three_pt_made: u32,
    pub three_pt_attempted: u32,
    pub three_pt_percentage: f64,
    pub ft_made: u32,
    pub ft_attempted: u32,
    pub ft_percentage: f64,
    pub plus_minus: f64,
}

// ---------------------------------------------------------------------------
// Games on a given date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGame {
    pub game_id: String,
    pub home_team: DateGameSide,
    pub away_team: DateGameSide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGameSide {
    pub team_id: u64,
    pub team_tricode: String,
    pub score: u32,
}

// ---------------------------------------------------------------------------
// League leaders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderCategory {
    Points,
    Rebounds,
    Assists,
    Blocks,
    Steals,
    FieldGoalsMade,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 6] = [
        LeaderCategory::Points,
        LeaderCategory::Rebounds,
        LeaderCategory::Assists,
        LeaderCategory::Blocks,
        LeaderCategory::Steals,
        LeaderCategory::FieldGoalsMade,
    ];

    /// Route segment, e.g. `/api/leaders/fgm/`.
    pub fn slug(&self) -> &'static str {
        match self {
            LeaderCategory::Points => "points",
            LeaderCategory::Rebounds => "rebounds",
            LeaderCategory::Assists => "assists",
            LeaderCategory::Blocks => "blocks",
            LeaderCategory::Steals => "steals",
            LeaderCategory::FieldGoalsMade => "fgm",
        }
    }

    /// Column name in the stats tables.
    pub fn stat_column(&self) -> &'static str {
        match self {
            LeaderCategory::Points => "PTS",
            LeaderCategory::Rebounds => "REB",
            LeaderCategory::Assists => "AST",
            LeaderCategory::Blocks => "BLK",
            LeaderCategory::Steals => "STL",
            LeaderCategory::FieldGoalsMade => "FGM",
        }
    }

    /// Key the per-game average is published under.
    pub fn output_key(&self) -> &'static str {
        match self {
            LeaderCategory::FieldGoalsMade => "field_goals",
            other => other.slug(),
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderEntry {
    pub category: LeaderCategory,
    pub rank: i64,
    pub player_id: i64,
    pub player_name: String,
    pub team: String,
    pub games_played: i64,
    pub value: f64,
}

impl Serialize for LeaderEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("rank", &self.rank)?;
        map.serialize_entry("player_id", &self.player_id)?;
        map.serialize_entry("player_name", &self.player_name)?;
        map.serialize_entry("team", &self.team)?;
        map.serialize_entry("games_played", &self.games_played)?;
        map.serialize_entry(self.category.output_key(), &self.value)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Standings and team records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    pub eastern_conference: Vec<StandingsEntry>,
    pub western_conference: Vec<StandingsEntry>,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub rank: usize,
    pub team_id: i64,
    pub team_name: String,
    pub team_city: String,
    pub team_abbreviation: String,
    pub wins: i64,
    pub losses: i64,
    pub win_pct: f64,
    pub games_back: Value,
    pub conference: String,
    pub division: String,
    pub home_record: String,
    pub road_record: String,
    pub last_10: String,
    pub streak: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team_id: i64,
    pub team_name: String,
    pub team_city: String,
    pub wins: i64,
    pub losses: i64,
    pub win_percentage: f64,
    pub conference: String,
    pub conference_rank: usize,
    pub league_rank: usize,
    pub home_record: String,
    pub road_record: String,
    pub last_10: String,
}

// ---------------------------------------------------------------------------
// Rosters and game logs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub player_id: i64,
    pub player_name: String,
    pub jersey_number: Value,
    pub position: Value,
    pub height: Value,
    pub weight: Value,
    pub birth_date: Value,
    pub age: Value,
}

/// A stats row projected onto a fixed set of columns.
pub type Record = Map<String, Value>;

// ---------------------------------------------------------------------------
// Player pages and team averages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player_info: PlayerInfo,
    pub team_info: Option<PlayerTeam>,
    /// `playercareerstats` response, untouched.
    pub career_stats: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub id: u64,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

/// Where a player is rostered this season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTeam {
    pub team_id: Option<i64>,
    pub team_abbreviation: Option<String>,
    pub team_name: Option<String>,
    pub team_city: Option<String>,
}

/// Per-game averages for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonAverages {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub games_played: i64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
    pub season: String,
    pub has_played: bool,
}

impl PlayerSeasonAverages {
    /// All zeros, for a player with no games in `season` yet.
    pub fn not_played(season: &str) -> Self {
        Self {
            points: 0.0,
            rebounds: 0.0,
            assists: 0.0,
            steals: 0.0,
            blocks: 0.0,
            games_played: 0,
            field_goal_pct: 0.0,
            three_point_pct: 0.0,
            free_throw_pct: 0.0,
            season: season.to_owned(),
            has_played: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverages {
    pub team_id: u64,
    pub games_played: i64,
    pub wins: i64,
    pub losses: i64,
    pub points: f64,
    pub points_rank: usize,
    pub field_goals_made: f64,
    pub field_goals_attempted: f64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
    pub total_rebounds: f64,
    pub assists: f64,
    pub turnovers: f64,
    pub steals: f64,
    pub blocks: f64,
}
