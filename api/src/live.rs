//! Live data wire types: serde shapes for the cdn.nba.com liveData feeds.
//! The scoreboard game is passed through to the frontend as-is, so every
//! field we don't interpret is kept in `extra` and written back out.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Scoreboard  (todaysScoreboard_00.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub scoreboard: Option<Scoreboard>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub game_date: Option<String>,
    #[serde(default)]
    pub games: Vec<GameSummary>,
}

/// Coarse game state as published by the live feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum GameStatus {
    #[default]
    NotStarted,
    Live,
    Final,
    /// Codes we don't know about are carried through untouched.
    Other(u8),
}

impl From<u8> for GameStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => GameStatus::NotStarted,
            2 => GameStatus::Live,
            3 => GameStatus::Final,
            other => GameStatus::Other(other),
        }
    }
}

impl From<GameStatus> for u8 {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::NotStarted => 1,
            GameStatus::Live => 2,
            GameStatus::Final => 3,
            GameStatus::Other(code) => code,
        }
    }
}

/// One scoreboard game, kept exactly as the feed sent it. Key order, nulls
/// and fields we never look at all survive a round trip; only the keys
/// `merge_detail` writes can change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameSummary(Map<String, Value>);

impl GameSummary {
    pub fn game_id(&self) -> &str {
        self.0.get("gameId").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn status(&self) -> GameStatus {
        self.0
            .get("gameStatus")
            .and_then(Value::as_u64)
            .and_then(|code| u8::try_from(code).ok())
            .map(GameStatus::from)
            .unwrap_or_default()
    }

    pub fn is_live(&self) -> bool {
        self.status() == GameStatus::Live
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Score of `side` ("homeTeam" / "awayTeam"), when the feed has one.
    pub fn score(&self, side: &str) -> Option<u64> {
        self.0.get(side)?.get("score")?.as_u64()
    }

    /// Overlay a fresher boxscore snapshot onto this record. Only fields the
    /// detail actually carries are replaced, in place.
    pub fn merge_detail(&mut self, detail: GameDetail) {
        if let Some(period) = detail.period {
            self.0.insert("period".into(), period.into());
        }
        if let Some(clock) = detail.game_clock {
            self.0.insert("gameClock".into(), clock.into());
        }
        if let Some(home) = detail.home_team {
            self.merge_side("homeTeam", home);
        }
        if let Some(away) = detail.away_team {
            self.merge_side("awayTeam", away);
        }
    }

    fn merge_side(&mut self, key: &str, side: BoxscoreTeam) {
        if side.score.is_none() && side.periods.is_none() {
            return;
        }
        let Some(team) = self
            .0
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
        else {
            return;
        };
        if let Some(score) = side.score {
            team.insert("score".into(), score.into());
        }
        if let Some(periods) = side.periods {
            team.insert("periods".into(), periods);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodScore {
    pub period: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Boxscore  (boxscore_{gameId}.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreResponse {
    pub game: Option<GameDetail>,
}

/// Boxscore snapshot for exactly one game. Everything is optional: the feed
/// drops sections it has no data for yet.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    pub game_status: Option<GameStatus>,
    pub game_status_text: Option<String>,
    pub period: Option<u32>,
    pub game_clock: Option<String>,
    pub home_team: Option<BoxscoreTeam>,
    pub away_team: Option<BoxscoreTeam>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxscoreTeam {
    pub team_id: Option<u64>,
    pub team_name: Option<String>,
    pub team_city: Option<String>,
    pub team_tricode: Option<String>,
    pub score: Option<u32>,
    /// Passed to the scoreboard untouched; decoded for the game page.
    pub periods: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<BoxscorePlayer>,
    pub statistics: Option<TeamBoxStats>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxscorePlayer {
    pub person_id: Option<u64>,
    pub name: Option<String>,
    pub jersey_num: Option<String>,
    pub position: Option<String>,
    pub starter: Option<String>, // "1" | "0"
    pub statistics: Option<PlayerBoxStats>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerBoxStats {
    #[serde(deserialize_with = "minutes_or_zero")]
    pub minutes: String, // ISO-8601 duration, e.g. "PT25M01.00S"
    #[serde(deserialize_with = "null_as_default")]
    pub points: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub rebounds_total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub assists: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub steals: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub turnovers: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub fouls_personal: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub plus_minus_points: f64,
}

impl Default for PlayerBoxStats {
    fn default() -> Self {
        Self {
            minutes: "0".into(),
            points: 0,
            rebounds_total: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
            fouls_personal: 0,
            field_goals_made: 0,
            field_goals_attempted: 0,
            field_goals_percentage: 0.0,
            three_pointers_made: 0,
            three_pointers_attempted: 0,
            three_pointers_percentage: 0.0,
            free_throws_made: 0,
            free_throws_attempted: 0,
            free_throws_percentage: 0.0,
            plus_minus_points: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamBoxStats {
    #[serde(deserialize_with = "null_as_default")]
    pub points: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub field_goals_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub three_pointers_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_made: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_attempted: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub free_throws_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub rebounds_total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub rebounds_offensive: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub rebounds_defensive: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub assists: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub steals: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub turnovers: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub fouls_personal: u32,
}

/// The boxscore feed sends `null` for counters it hasn't filled in yet.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn minutes_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| "0".into()))
}
