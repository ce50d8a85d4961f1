//! Static franchise table. The upstream services only hand out team ids, so
//! names and abbreviations come from this snapshot.
use crate::TeamInfo;
use crate::client::{ApiError, ApiResult};

const TEAMS_JSON: &str = include_str!("../data/teams.json");

pub fn all_teams() -> ApiResult<Vec<TeamInfo>> {
    serde_json::from_str(TEAMS_JSON)
        .map_err(|e| ApiError::Other(format!("invalid embedded team table: {e}")))
}

/// Tricode the frontend expects for a team. Its logo set names two
/// franchises differently from the league abbreviation.
pub fn frontend_tricode(abbreviation: &str) -> String {
    match abbreviation {
        "UTA" => "UTAH".into(),
        "NOP" => "NO".into(),
        other => other.to_owned(),
    }
}
