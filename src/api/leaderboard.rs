use axum::Json;
use serde::Serialize;

use crate::models::ApiResponse;

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub fid: u64,
    pub username: String,
    pub score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub total_players: usize,
}

/// GET /api/v1/leaderboard
/// Demo leaderboard; entries are fixed until real score tracking lands.
pub async fn get_leaderboard() -> Json<ApiResponse<LeaderboardResponse>> {
    let entries = demo_entries();
    let total_players = entries.len();
    Json(ApiResponse::success(LeaderboardResponse {
        entries,
        total_players,
    }))
}

fn demo_entries() -> Vec<LeaderboardEntry> {
    let players: [(u64, &str, i64); 5] = [
        (12345, "DragonMaster", 12_450),
        (23456, "FireBreather", 9_870),
        (34567, "SkyRider", 8_200),
        (45678, "TailWhip", 6_540),
        (56789, "EggHatcher", 5_010),
    ];

    players
        .iter()
        .enumerate()
        .map(|(i, (fid, username, score))| LeaderboardEntry {
            rank: (i + 1) as u32,
            fid: *fid,
            username: username.to_string(),
            score: *score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_entries_are_ranked_by_descending_score() {
        let entries = demo_entries();
        assert!(!entries.is_empty());
        for pair in entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
        assert_eq!(entries[0].username, "DragonMaster");
    }
}
