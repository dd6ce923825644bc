use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_CHALLENGE_TIME_LIMIT_MS,
    error::{AppError, Result},
    models::{ApiResponse, Challenge, ChallengeParticipant, ChallengeStatus, CreateChallengeRequest},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
    pub id: Option<String>,
    pub fid: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeResponse {
    pub challenge_id: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChallengeLookup {
    Single { challenge: Challenge },
    Many { challenges: Vec<Challenge> },
}

/// POST /api/v1/challenge
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateChallengeRequest>,
) -> Result<Json<ApiResponse<CreateChallengeResponse>>> {
    let now = Utc::now().timestamp_millis();
    let time_limit = req.time_limit.unwrap_or(DEFAULT_CHALLENGE_TIME_LIMIT_MS);
    if time_limit <= 0 {
        return Err(AppError::BadRequest(
            "timeLimit must be positive".to_string(),
        ));
    }

    let challenge = Challenge {
        id: now.to_string(),
        from: req.from,
        to: req.to,
        challenge_type: req.challenge_type,
        target: req.target,
        time_limit,
        status: ChallengeStatus::Pending,
        created_at: now,
        expires_at: now + time_limit,
    };

    tracing::info!(
        "Challenge created: {} ({} -> {})",
        challenge.id,
        challenge.from.fid,
        challenge.to.fid
    );
    let challenge_id = challenge.id.clone();
    state.store.insert_challenge(challenge).await;

    Ok(Json(ApiResponse::success(CreateChallengeResponse {
        challenge_id,
    })))
}

/// GET /api/v1/challenge?id= or ?fid=
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<ApiResponse<ChallengeLookup>>> {
    if let Some(id) = query.id {
        let challenge = match state.store.get_challenge(&id).await {
            Some(found) => found,
            // Unknown ids fall back to the demo stub so the client flow
            // stays usable after a restart wipes the in-memory store.
            None => demo_challenge(id, query.fid.unwrap_or(0)),
        };
        return Ok(Json(ApiResponse::success(ChallengeLookup::Single {
            challenge,
        })));
    }

    if let Some(fid) = query.fid {
        let mut challenges = state.store.pending_challenges_for(fid).await;
        if challenges.is_empty() {
            challenges.push(demo_challenge("1".to_string(), fid));
        }
        return Ok(Json(ApiResponse::success(ChallengeLookup::Many {
            challenges,
        })));
    }

    Err(AppError::BadRequest("Missing parameters".to_string()))
}

fn demo_challenge(id: String, fid: u64) -> Challenge {
    let now = Utc::now().timestamp_millis();
    Challenge {
        id,
        from: ChallengeParticipant {
            fid: 12345,
            username: "DragonMaster".to_string(),
        },
        to: ChallengeParticipant {
            fid,
            username: "You".to_string(),
        },
        challenge_type: "score".to_string(),
        target: 1000,
        time_limit: DEFAULT_CHALLENGE_TIME_LIMIT_MS,
        status: ChallengeStatus::Pending,
        created_at: now - 10_000,
        expires_at: now + 20_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn create_request(to_fid: u64) -> CreateChallengeRequest {
        CreateChallengeRequest {
            from: ChallengeParticipant {
                fid: 12345,
                username: "DragonMaster".to_string(),
            },
            to: ChallengeParticipant {
                fid: to_fid,
                username: "You".to_string(),
            },
            challenge_type: "score".to_string(),
            target: 1000,
            time_limit: None,
        }
    }

    #[tokio::test]
    async fn created_challenge_is_retrievable_by_id() {
        let state = AppState::new(test_config());
        let created = create(State(state.clone()), Json(create_request(678)))
            .await
            .unwrap();
        let id = created.0.data.challenge_id.clone();

        let stored = state.store.get_challenge(&id).await.unwrap();
        assert_eq!(stored.to.fid, 678);
        assert_eq!(stored.time_limit, DEFAULT_CHALLENGE_TIME_LIMIT_MS);
        assert_eq!(stored.expires_at - stored.created_at, stored.time_limit);
    }

    #[tokio::test]
    async fn zero_time_limit_is_rejected() {
        let state = AppState::new(test_config());
        let mut req = create_request(678);
        req.time_limit = Some(0);
        assert!(create(State(state), Json(req)).await.is_err());
    }

    #[tokio::test]
    async fn lookup_without_parameters_is_a_bad_request() {
        let state = AppState::new(test_config());
        let result = get(
            State(state),
            Query(ChallengeQuery {
                id: None,
                fid: None,
            }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fid_lookup_falls_back_to_demo_challenge() {
        let state = AppState::new(test_config());
        let response = get(
            State(state),
            Query(ChallengeQuery {
                id: None,
                fid: Some(678),
            }),
        )
        .await
        .unwrap();

        match response.0.data {
            ChallengeLookup::Many { challenges } => {
                assert_eq!(challenges.len(), 1);
                assert_eq!(challenges[0].from.username, "DragonMaster");
                assert_eq!(challenges[0].to.fid, 678);
            }
            other => panic!("expected challenge list, got {:?}", other),
        }
    }
}
