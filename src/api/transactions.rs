use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    constants::ANONYMOUS_USER,
    error::{AppError, Result},
    models::{ApiResponse, BatchedCall, BudgetDecision, DailyUsage, SponsoredTransactionRequest},
    services::sponsored_transactions::{BatchExecution, SponsoredExecution},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub address: Option<String>,
    pub calls: Vec<BatchedCall>,
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub address: Option<String>,
}

/// Normalizes the caller-supplied address, falling back to the anonymous
/// identity the client uses when no wallet is connected.
fn resolve_address(address: Option<String>) -> Result<String> {
    match address {
        Some(addr) => {
            let trimmed = addr.trim();
            if trimmed.is_empty() {
                return Err(AppError::BadRequest("address must not be empty".to_string()));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(ANONYMOUS_USER.to_string()),
    }
}

/// POST /api/v1/transactions/sponsored
/// Gates and simulates one gas-free transaction. Quota or budget denial
/// is a 200 with `executed: false`, never an error status.
pub async fn execute_sponsored(
    State(state): State<AppState>,
    Json(req): Json<SponsoredTransactionRequest>,
) -> Result<Json<ApiResponse<SponsoredExecution>>> {
    let address = resolve_address(req.address)?;
    if let Some(cost) = req.gas_cost {
        if !cost.is_finite() || cost < 0.0 {
            return Err(AppError::BadRequest("gasCost must be non-negative".to_string()));
        }
    }

    let outcome = state
        .sponsor
        .execute(&address, req.transaction_type, req.gas_cost)
        .await;

    Ok(Json(ApiResponse::success(outcome)))
}

/// POST /api/v1/transactions/batch
pub async fn execute_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchExecution>>> {
    let address = resolve_address(req.address)?;
    let batch = state.sponsor.execute_batch(&req.calls).await?;
    tracing::debug!("Batch simulated for {}", address);
    Ok(Json(ApiResponse::success(batch)))
}

/// GET /api/v1/transactions/usage?address=
pub async fn get_usage(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<ApiResponse<DailyUsage>>> {
    let address = resolve_address(query.address)?;
    let usage = state.limiter.get_daily_usage(&address).await;
    Ok(Json(ApiResponse::success(usage)))
}

/// GET /api/v1/transactions/budget
pub async fn get_budget(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BudgetDecision>>> {
    // Fail-open: if the balance lookup ever becomes a real paymaster
    // call and that call fails, the demo gate stays available.
    let decision = match state.limiter.check_budget_limit().await {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!("Budget check unavailable, failing open: {}", e);
            BudgetDecision {
                can_proceed: true,
                reason: None,
                estimated_days_remaining: None,
                current_balance: None,
            }
        }
    };
    Ok(Json(ApiResponse::success(decision)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::models::TransactionType;

    #[test]
    fn missing_address_falls_back_to_anonymous() {
        assert_eq!(resolve_address(None).unwrap(), ANONYMOUS_USER);
    }

    #[test]
    fn blank_address_is_rejected() {
        assert!(resolve_address(Some("   ".to_string())).is_err());
    }

    #[tokio::test]
    async fn sponsored_denial_is_a_normal_response() {
        let state = AppState::new(test_config());

        let first = execute_sponsored(
            State(state.clone()),
            Json(SponsoredTransactionRequest {
                address: Some("0xABC".to_string()),
                transaction_type: TransactionType::Game,
                gas_cost: Some(0.25),
            }),
        )
        .await
        .unwrap();
        assert!(first.0.data.executed);

        let second = execute_sponsored(
            State(state),
            Json(SponsoredTransactionRequest {
                address: Some("0xabc".to_string()),
                transaction_type: TransactionType::Game,
                gas_cost: None,
            }),
        )
        .await
        .unwrap();
        assert!(!second.0.data.executed);
        assert_eq!(
            second.0.data.reason.as_deref(),
            Some("Daily game limit reached (1/day)")
        );
    }

    #[tokio::test]
    async fn negative_gas_cost_is_rejected() {
        let state = AppState::new(test_config());
        let result = execute_sponsored(
            State(state),
            Json(SponsoredTransactionRequest {
                address: Some("0xabc".to_string()),
                transaction_type: TransactionType::Game,
                gas_cost: Some(-1.0),
            }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn usage_reflects_executed_transactions() {
        let state = AppState::new(test_config());
        state
            .sponsor
            .execute("0xabc", TransactionType::Game, None)
            .await;

        let usage = get_usage(
            State(state),
            Query(UsageQuery {
                address: Some("0xABC".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(usage.0.data.game.used, 1);
        assert_eq!(usage.0.data.game.limit, 1);
        assert_eq!(usage.0.data.social.used, 0);
    }

    #[tokio::test]
    async fn budget_starts_fully_funded() {
        let state = AppState::new(test_config());
        let budget = get_budget(State(state)).await.unwrap();
        assert!(budget.0.data.can_proceed);
        assert_eq!(budget.0.data.current_balance, Some(500.0));
    }
}
