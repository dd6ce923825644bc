use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::{BatchedCall, TransactionType},
    services::usage_limiter::{GateOutcome, UsageLimiter},
};

/// Result of a simulated gas-free transaction. Denial is carried in the
/// body, not as an HTTP error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredExecution {
    pub executed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<f64>,
}

/// Result of a simulated `wallet_sendCalls` atomic batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExecution {
    pub tx_hash: String,
    pub call_count: usize,
    pub atomic: bool,
}

/// Simulates sponsored ("gas-free") and batched transaction execution.
///
/// No transaction ever reaches a chain: execution fabricates a hash the
/// way the paymaster demo does, and the limiter is the only real gate.
#[derive(Clone)]
pub struct SponsoredTransactionService {
    limiter: UsageLimiter,
}

impl SponsoredTransactionService {
    pub fn new(limiter: UsageLimiter) -> Self {
        Self { limiter }
    }

    /// Runs the composite gate and, on approval, simulates execution and
    /// records the transaction.
    pub async fn execute(
        &self,
        user_address: &str,
        transaction_type: TransactionType,
        gas_cost: Option<f64>,
    ) -> SponsoredExecution {
        match self
            .limiter
            .authorize_and_record(user_address, transaction_type, gas_cost)
            .await
        {
            GateOutcome::Approved {
                remaining,
                budget_warning,
                ..
            } => {
                let tx_hash = mock_transaction_hash();
                tracing::info!(
                    "Sponsored {} transaction for {}: {}",
                    transaction_type,
                    user_address,
                    tx_hash
                );
                SponsoredExecution {
                    executed: true,
                    tx_hash: Some(tx_hash),
                    reason: None,
                    remaining: Some(remaining),
                    budget_warning,
                    estimated_days_remaining: None,
                    current_balance: None,
                }
            }
            GateOutcome::BudgetDenied(decision) => SponsoredExecution {
                executed: false,
                tx_hash: None,
                reason: decision.reason,
                remaining: None,
                budget_warning: None,
                estimated_days_remaining: decision.estimated_days_remaining,
                current_balance: decision.current_balance,
            },
            GateOutcome::QuotaDenied(decision) => SponsoredExecution {
                executed: false,
                tx_hash: None,
                reason: decision.reason,
                remaining: decision.remaining,
                budget_warning: None,
                estimated_days_remaining: None,
                current_balance: None,
            },
        }
    }

    /// Simulates an atomic batch: one confirmation, one hash for all
    /// calls. Batches are demo-only and not quota-gated.
    pub async fn execute_batch(&self, calls: &[BatchedCall]) -> Result<BatchExecution> {
        if calls.is_empty() {
            return Err(AppError::BadRequest("No calls to batch".to_string()));
        }
        if calls.iter().any(|call| call.to.trim().is_empty()) {
            return Err(AppError::BadRequest(
                "Batched call is missing a target address".to_string(),
            ));
        }

        let tx_hash = mock_transaction_hash();
        tracing::info!("Simulated atomic batch of {} calls: {}", calls.len(), tx_hash);

        Ok(BatchExecution {
            tx_hash,
            call_count: calls.len(),
            atomic: true,
        })
    }
}

fn mock_transaction_hash() -> String {
    format!("0x{}", hex::encode(rand::random::<[u8; 32]>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::usage_limiter::{BudgetConfig, QuotaConfig};

    fn service() -> SponsoredTransactionService {
        SponsoredTransactionService::new(UsageLimiter::new(
            QuotaConfig::default(),
            BudgetConfig::default(),
        ))
    }

    #[test]
    fn mock_hash_is_32_bytes_hex() {
        let hash = mock_transaction_hash();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
    }

    #[tokio::test]
    async fn execute_records_then_denies_second_attempt() {
        let service = service();

        let first = service
            .execute("0xABC", TransactionType::Game, Some(0.25))
            .await;
        assert!(first.executed);
        assert!(first.tx_hash.is_some());
        assert_eq!(first.remaining, Some(0));

        let second = service.execute("0xabc", TransactionType::Game, None).await;
        assert!(!second.executed);
        assert!(second.tx_hash.is_none());
        assert_eq!(
            second.reason.as_deref(),
            Some("Daily game limit reached (1/day)")
        );
    }

    #[tokio::test]
    async fn batch_requires_at_least_one_call() {
        let service = service();
        assert!(service.execute_batch(&[]).await.is_err());

        let calls = vec![BatchedCall {
            to: "0x1111111111111111111111111111111111111111".to_string(),
            data: "0x".to_string(),
            value: None,
        }];
        let batch = service.execute_batch(&calls).await.unwrap();
        assert_eq!(batch.call_count, 1);
        assert!(batch.atomic);
    }
}
