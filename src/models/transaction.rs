use serde::{Deserialize, Serialize};

/// The three sponsored-transaction categories the limiter tracks.
///
/// Unknown tags are rejected at the deserialization boundary, so the
/// limiter itself never sees an unclassified transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Game,
    Social,
    Achievement,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Game => "game",
            TransactionType::Social => "social",
            TransactionType::Achievement => "achievement",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded sponsored transaction. Records are append-only; the log
/// is never mutated or compacted while the process lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Normalized to lowercase on write so lookups are case-insensitive.
    pub user_address: String,
    pub transaction_type: TransactionType,
    /// Milliseconds since epoch at record-creation time.
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_cost: Option<f64>,
}

/// Outcome of a per-user quota check. Denial is a normal return value,
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitDecision {
    pub can_proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl LimitDecision {
    pub fn allow(remaining: u32) -> Self {
        Self {
            can_proceed: true,
            reason: None,
            remaining: Some(remaining),
        }
    }

    pub fn deny(reason: String) -> Self {
        Self {
            can_proceed: false,
            reason: Some(reason),
            remaining: Some(0),
        }
    }
}

/// Outcome of the global synthetic-budget check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDecision {
    pub can_proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageEntry {
    pub used: u32,
    pub limit: u32,
    /// Days until the next achievement claim; present only while the
    /// cool-down is active.
    #[serde(rename = "nextAvailable", skip_serializing_if = "Option::is_none")]
    pub next_available: Option<i64>,
}

/// Read-only usage summary for UI display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUsage {
    pub game: UsageEntry,
    pub social: UsageEntry,
    pub achievement: UsageEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredTransactionRequest {
    /// Connected wallet address; the client falls back to an anonymous
    /// identity when no wallet is connected.
    pub address: Option<String>,
    pub transaction_type: TransactionType,
    pub gas_cost: Option<f64>,
}

/// One call in a simulated `wallet_sendCalls` atomic batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchedCall {
    pub to: String,
    pub data: String,
    pub value: Option<String>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success_sets_flag() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, "ok");
    }

    #[test]
    fn transaction_type_uses_lowercase_tags() {
        let parsed: TransactionType = serde_json::from_str("\"game\"").unwrap();
        assert_eq!(parsed, TransactionType::Game);
        assert_eq!(
            serde_json::to_string(&TransactionType::Achievement).unwrap(),
            "\"achievement\""
        );
    }

    #[test]
    fn unknown_transaction_type_is_rejected() {
        let parsed = serde_json::from_str::<TransactionType>("\"airdrop\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn limit_decision_deny_zeroes_remaining() {
        let decision = LimitDecision::deny("Daily game limit reached (1/day)".to_string());
        assert!(!decision.can_proceed);
        assert_eq!(decision.remaining, Some(0));
    }
}
