use std::sync::Arc;

use chrono::{Local, LocalResult, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    constants::{
        ACHIEVEMENT_CLAIMS, ACHIEVEMENT_INTERVAL_DAYS, AVG_TRANSACTION_COST, DAILY_BUDGET,
        DAILY_GAME_TRANSACTIONS, DAILY_SOCIAL_FEATURES, EMERGENCY_BALANCE_THRESHOLD, MS_PER_DAY,
        PAYMASTER_STARTING_BALANCE, WARNING_BALANCE_THRESHOLD,
    },
    error::Result,
    models::{
        BudgetDecision, DailyUsage, LimitDecision, TransactionRecord, TransactionType, UsageEntry,
    },
};

/// Per-user quota configuration.
#[derive(Debug, Clone, Copy)]
pub struct QuotaConfig {
    pub game_per_day: u32,
    pub social_per_day: u32,
    pub achievement_claims: u32,
    /// Rolling window between achievement claims, in days.
    pub achievement_interval_days: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            game_per_day: DAILY_GAME_TRANSACTIONS,
            social_per_day: DAILY_SOCIAL_FEATURES,
            achievement_claims: ACHIEVEMENT_CLAIMS,
            achievement_interval_days: ACHIEVEMENT_INTERVAL_DAYS,
        }
    }
}

/// Synthetic paymaster budget configuration.
#[derive(Debug, Clone, Copy)]
pub struct BudgetConfig {
    pub starting_balance: f64,
    pub avg_transaction_cost: f64,
    pub emergency_threshold: f64,
    pub warning_threshold: f64,
    pub daily_budget: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            starting_balance: PAYMASTER_STARTING_BALANCE,
            avg_transaction_cost: AVG_TRANSACTION_COST,
            emergency_threshold: EMERGENCY_BALANCE_THRESHOLD,
            warning_threshold: WARNING_BALANCE_THRESHOLD,
            daily_budget: DAILY_BUDGET,
        }
    }
}

/// Outcome of the composite sponsorship gate.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    Approved {
        record: TransactionRecord,
        /// Allowance left after this transaction was recorded.
        remaining: u32,
        /// Present when the budget check passed with a warning attached.
        budget_warning: Option<String>,
    },
    BudgetDenied(BudgetDecision),
    QuotaDenied(LimitDecision),
}

/// Gates simulated sponsored transactions behind per-user quotas and a
/// global synthetic budget.
///
/// The transaction log is owned by the limiter and injected into the app
/// state, never a module-level global, so tests get isolated instances
/// and a persistent store can replace it later. The log is append-only:
/// insertion order is chronological order.
#[derive(Clone)]
pub struct UsageLimiter {
    log: Arc<RwLock<Vec<TransactionRecord>>>,
    quotas: QuotaConfig,
    budget: BudgetConfig,
}

impl UsageLimiter {
    pub fn new(quotas: QuotaConfig, budget: BudgetConfig) -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            quotas,
            budget,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut quotas = QuotaConfig::default();
        if let Some(days) = config.achievement_interval_days {
            quotas.achievement_interval_days = days;
        }
        let mut budget = BudgetConfig::default();
        if let Some(balance) = config.paymaster_starting_balance {
            budget.starting_balance = balance;
        }
        Self::new(quotas, budget)
    }

    /// Appends one transaction record with the current wall-clock time.
    pub async fn record_transaction(
        &self,
        user_address: &str,
        transaction_type: TransactionType,
        gas_cost: Option<f64>,
    ) {
        let record = TransactionRecord {
            user_address: user_address.to_lowercase(),
            transaction_type,
            timestamp_ms: Utc::now().timestamp_millis(),
            gas_cost,
        };
        let mut log = self.log.write().await;
        log.push(record);
    }

    /// Per-user quota check. Denial is a normal return value.
    pub async fn check_user_limit(
        &self,
        user_address: &str,
        transaction_type: TransactionType,
    ) -> LimitDecision {
        let log = self.log.read().await;
        evaluate_user_limit(
            &log,
            &user_address.to_lowercase(),
            transaction_type,
            &self.quotas,
            Utc::now().timestamp_millis(),
        )
    }

    /// Read-only usage summary for UI display.
    pub async fn get_daily_usage(&self, user_address: &str) -> DailyUsage {
        let log = self.log.read().await;
        daily_usage(
            &log,
            &user_address.to_lowercase(),
            &self.quotas,
            Utc::now().timestamp_millis(),
        )
    }

    /// Global synthetic-budget check, recomputed from the full log on
    /// every call. The `Err` arm is reserved for a future real paymaster
    /// balance lookup; callers treat it as fail-open.
    pub async fn check_budget_limit(&self) -> Result<BudgetDecision> {
        let log = self.log.read().await;
        Ok(evaluate_budget(log.len(), &self.budget))
    }

    /// Composite gate: budget first, then per-user quota, then append,
    /// all under one write-lock acquisition so the check-then-append
    /// sequence cannot interleave with another caller's.
    pub async fn authorize_and_record(
        &self,
        user_address: &str,
        transaction_type: TransactionType,
        gas_cost: Option<f64>,
    ) -> GateOutcome {
        let address = user_address.to_lowercase();
        let now_ms = Utc::now().timestamp_millis();
        let mut log = self.log.write().await;

        // Budget is checked before the per-user quota so an exhausted
        // budget is reported uniformly regardless of which user asks.
        let budget = evaluate_budget(log.len(), &self.budget);
        if !budget.can_proceed {
            return GateOutcome::BudgetDenied(budget);
        }

        let decision = evaluate_user_limit(&log, &address, transaction_type, &self.quotas, now_ms);
        if !decision.can_proceed {
            return GateOutcome::QuotaDenied(decision);
        }

        let record = TransactionRecord {
            user_address: address,
            transaction_type,
            timestamp_ms: now_ms,
            gas_cost,
        };
        log.push(record.clone());

        GateOutcome::Approved {
            record,
            remaining: decision.remaining.unwrap_or(0).saturating_sub(1),
            budget_warning: budget.reason,
        }
    }

    pub async fn transaction_count(&self) -> usize {
        self.log.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn push_record(&self, record: TransactionRecord) {
        self.log.write().await.push(record);
    }
}

/// Start of the current local calendar day in epoch milliseconds.
///
/// Day boundaries follow the environment's local time zone, matching the
/// client's view of "today". A DST transition around midnight can shift
/// the boundary; the ambiguous-time arms below pick the earliest mapping.
pub(crate) fn local_day_start_ms(now_ms: i64) -> i64 {
    let now = match Local.timestamp_millis_opt(now_ms) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => return now_ms,
    };
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        LocalResult::None => now_ms,
    }
}

fn count_today(
    records: &[TransactionRecord],
    address: &str,
    transaction_type: TransactionType,
    day_start_ms: i64,
) -> u32 {
    records
        .iter()
        .filter(|r| {
            r.user_address == address
                && r.transaction_type == transaction_type
                && r.timestamp_ms >= day_start_ms
        })
        .count() as u32
}

/// Most recent achievement claim for the user. Last match wins: the log
/// is append-only with non-decreasing timestamps.
fn last_achievement(records: &[TransactionRecord], address: &str) -> Option<i64> {
    records
        .iter()
        .rev()
        .find(|r| r.user_address == address && r.transaction_type == TransactionType::Achievement)
        .map(|r| r.timestamp_ms)
}

fn evaluate_user_limit(
    records: &[TransactionRecord],
    address: &str,
    transaction_type: TransactionType,
    quotas: &QuotaConfig,
    now_ms: i64,
) -> LimitDecision {
    match transaction_type {
        TransactionType::Game | TransactionType::Social => {
            let limit = match transaction_type {
                TransactionType::Game => quotas.game_per_day,
                _ => quotas.social_per_day,
            };
            let used = count_today(
                records,
                address,
                transaction_type,
                local_day_start_ms(now_ms),
            );
            if used >= limit {
                LimitDecision::deny(format!(
                    "Daily {} limit reached ({}/day)",
                    transaction_type, limit
                ))
            } else {
                LimitDecision::allow(limit - used)
            }
        }
        TransactionType::Achievement => match last_achievement(records, address) {
            Some(last_ms) => {
                let days_since_claim = (now_ms - last_ms) as f64 / MS_PER_DAY as f64;
                if days_since_claim < quotas.achievement_interval_days {
                    let days_remaining =
                        (quotas.achievement_interval_days - days_since_claim).ceil() as i64;
                    LimitDecision::deny(format!(
                        "Achievement claims limited to every {} days. Try again in {} day(s)",
                        quotas.achievement_interval_days, days_remaining
                    ))
                } else {
                    LimitDecision::allow(quotas.achievement_claims)
                }
            }
            None => LimitDecision::allow(quotas.achievement_claims),
        },
    }
}

fn daily_usage(
    records: &[TransactionRecord],
    address: &str,
    quotas: &QuotaConfig,
    now_ms: i64,
) -> DailyUsage {
    let day_start_ms = local_day_start_ms(now_ms);

    // Achievement usage counts all claims, not just today's; the quota
    // is a rolling interval rather than a calendar-day window.
    let achievement_used = records
        .iter()
        .filter(|r| {
            r.user_address == address && r.transaction_type == TransactionType::Achievement
        })
        .count() as u32;
    let next_available = last_achievement(records, address).and_then(|last_ms| {
        let days_since_claim = (now_ms - last_ms) as f64 / MS_PER_DAY as f64;
        if days_since_claim < quotas.achievement_interval_days {
            Some((quotas.achievement_interval_days - days_since_claim).ceil() as i64)
        } else {
            None
        }
    });

    DailyUsage {
        game: UsageEntry {
            used: count_today(records, address, TransactionType::Game, day_start_ms),
            limit: quotas.game_per_day,
            next_available: None,
        },
        social: UsageEntry {
            used: count_today(records, address, TransactionType::Social, day_start_ms),
            limit: quotas.social_per_day,
            next_available: None,
        },
        achievement: UsageEntry {
            used: achievement_used,
            limit: quotas.achievement_claims,
            next_available,
        },
    }
}

fn estimated_days_remaining(balance: f64, daily_budget: f64) -> i64 {
    ((balance / daily_budget).floor() as i64).max(1)
}

fn evaluate_budget(total_records: usize, budget: &BudgetConfig) -> BudgetDecision {
    let estimated_cost = total_records as f64 * budget.avg_transaction_cost;
    let current_balance = (budget.starting_balance - estimated_cost).max(0.0);

    if current_balance <= budget.emergency_threshold {
        return BudgetDecision {
            can_proceed: false,
            reason: Some(
                "Budget running low. Gas-free transactions temporarily disabled.".to_string(),
            ),
            estimated_days_remaining: Some(estimated_days_remaining(
                current_balance,
                budget.daily_budget,
            )),
            current_balance: Some(current_balance),
        };
    }

    if current_balance <= budget.warning_threshold {
        return BudgetDecision {
            can_proceed: true,
            reason: Some(format!(
                "Budget running low. Only ${} remaining.",
                current_balance
            )),
            estimated_days_remaining: Some(estimated_days_remaining(
                current_balance,
                budget.daily_budget,
            )),
            current_balance: Some(current_balance),
        };
    }

    BudgetDecision {
        can_proceed: true,
        reason: None,
        estimated_days_remaining: None,
        current_balance: Some(current_balance),
    }
}
