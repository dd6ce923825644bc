// src/models/mod.rs
pub mod social;
pub mod transaction;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use social::{
    Challenge, ChallengeParticipant, ChallengeStatus, CreateChallengeRequest, NotificationDetails,
    ShareRecord, ShareRequest, WebhookEvent, WebhookPayload,
};
pub use transaction::{
    ApiResponse, BatchedCall, BudgetDecision, DailyUsage, LimitDecision, SponsoredTransactionRequest,
    TransactionRecord, TransactionType, UsageEntry,
};
