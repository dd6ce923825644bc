// All service modules
pub mod notification_service;
pub mod sponsored_transactions;
pub mod usage_limiter;

// Re-export for convenience
pub use notification_service::NotificationService;
pub use sponsored_transactions::SponsoredTransactionService;
pub use usage_limiter::UsageLimiter;
