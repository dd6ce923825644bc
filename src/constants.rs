/// Application constants

// Per-user quotas for sponsored transactions
pub const DAILY_GAME_TRANSACTIONS: u32 = 1;
pub const DAILY_SOCIAL_FEATURES: u32 = 1;
pub const ACHIEVEMENT_CLAIMS: u32 = 1;
pub const ACHIEVEMENT_INTERVAL_DAYS: f64 = 3.0;

// Paymaster budget simulation
pub const PAYMASTER_STARTING_BALANCE: f64 = 500.0;
pub const AVG_TRANSACTION_COST: f64 = 0.25;
pub const EMERGENCY_BALANCE_THRESHOLD: f64 = 100.0;
pub const WARNING_BALANCE_THRESHOLD: f64 = 200.0;
pub const DAILY_BUDGET: f64 = 8.33;

// Milliseconds in one day, used for rolling quota windows
pub const MS_PER_DAY: i64 = 86_400_000;

// Fallback identity when no wallet is connected
pub const ANONYMOUS_USER: &str = "anonymous-user";

// Challenge configuration
pub const DEFAULT_CHALLENGE_TIME_LIMIT_MS: i64 = 30_000;

// API version
pub const API_VERSION: &str = "v1";
