use serde::{Deserialize, Serialize};

/// Push-notification endpoint a Farcaster client hands us when a user
/// adds the mini app or enables notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDetails {
    pub url: String,
    pub token: String,
}

/// Webhook payload from the mini app host: `{ fid, event }`.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub fid: Option<u64>,
    pub event: Option<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(rename = "notificationDetails")]
    pub notification_details: Option<NotificationDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Pending,
    Accepted,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeParticipant {
    pub fid: u64,
    pub username: String,
}

/// A head-to-head challenge between two players.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub from: ChallengeParticipant,
    pub to: ChallengeParticipant,
    /// Challenge kind exposed to the client: "score", "time", or "combo".
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub target: i64,
    pub time_limit: i64,
    pub status: ChallengeStatus,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRequest {
    pub from: ChallengeParticipant,
    pub to: ChallengeParticipant,
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub target: i64,
    pub time_limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub text: String,
    #[serde(default)]
    pub embeds: Vec<String>,
    pub fid: Option<u64>,
}

/// A processed share, kept in memory for demo analytics.
#[derive(Debug, Clone, Serialize)]
pub struct ShareRecord {
    pub id: String,
    pub text: String,
    pub embeds: Vec<String>,
    pub fid: Option<u64>,
    pub timestamp: i64,
}
