use axum::{extract::State, Json};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, WebhookPayload},
};

use super::AppState;

/// POST /api/v1/webhook
/// Receives mini app lifecycle events from the Farcaster client.
pub async fn receive(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<ApiResponse<String>>> {
    let (Some(fid), Some(event)) = (payload.fid, payload.event) else {
        return Err(AppError::BadRequest("Invalid webhook payload".to_string()));
    };

    tracing::info!("Webhook received: fid={} event={}", fid, event.event);

    match event.event.as_str() {
        "miniapp_added" => {
            if let Some(details) = event.notification_details {
                state.notifications.set_details(fid, details).await;
                tracing::info!("User {} added mini app with notifications", fid);
                state
                    .notifications
                    .send(
                        fid,
                        "Welcome to Dragman! 🐉",
                        "Your dragon adventure begins now!",
                    )
                    .await;
            }
        }
        "miniapp_removed" => {
            state.notifications.remove_details(fid).await;
            tracing::info!("User {} removed mini app", fid);
        }
        "notifications_enabled" => {
            if let Some(details) = event.notification_details {
                state.notifications.set_details(fid, details).await;
                tracing::info!("User {} enabled notifications", fid);
                state
                    .notifications
                    .send(
                        fid,
                        "Notifications Enabled! 🔔",
                        "You'll now receive updates about your dragon adventures!",
                    )
                    .await;
            }
        }
        "notifications_disabled" => {
            state.notifications.remove_details(fid).await;
            tracing::info!("User {} disabled notifications", fid);
        }
        other => {
            tracing::info!("Unknown event type: {}", other);
        }
    }

    Ok(Json(ApiResponse::success("processed".to_string())))
}
