use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::Result,
    models::{ApiResponse, ShareRecord, ShareRequest},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    pub score: Option<i64>,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_id: String,
}

/// GET /share
/// Renders the share page with Open Graph tags and the mini app embed.
pub async fn share_page(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Html<String> {
    let score = query.score.unwrap_or(0);
    let mode = query.mode.unwrap_or_else(|| "classic".to_string());
    Html(render_share_page(score, &mode, &state.config.app_url))
}

/// POST /api/v1/share
pub async fn record_share(
    State(state): State<AppState>,
    Json(req): Json<ShareRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>> {
    let now = Utc::now().timestamp_millis();
    let share = ShareRecord {
        id: now.to_string(),
        text: req.text,
        embeds: req.embeds,
        fid: req.fid,
        timestamp: now,
    };

    tracing::info!("Share processed: {} (fid={:?})", share.id, share.fid);
    let share_id = share.id.clone();
    state.store.record_share(share).await;

    Ok(Json(ApiResponse::success(ShareResponse { share_id })))
}

/// Groups digits into thousands, the way the client renders scores.
fn format_score(score: i64) -> String {
    // unsigned_abs: i64::MIN has no i64 absolute value
    let digits = score.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if score < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn render_share_page(score: i64, game_mode: &str, app_url: &str) -> String {
    let embed = json!({
        "version": "next",
        "imageUrl": format!("{}/preview.svg", app_url),
        "button": {
            "title": "Play Dragman",
            "action": {
                "type": "launch_miniapp",
                "name": "Dragman Mini App",
                "url": app_url,
            }
        }
    });

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Dragman - Score Shared!</title>
    <meta property="og:title" content="Dragman - Score Shared!" />
    <meta property="og:description" content="I just scored {score} points in {mode} mode! Can you beat my score?" />
    <meta property="og:image" content="{app_url}/og-image.svg" />
    <meta property="og:url" content="{app_url}" />
    <meta property="og:type" content="website" />
    <meta name="fc:miniapp" content='{embed}' />
  </head>
  <body>
    <div class="container">
      <div class="dragon">🐉</div>
      <h1>Amazing Score!</h1>
      <div class="score">{pretty_score} Points</div>
      <p>I just scored {score} points in {mode} mode on Dragman!</p>
      <p>Can you beat my score?</p>
      <a href="{app_url}" class="play-button">Play Dragman</a>
      <p>Challenge friends and compete on leaderboards!</p>
    </div>
  </body>
</html>
"#,
        score = score,
        mode = game_mode,
        app_url = app_url,
        embed = embed,
        pretty_score = format_score(score),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn scores_group_thousands() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(999), "999");
        assert_eq!(format_score(1_000), "1,000");
        assert_eq!(format_score(1_234_567), "1,234,567");
        assert_eq!(format_score(-1_234), "-1,234");
    }

    #[test]
    fn extreme_scores_do_not_overflow() {
        assert_eq!(format_score(i64::MAX), "9,223,372,036,854,775,807");
        assert_eq!(format_score(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn share_page_embeds_score_and_mini_app_meta() {
        let html = render_share_page(1000, "classic", "https://dragman.xyz");
        assert!(html.contains("1,000 Points"));
        assert!(html.contains("classic mode"));
        assert!(html.contains("fc:miniapp"));
        assert!(html.contains("launch_miniapp"));
    }

    #[tokio::test]
    async fn recorded_share_lands_in_the_store() {
        let state = AppState::new(test_config());
        let response = record_share(
            State(state.clone()),
            Json(ShareRequest {
                text: "I just scored 1000 points in Dragman!".to_string(),
                embeds: vec!["https://dragman.xyz".to_string()],
                fid: Some(678),
            }),
        )
        .await
        .unwrap();

        assert!(!response.0.data.share_id.is_empty());
        assert_eq!(state.store.share_count().await, 1);
    }
}
