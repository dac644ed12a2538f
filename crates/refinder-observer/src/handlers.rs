//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read the latest published update from the shared
//! [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/character` | Latest character update |
//! | `GET` | `/api/health` | Liveness check |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::Utc;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page summarizing the latest update.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let latest = state.latest();
    let (character, archetypes, biome, zones, blood_moon, published) = latest.as_ref().map_or_else(
        || {
            (
                String::from("-"),
                String::from("-"),
                String::from("-"),
                0,
                false,
                String::from("never"),
            )
        },
        |u| {
            (
                u.character.id.to_string(),
                u.character.archetypes.label(),
                u.zone.biome.clone(),
                u.zone.zone_count(),
                u.zone.special_state_flag,
                u.published_at.to_rfc3339(),
            )
        },
    );

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Refinder</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Refinder</h1>
    <p class="subtitle">Live session tracker -- last update: {published}</p>

    <div>
        <div class="metric">
            <div class="label">Character</div>
            <div class="value">{character}</div>
        </div>
        <div class="metric">
            <div class="label">Archetypes</div>
            <div class="value">{archetypes}</div>
        </div>
        <div class="metric">
            <div class="label">Biome</div>
            <div class="value">{biome}</div>
        </div>
        <div class="metric">
            <div class="label">Zones</div>
            <div class="value">{zones}</div>
        </div>
        <div class="metric">
            <div class="label">Blood Moon</div>
            <div class="value">{blood_moon}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/character">/api/character</a> -- Latest character update</li>
        <li><a href="/api/health">/api/health</a> -- Liveness check</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/character</code> -- Live character update stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/character -- latest character update
// ---------------------------------------------------------------------------

/// Return the latest published character update.
///
/// # Errors
///
/// [`ObserverError::NotFound`] until the engine has published once.
pub async fn get_character(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let update = state
        .latest()
        .ok_or_else(|| ObserverError::NotFound(String::from("no character published yet")))?;
    Ok(Json(serde_json::to_value(&update)?))
}

// ---------------------------------------------------------------------------
// GET /api/health -- liveness
// ---------------------------------------------------------------------------

/// Liveness check with a summary of what has been published.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let latest = state.latest();
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();
    Json(serde_json::json!({
        "status": "ok",
        "has_character": latest.is_some(),
        "character_id": latest.map(|u| u.character.id),
        "uptime_seconds": uptime_seconds,
    }))
}
