//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use refinder_observer::router::build_router;
use refinder_observer::state::AppState;
use refinder_types::{
    ArchetypePair, Character, CharacterId, CharacterUpdate, Item, ZoneId, ZoneInfo, ZoneNode,
};
use serde_json::Value;
use tower::ServiceExt;

fn make_update() -> CharacterUpdate {
    let mut root = ZoneNode::new(ZoneId(1), ZoneId::NO_PARENT);
    root.label = String::from("Ancient Canopy");
    root.items.push(Item {
        id: 30,
        name: String::from("Sword"),
        source_zone_id: ZoneId(1),
        parent_quest_id: 0,
        quantity: 1,
        owned_by_character: true,
    });

    CharacterUpdate {
        character: Character {
            id: CharacterId(3),
            archetypes: ArchetypePair {
                primary: String::from("Hunter"),
                secondary: String::from("Medic"),
            },
            character_type: String::from("ERemnantCharacterType::Standard"),
            owned_item_ids: BTreeSet::from([String::from("Sword")]),
        },
        zone: ZoneInfo {
            root: Some(root),
            biome: String::from("Jungle"),
            special_state_flag: true,
        },
        published_at: Utc::now(),
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = Arc::new(AppState::new());
    state.publish(&make_update());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Hunter / Medic"));
    assert!(html.contains("Jungle"));
}

#[tokio::test]
async fn test_character_not_found_before_publish() {
    let router = build_router(Arc::new(AppState::new()));

    let response = router
        .oneshot(Request::get("/api/character").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_character_returns_latest_update() {
    let state = Arc::new(AppState::new());
    state.publish(&make_update());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/character").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["character"]["id"], 3);
    assert_eq!(json["character"]["type"], "ERemnantCharacterType::Standard");
    assert_eq!(json["zone"]["biome"], "Jungle");
    assert_eq!(json["zone"]["specialStateFlag"], true);
    assert_eq!(json["zone"]["root"]["items"][0]["name"], "Sword");
    assert_eq!(json["zone"]["root"]["items"][0]["ownedByCharacter"], true);
}

#[tokio::test]
async fn test_character_reflects_most_recent_publish() {
    let state = Arc::new(AppState::new());
    state.publish(&make_update());
    let mut second = make_update();
    second.zone.biome = String::from("Nerud");
    state.publish(&second);
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/character").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["zone"]["biome"], "Nerud");
}

#[tokio::test]
async fn test_health() {
    let state = Arc::new(AppState::new());
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["has_character"], false);

    state.publish(&make_update());
    let response = router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["has_character"], true);
    assert_eq!(json["character_id"], 3);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let router = build_router(Arc::new(AppState::new()));

    let response = router
        .oneshot(Request::get("/api/roster").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
