//! HTTP-level integration tests for the admin surface: mappings, talks
//! and their lifecycle, and card theme membership.

mod common;

use std::sync::Arc;

use arcana_core::audit::{AuditEvent, MemoryAuditSink};
use arcana_db::repositories::{CardRepo, MappingRepo, TalkRepo};
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_audit, delete, get, new_card, new_talk,
    post_empty, post_json, put_json,
};
use serde_json::json;
use sqlx::PgPool;

const MAPPINGS: &str = "/api/v1/admin/mappings";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mapping_body(card_id: i64, talk_id: i64, is_primary: bool) -> serde_json::Value {
    json!({
        "card_id": card_id,
        "talk_id": talk_id,
        "is_primary": is_primary,
        "strength": 4,
        "rationale_short": "Shared theme",
    })
}

// ---------------------------------------------------------------------------
// Test: POST /admin/mappings creates (201) then updates (200)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_mapping_status_codes(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-fool", 0)).await.unwrap();
    let talk = TalkRepo::create(&pool, &new_talk("Leap")).await.unwrap();
    let audit = Arc::new(MemoryAuditSink::new());

    let app = build_test_app_with_audit(pool.clone(), audit.clone());
    let body = mapping_body(card.id, talk.id, true);
    let response = post_json(app, "/api/v1/admin/mappings", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["created"], true);
    assert_eq!(json["data"]["mapping"]["is_primary"], true);

    let app = build_test_app_with_audit(pool.clone(), audit.clone());
    let body = mapping_body(card.id, talk.id, true);
    let response = post_json(app, "/api/v1/admin/mappings", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["created"], false);

    assert_eq!(
        audit.events(),
        vec![AuditEvent::MappingCreated, AuditEvent::MappingUpdated]
    );
}

// ---------------------------------------------------------------------------
// Test: invalid mapping fields are rejected before touching the store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_mapping_validation(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-fool", 0)).await.unwrap();
    let talk = TalkRepo::create(&pool, &new_talk("Leap")).await.unwrap();

    let mut body = mapping_body(card.id, talk.id, false);
    body["strength"] = json!(7);
    let response = post_json(build_test_app(pool.clone()), "/api/v1/admin/mappings", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut body = mapping_body(card.id, talk.id, false);
    body["rationale_short"] = json!("   ");
    let response = post_json(build_test_app(pool.clone()), "/api/v1/admin/mappings", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/mappings",
        mapping_body(card.id, 999_999, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(MappingRepo::list_for_admin(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: promote, delete and the admin listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promote_and_delete_mapping(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-lovers", 6)).await.unwrap();
    let a = TalkRepo::create(&pool, &new_talk("A")).await.unwrap();
    let b = TalkRepo::create(&pool, &new_talk("B")).await.unwrap();

    let app = build_test_app(pool.clone());
    let first = body_json(post_json(app, MAPPINGS, mapping_body(card.id, a.id, true)).await).await;
    let app = build_test_app(pool.clone());
    let body = mapping_body(card.id, b.id, false);
    let second = body_json(post_json(app, MAPPINGS, body).await).await;
    let a_id = first["data"]["mapping"]["id"].as_i64().unwrap();
    let b_id = second["data"]["mapping"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/admin/mappings/{b_id}/primary");
    let response = post_empty(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["demoted_ids"], json!([a_id]));

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/admin/mappings").await).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r["is_primary"] == true).count(), 1);

    let uri = format!("/api/v1/admin/mappings/{b_id}");
    let response = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/admin/mappings/cards-without-primary").await,
    )
    .await;
    assert_eq!(json["data"][0]["id"], card.id);

    let json = body_json(get(build_test_app(pool), "/api/v1/admin/mappings/stats").await).await;
    assert_eq!(json["data"]["total_mappings"], 1);
    assert_eq!(json["data"]["cards_without_primary"], 1);
    assert_eq!(json["data"]["unmapped_talks"], 1);
}

// ---------------------------------------------------------------------------
// Test: a second primary written around the manager is a 409
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_violation_is_conflict(pool: PgPool) {
    use arcana_api::error::AppError;
    use axum::response::IntoResponse;

    let card = CardRepo::create(&pool, &new_card("the-fool", 0)).await.unwrap();
    let a = TalkRepo::create(&pool, &new_talk("A")).await.unwrap();
    let b = TalkRepo::create(&pool, &new_talk("B")).await.unwrap();
    let insert = "INSERT INTO card_talk_mappings
                      (card_id, talk_id, is_primary, strength, rationale_short)
                  VALUES ($1, $2, true, 3, 'x')";
    sqlx::query(insert).bind(card.id).bind(a.id).execute(&pool).await.unwrap();
    let err = sqlx::query(insert)
        .bind(card.id)
        .bind(b.id)
        .execute(&pool)
        .await
        .unwrap_err();

    let response = AppError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONSTRAINT_VIOLATION");
}

// ---------------------------------------------------------------------------
// Test: admin talk create validates, normalizes and generates a slug
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_talk(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/talks",
        json!({
            "title": "The power of vulnerability",
            "speaker_name": "Brene Brown",
            "ted_url": "https://www.ted.com/talks/brene_brown_the_power_of_vulnerability",
            "speaker_twitter_handle": " @BreneBrown ",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "brene-brown-the-power-of-vulnerability");
    assert_eq!(json["data"]["speaker_twitter_handle"], "BreneBrown");

    // Neither URL.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/talks",
        json!({ "title": "No links", "speaker_name": "Nobody", "ted_url": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed handle.
    let response = post_json(
        build_test_app(pool),
        "/api/v1/admin/talks",
        json!({
            "title": "Bad handle",
            "speaker_name": "Somebody",
            "youtube_url": "https://www.youtube.com/watch?v=abc",
            "speaker_twitter_handle": "not a handle!",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: soft delete, admin listing with include_deleted, restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_talk_lifecycle_over_http(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-moon", 18)).await.unwrap();
    let talk = TalkRepo::create(&pool, &new_talk("Night")).await.unwrap();
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/mappings",
        mapping_body(card.id, talk.id, true),
    )
    .await;

    let uri = format!("/api/v1/admin/talks/{}", talk.id);
    let response = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/admin/talks").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/admin/talks?include_deleted=true").await,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["mappings_count"], 1);

    let json = body_json(get(build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(json["data"]["lifecycle"]["state"], "soft_deleted");
    assert_eq!(json["data"]["mappings"].as_array().unwrap().len(), 1);

    let restore = format!("/api/v1/admin/talks/{}/restore", talk.id);
    let response = post_empty(build_test_app(pool.clone()), &restore).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(pool), &uri).await).await;
    assert_eq!(json["data"]["lifecycle"]["state"], "active");
}

// ---------------------------------------------------------------------------
// Test: permanent delete cascades and is audited
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_over_http(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-tower", 16)).await.unwrap();
    let talk = TalkRepo::create(&pool, &new_talk("Collapse")).await.unwrap();
    let audit = Arc::new(MemoryAuditSink::new());
    post_json(
        build_test_app_with_audit(pool.clone(), audit.clone()),
        "/api/v1/admin/mappings",
        mapping_body(card.id, talk.id, true),
    )
    .await;

    let uri = format!("/api/v1/admin/talks/{}/permanent", talk.id);
    let response = delete(build_test_app_with_audit(pool.clone(), audit.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["cards_lost_primary"], json!([card.id]));

    assert!(MappingRepo::list_for_card(&pool, card.id, true)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(audit.events().last(), Some(&AuditEvent::TalkHardDeleted));

    let response = delete(build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: update keeps at least one external URL
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_talk_requires_an_external_url(pool: PgPool) {
    let talk = TalkRepo::create(&pool, &new_talk("Links")).await.unwrap();
    let uri = format!("/api/v1/admin/talks/{}", talk.id);

    let response = put_json(build_test_app(pool.clone()), &uri, json!({ "ted_url": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "youtube_url": "https://www.youtube.com/watch?v=abc", "year": 2012 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["year"], 2012);
    assert!(json["data"]["ted_url"].is_string());

    // A whitespace URL clears the column rather than being stored.
    let response = put_json(build_test_app(pool.clone()), &uri, json!({ "ted_url": "   " })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = TalkRepo::find_by_id(&pool, talk.id).await.unwrap().unwrap();
    assert!(stored.ted_url.is_none());
    assert_eq!(stored.youtube_url.as_deref(), Some("https://www.youtube.com/watch?v=abc"));

    let response = put_json(build_test_app(pool), &uri, json!({ "youtube_url": " " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: card updates and theme membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_card_update_and_themes(pool: PgPool) {
    let card = CardRepo::create(&pool, &new_card("the-chariot", 7)).await.unwrap();
    let theme = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/admin/themes",
            json!({ "name": "Willpower", "short_description": "Drive" }),
        )
        .await,
    )
    .await;
    let theme_id = theme["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/admin/cards/{}", card.id);
    let app = build_test_app(pool.clone());
    let response = put_json(app, &uri, json!({ "summary": "Onward" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["summary"], "Onward");

    let themes_uri = format!("/api/v1/admin/cards/{}/themes", card.id);
    let response = put_json(
        build_test_app(pool.clone()),
        &themes_uri,
        json!({ "theme_ids": [theme_id] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/cards/the-chariot").await).await;
    assert_eq!(json["data"]["themes"][0]["name"], "Willpower");

    let json = body_json(get(build_test_app(pool), "/api/v1/admin/cards").await).await;
    assert_eq!(json["data"][0]["mappings_count"], 0);
    assert_eq!(json["data"][0]["has_primary"], false);
}
