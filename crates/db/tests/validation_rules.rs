//! Integration tests for the validation sweep queries.
//!
//! Each rule is checked against a small fixture that contains exactly the
//! rows it should and should not report. Soft-deleted talks must never leak
//! into the rules that consider active talks only.

use arcana_db::models::card::CreateCard;
use arcana_db::models::mapping::UpsertMapping;
use arcana_db::models::talk::{CreateTalk, Talk};
use arcana_db::repositories::{CardRepo, MappingRepo, TalkRepo, ValidationRepo};
use chrono::Utc;
use sqlx::PgPool;

const OWNED_PREFIX: &str = "https://cdn.arcana.test/";
const LONG_DESCRIPTION: &str =
    "A thoughtful talk about change, courage and the first step into the unknown.";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn card(slug: &str, sequence_index: i32) -> CreateCard {
    CreateCard {
        slug: slug.to_string(),
        name: slug.to_string(),
        arcana_type: "major".to_string(),
        suit: None,
        number: Some(sequence_index),
        sequence_index,
        image_url: format!("/cards/{slug}.webp"),
        keywords: None,
        summary: "summary".to_string(),
    }
}

/// A talk that passes every rule on its own.
fn clean_talk(title: &str) -> CreateTalk {
    CreateTalk {
        title: title.to_string(),
        speaker_name: format!("{title} Speaker"),
        ted_url: Some(format!("https://www.ted.com/talks/{title}")),
        description: Some(LONG_DESCRIPTION.to_string()),
        thumbnail_url: Some(format!("{OWNED_PREFIX}{title}.jpg")),
        speaker_twitter_handle: Some("speaker".to_string()),
        speaker_bluesky_handle: Some("speaker.bsky.social".to_string()),
        ..Default::default()
    }
}

async fn create(pool: &PgPool, input: CreateTalk) -> Talk {
    TalkRepo::create(pool, &input).await.unwrap()
}

async fn map(pool: &PgPool, card_id: i64, talk_id: i64, is_primary: bool, long: Option<&str>) {
    MappingRepo::upsert(
        pool,
        &UpsertMapping {
            card_id,
            talk_id,
            is_primary,
            strength: 3,
            rationale_short: "short".to_string(),
            rationale_long: long.map(str::to_string),
        },
    )
    .await
    .unwrap();
}

async fn soft_delete(pool: &PgPool, id: i64) {
    TalkRepo::set_lifecycle(pool, id, Some(Utc::now()))
        .await
        .unwrap();
}

fn ids<T>(rows: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
    rows.iter().map(id).collect()
}

// ---------------------------------------------------------------------------
// Rule 1: duplicate YouTube ids
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_youtube_ids_groups_active_members(pool: PgPool) {
    let a = create(
        &pool,
        CreateTalk {
            youtube_video_id: Some("dupvid".to_string()),
            ..clean_talk("dup-a")
        },
    )
    .await;
    let b = create(
        &pool,
        CreateTalk {
            youtube_video_id: Some("dupvid".to_string()),
            ..clean_talk("dup-b")
        },
    )
    .await;
    let deleted = create(
        &pool,
        CreateTalk {
            youtube_video_id: Some("dupvid".to_string()),
            ..clean_talk("dup-deleted")
        },
    )
    .await;
    soft_delete(&pool, deleted.id).await;

    // Only one active member: not a duplicate.
    let lone = create(
        &pool,
        CreateTalk {
            youtube_video_id: Some("lonevid".to_string()),
            ..clean_talk("lone")
        },
    )
    .await;
    let lone_deleted = create(
        &pool,
        CreateTalk {
            youtube_video_id: Some("lonevid".to_string()),
            ..clean_talk("lone-deleted")
        },
    )
    .await;
    soft_delete(&pool, lone_deleted.id).await;

    let groups = ValidationRepo::duplicate_youtube_ids(&pool).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].youtube_video_id, "dupvid");
    let members = ids(&groups[0].talks, |t| t.id);
    assert_eq!(members, vec![a.id, b.id]);
    assert!(!members.contains(&lone.id));
}

// ---------------------------------------------------------------------------
// Rules 2-5: talk content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_both_urls(pool: PgPool) {
    let empty = create(
        &pool,
        CreateTalk {
            ted_url: Some(String::new()),
            youtube_url: Some("  ".to_string()),
            ..clean_talk("no-links")
        },
    )
    .await;
    create(&pool, clean_talk("ok")).await;

    let rows = ValidationRepo::missing_both_urls(&pool).await.unwrap();
    assert_eq!(ids(&rows, |t| t.id), vec![empty.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_and_external_thumbnails(pool: PgPool) {
    let none = create(
        &pool,
        CreateTalk {
            thumbnail_url: None,
            ..clean_talk("no-thumb")
        },
    )
    .await;
    let empty = create(
        &pool,
        CreateTalk {
            thumbnail_url: Some(String::new()),
            ..clean_talk("empty-thumb")
        },
    )
    .await;
    let external = create(
        &pool,
        CreateTalk {
            thumbnail_url: Some("https://i.ytimg.com/vi/x/hqdefault.jpg".to_string()),
            ..clean_talk("external-thumb")
        },
    )
    .await;
    create(
        &pool,
        CreateTalk {
            thumbnail_url: Some("/thumbnails/relative.jpg".to_string()),
            ..clean_talk("relative-thumb")
        },
    )
    .await;
    create(&pool, clean_talk("owned-thumb")).await;
    let deleted = create(
        &pool,
        CreateTalk {
            thumbnail_url: None,
            ..clean_talk("deleted-no-thumb")
        },
    )
    .await;
    soft_delete(&pool, deleted.id).await;

    let missing = ValidationRepo::missing_thumbnails(&pool).await.unwrap();
    let mut missing_ids = ids(&missing, |t| t.id);
    missing_ids.sort();
    assert_eq!(missing_ids, vec![none.id, empty.id]);

    let ext = ValidationRepo::external_thumbnails(&pool, OWNED_PREFIX)
        .await
        .unwrap();
    assert_eq!(ids(&ext, |t| t.id), vec![external.id]);

    // Without an owned prefix every absolute URL is external.
    let all_ext = ValidationRepo::external_thumbnails(&pool, "").await.unwrap();
    assert_eq!(all_ext.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_short_descriptions(pool: PgPool) {
    let short = create(
        &pool,
        CreateTalk {
            description: Some("Too short.".to_string()),
            ..clean_talk("short")
        },
    )
    .await;
    let missing = create(
        &pool,
        CreateTalk {
            description: None,
            ..clean_talk("missing")
        },
    )
    .await;
    let exactly = create(
        &pool,
        CreateTalk {
            description: Some("x".repeat(50)),
            ..clean_talk("exactly-fifty")
        },
    )
    .await;

    let padded = create(
        &pool,
        CreateTalk {
            description: Some(format!("{}     ", "y".repeat(45))),
            ..clean_talk("padded-fifty")
        },
    )
    .await;
    let almost = create(
        &pool,
        CreateTalk {
            description: Some("z".repeat(49)),
            ..clean_talk("forty-nine")
        },
    )
    .await;

    let rows = ValidationRepo::short_descriptions(&pool).await.unwrap();
    let found = ids(&rows, |t| t.id);
    assert!(found.contains(&short.id));
    assert!(found.contains(&missing.id));
    assert!(found.contains(&almost.id));
    assert!(!found.contains(&exactly.id), "50 characters is enough");
    assert!(!found.contains(&padded.id), "length counts trailing whitespace");
}

// ---------------------------------------------------------------------------
// Rules 6-8: mapping coverage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mapping_coverage_rules(pool: PgPool) {
    let fool = CardRepo::create(&pool, &card("the-fool", 0)).await.unwrap();
    let magician = CardRepo::create(&pool, &card("the-magician", 1)).await.unwrap();
    let priestess = CardRepo::create(&pool, &card("the-high-priestess", 2))
        .await
        .unwrap();

    let primary = create(&pool, clean_talk("primary")).await;
    let secondary = create(&pool, clean_talk("secondary")).await;
    let unmapped = create(&pool, clean_talk("unmapped")).await;
    let unmapped_deleted = create(&pool, clean_talk("unmapped-deleted")).await;
    soft_delete(&pool, unmapped_deleted.id).await;
    let mapped_deleted = create(&pool, clean_talk("mapped-deleted")).await;

    map(&pool, fool.id, primary.id, true, Some("Long rationale")).await;
    map(&pool, magician.id, secondary.id, false, None).await;
    map(&pool, magician.id, mapped_deleted.id, false, None).await;
    soft_delete(&pool, mapped_deleted.id).await;

    let without = ValidationRepo::cards_without_primary_mapping(&pool)
        .await
        .unwrap();
    assert_eq!(ids(&without, |c| c.id), vec![magician.id, priestess.id]);
    assert_eq!(without[0].mappings_count, 2);
    assert_eq!(without[1].mappings_count, 0);

    let not_mapped = ValidationRepo::talks_not_mapped_to_any_card(&pool)
        .await
        .unwrap();
    assert_eq!(ids(&not_mapped, |t| t.id), vec![unmapped.id]);

    let missing_long = ValidationRepo::mappings_missing_long_rationale(&pool)
        .await
        .unwrap();
    assert_eq!(missing_long.len(), 1, "mapping to a soft-deleted talk is skipped");
    assert_eq!(missing_long[0].talk_id, secondary.id);
    assert_eq!(missing_long[0].card_slug, "the-magician");
}

// ---------------------------------------------------------------------------
// Rules 9-10: info
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_talks_sorted_by_deletion(pool: PgPool) {
    let first = create(&pool, clean_talk("first")).await;
    let second = create(&pool, clean_talk("second")).await;
    create(&pool, clean_talk("active")).await;

    soft_delete(&pool, second.id).await;
    soft_delete(&pool, first.id).await;

    let rows = ValidationRepo::soft_deleted_talks(&pool).await.unwrap();
    assert_eq!(ids(&rows, |t| t.id), vec![second.id, first.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_social_handles_flags_either_blank(pool: PgPool) {
    let no_twitter = create(
        &pool,
        CreateTalk {
            speaker_twitter_handle: None,
            ..clean_talk("no-twitter")
        },
    )
    .await;
    let blank_bluesky = create(
        &pool,
        CreateTalk {
            speaker_bluesky_handle: Some("   ".to_string()),
            ..clean_talk("blank-bluesky")
        },
    )
    .await;
    create(&pool, clean_talk("both-present")).await;
    let deleted = create(
        &pool,
        CreateTalk {
            speaker_twitter_handle: None,
            speaker_bluesky_handle: None,
            ..clean_talk("deleted")
        },
    )
    .await;
    soft_delete(&pool, deleted.id).await;

    let rows = ValidationRepo::missing_social_handles(&pool).await.unwrap();
    let mut found = ids(&rows, |t| t.id);
    found.sort();
    assert_eq!(found, vec![no_twitter.id, blank_bluesky.id]);
}
