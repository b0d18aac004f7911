use super::helpers::{expect_status, get, read_json, send, spawn_app};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use gallery_api::{
    application::list_submissions::dto::{GalleryPage, PhotoDetail},
    domain::submission::entity::SubmissionStatus,
};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

#[tokio::test]
async fn gallery_pages_cover_every_approved_photo_exactly_once() {
    let test = spawn_app();
    let base = Utc::now() - Duration::hours(1);
    // groups of three share a timestamp, so the id tie-break is exercised
    let mut expected: Vec<_> = (0..45)
        .map(|i| {
            test.submissions
                .seed(SubmissionStatus::Approved, base + Duration::seconds(i / 3), "")
        })
        .collect();
    test.submissions
        .seed(SubmissionStatus::Pending, base, "not yet public");
    test.submissions
        .seed(SubmissionStatus::Rejected, base, "never public");
    expected.sort_by_key(|s| std::cmp::Reverse(s.sort_key()));

    let mut seen = Vec::new();
    let mut sizes = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(c) => format!("/api/v1/gallery?cursor={}", c),
            None => "/api/v1/gallery".to_string(),
        };
        let res = expect_status(send(&test.app, get(&uri)).await, StatusCode::OK).await;
        let page: GalleryPage = read_json(res).await;
        sizes.push(page.items.len());
        seen.extend(page.items.into_iter().map(|item| item.id));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(sizes, vec![20, 20, 5]);
    let expected_ids: Vec<Uuid> = expected.iter().map(|s| s.id).collect();
    assert_eq!(seen, expected_ids);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 45);
}

#[tokio::test]
async fn malformed_cursor_restarts_from_the_first_page() {
    let test = spawn_app();
    let base = Utc::now();
    for i in 0..25 {
        test.submissions
            .seed(SubmissionStatus::Approved, base - Duration::minutes(i), "");
    }

    let first: GalleryPage = read_json(send(&test.app, get("/api/v1/gallery")).await).await;
    let res = expect_status(
        send(&test.app, get("/api/v1/gallery?cursor=bm90LWEtY3Vyc29y")).await,
        StatusCode::OK,
    )
    .await;
    let garbled: GalleryPage = read_json(res).await;

    let ids = |page: &GalleryPage| page.items.iter().map(|i| i.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&garbled));
    assert!(garbled.next_cursor.is_some());
}

#[tokio::test]
async fn empty_gallery_has_no_cursor() {
    let test = spawn_app();
    let res = expect_status(send(&test.app, get("/api/v1/gallery")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["items"], serde_json::json!([]));
    assert!(body["nextCursor"].is_null());
}

#[tokio::test]
async fn gallery_items_carry_signed_thumbnail_urls() {
    let test = spawn_app();
    let row = test
        .submissions
        .seed(SubmissionStatus::Approved, Utc::now(), "Toast");

    let page: GalleryPage = read_json(send(&test.app, get("/api/v1/gallery")).await).await;
    let item = &page.items[0];
    assert_eq!(item.caption, "Toast");
    assert!(item.thumb_url.contains(&row.thumb_path));
    assert!(item.thumb_url.ends_with("expires=3600"));
}

#[tokio::test]
async fn photo_detail_is_only_served_for_approved_photos() {
    let test = spawn_app();
    let approved = test
        .submissions
        .seed(SubmissionStatus::Approved, Utc::now(), "Vows");
    let pending = test
        .submissions
        .seed(SubmissionStatus::Pending, Utc::now(), "");
    let rejected = test
        .submissions
        .seed(SubmissionStatus::Rejected, Utc::now(), "");

    let res = expect_status(
        send(&test.app, get(&format!("/api/v1/photos/{}", approved.id))).await,
        StatusCode::OK,
    )
    .await;
    let detail: PhotoDetail = read_json(res).await;
    assert_eq!(detail.caption, "Vows");
    assert!(detail.image_url.contains(&approved.image_path));
    assert!(detail.thumb_url.contains(&approved.thumb_path));
    assert_eq!((detail.width, detail.height), (640, 480));

    for id in [pending.id, rejected.id, Uuid::now_v7()] {
        expect_status(
            send(&test.app, get(&format!("/api/v1/photos/{}", id))).await,
            StatusCode::NOT_FOUND,
        )
        .await;
    }
}

#[tokio::test]
async fn malformed_photo_id_is_a_bad_request() {
    let test = spawn_app();
    expect_status(
        send(&test.app, get("/api/v1/photos/not-a-uuid")).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
async fn health_reports_ok() {
    let test = spawn_app();
    let res = expect_status(send(&test.app, get("/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn repeated_cursor_parameter_falls_back_to_the_first_page() {
    let test = spawn_app();
    let base = Utc::now();
    for i in 0..25 {
        test.submissions
            .seed(SubmissionStatus::Approved, base - Duration::minutes(i), "");
    }

    let first: GalleryPage = read_json(send(&test.app, get("/api/v1/gallery")).await).await;
    let res = expect_status(
        send(&test.app, get("/api/v1/gallery?cursor=a&cursor=b")).await,
        StatusCode::OK,
    )
    .await;
    let repeated: GalleryPage = read_json(res).await;

    let ids = |page: &GalleryPage| page.items.iter().map(|i| i.id).collect::<Vec<_>>();
    assert_eq!(repeated.items.len(), 20);
    assert_eq!(ids(&first), ids(&repeated));
}
