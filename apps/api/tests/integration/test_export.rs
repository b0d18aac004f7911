use super::helpers::{admin_request, expect_status, read_text, send, spawn_app};
use axum::http::{StatusCode, header};
use chrono::{Duration, Utc};
use gallery_api::domain::submission::entity::SubmissionStatus;

const HEADER: &str = "id,status,caption,created_at,approved_at,image_signed_url,thumb_signed_url";

#[tokio::test]
async fn empty_export_is_only_the_header() {
    let test = spawn_app();

    let res = send(
        &test.app,
        admin_request("GET", "/api/v1/admin/export", &test.admin_token, None),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;

    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains(".csv"));

    assert_eq!(read_text(res).await, HEADER);
}

#[tokio::test]
async fn export_lists_live_rows_newest_first_with_escaped_captions() {
    let test = spawn_app();
    let now = Utc::now();
    let pending = test
        .submissions
        .seed(SubmissionStatus::Pending, now, "Hello, \"world\"");
    let approved = test.submissions.seed(
        SubmissionStatus::Approved,
        now - Duration::minutes(1),
        "plain",
    );
    test.submissions.seed(
        SubmissionStatus::Deleted,
        now - Duration::minutes(2),
        "gone",
    );

    let res = send(
        &test.app,
        admin_request("GET", "/api/v1/admin/export", &test.admin_token, None),
    )
    .await;
    let body = read_text(expect_status(res, StatusCode::OK).await).await;
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);

    assert!(lines[1].starts_with(&format!("{},pending,\"Hello, \"\"world\"\"\",", pending.id)));
    // pending rows have no approval timestamp
    assert!(lines[1].contains("Z,,https://"));

    assert!(lines[2].starts_with(&format!("{},approved,plain,", approved.id)));
    assert!(lines[2].contains(&approved.image_path));
    assert!(lines[2].contains(&approved.thumb_path));
    assert!(lines[2].ends_with("expires=86400"));
    assert!(!body.contains("gone"));
}
