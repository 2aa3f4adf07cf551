mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use common::{create_test_app, TestApp};
use lexis_backend::db::operations::words as word_store;

const USER: &str = "learner-1";

async fn onboard(app: &TestApp) {
    let (status, _) = app
        .put(
            "/api/users/me",
            Some(USER),
            json!({ "timezoneOffsetMinutes": 0, "testTrack": "ielts" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(
            "/api/tracks/ielts/words",
            None,
            json!({ "words": ["fig", "apple", "banana", "cherry", " date ", "elder", "apple", ""] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 6);
}

fn parse_time(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .expect("timestamp")
}

// ============================================================================
// Health & plumbing
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");

    let (status, body) = app.get("/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_test_app().await;
    let (status, body) = app.get("/api/nope", Some(USER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let app = create_test_app().await;
    for uri in ["/api/users/me", "/api/words/due", "/api/schedule"] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

// ============================================================================
// Users & tracks
// ============================================================================

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = create_test_app().await;
    let (status, body) = app.get("/api/users/me", Some("ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_profile_round_trip() {
    let app = create_test_app().await;
    onboard(&app).await;

    let (status, body) = app.get("/api/users/me", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], USER);
    assert_eq!(body["data"]["testTrack"], "ielts");
    assert_eq!(body["data"]["timezoneOffsetMinutes"], 0);

    let (status, body) = app
        .put("/api/users/me", Some(USER), json!({ "timezoneOffsetMinutes": 480 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["timezoneOffsetMinutes"], 480);
    assert!(body["data"]["testTrack"].is_null());
}

#[tokio::test]
async fn test_profile_rejects_out_of_range_offset() {
    let app = create_test_app().await;
    let (status, body) = app
        .put("/api/users/me", Some(USER), json!({ "timezoneOffsetMinutes": 15 * 60 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_track_words_are_normalized() {
    let app = create_test_app().await;
    onboard(&app).await;

    let (status, body) = app.get("/api/tracks/ielts/words", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["words"],
        json!(["apple", "banana", "cherry", "date", "elder", "fig"])
    );
}

// ============================================================================
// Words
// ============================================================================

#[tokio::test]
async fn test_save_word_is_idempotent() {
    let app = create_test_app().await;
    onboard(&app).await;

    let (status, first) = app.post("/api/words", Some(USER), json!({ "word": "apple" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = app.post("/api/words", Some(USER), json!({ "word": " apple " })).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(first["data"]["isKnown"], false);
}

#[tokio::test]
async fn test_save_word_requires_profile() {
    let app = create_test_app().await;
    let (status, _) = app.post("/api/words", Some("ghost"), json!({ "word": "apple" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    onboard(&app).await;
    let (status, body) = app.post("/api/words", Some(USER), json!({ "word": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_fresh_word_status() {
    let app = create_test_app().await;
    onboard(&app).await;
    app.post("/api/words", Some(USER), json!({ "word": "apple" })).await;

    let (status, body) = app.get("/api/words/apple/status", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["word"], "apple");
    assert_eq!(data["reviewCount"], 0);
    assert_eq!(data["status"]["retention"], 1.0);
    assert_eq!(data["status"]["isDue"], false);
    assert_eq!(data["status"]["daysUntilDue"], 4);
    assert_eq!(
        parse_time(&data["status"]["nextReviewAt"]),
        app.now + Duration::days(4)
    );
}

#[tokio::test]
async fn test_days_until_due_follows_local_calendar() {
    let app = create_test_app().await;
    onboard(&app).await;
    app.put("/api/users/me", Some(USER), json!({ "timezoneOffsetMinutes": 60 }))
        .await;

    // 23:00 UTC on the 9th is midnight of the 10th in UTC+01:00
    word_store::save_word(&app.db, USER, "apple", app.now - Duration::hours(10))
        .await
        .unwrap();

    let (status, body) = app.get("/api/words/apple/status", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    let next = parse_time(&body["data"]["status"]["nextReviewAt"]);
    assert_eq!(next, app.now + Duration::days(4) - Duration::hours(10));
    // UTC dates would give 3; the learner's next review falls on local 2024-03-14
    assert_eq!(body["data"]["status"]["daysUntilDue"], 4);
}

#[tokio::test]
async fn test_unknown_word_status_is_not_found() {
    let app = create_test_app().await;
    onboard(&app).await;
    let (status, body) = app.get("/api/words/kiwi/status", Some(USER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_record_review_updates_status() {
    let app = create_test_app().await;
    onboard(&app).await;
    word_store::save_word(&app.db, USER, "apple", app.now - Duration::days(20))
        .await
        .unwrap();

    let (status, body) = app
        .post("/api/words/apple/reviews", Some(USER), json!({ "success": false }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["reviewCount"], 1);
    assert_eq!(body["data"]["status"]["retention"], 1.0);
    // a failure restarts the fastest decay band
    assert_eq!(body["data"]["status"]["daysUntilDue"], 4);
}

#[tokio::test]
async fn test_record_review_rejects_bad_timestamps() {
    let app = create_test_app().await;
    onboard(&app).await;
    app.post("/api/words", Some(USER), json!({ "word": "apple" })).await;

    let future = (app.now + Duration::hours(1)).to_rfc3339();
    let (status, body) = app
        .post(
            "/api/words/apple/reviews",
            Some(USER),
            json!({ "success": true, "reviewedAt": future }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let before_save = (app.now - Duration::days(1)).to_rfc3339();
    let (status, _) = app
        .post(
            "/api/words/apple/reviews",
            Some(USER),
            json!({ "success": true, "reviewedAt": before_save }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/words/kiwi/reviews", Some(USER), json!({ "success": true }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_due_words_most_forgotten_first() {
    let app = create_test_app().await;
    onboard(&app).await;

    word_store::save_word(&app.db, USER, "recent", app.now - Duration::days(5))
        .await
        .unwrap();
    word_store::save_word(&app.db, USER, "ancient", app.now - Duration::days(30))
        .await
        .unwrap();
    app.post("/api/words", Some(USER), json!({ "word": "fresh" })).await;

    let (status, body) = app.get("/api/words/due", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);

    let due: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["word"].as_str().unwrap())
        .collect();
    assert_eq!(due, vec!["ancient", "recent"]);
    assert!(body["data"][0]["retention"].as_f64().unwrap() < body["data"][1]["retention"].as_f64().unwrap());
}

#[tokio::test]
async fn test_known_words_leave_due_list() {
    let app = create_test_app().await;
    onboard(&app).await;
    word_store::save_word(&app.db, USER, "zebra", app.now - Duration::days(10))
        .await
        .unwrap();

    let (_, body) = app.get("/api/words/due", Some(USER)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.put("/api/words/zebra/known", Some(USER), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isKnown"], true);

    let (_, body) = app.get("/api/words/due", Some(USER)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .put("/api/words/zebra/known", Some(USER), json!({ "isKnown": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isKnown"], false);

    let (status, _) = app.put("/api/words/kiwi/known", Some(USER), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Schedule
// ============================================================================

#[tokio::test]
async fn test_schedule_lifecycle() {
    let app = create_test_app().await;
    onboard(&app).await;

    app.post("/api/words", Some(USER), json!({ "word": "apple" })).await;
    word_store::save_word(&app.db, USER, "zebra", app.now - Duration::days(10))
        .await
        .unwrap();

    let (status, body) = app.get("/api/schedule/today", Some(USER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app
        .post("/api/schedule", Some(USER), json!({ "targetEndDate": "2024-03-13" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let plan = &body["data"]["plan"];
    assert_eq!(plan["metadata"]["daysRemaining"], 3);
    assert_eq!(plan["metadata"]["totalNewWords"], 6);
    assert_eq!(plan["metadata"]["dailyNewWords"], 2);
    assert_eq!(plan["metadata"]["testPracticeWordsCount"], 1);
    assert_eq!(plan["metadata"]["nonTestPracticeWordsCount"], 1);

    let days = plan["dailySchedules"].as_object().unwrap();
    assert_eq!(
        days.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["2024-03-10", "2024-03-11", "2024-03-12"]
    );
    assert_eq!(days["2024-03-10"]["newWords"], json!(["apple", "banana"]));
    assert_eq!(days["2024-03-11"]["newWords"], json!(["cherry", "date"]));
    assert_eq!(days["2024-03-12"]["newWords"], json!(["elder", "fig"]));

    // zebra's overdue projections collapse onto today, earliest review wins
    let practice = days["2024-03-10"]["nonTestPractice"].as_array().unwrap();
    assert_eq!(practice.len(), 1);
    assert_eq!(practice[0]["word"], "zebra");
    assert_eq!(practice[0]["reviewNumber"], 1);

    let (status, stored) = app.get("/api/schedule", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["data"]["plan"], *plan);
    assert_eq!(stored["data"]["targetEndDate"], "2024-03-13");

    let (status, today) = app.get("/api/schedule/today", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["data"], days["2024-03-10"]);
}

#[tokio::test]
async fn test_regeneration_replaces_previous_plan() {
    let app = create_test_app().await;
    onboard(&app).await;

    app.post("/api/schedule", Some(USER), json!({ "targetEndDate": "2024-03-20" }))
        .await;
    let (status, body) = app
        .post("/api/schedule", Some(USER), json!({ "targetEndDate": "2024-03-12" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stored) = app.get("/api/schedule", Some(USER)).await;
    assert_eq!(stored["data"]["id"], body["data"]["id"]);
    assert_eq!(stored["data"]["plan"]["dailySchedules"].as_object().unwrap().len(), 2);
    assert_eq!(stored["data"]["plan"]["metadata"]["dailyNewWords"], 3);
}

#[tokio::test]
async fn test_schedule_rejects_past_target_date() {
    let app = create_test_app().await;
    onboard(&app).await;

    for target in ["2024-03-10", "2024-01-01"] {
        let (status, body) = app
            .post("/api/schedule", Some(USER), json!({ "targetEndDate": target }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{target}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, _) = app.get("/api/schedule", Some(USER)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_known_words_are_not_planned() {
    let app = create_test_app().await;
    onboard(&app).await;

    word_store::save_word(&app.db, USER, "banana", app.now - Duration::days(3))
        .await
        .unwrap();
    app.put("/api/words/banana/known", Some(USER), json!({})).await;

    let (_, body) = app
        .post("/api/schedule", Some(USER), json!({ "targetEndDate": "2024-03-15" }))
        .await;
    let plan = &body["data"]["plan"];
    assert_eq!(plan["metadata"]["totalNewWords"], 5);
    assert_eq!(plan["metadata"]["testPracticeWordsCount"], 0);

    for day in plan["dailySchedules"].as_object().unwrap().values() {
        assert!(!day["newWords"].as_array().unwrap().contains(&json!("banana")));
        assert!(day["testPractice"].as_array().unwrap().iter().all(|p| p["word"] != "banana"));
    }
}

#[tokio::test]
async fn test_word_saved_today_then_known_is_not_planned() {
    let app = create_test_app().await;
    onboard(&app).await;

    let (status, _) = app.post("/api/words", Some(USER), json!({ "word": "apple" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.put("/api/words/apple/known", Some(USER), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/schedule", Some(USER), json!({ "targetEndDate": "2024-03-15" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let plan = &body["data"]["plan"];
    assert_eq!(plan["metadata"]["totalNewWords"], 5);

    for day in plan["dailySchedules"].as_object().unwrap().values() {
        assert!(!day["newWords"].as_array().unwrap().contains(&json!("apple")));
    }
}
