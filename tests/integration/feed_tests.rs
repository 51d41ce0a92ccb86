//! Feed server endpoint tests

use super::common::{assert_feed_invariants, TestServer};

#[tokio::test]
async fn test_live_feed_invariants() {
    let server = TestServer::spawn().await;

    let feed = server.get_json("/live-feed").await;
    assert_feed_invariants(&feed);
}

#[tokio::test]
async fn test_consecutive_requests_are_each_valid() {
    let server = TestServer::spawn().await;

    let first = server.get_json("/live-feed").await;
    let second = server.get_json("/live-feed").await;

    assert_feed_invariants(&first);
    assert_feed_invariants(&second);
}

#[tokio::test]
async fn test_live_feed_top_level_fields() {
    let server = TestServer::spawn_with_seed(3).await;
    let feed = server.get_json("/live-feed").await;

    for key in [
        "elapsed_time",
        "race_id",
        "run_id",
        "run_name",
        "series_id",
        "time_of_day",
        "time_of_day_os",
        "track_id",
        "track_length",
        "track_name",
        "run_type",
        "number_of_caution_segments",
        "number_of_caution_laps",
        "number_of_lead_changes",
        "avg_diff_1to3",
    ] {
        assert!(!feed[key].is_null(), "{} missing", key);
    }

    let time = feed["time_of_day_os"].as_str().unwrap();
    assert!(time.ends_with("-05:00"));
    assert_eq!(feed["vehicles"][0]["delta"], 0.0);
}

#[tokio::test]
async fn test_same_seed_same_field() {
    let a = TestServer::spawn_with_seed(99).await;
    let b = TestServer::spawn_with_seed(99).await;

    let feed_a = a.get_json("/live-feed").await;
    let feed_b = b.get_json("/live-feed").await;

    assert_eq!(feed_a["race_id"], feed_b["race_id"]);
    assert_eq!(feed_a["vehicles"], feed_b["vehicles"]);
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;

    for path in ["/health", "/healthz"] {
        let body = server.get_json(path).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(
            body["message"],
            "Race feed mock is running. Use /live-feed for race data."
        );
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_ready_and_version() {
    let server = TestServer::spawn().await;

    let ready = server.get_json("/ready").await;
    assert_eq!(ready["ready"], true);

    let version = server.get_json("/version").await;
    assert_eq!(version["name"], "race-feed-simulator");
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));

    let root = server.get_json("/").await;
    let endpoints = root["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "/live-feed"));
}

#[tokio::test]
async fn test_stats_track_snapshots() {
    let server = TestServer::spawn().await;

    for _ in 0..3 {
        server.get_json("/live-feed").await;
    }

    let stats = server.get_json("/admin/stats").await;
    assert_eq!(stats["total_snapshots"], 3);
    assert_eq!(stats["total_vehicles"], 120);
    assert_eq!(stats["generation"]["count"], 3);
    assert_eq!(stats["draining"], false);

    let response = server.post("/admin/stats/reset").await;
    assert_eq!(response.status(), 204);

    let stats = server.get_json("/admin/stats").await;
    assert_eq!(stats["total_snapshots"], 0);
}

#[tokio::test]
async fn test_request_id_header() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "race-42")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "race-42");
}

#[tokio::test]
async fn test_cors_allows_browser_clients() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .get(server.url("/live-feed"))
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_unknown_path() {
    let server = TestServer::spawn().await;
    assert_eq!(server.get("/live-feed/old").await.status(), 404);
    assert!(server.addr.port() > 0);
}
