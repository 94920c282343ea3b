//! HTTP surface tests
//!
//! Drives the router directly with in-memory catalog and device doubles.

mod support;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use jellyroku::models::{CatalogItem, ItemKind, Library, MediaKind};
use jellyroku::server::{router, AppState};
use jellyroku::Config;
use support::{FakeCatalog, FakeLauncher};

fn config() -> Config {
    Config {
        jellyfin_url: "http://jf:8096".into(),
        user_id: "user-1".into(),
        roku_url: "http://roku:8060".into(),
        default_library: "lib-tv".into(),
        ..Default::default()
    }
}

fn app(
    catalog: FakeCatalog,
    launcher: FakeLauncher,
    config: Config,
) -> (Arc<FakeCatalog>, Arc<FakeLauncher>, Router) {
    let catalog = Arc::new(catalog);
    let launcher = Arc::new(launcher);
    let state = AppState::new(config, catalog.clone(), launcher.clone());
    (catalog, launcher, router(state))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// =============================================================================
// Play Endpoints
// =============================================================================

#[tokio::test]
async fn test_play_movie_returns_empty_ok() {
    let (_, launcher, app) = app(
        FakeCatalog::new().with_item("mv-1", ItemKind::Movie),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/play/mv-1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(
        launcher.launches(),
        vec![("mv-1".to_string(), MediaKind::Movie)]
    );
}

#[tokio::test]
async fn test_play_failure_is_plain_text_500() {
    let (catalog, launcher, app) = app(
        FakeCatalog::new().with_series("series-0", &[]),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/play/series-0").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "play failed: NoPlayableDescendants\n");
    assert!(catalog.resets().is_empty());
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn test_play_launch_rejected_is_500() {
    let (_, _, app) = app(
        FakeCatalog::new().with_item("ep-1", ItemKind::Episode),
        FakeLauncher::rejecting(500),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/play/ep-1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.lines().count(), 1);
    assert!(body.contains("DeviceRejected"));
}

#[tokio::test]
async fn test_post_episodes_plays_random_episode() {
    let (catalog, launcher, app) = app(
        FakeCatalog::new()
            .with_season("show", "S1", &["e1", "e2"])
            .with_season("show", "S2", &["e3"]),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::POST, "/series/show/episodes").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    let launches = launcher.launches();
    assert_eq!(launches.len(), 1);
    assert!(["e1", "e2", "e3"].contains(&launches[0].0.as_str()));
    assert_eq!(launches[0].1, MediaKind::Episode);
    assert_eq!(catalog.resets()[0].1, launches[0].0);
}

#[tokio::test]
async fn test_post_episodes_without_episodes_fails() {
    let (_, launcher, app) = app(FakeCatalog::new(), FakeLauncher::new(), config());

    let (status, _) = send(app, Method::POST, "/series/empty/episodes").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(launcher.launches().is_empty());
}

// =============================================================================
// Listing Endpoints
// =============================================================================

#[tokio::test]
async fn test_get_seasons() {
    let (_, _, app) = app(
        FakeCatalog::new()
            .with_season("show", "S1", &["e1"])
            .with_season("show", "S2", &["e2"]),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/series/show/seasons").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value, serde_json::json!([{"Id": "S1"}, {"Id": "S2"}]));
}

#[tokio::test]
async fn test_get_episodes_lists_flattened_without_playing() {
    let (catalog, launcher, app) = app(
        FakeCatalog::new()
            .with_season("show", "S1", &["e1", "e2"])
            .with_season("show", "S2", &["e3"]),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/series/show/episodes").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"Id": "e1"}, {"Id": "e2"}, {"Id": "e3"}])
    );
    assert!(catalog.resets().is_empty());
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn test_get_library_passthrough() {
    let (_, _, app) = app(
        FakeCatalog::new().with_library(
            "lib-1",
            vec![CatalogItem::new("m1", "Heat", ItemKind::Movie)],
        ),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/library/lib-1").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["TotalRecordCount"], 1);
    assert_eq!(value["Items"][0]["Id"], "m1");
    assert_eq!(value["Items"][0]["Type"], "Movie");
}

#[tokio::test]
async fn test_get_library_failure() {
    let (_, _, app) = app(FakeCatalog::new(), FakeLauncher::new(), config());

    let (status, body) = send(app, Method::GET, "/library/missing").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "catalog request failed: CatalogRejected\n");
}

#[tokio::test]
async fn test_default_library_listing() {
    let (catalog, _, app) = app(
        FakeCatalog::new().with_library(
            "lib-tv",
            vec![CatalogItem::new("s1", "Andor", ItemKind::Series)],
        ),
        FakeLauncher::new(),
        config(),
    );

    let (status, body) = send(app, Method::GET, "/series/").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["Items"][0]["Name"], "Andor");
    assert_eq!(catalog.calls(), vec!["library:lib-tv"]);
}

#[tokio::test]
async fn test_index_lists_configured_libraries() {
    let config = config().with_libraries(vec![
        Library {
            id: "lib-movies".into(),
            name: "Movies".into(),
        },
        Library {
            id: "lib-tv".into(),
            name: "Shows".into(),
        },
    ]);
    let (_, _, app) = app(
        FakeCatalog::new()
            .with_library("lib-movies", vec![CatalogItem::new("m1", "Heat", ItemKind::Movie)])
            .with_library("lib-tv", vec![]),
        FakeLauncher::new(),
        config,
    );

    let (status, body) = send(app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["roku_url"], "http://roku:8060");
    assert_eq!(value["libraries"][0]["Name"], "Movies");
    assert_eq!(value["libraries"][0]["Items"][0]["Id"], "m1");
    assert_eq!(value["libraries"][1]["TotalRecordCount"], 0);
}

#[tokio::test]
async fn test_index_fails_when_a_library_fails() {
    let config = config().with_libraries(vec![Library {
        id: "broken".into(),
        name: "Broken".into(),
    }]);
    let (_, _, app) = app(FakeCatalog::new(), FakeLauncher::new(), config);

    let (status, _) = send(app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
