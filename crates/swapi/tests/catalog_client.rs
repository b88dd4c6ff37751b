//! Integration tests for [`SwapiClient`] against an in-process fake
//! catalog.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::body::{Body, Bytes};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::{self, StreamExt};
use serde_json::json;

use common::fixtures;
use holonet_swapi::{CatalogError, SwapiClient};

fn catalog_router() -> Router {
    Router::new()
        .route(
            "/api/people",
            get(|| async {
                Json(json!([
                    fixtures::character_json(1, "Luke Skywalker"),
                    fixtures::character_json(5, "Leia Organa"),
                ]))
            }),
        )
        .route(
            "/api/people/{id}",
            get(|Path(id): Path<u32>| async move {
                match id {
                    1 => Ok(Json(fixtures::character_json(1, "Luke Skywalker"))),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            }),
        )
        .route(
            "/api/starships",
            get(|| async { Json(json!([fixtures::starship_json(10, "Millennium Falcon")])) }),
        )
        .route(
            "/api/starships/{id}",
            get(|Path(id): Path<u32>| async move {
                Json(fixtures::starship_json(id, "Millennium Falcon"))
            }),
        )
        .route(
            "/api/films",
            get(|| async {
                Json(json!([
                    fixtures::film_json(5, "The Empire Strikes Back"),
                    fixtures::film_json(4, "A New Hope"),
                ]))
            }),
        )
        .route(
            "/api/films/{id}",
            get(|Path(id): Path<i64>| async move { Json(fixtures::film_json(id, "A New Hope")) }),
        )
        .route(
            "/api/planets",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let page = params.get("page").cloned().unwrap_or_default();
                let search = params.get("search").cloned().unwrap_or_default();
                Json(json!([fixtures::planet_json(1, &format!("page={page};search={search}"))]))
            }),
        )
        .route(
            "/api/planets/{id}",
            get(|Path(id): Path<u32>| async move { Json(fixtures::planet_json(id, "Tatooine")) }),
        )
        .route("/api/rate-limited", get(|| async { StatusCode::TOO_MANY_REQUESTS }))
        .route("/api/broken", get(|| async { StatusCode::BAD_GATEWAY }))
        .route("/api/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
        .route(
            "/api/garbage",
            get(|| async { Json(json!({"name": "Luke Skywalker"})) }),
        )
        .route("/api/not-json", get(|| async { "<html>maintenance</html>" }))
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(fixtures::character_json(1, "Luke Skywalker"))
            }),
        )
        .route(
            "/api/stalled",
            get(|| async {
                // Headers and the first byte go out at once; the rest never
                // arrives within the client timeout.
                let head = stream::once(async {
                    Ok::<_, std::convert::Infallible>(Bytes::from_static(b"["))
                });
                let tail = stream::once(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(Bytes::from_static(b"]"))
                });
                Body::from_stream(head.chain(tail))
            }),
        )
}

async fn client() -> SwapiClient {
    let base = common::spawn_catalog(catalog_router()).await;
    SwapiClient::new(base).unwrap()
}

// ---------------------------------------------------------------------------
// Successful fetches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_character_collection() {
    let characters = client().await.get_characters().await.unwrap();
    let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Luke Skywalker", "Leia Organa"]);
}

#[tokio::test]
async fn fetches_single_character_by_id() {
    let luke = client().await.get_character("1").await.unwrap();
    assert_eq!(luke.name, "Luke Skywalker");
}

#[tokio::test]
async fn fetches_by_absolute_url_verbatim() {
    let base = common::spawn_catalog(catalog_router()).await;
    // The client's own base points elsewhere; the absolute URL must win.
    let client = SwapiClient::new("http://127.0.0.1:1/api").unwrap();
    let falcon = client
        .get_starship_by_url(&format!("{base}/starships/10"))
        .await
        .unwrap();
    assert_eq!(falcon.name, "Millennium Falcon");
}

#[tokio::test]
async fn fetches_films_in_upstream_order() {
    let films = client().await.get_films().await.unwrap();
    let episodes: Vec<i64> = films.iter().map(|f| f.episode_id).collect();
    assert_eq!(episodes, vec![5, 4]);
}

#[tokio::test]
async fn fetches_single_film_and_starships() {
    let client = client().await;
    assert_eq!(client.get_film("4").await.unwrap().episode_id, 4);
    assert_eq!(client.get_starships().await.unwrap().len(), 1);
    assert_eq!(client.get_starship("10").await.unwrap().mglt, "75");
}

#[tokio::test]
async fn planets_append_page_and_search_params() {
    let client = client().await;

    let planets = client.get_planets(2, Some("tat")).await.unwrap();
    assert_eq!(planets[0].name, "page=2;search=tat");

    let planets = client.get_planets(1, None).await.unwrap();
    assert_eq!(planets[0].name, "page=1;search=");

    let planets = client.get_planets(1, Some("")).await.unwrap();
    assert_eq!(planets[0].name, "page=1;search=");

    assert_eq!(client.get_planet("1").await.unwrap().name, "Tatooine");
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_entity_is_not_found() {
    let err = client().await.get_character("999").await.unwrap_err();
    assert_matches!(err, CatalogError::NotFound { .. });
    assert_eq!(err.to_string(), "Resource not found");
}

#[tokio::test]
async fn status_codes_map_to_taxonomy() {
    let client = client().await;
    let base = client.base_url().to_string();

    let err = client.get_character_by_url(&format!("{base}/rate-limited")).await.unwrap_err();
    assert_matches!(err, CatalogError::RateLimited { .. });

    let err = client.get_character_by_url(&format!("{base}/broken")).await.unwrap_err();
    assert_matches!(err, CatalogError::ServerError { status: 502, .. });

    let err = client.get_character_by_url(&format!("{base}/teapot")).await.unwrap_err();
    assert_eq!(err.to_string(), "API error (418)");
}

#[tokio::test]
async fn unreachable_catalog_is_network_error() {
    let client = SwapiClient::new(common::unreachable_base().await).unwrap();
    let err = client.get_characters().await.unwrap_err();
    assert_matches!(err, CatalogError::Network { .. });
    assert!(err.is_transient());
}

#[tokio::test]
async fn timeout_is_network_error() {
    let base = common::spawn_catalog(catalog_router()).await;
    let client = SwapiClient::with_timeout(base.clone(), Duration::from_millis(100)).unwrap();
    let err = client.get_character_by_url(&format!("{base}/slow")).await.unwrap_err();
    assert_matches!(err, CatalogError::Network { .. });
}

#[tokio::test]
async fn body_stalled_past_timeout_is_network_error() {
    let base = common::spawn_catalog(catalog_router()).await;
    let client = SwapiClient::with_timeout(base.clone(), Duration::from_millis(300)).unwrap();
    let err = client.get_character_by_url(&format!("{base}/stalled")).await.unwrap_err();
    assert_matches!(err, CatalogError::Network { .. });
    assert!(err.is_transient());
}

#[tokio::test]
async fn schema_mismatch_surfaces_validation_error() {
    let client = client().await;
    let base = client.base_url().to_string();
    let err = client.get_character_by_url(&format!("{base}/garbage")).await.unwrap_err();
    assert_matches!(err, CatalogError::Validation { entity: "character", .. });
}

#[tokio::test]
async fn non_json_body_surfaces_validation_error() {
    let client = client().await;
    let base = client.base_url().to_string();
    let err = client.get_character_by_url(&format!("{base}/not-json")).await.unwrap_err();
    assert_matches!(err, CatalogError::Validation { .. });
}
