use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use spsync::{
    config::{self, Config},
    errors::SyncError,
    reference::TrackUri,
    resolver::TrackSearch,
    spotify::{SpotifyClient, library::ADD_TRACKS_CHUNK},
    sync::Library,
};

const ACCESS_TOKEN: &str = "access-1";
const REFRESH: &str = "refresh-1";
const TRACK_ID: &str = "BBBBBBBBBBBBBBBBBBBBBB";

/// Fake Web API that records every append request per playlist.
struct FakeApi {
    base: String,
    appends: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeApi {
    fn appends_to(&self, playlist_id: &str) -> Vec<Vec<String>> {
        self.appends
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == playlist_id)
            .map(|(_, uris)| uris.clone())
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {}", ACCESS_TOKEN).as_str())
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let valid = form.get("grant_type").map(String::as_str) == Some("refresh_token")
        && form.get("refresh_token").map(String::as_str) == Some(REFRESH);
    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response();
    }
    Json(json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "scope": "playlist-modify-private",
        "expires_in": 3600
    }))
    .into_response()
}

async fn saved_tracks(
    State(api): State<Arc<FakeApi>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let track = |id: &str| {
        json!({ "track": { "id": id, "name": "Song", "uri": format!("spotify:track:{}", id) } })
    };
    match params.get("offset").map(String::as_str) {
        None => Json(json!({
            "items": [track("AAAAAAAAAAAAAAAAAAAAAA")],
            "next": format!("{}/me/tracks?offset=1&limit=1", api.base),
            "total": 2
        }))
        .into_response(),
        Some("1") => Json(json!({
            "items": [track(TRACK_ID)],
            "next": null,
            "total": 2
        }))
        .into_response(),
        Some(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn playlist_items(Path(playlist_id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if playlist_id != "mixed" {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(json!({
        "items": [
            { "track": null },
            { "track": { "uri": "spotify:episode:CCCCCCCCCCCCCCCCCCCCCC", "type": "episode" } },
            { "track": { "uri": "spotify:local:artist:album:title:180", "is_local": true } },
            { "track": { "uri": format!("spotify:track:{}", TRACK_ID), "name": "Song" } }
        ],
        "next": null,
        "total": 4
    }))
    .into_response()
}

async fn append_items(
    State(api): State<Arc<FakeApi>>,
    Path(playlist_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|uris| {
            uris.iter()
                .filter_map(|uri| uri.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let earlier = api.appends_to(&playlist_id).len();
    api.appends
        .lock()
        .unwrap()
        .push((playlist_id.clone(), uris));

    match playlist_id.as_str() {
        "locked" => (StatusCode::FORBIDDEN, "nope").into_response(),
        // accepts the first chunk only
        "flaky" if earlier > 0 => (StatusCode::INTERNAL_SERVER_ERROR, "later").into_response(),
        _ => (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" }))).into_response(),
    }
}

async fn search(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if params.get("type").map(String::as_str) != Some("track") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let items = match params.get("q").map(String::as_str) {
        Some("isrc:JPAB01234567") => vec![json!({
            "id": TRACK_ID,
            "name": "Song",
            "uri": format!("spotify:track:{}", TRACK_ID)
        })],
        _ => Vec::new(),
    };
    let total = items.len();
    Json(json!({ "tracks": { "items": items, "next": null, "total": total } })).into_response()
}

async fn start_api_server() -> Arc<FakeApi> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api = Arc::new(FakeApi {
        base: format!("http://{}", listener.local_addr().unwrap()),
        appends: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/token", post(token))
        .route("/me/tracks", get(saved_tracks))
        .route("/playlists/{id}/tracks", get(playlist_items).post(append_items))
        .route("/search", get(search))
        .with_state(api.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    api
}

fn test_config(refresh_token: &str) -> Config {
    let refresh_token = refresh_token.to_string();
    Config::from_lookup(|name| match name {
        config::CLIENT_ID => Some("client".to_string()),
        config::CLIENT_SECRET => Some("secret".to_string()),
        config::REFRESH_TOKEN => Some(refresh_token.clone()),
        config::PLAYLIST_ID => Some("mixed".to_string()),
        _ => None,
    })
    .unwrap()
}

async fn connect(api: &FakeApi) -> SpotifyClient {
    SpotifyClient::connect_to(
        &test_config(REFRESH),
        format!("{}/", api.base),
        format!("{}/token", api.base),
    )
    .await
    .unwrap()
}

fn track_uris(count: usize) -> HashSet<TrackUri> {
    (0..count)
        .map(|i| TrackUri::from_id(&format!("{:0>22}", i)))
        .collect()
}

#[tokio::test]
async fn test_connect_rejects_revoked_refresh_token() {
    let api = start_api_server().await;

    let result = SpotifyClient::connect_to(
        &test_config("revoked"),
        api.base.clone(),
        format!("{}/token", api.base),
    )
    .await;

    match result {
        Err(SyncError::Auth(reason)) => assert!(reason.contains("400"), "{}", reason),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("revoked refresh token was accepted"),
    }
}

#[tokio::test]
async fn test_playlist_items_keep_only_tracks() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    let ids = client.list_playlist_track_ids("mixed").await.unwrap();
    assert_eq!(
        ids,
        HashSet::from([TrackUri::from_id(TRACK_ID)]),
        "null, episode and local entries are skipped"
    );
}

#[tokio::test]
async fn test_unknown_playlist_is_an_api_error() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    match client.list_playlist_track_ids("missing").await {
        Err(SyncError::Api { status, .. }) => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected result: {:?}", other.map(|ids| ids.len())),
    }
}

#[tokio::test]
async fn test_saved_tracks_follow_next_links() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    let ids = client.list_favorite_track_ids().await.unwrap();
    assert_eq!(
        ids,
        HashSet::from([
            TrackUri::from_id("AAAAAAAAAAAAAAAAAAAAAA"),
            TrackUri::from_id(TRACK_ID),
        ])
    );
}

#[tokio::test]
async fn test_append_is_split_into_chunks() {
    let api = start_api_server().await;
    let client = connect(&api).await;
    let uris = track_uris(150);

    client.add_tracks("target", &uris).await.unwrap();

    let requests = api.appends_to("target");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].len(), ADD_TRACKS_CHUNK);
    assert_eq!(requests[1].len(), 50);

    let sent: HashSet<TrackUri> = requests
        .iter()
        .flatten()
        .filter_map(|uri| TrackUri::parse(uri))
        .collect();
    assert_eq!(sent, uris);
}

#[tokio::test]
async fn test_rejected_append_reports_nothing_added() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    match client.add_tracks("locked", &track_uris(3)).await {
        Err(SyncError::Mutation { added, reason }) => {
            assert_eq!(added, 0);
            assert!(reason.contains("403"), "{}", reason);
            assert!(reason.contains("nope"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other.map_err(|e| e.to_string())),
    }
    assert_eq!(api.appends_to("locked").len(), 1);
}

#[tokio::test]
async fn test_failed_second_chunk_reports_first_chunk_added() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    match client.add_tracks("flaky", &track_uris(150)).await {
        Err(SyncError::Mutation { added, .. }) => assert_eq!(added, ADD_TRACKS_CHUNK),
        other => panic!("unexpected result: {:?}", other.map_err(|e| e.to_string())),
    }
}

#[tokio::test]
async fn test_search_by_isrc() {
    let api = start_api_server().await;
    let client = connect(&api).await;

    let found = client.search_by_exact_code("JPAB01234567").await.unwrap();
    assert_eq!(found, Some(TrackUri::from_id(TRACK_ID)));

    let missing = client.search_by_exact_code("XXXX00000000").await.unwrap();
    assert_eq!(missing, None);

    let candidates = client
        .search_by_title_artist("Song", "Artist", 5)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}
