//! Integration tests for the Spotify client.
//!
//! These tests point the client at a local mock server standing in for the
//! Spotify Web API and check request shapes, response reshaping, credential
//! handling and error remapping.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use spotify_api::clients::spotify::{SpotifyClient, SpotifyError, TimeRange};
use spotify_api::clients::ErrorKind;
use spotify_api::{ClientConfig, InvalidArgumentError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client for `server` with its `/v1` prefix, as the real origin has.
fn client_for(server: &MockServer) -> SpotifyClient {
    SpotifyClient::for_access_token(
        "tok",
        Some(
            ClientConfig::builder()
                .base_origin(format!("{}/v1", server.uri()))
                .base_retry_delay_ms(10),
        ),
    )
    .unwrap()
}

fn track(id: &str, name: &str, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": artists.iter().map(|a| json!({"name": a})).collect::<Vec<_>>(),
        "uri": format!("spotify:track:{id}"),
        "preview_url": null,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{id}")},
        "popularity": 50
    })
}

async fn mount_top_tracks(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

/// Serves a 200 whose body is cut short: the advertised length is never
/// delivered before the connection closes. Returns the origin and a hit counter.
fn truncated_body_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            counter.fetch_add(1, Ordering::SeqCst);

            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }

            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"is_playing\": tr",
            );
            let _ = stream.flush();
            let _ = stream.shutdown(Shutdown::Both);
        }
    });

    (format!("http://{addr}"), hits)
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_calls_carry_bearer_token_until_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "display_name": "User One",
            "email": "one@example.com",
            "country": "SE",
            "product": "premium",
            "followers": {"href": null, "total": 3},
            "external_urls": {"spotify": "https://open.spotify.com/user/user-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);

    let profile = client.user_profile().await.unwrap();
    assert_eq!(profile.id, "user-1");
    assert_eq!(profile.product.as_deref(), Some("premium"));
    assert_eq!(profile.followers, Some(3));

    // Without the header the authenticated mock no longer matches
    client.clear_access_token();
    let error = client.user_profile().await.unwrap_err();
    assert_eq!(error.status_code(), 404);
}

#[tokio::test]
async fn test_set_access_token_replaces_previous_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/devices"))
        .and(header("Authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_access_token("second").unwrap();

    let devices = client.available_devices().await.unwrap();
    assert_eq!(devices.total, 0);
    assert!(devices.active_device.is_none());
}

#[test]
fn test_invalid_tokens_fail_synchronously() {
    let mut client = SpotifyClient::new(None);

    for token in [Some(""), None] {
        let error = client.set_access_token(token).unwrap_err();
        assert_eq!(error, InvalidArgumentError::MissingAccessToken);
        assert_eq!(error.to_string(), "Access token is required");
    }
}

// ============================================================================
// Domain Operations
// ============================================================================

#[tokio::test]
async fn test_followed_artists_sends_cursor_and_reshapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("limit", "2"))
        .and(query_param("after", "prev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {
                "items": [
                    {"id": "a1", "name": "One", "genres": ["pop"], "followers": {"total": 10},
                     "popularity": 70, "uri": "spotify:artist:a1"},
                    {"id": "a2", "name": "Two", "genres": [], "followers": {"total": 5},
                     "popularity": 20, "uri": "spotify:artist:a2"}
                ],
                "next": null,
                "total": 2,
                "cursors": {"after": null},
                "limit": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.followed_artists(2, Some("prev")).await.unwrap();

    assert_eq!(page.artists.len(), 2);
    assert_eq!(page.artists[0].name, "One");
    assert_eq!(page.artists[1].followers, Some(5));
    assert_eq!(page.total, Some(2));
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_top_tracks_are_indexed_from_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .and(query_param("limit", "2"))
        .and(query_param("time_range", "short_term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track("t1", "Song A", &["X", "Y"]), track("t2", "Song B", &["Z"])]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tracks = client.top_tracks(2, TimeRange::ShortTerm).await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!((tracks[0].index, tracks[0].artist.as_str()), (1, "X, Y"));
    assert_eq!((tracks[1].index, tracks[1].uri.as_str()), (2, "spotify:track:t2"));
}

#[tokio::test]
async fn test_start_playback_body_and_device() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .and(query_param("device_id", "dev-1"))
        .and(body_json(json!({"uris": ["spotify:track:t1"]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let ack = client.play_track("spotify:track:t1", Some("dev-1")).await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message, "Playback started");

    let ack = client.start_playback(&[], None).await.unwrap();
    assert_eq!(ack.message, "Playback started");
}

#[tokio::test]
async fn test_pause_playback_acknowledges() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ack = client.pause_playback(None).await.unwrap();

    assert!(ack.success);
    assert_eq!(ack.message, "Playback paused");
}

#[tokio::test]
async fn test_play_top_track_plays_selected_track() {
    let server = MockServer::start().await;
    mount_top_tracks(
        &server,
        vec![
            track("t1", "First", &["A"]),
            track("t2", "Second", &["B", "C"]),
        ],
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .and(body_json(json!({"uris": ["spotify:track:t2"]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.play_top_track(2, None).await.unwrap();

    assert!(result.success);
    assert_eq!(result.message, "Now playing: Second by B, C");
    assert_eq!(result.track.index, 2);
}

#[tokio::test]
async fn test_play_top_track_beyond_available_tracks() {
    let server = MockServer::start().await;
    mount_top_tracks(&server, vec![track("t1", "Only", &["A"])]).await;

    let client = client_for(&server);
    let error = client.play_top_track(3, None).await.unwrap_err();

    assert!(matches!(
        error,
        SpotifyError::InvalidArgument(InvalidArgumentError::TopTrackUnavailable {
            index: 3,
            available: 1
        })
    ));
    assert_eq!(error.to_string(), "Only 1 tracks available");
}

#[tokio::test]
async fn test_playback_state_and_nothing_playing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device": {"id": "d1", "name": "Laptop", "type": "Computer", "is_active": true,
                       "is_private_session": false, "is_restricted": false, "volume_percent": 30},
            "shuffle_state": true,
            "repeat_state": "context",
            "progress_ms": 42,
            "is_playing": true,
            "currently_playing_type": "track",
            "item": track("t1", "Song", &["A", "B"])
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let state = client.current_playback().await.unwrap().unwrap();
    assert!(state.is_playing && state.shuffle_state);
    assert_eq!(state.device.map(|d| d.device_type), Some("Computer".to_string()));
    assert_eq!(state.item.map(|i| i.artist), Some("A, B".to_string()));

    assert!(client.currently_playing().await.unwrap().is_none());
}

#[tokio::test]
async fn test_truncated_player_body_is_an_error_not_nothing_playing() {
    let (origin, hits) = truncated_body_server();
    let client = SpotifyClient::for_access_token(
        "tok",
        Some(ClientConfig::builder().base_origin(origin).base_retry_delay_ms(10)),
    )
    .unwrap();

    let error = client.currently_playing().await.unwrap_err();

    let api = error.as_api_error().expect("normalized API error");
    assert_eq!(api.kind(), ErrorKind::NetworkFailure);
    assert_eq!(error.status_code(), 0);
    // Spotify's ceiling is two retries
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_available_devices_reports_active_device() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                {"id": "d1", "name": "Laptop", "type": "Computer", "is_active": false,
                 "is_private_session": false, "is_restricted": false, "volume_percent": 30},
                {"id": "d2", "name": "Kitchen", "type": "Speaker", "is_active": true,
                 "is_private_session": false, "is_restricted": false, "volume_percent": 80}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let devices = client.available_devices().await.unwrap();

    assert_eq!(devices.total, 2);
    assert_eq!(
        devices.active_device.and_then(|d| d.id),
        Some("d2".to_string())
    );
}

#[tokio::test]
async fn test_malformed_success_payload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.user_profile().await.unwrap_err();

    assert!(matches!(
        error,
        SpotifyError::UnexpectedPayload { operation: "user_profile", .. }
    ));
}

// ============================================================================
// Error Remapping
// ============================================================================

#[tokio::test]
async fn test_401_asks_to_reauthenticate_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"status": 401, "message": "The access token expired"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.available_devices().await.unwrap_err();
    let api_error = error.as_api_error().unwrap();

    assert!(error.to_string().contains("re-authenticate"));
    assert!(!error.to_string().contains("access token expired"));
    assert_eq!(api_error.kind(), ErrorKind::AuthExpired);
    assert_eq!(api_error.data().unwrap()["error"]["status"], 401);
}

#[tokio::test]
async fn test_403_premium_required() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"status": 403, "message": "Player command failed: Premium required",
                      "reason": "PREMIUM_REQUIRED"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.pause_playback(None).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "Spotify Premium subscription required for this action."
    );
    assert_eq!(error.status_code(), 403);
}

#[tokio::test]
async fn test_429_message_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let error = client.top_tracks(10, TimeRange::default()).await.unwrap_err();
    assert_eq!(error.to_string(), "Rate limit exceeded. Retry after 5 seconds.");

    let error = client.followed_artists(20, None).await.unwrap_err();
    assert_eq!(error.to_string(), "Rate limit exceeded. Retry after a few seconds.");
}

#[tokio::test]
async fn test_server_errors_retry_with_spotify_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.user_profile().await.unwrap_err();

    assert_eq!(error.status_code(), 503);
    assert_eq!(error.to_string(), "Service Unavailable");
}

#[tokio::test]
async fn test_timeout_override_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let client = SpotifyClient::for_access_token(
        "tok",
        Some(
            ClientConfig::builder()
                .base_origin(format!("{}/v1", server.uri()))
                .timeout_ms(30)
                .max_retries(0),
        ),
    )
    .unwrap();

    let error = client.user_profile().await.unwrap_err();
    assert_eq!(error.to_string(), "No response received from server");
    assert_eq!(error.status_code(), 0);
}
