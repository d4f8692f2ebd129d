//! End-to-end tests for the client against a stub provider bound to a
//! loopback port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use warp::Filter;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Reply;
use weather_core::{Config, ConnectionKind, WeatherClient, WeatherError};

type StubRoute = BoxedFilter<(Box<dyn Reply>,)>;

fn tokyo_payload() -> serde_json::Value {
    json!({
        "name": "Tokyo",
        "sys": {"country": "JP"},
        "main": {"temp": 25.5, "feels_like": 27.0, "humidity": 65, "pressure": 1013},
        "weather": [{"description": "clear sky", "main": "Clear"}],
        "wind": {"speed": 3.5, "deg": 180},
        "visibility": 10000
    })
}

/// Serve `route` on an ephemeral loopback port and return its address.
fn spawn_stub(route: StubRoute) -> SocketAddr {
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// A stub that answers every `GET /weather` with the given status and body.
fn fixed_response_stub(status: StatusCode, body: serde_json::Value) -> SocketAddr {
    let route = warp::path("weather")
        .map(move || {
            Box::new(warp::reply::with_status(warp::reply::json(&body), status)) as Box<dyn Reply>
        })
        .boxed();
    spawn_stub(route)
}

fn client_for(addr: SocketAddr) -> WeatherClient {
    let mut config = Config::default();
    config.api.base_url = format!("http://{addr}");
    config.api.timeout = 2;
    WeatherClient::new(&config, "test-key".to_string()).expect("client")
}

/// An address nothing is listening on.
fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}

#[tokio::test]
async fn fetch_maps_the_full_payload() {
    let addr = fixed_response_stub(StatusCode::OK, tokyo_payload());
    let client = client_for(addr);

    let record = client.fetch("Tokyo", None).await.expect("fetch");

    assert_eq!(record.city_name, "Tokyo");
    assert_eq!(record.country, "JP");
    assert_eq!(record.temperature, 25.5);
    assert_eq!(record.feels_like, 27.0);
    assert_eq!(record.humidity, 65);
    assert_eq!(record.pressure, 1013);
    assert_eq!(record.wind_speed, Some(3.5));
    assert_eq!(record.wind_direction, Some(180));
    assert_eq!(record.visibility, Some(10_000));
}

#[tokio::test]
async fn fetch_sends_the_expected_query_parameters() {
    let route = warp::path("weather")
        .and(warp::query::<HashMap<String, String>>())
        .map(|q: HashMap<String, String>| {
            let ok = q.get("q").map(String::as_str) == Some("Oslo")
                && q.get("appid").map(String::as_str) == Some("test-key")
                && q.get("units").map(String::as_str) == Some("metric")
                && q.get("lang").map(String::as_str) == Some("ja");
            let status = if ok { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };
            Box::new(warp::reply::with_status(warp::reply::json(&tokyo_payload()), status))
                as Box<dyn Reply>
        })
        .boxed();
    let client = client_for(spawn_stub(route));

    // Explicit language overrides the configured default ("en").
    client.fetch("Oslo", Some("ja")).await.expect("stub saw the expected parameters");
}

#[tokio::test]
async fn http_404_is_city_not_found_with_the_requested_name() {
    let addr = fixed_response_stub(StatusCode::NOT_FOUND, json!({"message": "city not found"}));
    let client = client_for(addr);

    match client.fetch("Atlantis", None).await.unwrap_err() {
        WeatherError::CityNotFound { city } => assert_eq!(city, "Atlantis"),
        other => panic!("expected CityNotFound, got {other:?}"),
    }

    // An empty city name is forwarded and classified the same way.
    match client.fetch("", None).await.unwrap_err() {
        WeatherError::CityNotFound { city } => assert_eq!(city, ""),
        other => panic!("expected CityNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn http_401_is_invalid_credential() {
    let addr = fixed_response_stub(StatusCode::UNAUTHORIZED, json!({"message": "bad key"}));
    let client = client_for(addr);

    let err = client.fetch("Tokyo", None).await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidCredential(_)), "got {err:?}");
}

#[tokio::test]
async fn other_non_200_is_a_provider_error_with_the_status() {
    let addr = fixed_response_stub(StatusCode::SERVICE_UNAVAILABLE, json!({}));
    let client = client_for(addr);

    match client.fetch("Tokyo", None).await.unwrap_err() {
        WeatherError::Provider { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, None);
        }
        other => panic!("expected Provider, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_200_is_a_provider_error_naming_the_field() {
    let body = json!({
        "name": "Tokyo",
        "sys": {"country": "JP"},
        "main": {"feels_like": 27.0, "humidity": 65, "pressure": 1013},
        "weather": [{"description": "clear sky", "main": "Clear"}]
    });
    let addr = fixed_response_stub(StatusCode::OK, body);
    let client = client_for(addr);

    match client.fetch("Tokyo", None).await.unwrap_err() {
        WeatherError::Provider { status, message } => {
            assert_eq!(status, 200);
            assert!(message.expect("message").contains("temp"));
        }
        other => panic!("expected Provider, got {other:?}"),
    }
}

#[tokio::test]
async fn absent_optional_fields_stay_absent() {
    let body = json!({
        "name": "Tokyo",
        "sys": {"country": "JP"},
        "main": {"temp": 25.5, "feels_like": 27.0, "humidity": 65, "pressure": 1013},
        "weather": [{"description": "clear sky", "main": "Clear"}]
    });
    let addr = fixed_response_stub(StatusCode::OK, body);
    let client = client_for(addr);

    let record = client.fetch("Tokyo", None).await.expect("fetch");
    assert_eq!(record.wind_speed, None);
    assert_eq!(record.wind_direction, None);
    assert_eq!(record.visibility, None);
}

#[tokio::test]
async fn slow_provider_is_a_timeout() {
    let route = warp::path("weather")
        .and_then(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<Box<dyn Reply>, warp::Rejection>(Box::new(warp::reply::json(&tokyo_payload())))
        })
        .boxed();
    let addr = spawn_stub(route);

    let mut config = Config::default();
    config.api.base_url = format!("http://{addr}");
    config.api.timeout = 1;
    let client = WeatherClient::new(&config, "test-key".to_string()).expect("client");

    match client.fetch("Tokyo", None).await.unwrap_err() {
        WeatherError::Connection { kind, .. } => assert_eq!(kind, ConnectionKind::Timeout),
        other => panic!("expected Connection, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let client = client_for(dead_addr());

    match client.fetch("Tokyo", None).await.unwrap_err() {
        WeatherError::Connection { kind, .. } => assert_eq!(kind, ConnectionKind::Unreachable),
        other => panic!("expected Connection, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_credential_is_false_only_for_a_rejected_key() {
    let rejected = client_for(fixed_response_stub(StatusCode::UNAUTHORIZED, json!({})));
    assert!(!rejected.validate_credential().await);

    let accepted = client_for(fixed_response_stub(StatusCode::OK, tokyo_payload()));
    assert!(accepted.validate_credential().await);
}

#[tokio::test]
async fn validate_credential_forgives_every_other_failure() {
    // A provider outage does not indict the key.
    let unreachable = client_for(dead_addr());
    assert!(unreachable.validate_credential().await);

    // Neither does a not-found for the reference city...
    let not_found = client_for(fixed_response_stub(StatusCode::NOT_FOUND, json!({})));
    assert!(not_found.validate_credential().await);

    // ...nor a provider-side error.
    let broken = client_for(fixed_response_stub(StatusCode::BAD_GATEWAY, json!({})));
    assert!(broken.validate_credential().await);
}
