//! Integration tests for the cached forecast provider using wiremock and
//! on-disk storage.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use skyglance_weather::cache::DEFAULT_TTL;
use skyglance_weather::{
    build_client, CacheKey, CacheStorage, Clock, FileStorage, LocationResolver, WeatherCache,
    WeatherProvider, WeatherSnapshot,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct SteppedClock(AtomicI64);

impl Clock for SteppedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn cached_snapshot() -> WeatherSnapshot {
    serde_json::from_value(serde_json::json!({
        "current": {
            "temperature_2m": 33.0,
            "relative_humidity_2m": 18,
            "weather_code": 0,
            "wind_speed_10m": 14.0
        },
        "daily": {
            "time": ["2024-07-01", "2024-07-02", "2024-07-03", "2024-07-04", "2024-07-05", "2024-07-06", "2024-07-07"],
            "weather_code": [0, 0, 1, 0, 0, 2, 0],
            "temperature_2m_max": [36.0, 37.1, 35.4, 34.9, 36.2, 38.0, 37.5],
            "temperature_2m_min": [24.0, 24.5, 23.9, 23.1, 24.8, 25.0, 25.2]
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_prepopulated_file_cache_is_served_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
    let clock = Arc::new(SteppedClock(AtomicI64::new(5_000)));
    let cache = WeatherCache::with_clock(storage.clone(), clock, DEFAULT_TTL);

    let snapshot = cached_snapshot();
    cache.put(&CacheKey::place("Cairo").storage_key(), &snapshot).unwrap();
    assert!(storage.get("weather_Cairo").unwrap().is_some());

    let provider = WeatherProvider::with_endpoint(reqwest::Client::new(), &server.uri(), cache);
    let got = provider
        .fetch(12.0, 34.0, &CacheKey::place("Cairo"))
        .await
        .unwrap();
    assert_eq!(got, snapshot);
}

#[tokio::test]
async fn test_expired_file_entry_is_refetched_and_overwritten() {
    let server = MockServer::start().await;

    let mut fresh = cached_snapshot();
    fresh.current.temperature = 21.0;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fresh))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
    let clock = Arc::new(SteppedClock(AtomicI64::new(0)));
    let cache = WeatherCache::with_clock(storage.clone(), clock.clone(), Duration::from_secs(600));

    cache.put("weather_geo", &cached_snapshot()).unwrap();
    clock.0.store(600_000, Ordering::SeqCst);

    let provider = WeatherProvider::with_endpoint(
        reqwest::Client::new(),
        &format!("{}/v1/forecast", server.uri()),
        cache,
    );
    let got = provider.fetch(1.0, 2.0, &CacheKey::Geolocation).await.unwrap();
    assert_eq!(got.current.temperature, 21.0);

    let raw: serde_json::Value =
        serde_json::from_str(&storage.get("weather_geo").unwrap().unwrap()).unwrap();
    assert_eq!(raw["time"], 600_000);
    assert_eq!(raw["data"]["current"]["temperature_2m"], 21.0);
}

#[tokio::test]
async fn test_shared_client_serves_resolver_and_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"name": "Alexandria", "admin1": "Alexandria", "country": "Egypt", "latitude": 31.2, "longitude": 29.92}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cached_snapshot()))
        .mount(&server)
        .await;

    let client = build_client(Duration::from_secs(5)).unwrap();
    let resolver = LocationResolver::with_endpoint(
        client.clone(),
        &format!("{}/v1/search", server.uri()),
        "ar",
    );
    let dir = tempfile::tempdir().unwrap();
    let provider = WeatherProvider::with_endpoint(
        client,
        &format!("{}/v1/forecast", server.uri()),
        WeatherCache::new(Arc::new(FileStorage::new(dir.path()).unwrap())),
    );

    let coords = resolver.resolve("Alexandria").await.unwrap();
    assert_eq!(coords.display_name, "Alexandria، Alexandria، Egypt");

    let snapshot = provider
        .fetch(coords.latitude, coords.longitude, &CacheKey::place("Alexandria"))
        .await
        .unwrap();
    assert_eq!(snapshot.daily.days().len(), 7);
}
