//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Weather adapter against a mock OpenWeatherMap server
//! - Full lookup flow through `WeatherLookupService`
//! - Configuration feeding the adapter

use std::{sync::Arc, time::Duration};

use application::{
    ApplicationError, FetchOutcome, WeatherLookupService, WeatherPort, format_fetch_state,
};
use domain::{CityName, UnitSystem};
use infrastructure::{AppConfig, WeatherAdapter};
use integration_weather::WeatherConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "main": { "temp": 24.3, "humidity": 65 },
        "wind": { "speed": 3.4 },
        "cod": 200
    })
}

/// Five days of 3-hour slots starting Monday 2024-01-15
fn forecast_body() -> serde_json::Value {
    let mut list = Vec::new();
    for day in 15..=19 {
        for hour in (0u32..24).step_by(3) {
            list.push(serde_json::json!({
                "dt_txt": format!("2024-01-{day} {hour:02}:00:00"),
                "main": { "temp": 20.0 + f64::from(hour) / 4.0, "humidity": 70 },
                "wind": { "speed": 2.5 }
            }));
        }
    }
    serde_json::json!({ "cod": "200", "list": list })
}

fn adapter_for(mock_server: &MockServer) -> WeatherAdapter {
    WeatherAdapter::with_config(WeatherConfig {
        base_url: mock_server.uri(),
        api_key: "test-key".to_string(),
        timeout_secs: 1,
    })
    .unwrap()
}

fn service_for(mock_server: &MockServer) -> WeatherLookupService {
    WeatherLookupService::new(
        Arc::new(adapter_for(mock_server)),
        CityName::new("Falakata").unwrap(),
        UnitSystem::Metric,
    )
}

async fn mount_success(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Falakata")))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(mock_server)
        .await;
}

// ============================================================================
// Adapter Tests
// ============================================================================

mod adapter_tests {
    use super::*;

    #[tokio::test]
    async fn current_conditions_are_mapped() {
        let mock_server = MockServer::start().await;
        mount_success(&mock_server).await;

        let city = CityName::new("Falakata").unwrap();
        let current = adapter_for(&mock_server)
            .get_current_conditions(&city, UnitSystem::Metric)
            .await
            .unwrap();

        assert_eq!(current.location_name, "Falakata");
        assert_eq!(current.temperature, Some(24.3));
        assert_eq!(current.humidity.map(u8::from), Some(65));
        assert_eq!(current.wind_speed, Some(3.4));
    }

    #[tokio::test]
    async fn forecast_returns_raw_feed() {
        let mock_server = MockServer::start().await;
        mount_success(&mock_server).await;

        let city = CityName::new("Falakata").unwrap();
        let entries = adapter_for(&mock_server)
            .get_forecast(&city, UnitSystem::Metric)
            .await
            .unwrap();

        assert_eq!(entries.len(), 40);
    }

    #[tokio::test]
    async fn unknown_city_maps_to_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&mock_server)
            .await;

        let city = CityName::new("Atlantis").unwrap();
        let result = adapter_for(&mock_server)
            .get_current_conditions(&city, UnitSystem::Metric)
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn imperial_units_reach_the_wire() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "imperial"))
            .and(query_param("q", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Oslo")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let city = CityName::new("Oslo").unwrap();
        let result = adapter_for(&mock_server)
            .get_current_conditions(&city, UnitSystem::Imperial)
            .await;

        assert!(result.is_ok());
    }
}

// ============================================================================
// Lookup Flow Tests
// ============================================================================

mod lookup_flow_tests {
    use super::*;

    #[tokio::test]
    async fn initial_load_renders_four_days() {
        let mock_server = MockServer::start().await;
        mount_success(&mock_server).await;
        let svc = service_for(&mock_server);

        let outcome = svc.initial_load().await;

        assert_eq!(outcome, FetchOutcome::Completed);
        let state = svc.snapshot();
        assert_eq!(state.daily.len(), 4);

        let view = format_fetch_state(&state);
        assert!(view.starts_with("Falakata\n24.3°C\nHumidity: 65%\nWind Speed: 3.4 m/s"));
        assert!(view.contains("4-Day Forecast (Celsius)"));
        for weekday in ["Monday", "Tuesday", "Wednesday", "Thursday"] {
            assert!(view.contains(weekday), "missing {weekday} in {view}");
        }
        assert!(!view.contains("Friday"));
        assert!(view.contains("Monday\n23°C"));
    }

    #[tokio::test]
    async fn not_found_skips_forecast_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(0)
            .mount(&mock_server)
            .await;
        let svc = service_for(&mock_server);

        let outcome = svc.search("Atlantis").await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Failed(ref f) if f.status == Some(404)));
        assert_eq!(format_fetch_state(&svc.snapshot()), "Error: City not found");
    }

    #[tokio::test]
    async fn timeout_is_reported_as_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body("Falakata"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;
        let svc = service_for(&mock_server);

        let outcome = svc.initial_load().await;

        let FetchOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.message, "City not found");
        assert!(failure.status.is_none());
        assert!(!svc.snapshot().loading);
    }

    #[tokio::test]
    async fn toggling_units_refetches_in_imperial() {
        let mock_server = MockServer::start().await;
        for units in ["metric", "imperial"] {
            Mock::given(method("GET"))
                .and(path("/weather"))
                .and(query_param("units", units))
                .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Falakata")))
                .expect(1)
                .mount(&mock_server)
                .await;
            Mock::given(method("GET"))
                .and(path("/forecast"))
                .and(query_param("units", units))
                .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
                .expect(1)
                .mount(&mock_server)
                .await;
        }
        let svc = service_for(&mock_server);

        svc.initial_load().await;
        let outcome = svc.toggle_unit().await;

        assert_eq!(outcome, FetchOutcome::Completed);
        let view = format_fetch_state(&svc.snapshot());
        assert!(view.contains("24.3°F"));
        assert!(view.contains("3.4 mph"));
        assert!(view.contains("(Fahrenheit)"));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[tokio::test]
    async fn configured_adapter_talks_to_base_url() {
        let mock_server = MockServer::start().await;
        mount_success(&mock_server).await;

        let mut config = AppConfig::default();
        config.weather.base_url = mock_server.uri();
        config.set_api_key("test-key");
        assert!(config.validate().is_ok());

        let adapter = WeatherAdapter::with_config(config.weather.to_weather_config()).unwrap();
        let city = config.lookup.default_city().unwrap();
        let current = adapter
            .get_current_conditions(&city, config.lookup.default_units)
            .await
            .unwrap();

        assert_eq!(current.location_name, "Falakata");
    }

    #[test]
    fn adapter_without_key_is_rejected() {
        let config = AppConfig::default();
        let result = WeatherAdapter::with_config(config.weather.to_weather_config());
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }
}
