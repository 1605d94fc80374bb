// External weather data provider
//
// This module wraps outbound calls to the National Weather Service API.
// Every call carries a fixed User-Agent and Accept header, runs under a
// bounded timeout, and is attempted exactly once. Any failure is logged with
// its underlying reason and surfaces to callers as `None`, so downstream
// formatting code stays free of failure branches.

use log::error;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::errors::{ProviderError, ServerError};

const GEO_JSON: &str = "application/geo+json";
const UNKNOWN: &str = "Unknown";

/// HTTP client for the NWS API
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    /// Build a client from provider settings
    pub fn new(settings: &ProviderSettings) -> Result<Self, ServerError> {
        let http = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ServerError::ExternalService(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL for active alerts in a state
    pub fn alerts_url(&self, state: &str) -> String {
        format!("{}/alerts?area={}", self.base_url, state)
    }

    /// URL for the gridpoint metadata of a coordinate pair
    pub fn points_url(&self, latitude: f64, longitude: f64) -> String {
        format!("{}/points/{:.4},{:.4}", self.base_url, latitude, longitude)
    }

    /// Perform one GET request and decode the JSON body. Returns `None` on
    /// any failure; the reason is kept in the log sink.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        match self.try_fetch(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("weather request to {} failed: {}", url, e);
                None
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let response = self.http.get(url).header(ACCEPT, GEO_JSON).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

/// Properties of one weather alert
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlertProperties {
    pub event: Option<String>,
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub headline: Option<String>,
}

/// One feature of an alerts feature collection
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlertFeature {
    #[serde(default)]
    pub properties: AlertProperties,
}

/// Response body of the alerts endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

/// Properties of the points endpoint, carrying the forecast URL
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PointsProperties {
    pub forecast: Option<String>,
}

/// Response body of the points endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub properties: PointsProperties,
}

/// One forecast period
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_unit: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub short_forecast: Option<String>,
}

/// Properties of the forecast endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

/// Response body of the forecast endpoint
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub properties: ForecastProperties,
}

/// Render one alert as a fixed-order multi-line summary. Missing fields
/// render as the literal placeholder "Unknown" so the output shape stays
/// stable regardless of payload completeness.
pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;
    [
        format!("Event: {}", props.event.as_deref().unwrap_or(UNKNOWN)),
        format!("Area: {}", props.area_desc.as_deref().unwrap_or(UNKNOWN)),
        format!("Severity: {}", props.severity.as_deref().unwrap_or(UNKNOWN)),
        format!("Status: {}", props.status.as_deref().unwrap_or(UNKNOWN)),
        format!("Headline: {}", props.headline.as_deref().unwrap_or(UNKNOWN)),
        "---".to_string(),
    ]
    .join("\n")
}

/// Render one forecast period as a fixed-order multi-line summary
pub fn format_forecast_period(period: &ForecastPeriod) -> String {
    let temperature = match (period.temperature, period.temperature_unit.as_deref()) {
        (Some(t), Some(unit)) => format!("{}°{}", t, unit),
        (Some(t), None) => format!("{}", t),
        _ => UNKNOWN.to_string(),
    };
    [
        format!("{}:", period.name.as_deref().unwrap_or(UNKNOWN)),
        format!("Temperature: {}", temperature),
        format!(
            "Wind: {} {}",
            period.wind_speed.as_deref().unwrap_or(UNKNOWN),
            period.wind_direction.as_deref().unwrap_or(UNKNOWN)
        ),
        format!(
            "Forecast: {}",
            period.short_forecast.as_deref().unwrap_or(UNKNOWN)
        ),
        "---".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> WeatherClient {
        WeatherClient::new(&ProviderSettings {
            base_url: server.url(),
            user_agent: "userbase-mcp-tests/0.1".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_decodes_successful_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/alerts.json")
            .match_header("accept", "application/geo+json")
            .with_status(200)
            .with_body(
                json!({
                    "features": [
                        {"properties": {"event": "Flood Warning", "severity": "Severe"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/alerts.json", server.url());
        let alerts: AlertsResponse = client.fetch(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(alerts.features.len(), 1);
        assert_eq!(
            alerts.features[0].properties.event.as_deref(),
            Some("Flood Warning")
        );
    }

    #[tokio::test]
    async fn non_success_status_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/alerts.json")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/alerts.json", server.url());
        let alerts: Option<AlertsResponse> = client.fetch(&url).await;
        assert!(alerts.is_none());
    }

    #[tokio::test]
    async fn malformed_body_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/alerts.json")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/alerts.json", server.url());
        let alerts: Option<AlertsResponse> = client.fetch(&url).await;
        assert!(alerts.is_none());
    }

    #[test]
    fn alert_with_no_fields_renders_all_placeholders() {
        let formatted = format_alert(&AlertFeature::default());
        assert_eq!(
            formatted,
            "Event: Unknown\nArea: Unknown\nSeverity: Unknown\nStatus: Unknown\nHeadline: Unknown\n---"
        );
    }

    #[test]
    fn alert_renders_fields_in_fixed_order() {
        let feature = AlertFeature {
            properties: AlertProperties {
                event: Some("Flood Warning".to_string()),
                area_desc: Some("Sacramento County".to_string()),
                severity: Some("Severe".to_string()),
                status: None,
                headline: None,
            },
        };
        let formatted = format_alert(&feature);
        assert_eq!(
            formatted,
            "Event: Flood Warning\nArea: Sacramento County\nSeverity: Severe\nStatus: Unknown\nHeadline: Unknown\n---"
        );
    }

    #[test]
    fn forecast_period_renders_placeholders_for_missing_fields() {
        let formatted = format_forecast_period(&ForecastPeriod::default());
        assert_eq!(
            formatted,
            "Unknown:\nTemperature: Unknown\nWind: Unknown Unknown\nForecast: Unknown\n---"
        );
    }

    #[test]
    fn forecast_period_renders_temperature_with_unit() {
        let period = ForecastPeriod {
            name: Some("Tonight".to_string()),
            temperature: Some(61.0),
            temperature_unit: Some("F".to_string()),
            wind_speed: Some("5 mph".to_string()),
            wind_direction: Some("NW".to_string()),
            short_forecast: Some("Partly cloudy".to_string()),
        };
        let formatted = format_forecast_period(&period);
        assert_eq!(
            formatted,
            "Tonight:\nTemperature: 61°F\nWind: 5 mph NW\nForecast: Partly cloudy\n---"
        );
    }
}
