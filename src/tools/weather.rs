// Weather tools
//
// Tools backed by the NWS data provider: active alerts for a state and the
// forecast for a coordinate pair. Provider failures surface as `None` and
// these tools degrade to a fixed best-effort message instead of failing the
// request.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dispatch::Content;
use crate::errors::RegistryError;
use crate::provider::{
    format_alert, format_forecast_period, AlertsResponse, ForecastResponse, PointsResponse,
};
use crate::registry::{HandlerResult, Tool, ToolAnnotations, ToolDescriptor, ToolRegistry};
use crate::schema::{FieldType, InputSchema};
use crate::tools::ToolContext;

/// Register all weather tools
pub fn register_tools(registry: &ToolRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(GetAlertsTool))?;
    registry.register(Arc::new(GetForecastTool))?;
    Ok(())
}

/// Fetches active weather alerts for a US state
pub struct GetAlertsTool;

#[async_trait]
impl Tool for GetAlertsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get-alerts".to_string(),
            description: "Get active weather alerts for a US state".to_string(),
            annotations: ToolAnnotations {
                title: "Get Alerts".to_string(),
                read_only_hint: true,
                destructive_hint: false,
                idempotent_hint: true,
                open_world_hint: true,
            },
            schema: InputSchema::new().required(
                "state",
                FieldType::String,
                "Two-letter state code, e.g. CA or NY",
            ),
        }
    }

    async fn execute(&self, input: Value, ctx: ToolContext) -> HandlerResult {
        let state = input
            .get("state")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase();

        let url = ctx.weather.alerts_url(&state);
        let Some(alerts) = ctx.weather.fetch::<AlertsResponse>(&url).await else {
            return Ok(vec![Content::text("Failed to retrieve alerts data")]);
        };

        if alerts.features.is_empty() {
            return Ok(vec![Content::text(format!(
                "No active alerts for {}",
                state
            ))]);
        }

        let formatted: Vec<String> = alerts.features.iter().map(format_alert).collect();
        Ok(vec![Content::text(format!(
            "Active alerts for {}:\n\n{}",
            state,
            formatted.join("\n")
        ))])
    }
}

/// Fetches the forecast for a coordinate pair
pub struct GetForecastTool;

#[async_trait]
impl Tool for GetForecastTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get-forecast".to_string(),
            description: "Get the weather forecast for a location".to_string(),
            annotations: ToolAnnotations {
                title: "Get Forecast".to_string(),
                read_only_hint: true,
                destructive_hint: false,
                idempotent_hint: true,
                open_world_hint: true,
            },
            schema: InputSchema::new()
                .required("latitude", FieldType::Number, "Latitude of the location")
                .required("longitude", FieldType::Number, "Longitude of the location"),
        }
    }

    async fn execute(&self, input: Value, ctx: ToolContext) -> HandlerResult {
        let latitude = input
            .get("latitude")
            .and_then(Value::as_f64)
            .unwrap_or_default();
        let longitude = input
            .get("longitude")
            .and_then(Value::as_f64)
            .unwrap_or_default();

        // The NWS forecast is a two-step lookup: the points endpoint names
        // the gridpoint forecast URL for the coordinates.
        let points_url = ctx.weather.points_url(latitude, longitude);
        let Some(points) = ctx.weather.fetch::<PointsResponse>(&points_url).await else {
            return Ok(vec![Content::text(format!(
                "Failed to retrieve grid point data for {}, {}",
                latitude, longitude
            ))]);
        };

        let Some(forecast_url) = points.properties.forecast else {
            return Ok(vec![Content::text(
                "Failed to get forecast URL for this location",
            )]);
        };

        let Some(forecast) = ctx.weather.fetch::<ForecastResponse>(&forecast_url).await else {
            return Ok(vec![Content::text("Failed to retrieve forecast data")]);
        };

        let periods = forecast.properties.periods;
        if periods.is_empty() {
            return Ok(vec![Content::text("No forecast periods available")]);
        }

        let formatted: Vec<String> = periods.iter().map(format_forecast_period).collect();
        Ok(vec![Content::text(format!(
            "Forecast for {}, {}:\n\n{}",
            latitude,
            longitude,
            formatted.join("\n")
        ))])
    }
}
