// API module
//
// Thin HTTP shell over the dispatcher. The transport itself is not part of
// the core: this module only decodes the logical request shape, hands it to
// the dispatcher, and writes the envelope back.

mod routes;

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use crate::config::Settings;
use crate::dispatch::Dispatcher;

/// Common response structure for API endpoints
#[derive(serde::Serialize)]
pub struct ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Status of the response (success or error)
    pub status: String,
    /// Response data (if any)
    pub data: Option<T>,
    /// Error message (if any)
    pub message: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a new success response with data
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    /// Create a new error response with message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Initialize the API server with the appropriate routes and middleware
pub async fn init_server(
    settings: Arc<Settings>,
    dispatcher: Arc<Dispatcher>,
) -> std::io::Result<()> {
    let bind_addr = (settings.server.host.clone(), settings.server.port);
    let dispatcher = web::Data::new(dispatcher);

    HttpServer::new(move || {
        App::new()
            .app_data(dispatcher.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .workers(settings.server.workers.max(1))
    .bind(bind_addr)?
    .run()
    .await
}

/// Health check handler
pub async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": crate::MCP_VERSION,
    }))
}
