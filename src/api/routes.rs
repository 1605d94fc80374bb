// API routes
//
// This file defines the routing for the server API endpoints.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::api::{health_check, ApiResponse};
use crate::dispatch::{Dispatcher, Request};

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // Logical request dispatch
        .route("/rpc", web::post().to(dispatch))
        // Descriptor metadata exposed to the client
        .route("/tools", web::get().to(list_tools))
        .route("/resources", web::get().to(list_resources))
        // Fallback for undefined routes
        .default_service(web::route().to(not_found));
}

/// Handler for dispatching a logical request
async fn dispatch(
    dispatcher: web::Data<Arc<Dispatcher>>,
    request: web::Json<Request>,
) -> impl Responder {
    let envelope = dispatcher.dispatch(request.into_inner()).await;
    HttpResponse::Ok().json(envelope)
}

/// Handler for listing registered tool descriptors
async fn list_tools(dispatcher: web::Data<Arc<Dispatcher>>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(dispatcher.tool_descriptors()))
}

/// Handler for listing registered resource descriptors
async fn list_resources(dispatcher: web::Data<Arc<Dispatcher>>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(dispatcher.resource_descriptors()))
}

/// Handler for undefined routes
async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::<()>::error("Route not found"))
}
