// Request dispatcher
//
// This module implements the per-request pipeline: resolve the tool or
// resource, validate input, execute the handler, and wrap the outcome into
// the uniform response envelope. Every request is handled exactly once.
// Handler failures are caught here, logged with the request id, and replaced
// by a fixed message so internal error text never crosses the boundary.

use std::sync::Arc;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::DispatchError;
use crate::provider::WeatherClient;
use crate::registry::{ResourceDescriptor, ResourceRegistry, ToolDescriptor, ToolRegistry};
use crate::store::UserStore;
use crate::tools::ToolContext;

/// Fixed message returned for any handler-level failure
pub const GENERIC_FAILURE: &str = "The request could not be completed.";

/// One item of response content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        text: String,
    },
    Structured {
        data: Value,
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl Content {
    /// Plain text content item
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// Structured JSON content item
    pub fn structured(data: Value, mime_type: &str) -> Self {
        Content::Structured {
            data,
            mime_type: Some(mime_type.to_string()),
        }
    }
}

/// Logical request shape received from the transport layer
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Request {
    Operation {
        name: String,
        #[serde(default)]
        input: Value,
    },
    Resource {
        uri: String,
    },
}

/// Uniform success/failure wrapper returned for every dispatched request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ResponseEnvelope {
    /// Success envelope for a tool invocation
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
            uri: None,
            mime_type: None,
        }
    }

    /// Success envelope for a resource read, carrying the resolved URI and
    /// MIME type
    pub fn resource(uri: &str, mime_type: &str, content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
            uri: Some(uri.to_string()),
            mime_type: Some(mime_type.to_string()),
        }
    }

    /// Failure envelope with a short user-facing message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(message)],
            is_error: true,
            uri: None,
            mime_type: None,
        }
    }
}

/// Dispatcher routes decoded requests to registered handlers
pub struct Dispatcher {
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
    store: Arc<UserStore>,
    weather: Arc<WeatherClient>,
}

impl Dispatcher {
    pub fn new(
        tools: Arc<ToolRegistry>,
        resources: Arc<ResourceRegistry>,
        store: Arc<UserStore>,
        weather: Arc<WeatherClient>,
    ) -> Self {
        Self {
            tools,
            resources,
            store,
            weather,
        }
    }

    /// Descriptors of all registered tools
    pub fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.list()
    }

    /// Descriptors of all registered resources
    pub fn resource_descriptors(&self) -> Vec<ResourceDescriptor> {
        self.resources.list()
    }

    /// Handle one decoded request and produce a response envelope
    pub async fn dispatch(&self, request: Request) -> ResponseEnvelope {
        let request_id = Uuid::new_v4().to_string();
        match request {
            Request::Operation { name, input } => {
                self.dispatch_tool(&request_id, &name, input).await
            }
            Request::Resource { uri } => self.dispatch_resource(&request_id, &uri).await,
        }
    }

    async fn dispatch_tool(&self, request_id: &str, name: &str, input: Value) -> ResponseEnvelope {
        debug!("[{}] resolving tool '{}'", request_id, name);
        let tool = match self.tools.get(name) {
            Some(tool) => tool,
            None => {
                warn!("[{}] unknown tool '{}'", request_id, name);
                let err = DispatchError::ToolNotFound(name.to_string());
                return ResponseEnvelope::failure(err.to_string());
            }
        };

        // Validation runs before the handler touches the store or the
        // provider; a rejected request has no side effects.
        if let Err(e) = tool.descriptor().schema.validate(&input) {
            warn!("[{}] tool '{}' rejected: {}", request_id, name, e);
            return ResponseEnvelope::failure(e.to_string());
        }

        let ctx = self.context(request_id);
        match tool.execute(input, ctx).await {
            Ok(content) => ResponseEnvelope::success(content),
            Err(e) => {
                error!("[{}] tool '{}' failed: {}", request_id, name, e);
                ResponseEnvelope::failure(GENERIC_FAILURE)
            }
        }
    }

    async fn dispatch_resource(&self, request_id: &str, uri: &str) -> ResponseEnvelope {
        debug!("[{}] resolving resource '{}'", request_id, uri);
        let (resource, variables) = match self.resources.resolve(uri) {
            Some(resolved) => resolved,
            None => {
                warn!("[{}] unknown resource '{}'", request_id, uri);
                let err = DispatchError::ResourceNotFound(uri.to_string());
                return ResponseEnvelope::failure(err.to_string());
            }
        };

        let descriptor = resource.descriptor();
        let ctx = self.context(request_id);
        match resource.read(uri, &variables, ctx).await {
            Ok(content) => ResponseEnvelope::resource(uri, &descriptor.mime_type, content),
            Err(e) => {
                error!(
                    "[{}] resource '{}' failed: {}",
                    request_id, descriptor.name, e
                );
                ResponseEnvelope::failure(GENERIC_FAILURE)
            }
        }
    }

    fn context(&self, request_id: &str) -> ToolContext {
        ToolContext {
            request_id: request_id.to_string(),
            store: self.store.clone(),
            weather: self.weather.clone(),
        }
    }
}
