// Tools module
//
// This module implements the tool registration and execution surface of the
// server.

pub mod users;
pub mod weather;

use std::sync::Arc;

use crate::errors::RegistryError;
use crate::provider::WeatherClient;
use crate::registry::ToolRegistry;
use crate::store::UserStore;

/// ToolContext holds the shared collaborators a handler may touch
#[derive(Clone)]
pub struct ToolContext {
    /// Request ID for log correlation
    pub request_id: String,
    /// The user record store
    pub store: Arc<UserStore>,
    /// The external weather data provider
    pub weather: Arc<WeatherClient>,
}

/// Initialize the tool registry with every tool this server exposes
pub fn init_registry() -> Result<Arc<ToolRegistry>, RegistryError> {
    let registry = ToolRegistry::new();

    // User database tools
    users::register_tools(&registry)?;

    // Weather tools
    weather::register_tools(&registry)?;

    Ok(Arc::new(registry))
}
