// Resources module
//
// This module implements the read-only addressable resources the server
// exposes over the user record store.

pub mod users;

use std::sync::Arc;

use crate::errors::RegistryError;
use crate::registry::ResourceRegistry;

/// Initialize the resource registry with every resource this server exposes
pub fn init_registry() -> Result<Arc<ResourceRegistry>, RegistryError> {
    let registry = ResourceRegistry::new();
    users::register_resources(&registry)?;
    Ok(Arc::new(registry))
}
