// User resources
//
// Read-only views over the user record store: the full collection at
// `users://all` and a single profile at `users://{userId}/profile`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::dispatch::Content;
use crate::errors::RegistryError;
use crate::registry::{HandlerResult, Resource, ResourceDescriptor, ResourceRegistry};
use crate::tools::ToolContext;

const JSON_MIME: &str = "application/json";

/// Register all user resources
pub fn register_resources(registry: &ResourceRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(UsersResource))?;
    registry.register(Arc::new(UserProfileResource))?;
    Ok(())
}

/// The full user collection
pub struct UsersResource;

#[async_trait]
impl Resource for UsersResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            name: "users".to_string(),
            uri_template: "users://all".to_string(),
            title: "All Users".to_string(),
            description: "Every user record in the database".to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }

    async fn read(
        &self,
        _uri: &str,
        _variables: &HashMap<String, String>,
        ctx: ToolContext,
    ) -> HandlerResult {
        let users = ctx.store.load().await?;
        Ok(vec![Content::structured(json!(users), JSON_MIME)])
    }
}

/// A single user record, addressed by id
pub struct UserProfileResource;

#[async_trait]
impl Resource for UserProfileResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            name: "user-profile".to_string(),
            uri_template: "users://{userId}/profile".to_string(),
            title: "User Profile".to_string(),
            description: "A single user record, addressed by id".to_string(),
            mime_type: JSON_MIME.to_string(),
        }
    }

    async fn read(
        &self,
        _uri: &str,
        variables: &HashMap<String, String>,
        ctx: ToolContext,
    ) -> HandlerResult {
        let id: Option<u64> = variables.get("userId").and_then(|v| v.parse().ok());
        let users = ctx.store.load().await?;

        // An unknown id is a valid read result, reported as an explicit
        // not-found payload rather than a dispatch failure.
        let payload = match id.and_then(|id| users.into_iter().find(|u| u.id == id)) {
            Some(user) => json!(user),
            None => json!({
                "error": "User not found",
                "userId": variables.get("userId"),
            }),
        };
        Ok(vec![Content::structured(payload, JSON_MIME)])
    }
}
