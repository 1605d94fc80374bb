// User database tools
//
// Tools that read and write the user record store: create a user, delete the
// most recently added user, and stamp a field onto every record.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dispatch::Content;
use crate::errors::{HandlerError, RegistryError};
use crate::registry::{HandlerResult, Tool, ToolAnnotations, ToolDescriptor, ToolRegistry};
use crate::schema::{FieldType, InputSchema};
use crate::store::NewUser;
use crate::tools::ToolContext;

/// Register all user database tools
pub fn register_tools(registry: &ToolRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(CreateUserTool))?;
    registry.register(Arc::new(DeleteUserTool))?;
    registry.register(Arc::new(SetUserFieldTool))?;
    Ok(())
}

/// Creates a new user record from the supplied fields
pub struct CreateUserTool;

#[async_trait]
impl Tool for CreateUserTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "create-user".to_string(),
            description: "Create a new user in the database".to_string(),
            annotations: ToolAnnotations {
                title: "Create User".to_string(),
                read_only_hint: false,
                destructive_hint: false,
                idempotent_hint: false,
                open_world_hint: true,
            },
            schema: InputSchema::new()
                .required("name", FieldType::String, "Full name of the user")
                .required("email", FieldType::String, "Email address")
                .required("address", FieldType::String, "Postal address")
                .required("phone", FieldType::String, "Phone number"),
        }
    }

    async fn execute(&self, input: Value, ctx: ToolContext) -> HandlerResult {
        let user: NewUser = serde_json::from_value(input)
            .map_err(|e| HandlerError::Internal(format!("malformed input: {}", e)))?;
        let id = ctx.store.append(user).await?;
        Ok(vec![Content::text(format!(
            "User {} created successfully.",
            id
        ))])
    }
}

/// Deletes the last user from the database
pub struct DeleteUserTool;

#[async_trait]
impl Tool for DeleteUserTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "delete-user".to_string(),
            description: "Delete the last user from the database".to_string(),
            annotations: ToolAnnotations {
                title: "Delete User".to_string(),
                read_only_hint: false,
                destructive_hint: true,
                idempotent_hint: false,
                open_world_hint: false,
            },
            schema: InputSchema::new(),
        }
    }

    async fn execute(&self, _input: Value, ctx: ToolContext) -> HandlerResult {
        let id = ctx.store.remove_last().await?;
        Ok(vec![Content::text(format!(
            "User {} has been deleted.",
            id
        ))])
    }
}

/// Sets a field to a fixed value on every user record
pub struct SetUserFieldTool;

#[async_trait]
impl Tool for SetUserFieldTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "set-user-field".to_string(),
            description: "Set a field to the given value on every user record".to_string(),
            annotations: ToolAnnotations {
                title: "Set User Field".to_string(),
                read_only_hint: false,
                destructive_hint: false,
                idempotent_hint: true,
                open_world_hint: false,
            },
            schema: InputSchema::new()
                .required("field", FieldType::String, "Name of the field to set")
                .required("value", FieldType::String, "Value to assign"),
        }
    }

    async fn execute(&self, input: Value, ctx: ToolContext) -> HandlerResult {
        let field = input
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::Internal("missing field name".to_string()))?
            .to_string();
        let value = input
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::Internal("missing field value".to_string()))?
            .to_string();

        let count = ctx
            .store
            .map_fields(|user| match field.as_str() {
                "name" => user.name = Some(value.clone()),
                "email" => user.email = Some(value.clone()),
                "address" => user.address = Some(value.clone()),
                "phone" => user.phone = Some(value.clone()),
                _ => {
                    user.extra
                        .insert(field.clone(), Value::String(value.clone()));
                }
            })
            .await?;

        Ok(vec![Content::text(format!("Updated {} users.", count))])
    }
}
