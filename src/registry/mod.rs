// Registries for tools and resources
//
// This module defines the descriptor types, the handler traits, and the two
// registries that map tool names and resource URIs to their handlers.
// Registration is first-wins: a duplicate name or URI template is an error,
// never a silent overwrite.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::Content;
use crate::errors::{HandlerError, RegistryError};
use crate::schema::InputSchema;
use crate::tools::ToolContext;

/// Behavioral hints exposed to the client. Informational only, not enforced
/// by the dispatcher.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Display title
    pub title: String,
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    pub open_world_hint: bool,
}

/// Descriptor for a registered tool
#[derive(Clone, Debug, Serialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Behavioral hints
    pub annotations: ToolAnnotations,
    /// Declared input schema
    #[serde(rename = "inputSchema")]
    pub schema: InputSchema,
}

/// Descriptor for a registered resource
#[derive(Clone, Debug, Serialize)]
pub struct ResourceDescriptor {
    /// Unique name of the resource
    pub name: String,
    /// Literal URI or template with `{variable}` segments
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Display title
    pub title: String,
    /// Description of the resource
    pub description: String,
    /// MIME type of the resource content
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Result type for tool and resource handlers
pub type HandlerResult = Result<Vec<Content>, HandlerError>;

/// Trait for implementing tool functionality
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool descriptor
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with validated input
    async fn execute(&self, input: Value, ctx: ToolContext) -> HandlerResult;
}

/// Trait for implementing a read-only addressable resource
#[async_trait]
pub trait Resource: Send + Sync {
    /// Get the resource descriptor
    fn descriptor(&self) -> ResourceDescriptor;

    /// Read the resource at the resolved URI with extracted path variables
    async fn read(
        &self,
        uri: &str,
        variables: &HashMap<String, String>,
        ctx: ToolContext,
    ) -> HandlerResult;
}

/// ToolRegistry manages tool registration and lookup
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.descriptor().name;
        let mut tools = self.tools.write().map_err(|_| RegistryError::LockPoisoned)?;
        if tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().ok()?.get(name).cloned()
    }

    /// List descriptors of all registered tools
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .read()
            .map(|tools| tools.values().map(|tool| tool.descriptor()).collect())
            .unwrap_or_default()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// ResourceRegistry manages resource registration and URI resolution.
/// Resources are kept in registration order; when more than one template
/// matches a URI, the first registered one wins.
pub struct ResourceRegistry {
    resources: RwLock<Vec<Arc<dyn Resource>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(Vec::new()),
        }
    }

    /// Register a resource. Fails if a resource with the same URI template
    /// already exists.
    pub fn register(&self, resource: Arc<dyn Resource>) -> Result<(), RegistryError> {
        let template = resource.descriptor().uri_template;
        let mut resources = self
            .resources
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        if resources
            .iter()
            .any(|r| r.descriptor().uri_template == template)
        {
            return Err(RegistryError::Duplicate(template));
        }
        resources.push(resource);
        Ok(())
    }

    /// Resolve a URI to a resource and its extracted path variables
    pub fn resolve(&self, uri: &str) -> Option<(Arc<dyn Resource>, HashMap<String, String>)> {
        let resources = self.resources.read().ok()?;
        for resource in resources.iter() {
            if let Some(variables) = match_template(&resource.descriptor().uri_template, uri) {
                return Some((resource.clone(), variables));
            }
        }
        None
    }

    /// List descriptors of all registered resources in registration order
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        self.resources
            .read()
            .map(|resources| resources.iter().map(|r| r.descriptor()).collect())
            .unwrap_or_default()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a URI against a literal string or a template with `{variable}`
/// segments, extracting variable values positionally.
fn match_template(template: &str, uri: &str) -> Option<HashMap<String, String>> {
    if !template.contains('{') {
        return (template == uri).then(HashMap::new);
    }

    let template_segments: Vec<&str> = template.split('/').collect();
    let uri_segments: Vec<&str> = uri.split('/').collect();
    if template_segments.len() != uri_segments.len() {
        return None;
    }

    let mut variables = HashMap::new();
    for (pattern, segment) in template_segments.iter().zip(uri_segments.iter()) {
        if let Some(name) = pattern.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            if segment.is_empty() {
                return None;
            }
            variables.insert(name.to_string(), segment.to_string());
        } else if pattern != segment {
            return None;
        }
    }
    Some(variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Content;

    struct StubTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for StubTool {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: self.name.to_string(),
                description: "stub".to_string(),
                annotations: ToolAnnotations::default(),
                schema: InputSchema::new(),
            }
        }

        async fn execute(&self, _input: Value, _ctx: ToolContext) -> HandlerResult {
            Ok(vec![Content::text("stub")])
        }
    }

    struct StubResource {
        name: &'static str,
        template: &'static str,
    }

    #[async_trait]
    impl Resource for StubResource {
        fn descriptor(&self) -> ResourceDescriptor {
            ResourceDescriptor {
                name: self.name.to_string(),
                uri_template: self.template.to_string(),
                title: "stub".to_string(),
                description: "stub".to_string(),
                mime_type: "text/plain".to_string(),
            }
        }

        async fn read(
            &self,
            _uri: &str,
            _variables: &HashMap<String, String>,
            _ctx: ToolContext,
        ) -> HandlerResult {
            Ok(vec![Content::text(self.name)])
        }
    }

    #[test]
    fn duplicate_tool_name_is_rejected() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool { name: "one" })).unwrap();
        let err = registry
            .register(Arc::new(StubTool { name: "one" }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "one"));
    }

    #[test]
    fn unknown_tool_lookup_returns_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn literal_resource_resolves_by_exact_match() {
        let registry = ResourceRegistry::new();
        registry
            .register(Arc::new(StubResource {
                name: "all",
                template: "users://all",
            }))
            .unwrap();

        let (resource, variables) = registry.resolve("users://all").unwrap();
        assert_eq!(resource.descriptor().name, "all");
        assert!(variables.is_empty());
        assert!(registry.resolve("users://other").is_none());
    }

    #[test]
    fn templated_resource_extracts_variables() {
        let registry = ResourceRegistry::new();
        registry
            .register(Arc::new(StubResource {
                name: "profile",
                template: "users://{userId}/profile",
            }))
            .unwrap();

        let (_, variables) = registry.resolve("users://42/profile").unwrap();
        assert_eq!(variables.get("userId").map(String::as_str), Some("42"));
        assert!(registry.resolve("users://42/settings").is_none());
        assert!(registry.resolve("users:///profile").is_none());
    }

    #[test]
    fn first_registered_template_wins() {
        let registry = ResourceRegistry::new();
        registry
            .register(Arc::new(StubResource {
                name: "first",
                template: "users://{a}/profile",
            }))
            .unwrap();
        registry
            .register(Arc::new(StubResource {
                name: "second",
                template: "users://{b}/profile",
            }))
            .unwrap();

        let (resource, _) = registry.resolve("users://7/profile").unwrap();
        assert_eq!(resource.descriptor().name, "first");
    }

    #[test]
    fn duplicate_uri_template_is_rejected() {
        let registry = ResourceRegistry::new();
        registry
            .register(Arc::new(StubResource {
                name: "one",
                template: "users://all",
            }))
            .unwrap();
        let err = registry
            .register(Arc::new(StubResource {
                name: "two",
                template: "users://all",
            }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(_)));
    }
}
