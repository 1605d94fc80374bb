// Error handling module for the server
//
// This module defines the error types used throughout the server.

use thiserror::Error;

/// Common error types for the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

/// Errors raised by the user record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),

    #[error("collection is empty")]
    EmptyCollection,
}

/// Errors raised while dispatching a request, before a handler runs
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Unknown resource: {0}")]
    ResourceNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

/// Errors raised inside a tool or resource handler. These are logged at the
/// dispatch boundary and never echoed back to the client.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("handler failed: {0}")]
    Internal(String),
}

/// Registration-time errors. Fatal at startup, never a runtime condition.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("descriptor with name '{0}' already registered")]
    Duplicate(String),

    #[error("registry lock poisoned")]
    LockPoisoned,
}

/// Failures of the external weather data provider. Downgraded to `None` by
/// the provider itself; this type only exists so the log sink keeps the
/// underlying reason.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider returned HTTP status {0}")]
    Status(u16),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}
