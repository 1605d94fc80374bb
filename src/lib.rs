// userbase-mcp: Model Context Protocol server for a user database
//
// This library implements a small MCP-style server which exposes a set of
// schema-validated tools and addressable resources over a user record store
// and the National Weather Service API.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod store;
pub mod tools;

/// Version of the MCP surface implemented by this server
pub const MCP_VERSION: &str = "0.1.0";

/// Default server configuration constants
pub mod defaults {
    /// Default port for the server
    pub const SERVER_PORT: u16 = 3020;
    /// Default host address to bind to
    pub const SERVER_HOST: &str = "127.0.0.1";
    /// Default path to the users JSON document
    pub const STORE_PATH: &str = "data/users.json";
    /// Default base URL for the weather data provider
    pub const PROVIDER_BASE_URL: &str = "https://api.weather.gov";
    /// Default User-Agent sent to the weather data provider
    pub const PROVIDER_USER_AGENT: &str = "userbase-mcp/0.1";
    /// Default timeout for outbound provider requests in seconds
    pub const PROVIDER_TIMEOUT_SECS: u64 = 10;
}
