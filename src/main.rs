use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use userbase_mcp::dispatch::Dispatcher;
use userbase_mcp::provider::WeatherClient;
use userbase_mcp::store::UserStore;
use userbase_mcp::{api, resources, tools};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    info!(
        "Starting userbase-mcp server version {}",
        userbase_mcp::MCP_VERSION
    );

    // Get configuration path from command line arguments
    let config_path = env::args().nth(1);

    // Load configuration
    let settings = match userbase_mcp::config::load_config(config_path.as_deref()) {
        Ok(settings) => {
            info!("Loaded configuration successfully");
            settings
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Prepare the user record store
    let store = Arc::new(UserStore::new(&settings.store.path));
    if let Err(e) = store.init().await {
        error!("Failed to initialize user store: {}", e);
        process::exit(1);
    }

    // Build the weather data provider client
    let weather = match WeatherClient::new(&settings.provider) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build weather client: {}", e);
            process::exit(1);
        }
    };

    // Initialize registries; a duplicate registration is fatal at startup
    let tool_registry = match tools::init_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to register tools: {}", e);
            process::exit(1);
        }
    };
    let resource_registry = match resources::init_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to register resources: {}", e);
            process::exit(1);
        }
    };
    info!(
        "Registered {} tools and {} resources",
        tool_registry.list().len(),
        resource_registry.list().len()
    );

    let dispatcher = Arc::new(Dispatcher::new(
        tool_registry,
        resource_registry,
        store,
        weather,
    ));

    // Start the API server
    match api::init_server(settings, dispatcher).await {
        Ok(_) => {
            info!("userbase-mcp server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Error starting userbase-mcp server: {}", e);
            process::exit(1);
        }
    }
}
