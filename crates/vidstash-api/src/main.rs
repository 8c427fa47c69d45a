use tracing_subscriber::EnvFilter;

use vidstash_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (repository, data store, routes)
    let (_state, router) = vidstash_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    vidstash_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
