use std::sync::Arc;

use tracing::{error, info};

use filestash::{Config, Database, FileStorage, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = filestash::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filestash::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> filestash::Result<()> {
    config.validate()?;

    info!("filestash starting");

    let db = Database::open(&config.database.url).await?;
    info!("Metadata store ready at {}", config.database.url);

    let storage = FileStorage::new(&config.files.storage_path)?;
    info!("File storage initialized at: {}", config.files.storage_path);

    let server = WebServer::new(
        &config.web,
        Arc::new(db),
        storage,
        config.files.max_upload_size_bytes(),
    )?;
    server.run().await?;

    Ok(())
}
