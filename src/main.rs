use clap::Parser;
use dotenvy::dotenv;
use menu_cart::{
    cli::{Cli, Session},
    config::{app::load_config_or_default, database},
    core::{
        cart::CartEngine,
        menu::MenuCatalog,
        receipt::{DirectorySink, ReceiptExporter},
        store::DatabaseStore,
    },
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the application configuration
    let app_config = load_config_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Loaded configuration with {} menu entries",
        app_config.menu.len()
    );

    // 4. Connect to the database and make sure the cart table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Wire up the cart and the receipt exporter
    let engine = CartEngine::new(DatabaseStore::new(db, app_config.cart.storage_key));
    let exporter = ReceiptExporter::new(app_config.receipt.clone());
    if !exporter.is_available() {
        warn!("Built without PDF support, export is disabled");
    }
    let session = Session::new(
        engine,
        MenuCatalog::new(app_config.menu),
        exporter,
        DirectorySink::new(&app_config.receipt.output_dir),
    );

    // 6. Run the command
    let mut stdout = std::io::stdout().lock();
    session
        .run(cli.command, &mut stdout)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))
}
