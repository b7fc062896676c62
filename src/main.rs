use std::sync::Arc;

use bucketeer::config::{self, AppState, Config, StorageBackend};
use bucketeer::db::{InMemoryItemStore, ItemStore, PostgresItemStore};
use bucketeer::logger;
use bucketeer::server::{self, ShutdownSignal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_error = config::load_dotenv();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;
    if let Some(err) = dotenv_error {
        logger::log_warning(&format!("Could not load .env file: {err}"));
    }

    // Multi-thread runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    let mut postgres = None;
    let store: Arc<dyn ItemStore> = match cfg.database.backend {
        StorageBackend::Postgres => {
            let pg = Arc::new(PostgresItemStore::connect(&cfg.database).await?);
            pg.ensure_schema().await?;
            logger::log_store_ready(&format!(
                "postgres://{}@{}:{}/{}",
                cfg.database.user, cfg.database.host, cfg.database.port, cfg.database.name
            ));
            postgres = Some(Arc::clone(&pg));
            pg
        }
        StorageBackend::Memory => {
            logger::log_store_ready("in-memory");
            Arc::new(InMemoryItemStore::new())
        }
    };

    let listener = server::create_listener(addr, cfg.server.backlog)?;

    let shutdown = Arc::new(ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, store));
    server::serve(listener, state, shutdown.subscribe()).await?;

    if let Some(pg) = postgres {
        pg.close().await;
    }

    Ok(())
}
