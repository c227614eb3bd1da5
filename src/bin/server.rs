//! Starter API server: reads settings from env, picks a store, seeds empty collections, serves.

use starter_api::{
    builtin_config, ensure_database_exists, load_from_file, resolve, router, AppState, CrudService, MemoryStore,
    PgStore, ResourceStore, ServerSettings,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("starter_api=info,tower_http=info")),
        )
        .init();

    let settings = ServerSettings::from_env()?;
    let config = match &settings.resources_path {
        Some(path) => load_from_file(path).await?,
        None => builtin_config()?,
    };
    let model = resolve(&config)?;

    let store: Arc<dyn ResourceStore> = match &settings.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let store = PgStore::new(pool, settings.database_schema.clone());
            store.ensure_tables(&model).await?;
            tracing::info!(schema = %settings.database_schema, "using postgres store");
            Arc::new(store)
        }
        None => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    for resource in &model.resources {
        CrudService::seed(store.as_ref(), resource).await?;
    }

    let state = AppState::new(store, model);
    let app = router(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
