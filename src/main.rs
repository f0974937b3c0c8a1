use std::sync::Arc;

use skillpivot_server::store::{MemoryStudentStore, PgStudentStore, StudentStore};
use skillpivot_server::{router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env()?;

    let store: Arc<dyn StudentStore> = match &config.database_url {
        Some(url) => Arc::new(PgStudentStore::connect(url, config.max_connections).await?),
        None => {
            log::warn!("DATABASE_URL is not set, profiles will be kept in memory");
            Arc::new(MemoryStudentStore::new())
        }
    };
    if config.admin_key.is_none() {
        log::warn!("ADMIN_KEY is not set, verification status cannot be changed");
    }

    let app = router(AppState::new(store, config.admin_key.clone()));

    log::info!("Starting SkillPivot HTTP Server on http://{}", config.bind_addr);
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
