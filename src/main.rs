use std::fs;
use std::io;

use actix_web::{App, HttpServer, middleware, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;

use pushkind_catalog::db::establish_connection_pool;
use pushkind_catalog::models::config::ServerConfig;
use pushkind_catalog::repository::DieselRepository;
use pushkind_catalog::routes::configure;
use pushkind_catalog::storage::{LocalBlobStore, PRODUCT_IMAGE_DIR};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection: {e}");
        io::Error::other(e)
    })?;

    {
        let mut conn = pool.get().map_err(io::Error::other)?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            log::error!("Failed to run migrations: {e}");
            io::Error::other(e.to_string())
        })?;
    }

    fs::create_dir_all(server_config.storage_root.join(PRODUCT_IMAGE_DIR))?;

    let repo = DieselRepository::new(pool);
    let store = LocalBlobStore::new(server_config.storage_root.clone());
    let bind_address = server_config.bind_address();

    log::info!(
        "Starting catalog server on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(|cfg| configure(cfg, &server_config))
    })
    .bind(bind_address)?
    .run()
    .await
}
