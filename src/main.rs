use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod store;

use config::Config;
use store::RecordStore;

pub struct AppState {
    pub store: Arc<RecordStore>,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Loading record store from {}", config.data_file);
    let store = Arc::new(RecordStore::load(&config.data_file)?);
    log::info!("Loaded {} records", store.len());
    log::info!("Serving static assets from {}", config.assets_dir);
    log::info!("Starting pokedex-backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::clone(&store),
                config: config.clone(),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::info::config)
            .configure(controllers::pokemons::config)
            .configure(controllers::assets::config)
            .service(Files::new("/assets", config.assets_dir.clone()))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
