use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(service_info)));
}

/// Service banner and endpoint directory.
async fn service_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "pokedex-backend",
        "version": VERSION,
        "records": state.store.len(),
        "endpoints": {
            "list": "/api/pokemons?page=N",
            "search": "/api/pokemons/search/:name",
            "get": "/api/pokemons/:id",
            "create": "POST /api/pokemons",
            "update": "PUT /api/pokemons/:id",
            "delete": "DELETE /api/pokemons/:id",
            "assets": "/assets/*",
            "assetsDebug": "/debug/assets"
        }
    }))
}
