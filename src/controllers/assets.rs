use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/debug/assets").route(web::get().to(assets_info)));
}

/// Reports where static assets are served from and an example URL, for
/// checking a deployment's asset wiring.
async fn assets_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "assetsPath": state.config.assets_dir,
        "exampleUrl": format!("{}/assets/images/001.png", state.config.public_base_url)
    }))
}
