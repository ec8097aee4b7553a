use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::store::{CreateRecordRequest, StoreError, UpdateRecordRequest, parse_page};

#[derive(Deserialize)]
struct ListQuery {
    page: Option<String>,
}

/// Paginated listing, fixed page size 20. Bad page values coerce to 1; a
/// page past the end of a non-empty collection is a 400.
async fn list(data: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let page = parse_page(query.page.as_deref());

    match data.store.list_page(page) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(StoreError::PageOutOfRange { page, total_pages }) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "message": format!("Page {} does not exist, total pages: {}", page, total_pages)
            }))
        }
        Err(e) => {
            log::error!("Failed to list records: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal server error"
            }))
        }
    }
}

/// Case-insensitive substring search over every language value of `name`.
async fn search(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let query = path.into_inner();
    let results = data.store.search(&query);

    if results.is_empty() {
        return HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("No pokemon matched '{}'", query),
            "results": []
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{} pokemon matched '{}'", results.len(), query),
        "results": results
    }))
}

async fn get_by_id(data: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    match data.store.get(id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(StoreError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("Pokemon with id {} not found", id)
        })),
        Err(e) => {
            log::error!("Failed to fetch record {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal server error"
            }))
        }
    }
}

/// Create a new record; the store assigns the id.
async fn create(data: web::Data<AppState>, body: web::Json<CreateRecordRequest>) -> impl Responder {
    match data.store.create(body.into_inner()) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(StoreError::MissingFields(fields)) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "message": format!("Missing required fields: {}", fields.join(", "))
            }))
        }
        Err(e) => {
            log::error!("Failed to create record: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to persist store"
            }))
        }
    }
}

/// Shallow partial update; `id` itself is immutable.
async fn update(
    data: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<UpdateRecordRequest>,
) -> impl Responder {
    let id = path.into_inner();

    match data.store.update(id, body.into_inner()) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(StoreError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("Pokemon with id {} not found", id)
        })),
        Err(e) => {
            log::error!("Failed to update record {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to persist store"
            }))
        }
    }
}

/// Delete by id, returning the removed record.
async fn delete(data: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    match data.store.delete(id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(StoreError::NotFound { id }) => HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("Pokemon with id {} not found", id)
        })),
        Err(e) => {
            log::error!("Failed to delete record {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to persist store"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/pokemons")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/search/{name}", web::get().to(search))
            .route("/{id}", web::get().to(get_by_id))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}
