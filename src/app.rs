use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/items", post(handlers::form_add))
        .route("/items/:id/toggle", post(handlers::form_toggle))
        .route("/items/:id/edit", post(handlers::form_edit))
        .route("/items/:id/delete", post(handlers::form_delete))
        .route("/sections/:section/clear", post(handlers::form_clear_completed))
        .route("/api/items", get(handlers::list_items).post(handlers::add_item))
        .route("/api/items/bulk-delete", post(handlers::bulk_delete))
        .route(
            "/api/items/:id",
            put(handlers::edit_item).delete(handlers::delete_item),
        )
        .route("/api/items/:id/toggle", post(handlers::toggle_item))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/sections", get(handlers::get_sections))
        .route(
            "/api/sections/:section/clear-completed",
            post(handlers::clear_completed),
        )
        .with_state(state)
}
