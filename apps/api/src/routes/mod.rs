pub mod health;

#[cfg(test)]
pub mod test_support;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::admin::handlers as admin;
use crate::ai::handlers as ai;
use crate::auth::{self, handlers as session};
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/register", post(session::handle_register))
        .route("/api/login", post(session::handle_login))
        .route("/api/logout", post(session::handle_logout))
        .route("/api/templates", get(render::handle_list_templates))
        .route("/api/templates/:id", get(render::handle_get_template));

    let user = Router::new()
        .route("/api/user", get(session::handle_current_user))
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/resumes/:id/entries/:section",
            post(resumes::handle_add_entry),
        )
        .route(
            "/api/resumes/:id/entries/:section/:entry_id",
            put(resumes::handle_update_entry).delete(resumes::handle_remove_entry),
        )
        .route(
            "/api/resumes/:id/personal/:field",
            put(resumes::handle_set_personal_field),
        )
        .route("/api/resumes/:id/preview", get(resumes::handle_preview_resume))
        .route("/api/resumes/:id/pdf", get(resumes::handle_download_resume))
        // Drafts
        .route("/api/render/preview", post(render::handle_preview_draft))
        .route("/api/render/pdf", post(render::handle_export_draft))
        // AI assist
        .route("/api/ai/generate", post(ai::handle_generate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let admin = Router::new()
        .route("/api/admin/users", get(admin::handle_list_users))
        .route("/api/admin/users/:id", delete(admin::handle_delete_user))
        .route("/api/admin/resumes", get(admin::handle_list_all_resumes))
        .route(
            "/api/admin/resumes/:id",
            delete(admin::handle_delete_any_resume),
        )
        .route(
            "/api/admin/api-keys",
            get(admin::handle_list_api_keys).post(admin::handle_create_api_key),
        )
        .route(
            "/api/admin/api-keys/:id",
            put(admin::handle_update_api_key).delete(admin::handle_delete_api_key),
        )
        // Layers run bottom-up: auth resolves the user, then the admin check.
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    public.merge(user).merge(admin).with_state(state)
}
