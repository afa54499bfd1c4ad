pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::files::handlers as files;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI feedback
        .route(
            "/ai/content-suggestions",
            post(ai::handle_content_suggestions),
        )
        .route(
            "/ai/format-achievements",
            post(ai::handle_format_achievements),
        )
        .route("/ai/keyword-analysis", post(ai::handle_keyword_analysis))
        .route("/ai/resume-analysis", post(ai::handle_resume_analysis))
        // Document parsing
        .route(
            "/parse/pdf",
            post(files::handle_parse_pdf).layer(upload_limit()),
        )
        .route(
            "/parse/docx",
            post(files::handle_parse_docx).layer(upload_limit()),
        )
        .route(
            "/parse/text",
            post(files::handle_parse_text).layer(upload_limit()),
        )
        // Import / export
        .route("/import", post(files::handle_import).layer(upload_limit()))
        .route("/export/:format", post(files::handle_export))
        // Persistence
        .route(
            "/resume",
            get(storage::handle_get_resume)
                .put(storage::handle_save_resume)
                .delete(storage::handle_clear_resume),
        )
        .route(
            "/resume/template",
            get(storage::handle_get_template).put(storage::handle_save_template),
        )
        .with_state(state)
}

fn upload_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(files::MAX_UPLOAD_BYTES)
}
