//! Template renderer: resume content + template source → HTML markup.

pub mod catalog;
pub mod engine;
pub mod escape;
pub mod handlers;
pub mod template;

use thiserror::Error;

pub use engine::render_by_id;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0} not found")]
    TemplateNotFound(i32),

    #[error("template syntax error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("unknown placeholder '{name}' at byte {offset}")]
    UnknownField { offset: usize, name: String },
}
