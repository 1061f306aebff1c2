pub mod api_key;
pub mod content;
pub mod resume;
pub mod template;
pub mod user;
