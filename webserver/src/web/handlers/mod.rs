pub mod api;
pub mod health;

pub use api::{content_disposition, download};
pub use health::{health, index};
