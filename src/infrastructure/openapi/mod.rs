//! OpenAPI document loading

mod http_loader;

pub use http_loader::{normalize_swagger_source, HttpSpecLoader};
