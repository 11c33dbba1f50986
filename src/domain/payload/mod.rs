//! API payload domain: the typed description of one HTTP call, the
//! generator capability that produces it, and strict URL resolution.

mod entity;
mod error;
mod generator;
mod url;

pub use entity::{ApiPayload, HttpMethod};
pub use error::PayloadError;
pub use generator::PayloadGenerator;
pub use url::{is_absolute_url, resolve_url, UrlResolutionError};

#[cfg(test)]
pub use generator::MockPayloadGenerator;
