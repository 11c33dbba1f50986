//! API invocation capability

mod invoker;
mod request;

pub use invoker::ApiInvoker;
pub use request::{ApiRequest, ApiResponse};

#[cfg(test)]
pub use invoker::MockApiInvoker;
