//! HTTP invocation of generated API calls

mod http_invoker;

pub use http_invoker::ReqwestApiInvoker;
