//! Dynamic planning fallback

mod single_call;

pub use single_call::SingleCallPlanner;
