pub mod result_cache;
pub mod trajectory_service;

pub use result_cache::*;
pub use trajectory_service::*;
