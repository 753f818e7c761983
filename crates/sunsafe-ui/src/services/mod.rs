pub mod uv_service;

pub use uv_service::{request_fetch as request_uv_fetch, UvFetchError, UvServiceMessage};
