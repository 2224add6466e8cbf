//! HTTP transport: the request wrapper and header construction.

pub mod headers;
pub mod http;

pub use http::{ApiWrapper, ACCEPT_CREATED, ACCEPT_DEFAULT, ACCEPT_OK};
