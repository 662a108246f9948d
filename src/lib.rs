//! Wireline - a small HTTP/1.1 server
//!
//! Bounded request parsing, ordered path-pattern routing and keep-alive
//! connection handling on top of tokio.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
