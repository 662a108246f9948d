//! HTTP/1.1 protocol implementation.
//!
//! # Architecture
//!
//! - **`line_reader`**: Bounded line reads over a buffered byte stream
//! - **`parser`**: Turns lines into one validated [`Request`]
//! - **`request`**: Request representation, methods and query strings
//! - **`response`**: Status codes and reason phrases
//! - **`writer`**: Accumulates a response and serializes it in one piece
//! - **`handler`**: The trait every handler and router implements
//! - **`connection`**: The per-socket request/response state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Parse the next request
//!        └──────┬───────────┘
//!               │ Request parsed (EOF → Closed, malformed → 400 → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Run the handler
//!        └──────┬───────────┘
//!               │ Response buffered
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Flush to the client
//!        └──────┬───────────┘
//!               ├─ Keep-Alive → AwaitingRequest (same connection)
//!               └─ HTTP/1.0 or Connection: close → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use wireline::config::Limits;
//! use wireline::http::connection::Connection;
//! use wireline::router::Router;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let router: Arc<dyn wireline::http::Handler> = Arc::new(Router::new());
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router, &Limits::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod handler;
pub mod line_reader;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub use handler::Handler;
pub use request::{Method, Request};
pub use response::StatusCode;
pub use writer::ResponseWriter;
