//! HTTP surface of the describe service.
//!
//! `describe_router()` returns a composable axum `Router` with the
//! `/describe` and `/healthz` routes; `server` owns the bind/spawn/shutdown
//! lifecycle around it.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

pub use router::{describe_router, AppState};
pub use server::{start_server_on, DescribeServer, ServerSession};
