//! Backend library modules.
//!
//! The crate is organised hexagonally: `domain` holds framework-independent
//! entities, ports, and services; `inbound` adapts HTTP requests onto the
//! driving ports; `outbound` implements the driven ports against PostgreSQL
//! and the token/password infrastructure.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Request tracing middleware attaching a `trace-id` header to responses.
pub use middleware::trace::Trace;
