//! HTTP transport for whitelist lookups.
//!
//! Implements the gate's [`HttpTransport`](admission_gate::HttpTransport)
//! contract on top of `reqwest`: every GET runs on its own Tokio task and
//! ends in exactly one callback.

mod error;
mod transport;

pub use error::{TransportError, TransportResult};
pub use transport::ReqwestTransport;
