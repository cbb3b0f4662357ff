//! Network layer - HTTP request execution
//!
//! The Network actor receives explore commands and sends back response snapshots.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{build_request, create_client, execute_draft};
