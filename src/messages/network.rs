//! Network messages - communication between App and Network layers

use crate::render::ResponseSnapshot;
use crate::request::RequestDraft;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Send a built request
    Explore { id: u64, draft: RequestDraft },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// The request finished, successfully or with a status 0 snapshot
    Completed {
        id: u64,
        snapshot: ResponseSnapshot,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
