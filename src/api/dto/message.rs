//! Plain acknowledgement bodies.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement for bulk deletes.
#[derive(Debug, Serialize)]
pub struct DeletedCountResponse {
    pub message: String,
    pub deleted: u64,
}
