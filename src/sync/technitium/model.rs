use serde::Deserialize;

use super::error::{TechnitiumError, TechnitiumResult};

pub const STATUS_OK: &str = "ok";

/// Wrapper around every Technitium API answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: String,
    pub response: Option<T>,
    pub error_message: Option<String>,
}

impl<T: Default> Envelope<T> {
    /// Payload of an `ok` answer; a missing payload counts as empty.
    pub fn into_response(self, action: &'static str) -> TechnitiumResult<T> {
        if self.status != STATUS_OK {
            return Err(TechnitiumError::Api {
                action,
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            });
        }

        Ok(self.response.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: String,
    pub token: Option<String>,
    pub error_message: Option<String>,
}
