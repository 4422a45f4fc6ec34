use crate::core::domain::model::api_response::ApiResponse;
use serde::Deserialize;

/// Answer of `POST /access/ticket`.
pub type LoginResponse = ApiResponse<LoginResponseData>;

#[derive(Debug, Deserialize)]
pub struct LoginResponseData {
    pub ticket: String,
    /// Absent when the server is not asked for one, e.g. for API tokens.
    #[serde(rename = "CSRFPreventionToken", default)]
    pub csrf_token: Option<String>,
    /// The user the ticket was issued for, as `user@realm`.
    #[serde(default)]
    pub username: Option<String>,
}
