//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CodePurpose;

/// Request for POST /api/2fa/codes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeRequest {
    pub email: String,
    #[serde(default)]
    pub purpose: CodePurpose,
}

/// Response for POST /api/2fa/codes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeResponse {
    pub expires_at_ms: i64,
}

/// Request for POST /api/2fa/codes/verify
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub email: String,
    #[serde(default)]
    pub purpose: CodePurpose,
    pub code: String,
}

/// Successful verification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub verified: bool,
}

/// Request for POST /api/2fa/login/begin
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginLoginRequest {
    pub email: String,
}

/// Response for POST /api/2fa/login/begin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginLoginResponse {
    pub two_factor_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

/// Request for POST /api/2fa/login/complete
///
/// `code` may be omitted when two-factor login is switched off.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLoginRequest {
    pub email: String,
    #[serde(default)]
    pub code: String,
}
