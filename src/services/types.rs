use crate::error::ServiceError;
use crate::models::{Session, SessionUser};
use serde::Deserialize;
use std::path::Path;

/// A local file selected for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Password grant response from the auth endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub user: SessionUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session::new(
            token.access_token,
            token.refresh_token,
            token.expires_in,
            token.user,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub secure_url: String,
}

/// Pull a human-readable message out of an error body. The row store,
/// the auth service and the media host each use a different shape.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let pick = |v: &serde_json::Value| v.as_str().map(str::to_string);

    value
        .pointer("/error/message")
        .and_then(pick)
        .or_else(|| value.get("message").and_then(pick))
        .or_else(|| value.get("msg").and_then(pick))
        .or_else(|| value.get("error_description").and_then(pick))
        .or_else(|| value.get("error").and_then(pick))
        .filter(|m| !m.trim().is_empty())
}

/// Total from a `Content-Range` header such as `0-9/10` or `*/0`
pub(crate) fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}
