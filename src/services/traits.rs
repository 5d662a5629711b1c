use crate::error::ServiceError;
use crate::models::{Property, PropertyPayload, Session};
use crate::services::types::UploadFile;
use async_trait::async_trait;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Credential exchange with the hosted auth service
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Session>;

    async fn sign_out(&self, session: &Session) -> ServiceResult<()>;
}

/// Request-per-operation access to the `properties` table.
///
/// `auth` is the operator's session; without one the request is made with
/// the project's anonymous key.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows, newest first
    async fn list(&self, auth: Option<&Session>) -> ServiceResult<Vec<Property>>;

    async fn count(&self, auth: Option<&Session>) -> ServiceResult<u64>;

    /// Insert one row and return it with its assigned id and timestamp
    async fn insert(
        &self,
        auth: Option<&Session>,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property>;

    /// Replace every field of the row with `id`
    async fn update(
        &self,
        auth: Option<&Session>,
        id: &str,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property>;

    async fn delete(&self, auth: Option<&Session>, id: &str) -> ServiceResult<()>;
}

/// Image hosting; returns the public URL of the stored asset
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, file: &UploadFile, upload_target: &str) -> ServiceResult<String>;

    /// Name of the host, for log lines
    fn host_name(&self) -> &'static str;
}
