use crate::config::{HttpConfig, SupabaseConfig};
use crate::error::ServiceError;
use crate::models::{Property, PropertyPayload, Session};
use crate::services::traits::{AuthService, RowStore, ServiceResult};
use crate::services::types::{error_message, parse_content_range, TokenResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the hosted Supabase project: password auth and the
/// PostgREST endpoint for the listings table
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, http: &HttpConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(concat!("land-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach the project key and the bearer: the operator's token when
    /// signed in, the anon key otherwise
    fn authorized(&self, request: RequestBuilder, auth: Option<&Session>) -> RequestBuilder {
        let bearer = auth
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        request.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    fn row_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }
}

/// Turn a non-success response into a typed error carrying the service's message
async fn check(response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    warn!("Supabase returned {}: {}", status, message);
    Err(ServiceError::api(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    let body = check(response).await?.text().await?;
    serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Representation responses are arrays; we always expect exactly one row back
fn single_row(rows: Vec<Property>, id: Option<&str>) -> ServiceResult<Property> {
    match (rows.into_iter().next(), id) {
        (Some(row), _) => Ok(row),
        (None, Some(id)) => Err(ServiceError::api(404, format!("Property {} not found", id))),
        (None, None) => Err(ServiceError::Decode("no row returned".to_string())),
    }
}

#[async_trait]
impl AuthService for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Session> {
        debug!("Signing in {}", email);

        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let token: TokenResponse = decode(response).await?;
        let session = Session::from(token);
        info!("Signed in as {}", session.operator());
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> ServiceResult<()> {
        let request = self.client.post(self.auth_url("logout"));
        let response = self.authorized(request, Some(session)).send().await?;
        check(response).await?;
        info!("Signed out {}", session.operator());
        Ok(())
    }
}

#[async_trait]
impl RowStore for SupabaseClient {
    async fn list(&self, auth: Option<&Session>) -> ServiceResult<Vec<Property>> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let rows: Vec<Property> = decode(self.authorized(request, auth).send().await?).await?;
        debug!("Fetched {} rows from {}", rows.len(), self.table);
        Ok(rows)
    }

    async fn count(&self, auth: Option<&Session>) -> ServiceResult<u64> {
        let request = self
            .client
            .head(self.table_url())
            .query(&[("select", "*")])
            .header("Prefer", "count=exact");
        let response = check(self.authorized(request, auth).send().await?).await?;

        response
            .headers()
            .get("content-range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| ServiceError::Decode("missing Content-Range total".to_string()))
    }

    async fn insert(
        &self,
        auth: Option<&Session>,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&[payload]);
        let rows: Vec<Property> = decode(self.authorized(request, auth).send().await?).await?;
        let row = single_row(rows, None)?;
        info!("Inserted property {} ({})", row.id, row.title);
        Ok(row)
    }

    async fn update(
        &self,
        auth: Option<&Session>,
        id: &str,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property> {
        let request = self
            .client
            .patch(self.table_url())
            .query(&Self::row_filter(id))
            .header("Prefer", "return=representation")
            .json(payload);
        let rows: Vec<Property> = decode(self.authorized(request, auth).send().await?).await?;
        let row = single_row(rows, Some(id))?;
        info!("Updated property {}", row.id);
        Ok(row)
    }

    async fn delete(&self, auth: Option<&Session>, id: &str) -> ServiceResult<()> {
        let request = self
            .client
            .delete(self.table_url())
            .query(&Self::row_filter(id));
        check(self.authorized(request, auth).send().await?).await?;
        info!("Deleted property {}", id);
        Ok(())
    }
}
