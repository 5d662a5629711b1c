use crate::config::{CloudinaryConfig, HttpConfig};
use crate::error::ServiceError;
use crate::services::traits::{MediaHost, ServiceResult};
use crate::services::types::{error_message, UploadFile, UploadResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Unsigned uploads to Cloudinary
pub struct CloudinaryHost {
    client: Client,
    cloud_name: String,
}

impl CloudinaryHost {
    pub fn new(config: &CloudinaryConfig, http: &HttpConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(concat!("land-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            cloud_name: config.cloud_name.trim().to_string(),
        })
    }

    fn upload_url(&self) -> ServiceResult<String> {
        if self.cloud_name.is_empty() {
            return Err(ServiceError::Invalid(
                "Cloudinary cloud name is missing (PUBLIC_CLOUDINARY_CLOUD_NAME)".to_string(),
            ));
        }
        Ok(format!("{}/{}/image/upload", API_BASE, self.cloud_name))
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: &UploadFile, upload_target: &str) -> ServiceResult<String> {
        let url = self.upload_url()?;
        debug!("Uploading {} ({} bytes) with preset {}", file.name, file.bytes.len(), upload_target);

        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", upload_target.to_string());

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| "Upload failed".to_string());
            warn!("Upload of {} rejected ({}): {}", file.name, status, message);
            return Err(ServiceError::api(status.as_u16(), message));
        }

        let uploaded: UploadResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))?;
        info!("Uploaded {} -> {}", file.name, uploaded.secure_url);
        Ok(uploaded.secure_url)
    }

    fn host_name(&self) -> &'static str {
        "Cloudinary"
    }
}
