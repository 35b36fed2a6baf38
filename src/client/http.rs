//! HTTP transport built on reqwest.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::client::service::WatermarkService;
use crate::client::types::{ImageFile, UploadRequest, UploadResult};
use crate::client::wire;
use crate::config::schema::{ClientConfig, DecodeContract};
use crate::error::UploadError;

/// Talks multipart to the embed and decode endpoints.
#[derive(Debug, Clone)]
pub struct HttpWatermarkService {
    client: Client,
    upload_url: String,
    decode_url: String,
    decode_contract: DecodeContract,
}

impl HttpWatermarkService {
    /// Build the client from validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.service.use_system_proxy {
            builder = builder.no_proxy();
        }

        let base = config.service.base_url.trim_end_matches('/');
        Ok(Self {
            client: builder.build()?,
            upload_url: format!("{}{}", base, config.service.upload_path),
            decode_url: format!("{}{}", base, config.service.decode_path),
            decode_contract: config.service.decode_contract,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn decode_url(&self) -> &str {
        &self.decode_url
    }

    async fn post(&self, url: &str, form: Form) -> Result<String, UploadError> {
        let resp = self.client.post(url).multipart(form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            // The status alone decides the error; an unreadable body only
            // loses the detail.
            let detail = match resp.text().await {
                Ok(text) => wire::error_detail(&text),
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Error body unreadable");
                    None
                }
            };
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                detail = ?detail,
                "Service returned error status"
            );
            return Err(UploadError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(resp.text().await?)
    }
}

fn file_part(file: &ImageFile) -> Result<Part, UploadError> {
    let part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
    match &file.mime_type {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|_| UploadError::Validation(format!("Invalid MIME type {:?} for {}", mime, file.name))),
        None => Ok(part),
    }
}

impl WatermarkService for HttpWatermarkService {
    async fn submit(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        let file = request.file();
        tracing::debug!(
            mode = %request.mode(),
            file = %file.name,
            size = file.len(),
            "Sending submission"
        );

        match request {
            UploadRequest::Embed { file, chain, wallet_key } => {
                let form = Form::new()
                    .part("file", file_part(&file)?)
                    .text("chain", chain.as_str())
                    .text("key", wallet_key.expose().to_string());
                let body = self.post(&self.upload_url, form).await?;
                wire::parse_embed(&body, chain)
            }
            UploadRequest::Decode { file } => {
                let form = Form::new().part("file", file_part(&file)?);
                let body = self.post(&self.decode_url, form).await?;
                wire::parse_decode(&body, self.decode_contract)
            }
        }
    }
}
