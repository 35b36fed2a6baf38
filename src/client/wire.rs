//! JSON bodies exchanged with the watermark service.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::blockchain::types::Chain;
use crate::client::types::{Artifact, UploadResult};
use crate::config::schema::DecodeContract;
use crate::error::UploadError;

/// Accepts padded or unpadded payloads and non-canonical trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// `{ "data": <base64>, "type": <mime> }`
#[derive(Debug, Deserialize)]
pub struct WireArtifact {
    pub data: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Successful `POST /api/v1/upload` body.
#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    pub embedded: WireArtifact,
    pub extracted: WireArtifact,
    #[serde(default, rename = "txHash", alias = "tx_hash")]
    pub tx_hash: Option<String>,
    #[serde(default, rename = "imageHash", alias = "image_hash")]
    pub image_hash: Option<String>,
}

/// Successful decode body under [`DecodeContract::Link`].
#[derive(Debug, Deserialize)]
pub struct DecodeLinkResponse {
    pub link: String,
}

/// Successful decode body under [`DecodeContract::Extracted`].
#[derive(Debug, Deserialize)]
pub struct DecodeExtractedResponse {
    pub extracted: WireArtifact,
}

/// Non-success body. FastAPI sends `detail` as a string or a list.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl WireArtifact {
    fn into_artifact(self, field: &str) -> Result<Artifact, UploadError> {
        // Line-wrapped output (e.g. Python's `encodebytes`) is valid too.
        let compact: String = self.data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = LENIENT
            .decode(compact.as_bytes())
            .map_err(|e| UploadError::Decode(format!("`{}.data` is not valid base64: {}", field, e)))?;
        if self.mime_type.trim().is_empty() {
            return Err(UploadError::Decode(format!("`{}.type` is empty", field)));
        }
        Ok(Artifact {
            bytes: bytes.into(),
            mime_type: self.mime_type,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, UploadError> {
    serde_json::from_str(body).map_err(|e| UploadError::Decode(e.to_string()))
}

/// Decode an embed response into an [`UploadResult`].
pub fn parse_embed(body: &str, chain: Chain) -> Result<UploadResult, UploadError> {
    let response: EmbedResponse = parse(body)?;
    Ok(UploadResult {
        embedded: Some(response.embedded.into_artifact("embedded")?),
        extracted: Some(response.extracted.into_artifact("extracted")?),
        transaction_hash: non_empty(response.tx_hash),
        image_hash: non_empty(response.image_hash),
        decoded_link: None,
        chain: Some(chain),
    })
}

/// Decode a decode response according to the deployed contract.
pub fn parse_decode(body: &str, contract: DecodeContract) -> Result<UploadResult, UploadError> {
    match contract {
        DecodeContract::Link => {
            let response: DecodeLinkResponse = parse(body)?;
            if response.link.trim().is_empty() {
                return Err(UploadError::Decode("`link` is empty".to_string()));
            }
            Ok(UploadResult {
                decoded_link: Some(response.link),
                ..UploadResult::default()
            })
        }
        DecodeContract::Extracted => {
            let response: DecodeExtractedResponse = parse(body)?;
            Ok(UploadResult {
                extracted: Some(response.extracted.into_artifact("extracted")?),
                ..UploadResult::default()
            })
        }
    }
}

/// Pull a displayable `detail` out of an error body, if there is one.
pub fn error_detail(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    match body.detail? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
