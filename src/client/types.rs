//! Request and result types shared by the transport and the controller.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::blockchain::types::Chain;
use crate::settings::model::WalletKey;

/// Which service operation a controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitMode {
    /// Embed a watermark and register the image on-chain.
    Embed,
    /// Recover a previously embedded watermark or link.
    Decode,
}

impl SubmitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitMode::Embed => "embed",
            SubmitMode::Decode => "decode",
        }
    }
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name sent in the multipart `file` part.
    pub name: String,
    /// Raw file contents.
    pub bytes: Bytes,
    /// Declared MIME type, if known.
    pub mime_type: Option<String>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime_type = mime_from_name(&name).map(str::to_string);
        Self {
            name,
            bytes: bytes.into(),
            mime_type,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read an image from disk, inferring the MIME type from its extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What a controller sends to the service for one submission.
#[derive(Debug, Clone)]
pub enum UploadRequest {
    Embed {
        file: ImageFile,
        chain: Chain,
        wallet_key: WalletKey,
    },
    Decode {
        file: ImageFile,
    },
}

impl UploadRequest {
    pub fn mode(&self) -> SubmitMode {
        match self {
            UploadRequest::Embed { .. } => SubmitMode::Embed,
            UploadRequest::Decode { .. } => SubmitMode::Decode,
        }
    }

    pub fn file(&self) -> &ImageFile {
        match self {
            UploadRequest::Embed { file, .. } | UploadRequest::Decode { file } => file,
        }
    }
}

/// An image payload returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl Artifact {
    /// `data:<mime>;base64,<bytes>` for direct display.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// File extension matching the MIME type, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        extension_from_mime(&self.mime_type)
    }
}

/// Outcome of one successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    /// Watermarked image (embed).
    pub embedded: Option<Artifact>,
    /// Visualization of the embedded or recovered watermark.
    pub extracted: Option<Artifact>,
    /// Registration transaction, only when the service reports success.
    pub transaction_hash: Option<String>,
    /// Fingerprint the service registered.
    pub image_hash: Option<String>,
    /// Link recovered from the image (decode).
    pub decoded_link: Option<String>,
    /// Chain the submission was made against.
    pub chain: Option<Chain>,
}

impl UploadResult {
    pub fn is_empty(&self) -> bool {
        *self == UploadResult::default()
    }
}

const MIME_TABLE: [(&str, &str); 8] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    MIME_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

fn extension_from_mime(mime: &str) -> &'static str {
    let mime = mime.split(';').next().unwrap_or(mime).trim();
    MIME_TABLE
        .iter()
        .find(|(_, m)| m.eq_ignore_ascii_case(mime))
        .map(|(ext, _)| *ext)
        .unwrap_or("bin")
}
