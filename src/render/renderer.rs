//! Read-only projection of an [`UploadResult`] for display.

use serde::Serialize;

use crate::blockchain::explorer::ChainLinkResolver;
use crate::client::types::UploadResult;
use crate::error::UploadError;

/// Everything the presentation layer shows for one result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    /// `data:` URI of the watermarked image.
    pub embedded_uri: Option<String>,
    /// `data:` URI of the extracted watermark.
    pub extracted_uri: Option<String>,
    pub transaction_hash: Option<String>,
    /// Explorer URL, only when the chain has a template.
    pub transaction_link: Option<String>,
    pub image_hash: Option<String>,
    /// Link recovered by decode, shown as-is.
    pub decoded_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer {
    resolver: ChainLinkResolver,
}

impl ResultRenderer {
    pub fn new(resolver: ChainLinkResolver) -> Self {
        Self { resolver }
    }

    /// Explorer link for the result's transaction.
    ///
    /// `Ok(None)` when no transaction was registered; `UnsupportedChain` when
    /// there is a hash but the chain has no explorer template.
    pub fn transaction_link(&self, result: &UploadResult) -> Result<Option<String>, UploadError> {
        match result.transaction_hash.as_deref() {
            Some(hash) => Ok(Some(self.resolver.resolve(result.chain, hash)?)),
            None => Ok(None),
        }
    }

    /// Render whatever subset of fields is present. Never fails.
    pub fn render(&self, result: &UploadResult) -> RenderedResult {
        let transaction_link = self.transaction_link(result).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No explorer link for transaction");
            None
        });

        RenderedResult {
            embedded_uri: result.embedded.as_ref().map(|a| a.data_uri()),
            extracted_uri: result.extracted.as_ref().map(|a| a.data_uri()),
            transaction_hash: result.transaction_hash.clone(),
            transaction_link,
            image_hash: result.image_hash.clone(),
            decoded_link: result.decoded_link.clone(),
        }
    }
}
