//! Transport seam between the controller and the remote service.

use std::future::Future;
use std::sync::Arc;

use crate::client::types::{UploadRequest, UploadResult};
use crate::error::UploadError;

/// Issues one submission to the watermark service.
///
/// Implementations must map failures onto `Network`, `Server` or `Decode`.
pub trait WatermarkService: Send + Sync + 'static {
    fn submit(
        &self,
        request: UploadRequest,
    ) -> impl Future<Output = Result<UploadResult, UploadError>> + Send;
}

impl<T: WatermarkService> WatermarkService for Arc<T> {
    fn submit(
        &self,
        request: UploadRequest,
    ) -> impl Future<Output = Result<UploadResult, UploadError>> + Send {
        (**self).submit(request)
    }
}
