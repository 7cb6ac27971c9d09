use crate::domain::model::{ModelRequest, ModelResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The external text generation service.
///
/// Transport, auth and quota failures come back as
/// `WordWolfError::ExternalService` / `ApiError`. Whatever text the service
/// produced is returned untouched; shape checks belong to the parser.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        (**self).generate(request).await
    }
}

/// Model identity and sampling knobs sent with every request.
pub trait ModelSettingsProvider: Send + Sync {
    fn model_name(&self) -> &str;
    fn temperature(&self) -> f32;
    fn reasoning_budget(&self) -> u32;
}
