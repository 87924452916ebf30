//! Remote operations consumed by the edit session and the navigation panel.
//!
//! The platform is reached through the [`Platform`] trait; [`AnyPlatform`]
//! dispatches between the HTTP transport and the scripted mock backend used
//! in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{product::ProductInfo, profile::ProfileUpdate};

pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use http::HttpPlatform;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPlatform;

pub type ApiResult<T> = Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Service(String),
}

/// Outcome of the profile update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReply {
    pub status: bool,
    #[serde(default)]
    pub message: String,
}

/// Outcome of the avatar persist operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarReply {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub avatar_id: i64,
    pub avatar_url: String,
}

/// The platform's remote operations, one method per collaborator.
pub trait Platform: Send + Sync {
    /// Fetch the encoded category taxonomy. `None` means no taxonomy has
    /// been published yet. Called once per session by the taxonomy cache.
    fn fetch_categories(&self) -> impl Future<Output = ApiResult<Option<String>>> + Send;

    /// Submit a normalized profile update.
    fn update_profile(
        &self,
        payload: &ProfileUpdate,
    ) -> impl Future<Output = ApiResult<UpdateReply>> + Send;

    /// Persist a staged avatar image (a thumbnail reference or data URL).
    fn save_avatar(&self, image: &str) -> impl Future<Output = ApiResult<AvatarReply>> + Send;

    /// Fetch the product header data for the navigation panel.
    fn fetch_product(&self, slug: &str) -> impl Future<Output = ApiResult<ProductInfo>> + Send;
}

/// Generates a match over all `AnyPlatform` variants, binding the inner
/// backend and evaluating the given closure for each arm.
macro_rules! delegate_platform {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyPlatform::Http($p) => $expr,
            #[cfg(any(test, feature = "mock"))]
            AnyPlatform::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyPlatform {
    Http(HttpPlatform),
    #[cfg(any(test, feature = "mock"))]
    Mock(MockPlatform),
}

impl Platform for AnyPlatform {
    async fn fetch_categories(&self) -> ApiResult<Option<String>> {
        delegate_platform!(self, |p| p.fetch_categories().await)
    }

    async fn update_profile(&self, payload: &ProfileUpdate) -> ApiResult<UpdateReply> {
        delegate_platform!(self, |p| p.update_profile(payload).await)
    }

    async fn save_avatar(&self, image: &str) -> ApiResult<AvatarReply> {
        delegate_platform!(self, |p| p.save_avatar(image).await)
    }

    async fn fetch_product(&self, slug: &str) -> ApiResult<ProductInfo> {
        delegate_platform!(self, |p| p.fetch_product(slug).await)
    }
}
