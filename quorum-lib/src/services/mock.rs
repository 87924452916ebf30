//! Test-only scripted platform backend.

use std::sync::{Arc, Mutex};

use crate::{
    product::ProductInfo,
    profile::ProfileUpdate,
    services::{ApiResult, AvatarReply, Error, Platform, UpdateReply},
};

#[derive(Debug, Clone)]
pub struct MockPlatform {
    pub categories: Option<String>,
    pub update_reply: UpdateReply,
    pub avatar_reply: AvatarReply,
    pub product: ProductInfo,
    pub fail_categories: bool,
    pub fail_update: bool,
    pub fail_avatar: bool,
    category_fetches: Arc<Mutex<usize>>,
    persist_calls: Arc<Mutex<usize>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            categories: None,
            update_reply: UpdateReply {
                status: true,
                message: "profile updated".into(),
            },
            avatar_reply: AvatarReply {
                status: true,
                message: "avatar uploaded".into(),
                avatar_id: 1,
                avatar_url: "/media/avatars/1.png".into(),
            },
            product: ProductInfo {
                name: "Mock Product".into(),
                website: "https://example.com".into(),
            },
            fail_categories: false,
            fail_update: false,
            fail_avatar: false,
            category_fetches: Arc::new(Mutex::new(0)),
            persist_calls: Arc::new(Mutex::new(0)),
        }
    }
}

impl MockPlatform {
    #[must_use]
    pub fn with_categories(payload: &str) -> Self {
        Self {
            categories: Some(payload.to_owned()),
            ..Self::default()
        }
    }

    /// A backend whose every operation fails at the transport level.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_categories: true,
            fail_update: true,
            fail_avatar: true,
            ..Self::default()
        }
    }

    /// A backend that reaches the service but is told "no".
    #[must_use]
    pub fn rejecting_update(message: &str) -> Self {
        Self {
            update_reply: UpdateReply {
                status: false,
                message: message.to_owned(),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rejecting_avatar(message: &str) -> Self {
        Self {
            avatar_reply: AvatarReply {
                status: false,
                message: message.to_owned(),
                avatar_id: 0,
                avatar_url: String::new(),
            },
            ..Self::default()
        }
    }

    pub fn category_fetches(&self) -> usize {
        *self.category_fetches.lock().unwrap()
    }

    /// How many times `save_avatar` was actually invoked.
    pub fn persist_calls(&self) -> usize {
        *self.persist_calls.lock().unwrap()
    }
}

impl Platform for MockPlatform {
    async fn fetch_categories(&self) -> ApiResult<Option<String>> {
        *self.category_fetches.lock().unwrap() += 1;
        if self.fail_categories {
            return Err(Error::Service("mock category failure".into()));
        }
        Ok(self.categories.clone())
    }

    async fn update_profile(&self, _payload: &ProfileUpdate) -> ApiResult<UpdateReply> {
        if self.fail_update {
            return Err(Error::Service("mock update failure".into()));
        }
        Ok(self.update_reply.clone())
    }

    async fn save_avatar(&self, _image: &str) -> ApiResult<AvatarReply> {
        *self.persist_calls.lock().unwrap() += 1;
        if self.fail_avatar {
            return Err(Error::Service("mock avatar failure".into()));
        }
        Ok(self.avatar_reply.clone())
    }

    async fn fetch_product(&self, _slug: &str) -> ApiResult<ProductInfo> {
        Ok(self.product.clone())
    }
}
