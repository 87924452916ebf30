//! JSON transport against the platform's HTTP API.

use serde::{Deserialize, Serialize};

use crate::{
    product::ProductInfo,
    profile::ProfileUpdate,
    services::{ApiResult, AvatarReply, Platform, UpdateReply},
};

#[derive(Debug, Clone)]
pub struct HttpPlatform {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlatform {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListing {
    #[serde(default)]
    task_category_listing: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveAvatarBody<'a> {
    avatar: &'a str,
}

impl Platform for HttpPlatform {
    async fn fetch_categories(&self) -> ApiResult<Option<String>> {
        let listing: CategoryListing = self
            .client
            .get(self.url("/api/task-categories"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing.task_category_listing)
    }

    async fn update_profile(&self, payload: &ProfileUpdate) -> ApiResult<UpdateReply> {
        Ok(self
            .client
            .post(self.url("/api/people/update"))
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn save_avatar(&self, image: &str) -> ApiResult<AvatarReply> {
        Ok(self
            .client
            .post(self.url("/api/people/avatar"))
            .json(&SaveAvatarBody { avatar: image })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn fetch_product(&self, slug: &str) -> ApiResult<ProductInfo> {
        Ok(self
            .client
            .get(self.url(&format!("/api/products/{slug}")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}
