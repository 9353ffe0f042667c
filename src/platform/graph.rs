//! Minimal Facebook Graph API client.
//!
//! | Call | Request |
//! |------|---------|
//! | [`page_post_ids`](GraphClient::page_post_ids) | `GET /{page_id}/posts?fields=id,created_time` |
//! | [`comments`](GraphClient::comments) | `GET /{post_id}/comments?fields=id,message,created_time` |
//! | [`search_posts`](GraphClient::search_posts) | `GET /search?type=post&q=…` |
//! | [`post_reply`](ReplySink::post_reply) | `POST /{id}/comments` `{message, access_token}` |
//!
//! Only the first page of each listing is read; pagination and retries are
//! left to the next scheduled run.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DeliveryOutcome, FetchedItem, PlatformError, ReplySink};
use crate::config::PlatformConfig;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct GraphClient {
    client: reqwest::Client,
    /// `{base_url}/{api_version}` without a trailing slash.
    api_root: String,
    token: String,
}

impl GraphClient {
    /// Build a client for `config` authenticated with `token`.
    pub fn from_config(config: &PlatformConfig, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_root = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.api_version.trim_matches('/')
        );

        Self {
            client,
            api_root,
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    async fn get_listing(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<RawItem>, PlatformError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .query(&[("access_token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| PlatformError::Parse(e.to_string()))?;
        Ok(listing.data)
    }

    fn collect_items(raw: Vec<RawItem>, make: fn(String, String) -> FetchedItem) -> Vec<FetchedItem> {
        raw.into_iter()
            .filter_map(|item| match item.id {
                Some(id) => Some(make(id, item.message.unwrap_or_default())),
                None => {
                    log::warn!("graph: dropping listing entry without an id");
                    None
                }
            })
            .collect()
    }

    /// Ids of the page's most recent posts.
    pub async fn page_post_ids(&self, page_id: &str) -> Result<Vec<String>, PlatformError> {
        let raw = self
            .get_listing(&format!("{page_id}/posts"), &[("fields", "id,created_time")])
            .await?;
        Ok(raw.into_iter().filter_map(|item| item.id).collect())
    }

    /// Comments on `post_id`.
    pub async fn comments(&self, post_id: &str) -> Result<Vec<FetchedItem>, PlatformError> {
        let raw = self
            .get_listing(
                &format!("{post_id}/comments"),
                &[("fields", "id,message,created_time")],
            )
            .await?;
        Ok(Self::collect_items(raw, |id, msg| FetchedItem::comment(id, msg)))
    }

    /// Public posts matching `keyword`.
    pub async fn search_posts(&self, keyword: &str) -> Result<Vec<FetchedItem>, PlatformError> {
        let raw = self
            .get_listing("search", &[("type", "post"), ("q", keyword)])
            .await?;
        Ok(Self::collect_items(raw, |id, msg| FetchedItem::post(id, msg)))
    }
}

#[async_trait]
impl ReplySink for GraphClient {
    async fn post_reply(&self, item_id: &str, message: &str) -> DeliveryOutcome {
        let body = serde_json::json!({
            "message": message,
            "access_token": self.token,
        });

        let response = match self
            .client
            .post(self.url(&format!("{item_id}/comments")))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return DeliveryOutcome {
                    delivered: false,
                    detail: PlatformError::from(e).to_string(),
                }
            }
        };

        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        DeliveryOutcome {
            delivered: status.is_success(),
            detail: if status.is_success() {
                detail
            } else {
                format!("HTTP {}: {detail}", status.as_u16())
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
