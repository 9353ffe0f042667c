//! Item sources for the two run modes.
//!
//! * [`PageCommentsSource`] — every comment on the page's recent posts
//!   (replies go to the comment).
//! * [`KeywordSearchSource`] — public posts matching each search phrase
//!   (replies go to the post).
//!
//! A failure fetching one post's comments or one keyword is logged and
//! skipped; only a failure listing the page's posts fails the whole fetch.

use std::sync::Arc;

use async_trait::async_trait;

use super::{FetchedItem, GraphClient, ItemSource, PlatformError};

pub struct PageCommentsSource {
    client: Arc<GraphClient>,
    page_id: String,
}

impl PageCommentsSource {
    pub fn new(client: Arc<GraphClient>, page_id: impl Into<String>) -> Self {
        Self {
            client,
            page_id: page_id.into(),
        }
    }
}

#[async_trait]
impl ItemSource for PageCommentsSource {
    fn name(&self) -> &str {
        "page-comments"
    }

    async fn fetch_items(&self) -> Result<Vec<FetchedItem>, PlatformError> {
        let posts = self.client.page_post_ids(&self.page_id).await?;
        log::info!("monitoring {} posts for new comments", posts.len());

        let mut items = Vec::new();
        for post_id in &posts {
            match self.client.comments(post_id).await {
                Ok(comments) => {
                    log::debug!("post {post_id}: {} comments", comments.len());
                    items.extend(comments);
                }
                Err(e) => log::warn!("post {post_id}: failed to fetch comments: {e}"),
            }
        }
        Ok(items)
    }
}

pub struct KeywordSearchSource {
    client: Arc<GraphClient>,
    keywords: Vec<String>,
}

impl KeywordSearchSource {
    pub fn new(client: Arc<GraphClient>, keywords: Vec<String>) -> Self {
        Self { client, keywords }
    }
}

#[async_trait]
impl ItemSource for KeywordSearchSource {
    fn name(&self) -> &str {
        "keyword-search"
    }

    async fn fetch_items(&self) -> Result<Vec<FetchedItem>, PlatformError> {
        let mut items = Vec::new();
        for keyword in &self.keywords {
            match self.client.search_posts(keyword).await {
                Ok(posts) => {
                    log::info!("keyword '{keyword}': found {} posts", posts.len());
                    items.extend(posts);
                }
                Err(e) => log::warn!("keyword '{keyword}': search failed: {e}"),
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<GraphClient> {
        let config = PlatformConfig {
            base_url: server.uri(),
            ..PlatformConfig::default()
        };
        Arc::new(GraphClient::from_config(&config, "tok"))
    }

    #[tokio::test]
    async fn collects_comments_across_posts_and_skips_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v19.0/page/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "p1"}, {"id": "p2"}, {"id": "p3"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v19.0/p1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "c1", "message": "a"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v19.0/p2/comments"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v19.0/p3/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "c3", "message": "b"}]
            })))
            .mount(&server)
            .await;

        let source = PageCommentsSource::new(client_for(&server), "page");
        let items = source.fetch_items().await.unwrap();

        assert_eq!(
            items,
            vec![FetchedItem::comment("c1", "a"), FetchedItem::comment("c3", "b")]
        );
    }

    #[tokio::test]
    async fn post_listing_failure_fails_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v19.0/page/posts"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = PageCommentsSource::new(client_for(&server), "page");
        assert!(source.fetch_items().await.is_err());
    }

    #[tokio::test]
    async fn search_keeps_keyword_order() {
        let server = MockServer::start().await;
        for (kw, id) in [("house for rent", "s1"), ("hall for rent", "s2")] {
            Mock::given(method("GET"))
                .and(path("/v19.0/search"))
                .and(query_param("q", kw))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "data": [{"id": id, "message": kw}]
                })))
                .mount(&server)
                .await;
        }

        let source = KeywordSearchSource::new(
            client_for(&server),
            vec!["house for rent".into(), "hall for rent".into()],
        );
        let ids: Vec<String> = source
            .fetch_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();

        assert_eq!(ids, vec!["s1", "s2"]);
    }
}
