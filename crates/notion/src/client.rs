//! Notion REST API client.
//!
//! Each `PageStore` method maps to exactly one HTTP call. Only the first
//! page of any paginated listing is read (`page_size` ≤ 100, no cursor
//! following), and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use metodo_core::error::StoreError;
use metodo_core::store::{Block, DatabaseQuery, NewBlock, Page, PageStore, Parent, PropertyMap};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Largest page size the Notion API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A Notion API client authenticated with an integration token.
pub struct NotionClient {
    base_url: String,
    token: String,
    version: String,
    client: reqwest::Client,
}

impl NotionClient {
    /// Create a client against the public Notion API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.notion.com/v1".into(),
            token: token.into(),
            version: "2022-06-28".into(),
            client: build_client(Duration::from_secs(30)),
        }
    }

    /// Build a client from the `[notion]` config section.
    pub fn from_config(config: &metodo_config::NotionConfig) -> Result<Self, StoreError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StoreError::AuthenticationFailed("NOTION_TOKEN is not set".into()))?;

        Ok(Self::new(token)
            .with_base_url(&config.api_url)
            .with_version(&config.version)
            .with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded,
    /// so an id containing `/` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let invalid = || StoreError::Network(format!("invalid Notion URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    /// Send a request and decode the JSON body, mapping failures to `StoreError`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: &str,
    ) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), object = target, body = %body, "Notion returned error");
            return Err(map_error(status, &body, target, retry_after));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(format!("{target}: {e}")))
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Error body returned by the Notion API.
#[derive(Debug, Default, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

fn map_error(status: StatusCode, body: &str, target: &str, retry_after: Option<u64>) -> StoreError {
    let parsed: NotionErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        body.to_string()
    } else {
        parsed.message
    };

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(format!("{target}: {message}")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::AuthenticationFailed(message)
        }
        StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(1),
        },
        _ => StoreError::ApiError {
            status_code: status.as_u16(),
            code: parsed.code,
            message,
        },
    }
}

/// A paginated list response; only `results` is used.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    results: Vec<T>,
}

#[async_trait]
impl PageStore for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: DatabaseQuery,
    ) -> Result<Vec<Page>, StoreError> {
        let query = DatabaseQuery {
            page_size: query.page_size.clamp(1, MAX_PAGE_SIZE),
            ..query
        };
        debug!(
            database_id,
            page_size = query.page_size,
            filtered = query.filter.is_some(),
            "Querying database"
        );

        let url = self.endpoint(&["databases", database_id, "query"])?;
        let request = self.request(Method::POST, url).json(&query);
        let list: ListResponse<Page> = self.send(request, database_id).await?;
        Ok(list.results)
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, StoreError> {
        debug!(page_id, "Retrieving page");
        let url = self.endpoint(&["pages", page_id])?;
        self.send(self.request(Method::GET, url), page_id).await
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: PropertyMap,
        children: Vec<NewBlock>,
    ) -> Result<Page, StoreError> {
        debug!(database_id, children = children.len(), "Creating page");
        let body = serde_json::json!({
            "parent": Parent::database(database_id),
            "properties": properties,
            "children": children,
        });
        let url = self.endpoint(&["pages"])?;
        let request = self.request(Method::POST, url).json(&body);
        self.send(request, database_id).await
    }

    async fn update_page_properties(
        &self,
        page_id: &str,
        properties: PropertyMap,
    ) -> Result<Page, StoreError> {
        debug!(page_id, properties = properties.len(), "Updating page properties");
        let body = serde_json::json!({ "properties": properties });
        let url = self.endpoint(&["pages", page_id])?;
        let request = self.request(Method::PATCH, url).json(&body);
        self.send(request, page_id).await
    }

    async fn archive_page(&self, page_id: &str) -> Result<Page, StoreError> {
        debug!(page_id, "Archiving page");
        let body = serde_json::json!({ "archived": true });
        let url = self.endpoint(&["pages", page_id])?;
        let request = self.request(Method::PATCH, url).json(&body);
        self.send(request, page_id).await
    }

    async fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, StoreError> {
        debug!(block_id, "Listing block children");
        let mut url = self.endpoint(&["blocks", block_id, "children"])?;
        url.query_pairs_mut()
            .append_pair("page_size", &MAX_PAGE_SIZE.to_string());
        let list: ListResponse<Block> = self.send(self.request(Method::GET, url), block_id).await?;
        Ok(list.results)
    }

    async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<NewBlock>,
    ) -> Result<(), StoreError> {
        debug!(block_id, children = children.len(), "Appending block children");
        let body = serde_json::json!({ "children": children });
        let url = self.endpoint(&["blocks", block_id, "children"])?;
        let request = self.request(Method::PATCH, url).json(&body);
        let _: serde_json::Value = self.send(request, block_id).await?;
        Ok(())
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        debug!(block_id, "Deleting block");
        let url = self.endpoint(&["blocks", block_id])?;
        let _: serde_json::Value = self.send(self.request(Method::DELETE, url), block_id).await?;
        Ok(())
    }

    async fn search_pages(&self, query: &str) -> Result<Vec<Page>, StoreError> {
        debug!(query, "Searching pages");
        let body = serde_json::json!({
            "query": query,
            "filter": { "property": "object", "value": "page" },
        });
        let url = self.endpoint(&["search"])?;
        let request = self.request(Method::POST, url).json(&body);
        let list: ListResponse<Page> = self.send(request, "search").await?;
        Ok(list.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page with ID: abc."}"#;
        let err = map_error(StatusCode::NOT_FOUND, body, "abc", None);
        match err {
            StoreError::NotFound(msg) => assert!(msg.contains("Could not find page")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_error_keeps_code() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"body failed validation"}"#;
        let err = map_error(StatusCode::BAD_REQUEST, body, "db", None);
        match err {
            StoreError::ApiError {
                status_code,
                code,
                message,
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "body failed validation");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_and_rate_limited() {
        assert!(matches!(
            map_error(StatusCode::UNAUTHORIZED, "{}", "x", None),
            StoreError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            map_error(StatusCode::TOO_MANY_REQUESTS, "", "x", Some(7)),
            StoreError::RateLimited {
                retry_after_secs: 7
            }
        ));
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        let err = map_error(StatusCode::BAD_GATEWAY, "upstream down", "x", None);
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn from_config_requires_token() {
        let config = metodo_config::NotionConfig::default();
        assert!(NotionClient::from_config(&config).is_err());

        let config = metodo_config::NotionConfig {
            token: Some("secret_x".into()),
            api_url: "http://localhost:9999/v1/".into(),
            ..Default::default()
        };
        let client = NotionClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1");
        assert_eq!(client.name(), "notion");
    }

    #[test]
    fn ids_stay_single_path_segments() {
        let client = NotionClient::new("secret_x").with_base_url("http://localhost:9999/v1");

        let url = client.endpoint(&["pages", "x/../../v1/users"]).unwrap();
        assert_eq!(url.path(), "/v1/pages/x%2F..%2F..%2Fv1%2Fusers");

        let url = client.endpoint(&["blocks", "b1?page_size=1", "children"]).unwrap();
        assert_eq!(url.path(), "/v1/blocks/b1%3Fpage_size=1/children");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn endpoint_rejects_unusable_base_url() {
        let client = NotionClient::new("secret_x").with_base_url("not a url");
        assert!(matches!(
            client.endpoint(&["search"]),
            Err(StoreError::Network(_))
        ));
    }

    #[test]
    fn parse_query_response() {
        let data = r#"{
            "object": "list",
            "results": [{"object": "page", "id": "p1", "properties": {}}],
            "next_cursor": null,
            "has_more": false
        }"#;
        let list: ListResponse<Page> = serde_json::from_str(data).unwrap();
        assert_eq!(list.results.len(), 1);
        assert_eq!(list.results[0].id, "p1");
    }
}
