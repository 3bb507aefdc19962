//! Elasticsearch storage adapter implementation

pub mod config;
pub mod query;

pub use config::ElasticsearchConfig;

use async_trait::async_trait;
use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::Document;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ports::{IndexInfo, IndexSettings, KnnQuery, SearchIndex, StoredHit};

/// Elasticsearch k-NN index adapter over the REST API
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    base_url: Url,
    config: ElasticsearchConfig,
}

impl ElasticsearchIndex {
    /// Create a new adapter with the given configuration
    ///
    /// No request is made; use [`SearchIndex::ping`] to check connectivity.
    pub fn new(config: ElasticsearchConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder().timeout(config.timeout).build().map_err(|e| {
            FlexsearchError::Connection {
                url: config.url.clone(),
                reason: format!("failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self { client, base_url, config })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Build a URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FlexsearchError::ConfigInvalid {
                key: "elasticsearch_url".to_string(),
                reason: format!("'{}' cannot be used as a base URL", self.config.url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let builder = self.client.request(method, self.url(segments)?);
        Ok(match &self.config.username {
            Some(username) => builder.basic_auth(username, self.config.password.as_ref()),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|e| FlexsearchError::Connection {
            url: self.config.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Upsert through `_bulk`, which carries the ID in the body
    async fn upsert_bulk(&self, index: &str, document: &Document) -> Result<()> {
        let id = document.id.as_str();
        let body = query::bulk_index_body(index, id, &document.to_source());
        let builder = self
            .request(Method::POST, &["_bulk"])?
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        let response = self.send(builder).await?;

        if !response.status().is_success() {
            return Err(FlexsearchError::Index {
                id: id.to_string(),
                reason: Self::failure_reason(response).await,
            });
        }

        let text = response.text().await.map_err(|e| FlexsearchError::Connection {
            url: self.config.url.clone(),
            reason: e.to_string(),
        })?;
        if let Some(reason) = query::bulk_item_error(&text)? {
            return Err(FlexsearchError::Index { id: id.to_string(), reason });
        }

        debug!(index = %index, id = %id, "upserted document through _bulk");
        Ok(())
    }

    async fn failure_reason(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("{} ({})", query::error_reason(&body), status)
    }
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn ping(&self) -> Result<()> {
        let response = self.send(self.request(Method::GET, &[])?).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(FlexsearchError::Connection {
                url: self.config.url.clone(),
                reason: Self::failure_reason(response).await,
            })
        }
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self.send(self.request(Method::HEAD, &[index])?).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(FlexsearchError::Connection {
                url: self.config.url.clone(),
                reason: format!("unexpected status {} checking index '{}'", status, index),
            }),
        }
    }

    async fn create_index(&self, index: &str, settings: &IndexSettings) -> Result<()> {
        let body = query::create_index_body(settings);
        let response = self.send(self.request(Method::PUT, &[index])?.json(&body)).await?;

        if !response.status().is_success() {
            return Err(FlexsearchError::Index {
                id: index.to_string(),
                reason: format!("index creation failed: {}", Self::failure_reason(response).await),
            });
        }

        info!(
            index = %index,
            field = %settings.vector_field,
            dims = settings.dimensions,
            model = %settings.model,
            "created index"
        );
        Ok(())
    }

    async fn index_info(&self, index: &str) -> Result<Option<IndexInfo>> {
        let response = self.send(self.request(Method::GET, &[index, "_mapping"])?).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await.map_err(|e| FlexsearchError::Connection {
                    url: self.config.url.clone(),
                    reason: e.to_string(),
                })?;
                query::parse_mapping_response(index, &body).map(Some)
            }
            _ => Err(FlexsearchError::search(Self::failure_reason(response).await)),
        }
    }

    async fn upsert(&self, index: &str, document: &Document) -> Result<()> {
        let id = document.id.as_str();
        if is_dot_segment(id) {
            return self.upsert_bulk(index, document).await;
        }

        let response = self
            .send(self.request(Method::PUT, &[index, "_doc", id])?.json(&document.to_source()))
            .await?;

        if !response.status().is_success() {
            return Err(FlexsearchError::Index {
                id: id.to_string(),
                reason: Self::failure_reason(response).await,
            });
        }

        debug!(index = %index, id = %id, "upserted document");
        Ok(())
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        let response = self.send(self.request(Method::POST, &[index, "_refresh"])?).await?;
        if !response.status().is_success() {
            return Err(FlexsearchError::Index {
                id: index.to_string(),
                reason: format!("refresh failed: {}", Self::failure_reason(response).await),
            });
        }
        Ok(())
    }

    async fn count(&self, index: &str) -> Result<u64> {
        let response = self.send(self.request(Method::GET, &[index, "_count"])?).await?;
        if !response.status().is_success() {
            return Err(FlexsearchError::search(Self::failure_reason(response).await));
        }
        let body: CountResponse = response
            .json()
            .await
            .map_err(|e| FlexsearchError::search(format!("unexpected count response: {}", e)))?;
        Ok(body.count)
    }

    async fn knn_search(&self, index: &str, knn: &KnnQuery) -> Result<Vec<StoredHit>> {
        let body = query::knn_body(knn);
        let response =
            self.send(self.request(Method::POST, &[index, "_search"])?.json(&body)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                Err(FlexsearchError::search(format!("index '{}' does not exist", index)))
            }
            status if status.is_success() => {
                let text = response.text().await.map_err(|e| FlexsearchError::Connection {
                    url: self.config.url.clone(),
                    reason: e.to_string(),
                })?;
                let mut hits = query::parse_search_response(&text)?;
                hits.truncate(knn.k);
                debug!(index = %index, hits = hits.len(), "knn search");
                Ok(hits)
            }
            _ => Err(FlexsearchError::search(Self::failure_reason(response).await)),
        }
    }

    fn backend_name(&self) -> &str {
        "elasticsearch"
    }
}

/// URL parsers drop `.` and `..` path segments, encoded or not
fn is_dot_segment(id: &str) -> bool {
    id == "." || id == ".."
}
