use crate::errors::{ApiError, ProviderError};
use crate::validation::PageParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub mod cache;

pub use cache::CachedProvider;

const GIPHY_API_BASE_URL: &str = "https://api.giphy.com/v1/gifs";

// Fixed content-safety and locale filters, not user-configurable
const RATING: &str = "g";
const LANG: &str = "en";

/// A single encoded variant of a GIF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// The renditions this service exposes: `original` for download/copy,
/// `fixed_height` for thumbnails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renditions {
    pub original: Rendition,
    pub fixed_height: Rendition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GifItem {
    pub id: String,
    pub title: Option<String>,
    pub images: Renditions,
}

/// One page of ranked search or trending results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<GifItem>,
    pub total_count: u64,
    pub offset: u32,
    pub limit: u32,
}

#[async_trait]
pub trait GifProvider: Send + Sync + 'static {
    async fn search(&self, term: &str, page: PageParams) -> Result<SearchPage, ApiError>;
    async fn trending(&self, page: PageParams) -> Result<SearchPage, ApiError>;
}

#[async_trait]
impl<P: GifProvider + ?Sized> GifProvider for Arc<P> {
    async fn search(&self, term: &str, page: PageParams) -> Result<SearchPage, ApiError> {
        (**self).search(term, page).await
    }

    async fn trending(&self, page: PageParams) -> Result<SearchPage, ApiError> {
        (**self).trending(page).await
    }
}

// Upstream payload shapes. GIPHY reports rendition dimensions as strings.

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    data: Vec<GiphyGif>,
    pagination: GiphyPagination,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    id: String,
    #[serde(default)]
    title: String,
    images: GiphyImages,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    original: GiphyRendition,
    fixed_height: GiphyRendition,
}

#[derive(Debug, Deserialize)]
struct GiphyRendition {
    url: String,
    #[serde(default)]
    width: String,
    #[serde(default)]
    height: String,
}

#[derive(Debug, Deserialize)]
struct GiphyPagination {
    total_count: u64,
    offset: u32,
}

impl GiphyRendition {
    fn into_rendition(self) -> Rendition {
        Rendition {
            url: self.url,
            width: self.width.parse().unwrap_or(0),
            height: self.height.parse().unwrap_or(0),
        }
    }
}

impl GiphyResponse {
    fn into_page(self, limit: u32) -> SearchPage {
        let items = self
            .data
            .into_iter()
            .map(|gif| GifItem {
                id: gif.id,
                title: Some(gif.title).filter(|t| !t.trim().is_empty()),
                images: Renditions {
                    original: gif.images.original.into_rendition(),
                    fixed_height: gif.images.fixed_height.into_rendition(),
                },
            })
            .collect();

        SearchPage {
            items,
            total_count: self.pagination.total_count,
            offset: self.pagination.offset,
            limit,
        }
    }
}

/// Direct client for the GIPHY HTTP API.
#[derive(Debug, Clone)]
pub struct GiphyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GiphyClient {
    pub fn new(api_key: String) -> Self {
        GiphyClient {
            http: reqwest::Client::new(),
            api_key,
            base_url: GIPHY_API_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint, used against stub servers.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn fetch(
        &self,
        endpoint: &str,
        term: Option<&str>,
        page: PageParams,
    ) -> Result<SearchPage, ApiError> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
            ("rating", RATING.to_string()),
        ];
        if let Some(term) = term {
            params.push(("q", term.to_string()));
            params.push(("lang", LANG.to_string()));
        }

        debug!(endpoint, limit = page.limit, offset = page.offset, "Fetching from provider");

        let response = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&params)
            .send()
            .await
            .map_err(ProviderError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UpstreamStatus(status).into());
        }

        let payload: GiphyResponse = response.json().await.map_err(ProviderError::Request)?;
        Ok(payload.into_page(page.limit))
    }
}

#[async_trait]
impl GifProvider for GiphyClient {
    async fn search(&self, term: &str, page: PageParams) -> Result<SearchPage, ApiError> {
        self.fetch("search", Some(term), page).await
    }

    async fn trending(&self, page: PageParams) -> Result<SearchPage, ApiError> {
        self.fetch("trending", None, page).await
    }
}
