use crate::error::ClientError;
use crate::types::{
    CheckEnvelope, ErrorBody, FavoriteEnvelope, FavoriteRecord, FavoritesEnvelope, SearchPage,
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// New favorite payload, built from a displayed GIF's renditions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDraft {
    pub gif_id: String,
    pub gif_url: String,
    pub gif_title: Option<String>,
    pub thumbnail_url: String,
}

#[async_trait]
pub trait GifStashApi: Send + Sync {
    async fn search(&self, term: &str, limit: u32, offset: u32)
    -> Result<SearchPage, ClientError>;
    async fn trending(&self, limit: u32, offset: u32) -> Result<SearchPage, ClientError>;
    async fn favorites(&self) -> Result<Vec<FavoriteRecord>, ClientError>;
    async fn add_favorite(&self, draft: &FavoriteDraft) -> Result<FavoriteRecord, ClientError>;
    /// Returns whether a favorite was actually removed; a missing favorite is
    /// reported as `false`, not as an error.
    async fn remove_favorite(&self, gif_id: &str) -> Result<bool, ClientError>;
    async fn is_favorite(&self, gif_id: &str) -> Result<bool, ClientError>;
    /// Fetches the raw bytes of a rendition URL, for downloads.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

#[async_trait]
impl<A: GifStashApi + ?Sized> GifStashApi for Arc<A> {
    async fn search(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SearchPage, ClientError> {
        (**self).search(term, limit, offset).await
    }

    async fn trending(&self, limit: u32, offset: u32) -> Result<SearchPage, ClientError> {
        (**self).trending(limit, offset).await
    }

    async fn favorites(&self) -> Result<Vec<FavoriteRecord>, ClientError> {
        (**self).favorites().await
    }

    async fn add_favorite(&self, draft: &FavoriteDraft) -> Result<FavoriteRecord, ClientError> {
        (**self).add_favorite(draft).await
    }

    async fn remove_favorite(&self, gif_id: &str) -> Result<bool, ClientError> {
        (**self).remove_favorite(gif_id).await
    }

    async fn is_favorite(&self, gif_id: &str) -> Result<bool, ClientError> {
        (**self).is_favorite(gif_id).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        (**self).fetch_bytes(url).await
    }
}

/// reqwest-backed client for the Gifstash HTTP API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpApi {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GifStashApi for HttpApi {
    async fn search(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SearchPage, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/gifs/search", self.base_url))
            .query(&[
                ("q", term.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn trending(&self, limit: u32, offset: u32) -> Result<SearchPage, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/gifs/trending", self.base_url))
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn favorites(&self) -> Result<Vec<FavoriteRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/favorites", self.base_url))
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let envelope: FavoritesEnvelope = response.json().await?;
        Ok(envelope.favorites)
    }

    async fn add_favorite(&self, draft: &FavoriteDraft) -> Result<FavoriteRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/favorites", self.base_url))
            .json(draft)
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let envelope: FavoriteEnvelope = response.json().await?;
        Ok(envelope.favorite)
    }

    async fn remove_favorite(&self, gif_id: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .delete(format!("{}/api/favorites/{gif_id}", self.base_url))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::error_for_status(response).await?;
        Ok(true)
    }

    async fn is_favorite(&self, gif_id: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/favorites/check/{gif_id}", self.base_url))
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let envelope: CheckEnvelope = response.json().await?;
        Ok(envelope.is_favorite)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.http.get(url).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
