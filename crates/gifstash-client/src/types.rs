use serde::{Deserialize, Serialize};

/// Wire types mirroring the service's JSON shapes.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<GifItem>,
    pub total_count: u64,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub id: i32,
    pub user_id: i32,
    pub gif_id: String,
    pub gif_url: String,
    pub gif_title: Option<String>,
    pub thumbnail_url: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoritesEnvelope {
    pub favorites: Vec<FavoriteRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoriteEnvelope {
    pub favorite: FavoriteRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckEnvelope {
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
