use crate::api::{FavoriteDraft, GifStashApi};
use crate::error::ClientError;
use crate::sinks::{ClipboardSink, FileSink};
use crate::types::{FavoriteRecord, GifItem, SearchPage};

pub const DEFAULT_PAGE_LIMIT: u32 = 25;
const FALLBACK_FILENAME: &str = "giphy.gif";

/// Lifecycle of the current search session. `Errored` only leaves via an
/// explicit retry; nothing is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Trending,
    Search(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing notification; failures of copy, download, and
/// toggle degrade to these instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A displayed GIF together with its live favorite flag.
#[derive(Debug, Clone, PartialEq)]
pub struct GifView<'a> {
    pub item: &'a GifItem,
    pub is_favorite: bool,
}

/// Merges paginated search results with favorites truth and drives the
/// toggle/copy/download intents.
///
/// Favorite state is never patched locally: the intent is issued and the
/// favorites list refetched, so the membership flag always reflects what the
/// server last confirmed.
pub struct SearchController<A: GifStashApi> {
    api: A,
    query: QueryKind,
    limit: u32,
    items: Vec<GifItem>,
    total_count: u64,
    favorites: Vec<FavoriteRecord>,
    phase: Phase,
    last_error: Option<String>,
    notices: Vec<Notice>,
    // Monotonic token; a response issued under an older token is stale and
    // must not touch state.
    generation: u64,
    pending_offset: u32,
    pending_append: bool,
}

impl<A: GifStashApi> SearchController<A> {
    pub fn new(api: A) -> Self {
        Self::with_limit(api, DEFAULT_PAGE_LIMIT)
    }

    pub fn with_limit(api: A, limit: u32) -> Self {
        SearchController {
            api,
            query: QueryKind::Trending,
            limit,
            items: Vec::new(),
            total_count: 0,
            favorites: Vec::new(),
            phase: Phase::Idle,
            last_error: None,
            notices: Vec::new(),
            generation: 0,
            pending_offset: 0,
            pending_append: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query(&self) -> &QueryKind {
        &self.query
    }

    pub fn items(&self) -> &[GifItem] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn has_more(&self) -> bool {
        (self.items.len() as u64) < self.total_count
    }

    pub fn is_favorite(&self, gif_id: &str) -> bool {
        self.favorites.iter().any(|f| f.gif_id == gif_id)
    }

    pub fn favorites(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    pub fn views(&self) -> Vec<GifView<'_>> {
        self.items
            .iter()
            .map(|item| GifView {
                is_favorite: self.is_favorite(&item.id),
                item,
            })
            .collect()
    }

    /// Starts a fresh search: offset back to zero, results replaced.
    pub async fn search(&mut self, term: &str) {
        self.query = QueryKind::Search(term.to_string());
        self.fetch_page(0, false).await;
    }

    pub async fn show_trending(&mut self) {
        self.query = QueryKind::Trending;
        self.fetch_page(0, false).await;
    }

    /// Fetches the next page and appends it in page order.
    pub async fn load_more(&mut self) {
        let offset = self.items.len() as u32;
        self.fetch_page(offset, true).await;
    }

    /// Re-issues the last attempted fetch. The only way out of `Errored`.
    pub async fn retry(&mut self) {
        self.fetch_page(self.pending_offset, self.pending_append).await;
    }

    async fn fetch_page(&mut self, offset: u32, append: bool) {
        let issued = self.begin_fetch(offset, append);

        let result = match &self.query {
            QueryKind::Search(term) => self.api.search(term, self.limit, offset).await,
            QueryKind::Trending => self.api.trending(self.limit, offset).await,
        };

        self.apply_page(issued, append, result);
    }

    /// Marks a fetch as in flight and returns its generation token.
    fn begin_fetch(&mut self, offset: u32, append: bool) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.pending_offset = offset;
        self.pending_append = append;
        self.generation
    }

    /// Applies a fetch result. A response issued under an older token has
    /// been superseded by a newer query and is discarded untouched.
    fn apply_page(
        &mut self,
        issued: u64,
        append: bool,
        result: Result<SearchPage, ClientError>,
    ) {
        if issued != self.generation {
            return;
        }

        match result {
            Ok(page) => {
                if append {
                    self.items.extend(page.items);
                } else {
                    self.items = page.items;
                }
                self.total_count = page.total_count;
                self.phase = Phase::Loaded;
                self.last_error = None;
            }
            Err(err) => {
                self.phase = Phase::Errored;
                self.last_error = Some(err.to_string());
                self.notify_error(format!("Failed to load GIFs: {err}"));
            }
        }
    }

    /// Replaces favorites state with server truth.
    pub async fn refresh_favorites(&mut self) {
        match self.api.favorites().await {
            Ok(favorites) => self.favorites = favorites,
            Err(err) => self.notify_error(format!("Failed to load favorites: {err}")),
        }
    }

    /// Issues the add/remove intent chosen by current membership, then
    /// refetches favorites so the flag reflects server truth. On failure the
    /// refetch is skipped and membership stays at the pre-toggle truth.
    pub async fn toggle_favorite(&mut self, gif_id: &str) {
        if self.is_favorite(gif_id) {
            match self.api.remove_favorite(gif_id).await {
                Ok(_) => {
                    self.refresh_favorites().await;
                    self.notify_info("GIF removed from favorites");
                }
                Err(err) => {
                    self.notify_error(format!("Failed to remove GIF from favorites: {err}"));
                }
            }
        } else {
            let Some(item) = self.items.iter().find(|g| g.id == gif_id).cloned() else {
                self.notify_error(format!("GIF {gif_id} is not in the current results"));
                return;
            };

            let draft = FavoriteDraft {
                gif_id: item.id,
                gif_url: item.images.original.url,
                gif_title: item.title,
                thumbnail_url: item.images.fixed_height.url,
            };

            match self.api.add_favorite(&draft).await {
                Ok(_) => {
                    self.refresh_favorites().await;
                    self.notify_info("GIF added to favorites");
                }
                Err(err) => {
                    self.notify_error(format!("Failed to add GIF to favorites: {err}"));
                }
            }
        }
    }

    /// Hands the original-rendition URL of a displayed GIF to the clipboard.
    pub fn copy_original(&mut self, gif_id: &str, clipboard: &mut dyn ClipboardSink) {
        let Some(url) = self.original_url(gif_id) else {
            self.notify_error(format!("GIF {gif_id} is not in the current results"));
            return;
        };

        match clipboard.set_text(&url) {
            Ok(()) => self.notify_info("GIF URL copied to clipboard"),
            Err(err) => self.notify_error(format!("Failed to copy GIF URL: {err}")),
        }
    }

    /// Downloads the original rendition into the sink under a filename
    /// derived from the GIF's title.
    pub async fn download_original(&mut self, gif_id: &str, sink: &mut dyn FileSink) {
        let Some(item) = self.items.iter().find(|g| g.id == gif_id).cloned() else {
            self.notify_error(format!("GIF {gif_id} is not in the current results"));
            return;
        };

        let bytes = match self.api.fetch_bytes(&item.images.original.url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.notify_error(format!("Failed to download GIF: {err}"));
                return;
            }
        };

        let filename = download_filename(item.title.as_deref());
        match sink.save(&filename, &bytes) {
            Ok(()) => self.notify_info(format!("Downloaded {filename}")),
            Err(err) => self.notify_error(format!("Failed to save GIF: {err}")),
        }
    }

    fn original_url(&self, gif_id: &str) -> Option<String> {
        self.items
            .iter()
            .find(|g| g.id == gif_id)
            .map(|g| g.images.original.url.clone())
    }

    fn notify_info(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        });
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }
}

/// `"Funny Cat GIF!"` becomes `funny-cat-gif.gif`; untitled GIFs fall back
/// to a generic name.
fn download_filename(title: Option<&str>) -> String {
    let Some(title) = title else {
        return FALLBACK_FILENAME.to_string();
    };

    let mut slug = String::new();
    for ch in title.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{slug}.gif")
    }
}
