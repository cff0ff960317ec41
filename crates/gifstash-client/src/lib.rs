pub mod api;
pub mod controller;
pub mod error;
pub mod sinks;
pub mod types;

pub use api::{FavoriteDraft, GifStashApi, HttpApi};
pub use controller::{GifView, Notice, NoticeLevel, Phase, QueryKind, SearchController};
pub use error::ClientError;
pub use sinks::{ClipboardSink, FileSink};
