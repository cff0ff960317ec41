use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::{Service, ServiceExt};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut connection)
        .expect("Failed to enable foreign keys");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

pub mod stub {
    use async_trait::async_trait;
    use gifstash_service::errors::{ApiError, ProviderError};
    use gifstash_service::giphy::{GifItem, GifProvider, Rendition, Renditions, SearchPage};
    use gifstash_service::validation::PageParams;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Scripted provider that fabricates pages and counts upstream calls.
    pub struct StubProvider {
        pub total_count: u64,
        pub search_calls: AtomicUsize,
        pub trending_calls: AtomicUsize,
        pub fail: AtomicBool,
    }

    impl StubProvider {
        pub fn new(total_count: u64) -> Self {
            StubProvider {
                total_count,
                search_calls: AtomicUsize::new(0),
                trending_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }

        fn page(&self, page: PageParams) -> SearchPage {
            let remaining = self.total_count.saturating_sub(u64::from(page.offset));
            let count = u64::from(page.limit).min(remaining);

            let items = (0..count)
                .map(|i| {
                    let n = u64::from(page.offset) + i;
                    GifItem {
                        id: format!("gif-{n}"),
                        title: Some(format!("Stub GIF {n}")),
                        images: Renditions {
                            original: Rendition {
                                url: format!("https://media.test/{n}/giphy.gif"),
                                width: 480,
                                height: 270,
                            },
                            fixed_height: Rendition {
                                url: format!("https://media.test/{n}/200.gif"),
                                width: 356,
                                height: 200,
                            },
                        },
                    }
                })
                .collect();

            SearchPage {
                items,
                total_count: self.total_count,
                offset: page.offset,
                limit: page.limit,
            }
        }

        fn check_failure(&self) -> Result<(), ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(
                    ProviderError::UpstreamStatus(reqwest::StatusCode::BAD_GATEWAY).into(),
                );
            }
            Ok(())
        }
    }

    #[async_trait]
    impl GifProvider for StubProvider {
        async fn search(&self, _term: &str, page: PageParams) -> Result<SearchPage, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            Ok(self.page(page))
        }

        async fn trending(&self, page: PageParams) -> Result<SearchPage, ApiError> {
            self.trending_calls.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            Ok(self.page(page))
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: Arc<Mutex<SqliteConnection>>,
    pub provider: Arc<stub::StubProvider>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_total(100)
}

pub fn create_test_app_with_total(total_count: u64) -> TestApp {
    use gifstash_service::giphy::CachedProvider;
    use gifstash_service::{DefaultAppState, create_app};

    let db = Arc::new(Mutex::new(establish_test_connection()));
    let provider = Arc::new(stub::StubProvider::new(total_count));

    let state = DefaultAppState::new(
        db.clone(),
        Arc::new(CachedProvider::new(provider.clone())),
    );

    TestApp {
        app: create_app(state),
        db,
        provider,
    }
}

pub async fn make_request(app: &mut Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = ServiceExt::<Request<Body>>::ready(app)
        .await?
        .call(request)
        .await?;

    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body_str = String::from_utf8(body_bytes.to_vec())?;

    let json_response: Value = if body_str.is_empty() || body_str == "\"OK\"" {
        json!(body_str.trim_matches('"'))
    } else {
        serde_json::from_str(&body_str).unwrap_or(json!(body_str))
    };

    Ok((status, json_response))
}
