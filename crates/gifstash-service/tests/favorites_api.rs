use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use diesel::prelude::*;
use hyper::Method;
use serde_json::{Value, json};

mod common;

use common::{create_test_app, make_request};

fn post_favorite(payload: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/favorites")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn sample_favorite(gif_id: &str) -> Value {
    json!({
        "gifId": gif_id,
        "gifUrl": format!("https://media.giphy.com/media/{gif_id}/giphy.gif"),
        "gifTitle": format!("GIF {gif_id}"),
        "thumbnailUrl": format!("https://media.giphy.com/media/{gif_id}/200.gif"),
    })
}

mod db_utils {
    use diesel::prelude::*;
    use diesel::sqlite::SqliteConnection;
    use gifstash_service::schema::{favorites, users};

    pub fn count_favorites(conn: &mut SqliteConnection) -> i64 {
        favorites::table.count().get_result(conn).unwrap()
    }

    pub fn count_users(conn: &mut SqliteConnection) -> i64 {
        users::table.count().get_result(conn).unwrap()
    }
}

#[tokio::test]
async fn test_add_favorite_creates_row_and_demo_user() -> Result<()> {
    let mut test_app = create_test_app();

    let (status, body) = make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["favorite"]["gifId"], "abc123");
    assert_eq!(
        body["favorite"]["thumbnailUrl"],
        "https://media.giphy.com/media/abc123/200.gif"
    );
    assert!(body["favorite"]["id"].is_number());

    {
        let mut conn = test_app.db.lock().unwrap();
        assert_eq!(db_utils::count_favorites(&mut conn), 1);
        assert_eq!(db_utils::count_users(&mut conn), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_add_favorite_is_idempotent() -> Result<()> {
    let mut test_app = create_test_app();

    let (first_status, first) = make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;
    let (second_status, second) = make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_eq!(first["favorite"]["id"], second["favorite"]["id"]);

    {
        let mut conn = test_app.db.lock().unwrap();
        assert_eq!(db_utils::count_favorites(&mut conn), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_list_favorites_in_creation_order() -> Result<()> {
    let mut test_app = create_test_app();

    for gif_id in ["first", "second", "third"] {
        make_request(&mut test_app.app, post_favorite(&sample_favorite(gif_id))).await?;
    }

    let (status, body) = make_request(&mut test_app.app, get("/api/favorites")).await?;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["favorites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["gifId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["first", "second", "third"]);
    Ok(())
}

#[tokio::test]
async fn test_list_favorites_empty_initially() -> Result<()> {
    let mut test_app = create_test_app();

    let (status, body) = make_request(&mut test_app.app, get("/api/favorites")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_remove_favorite_then_check_reports_false() -> Result<()> {
    let mut test_app = create_test_app();

    make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;

    let (remove_status, body) =
        make_request(&mut test_app.app, delete("/api/favorites/abc123")).await?;
    assert_eq!(remove_status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (check_status, check) =
        make_request(&mut test_app.app, get("/api/favorites/check/abc123")).await?;
    assert_eq!(check_status, StatusCode::OK);
    assert_eq!(check["isFavorite"], false);
    Ok(())
}

#[tokio::test]
async fn test_remove_unknown_favorite_returns_404() -> Result<()> {
    let mut test_app = create_test_app();

    let (status, body) =
        make_request(&mut test_app.app, delete("/api/favorites/never-added")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    {
        let mut conn = test_app.db.lock().unwrap();
        assert_eq!(db_utils::count_favorites(&mut conn), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_check_favorite_after_add() -> Result<()> {
    let mut test_app = create_test_app();

    make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;

    let (status, body) =
        make_request(&mut test_app.app, get("/api/favorites/check/abc123")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isFavorite"], true);
    Ok(())
}

#[tokio::test]
async fn test_add_favorite_with_empty_gif_id_is_rejected() -> Result<()> {
    let mut test_app = create_test_app();

    let payload = json!({
        "gifId": "",
        "gifUrl": "https://media.giphy.com/media/x/giphy.gif",
        "thumbnailUrl": "https://media.giphy.com/media/x/200.gif",
    });
    let (status, body) = make_request(&mut test_app.app, post_favorite(&payload)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("gifId"));
    Ok(())
}

#[tokio::test]
async fn test_add_favorite_with_bad_url_is_rejected() -> Result<()> {
    let mut test_app = create_test_app();

    let payload = json!({
        "gifId": "abc123",
        "gifUrl": "javascript:alert(1)",
        "thumbnailUrl": "https://media.giphy.com/media/x/200.gif",
    });
    let (status, _) = make_request(&mut test_app.app, post_favorite(&payload)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    {
        let mut conn = test_app.db.lock().unwrap();
        assert_eq!(db_utils::count_favorites(&mut conn), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_favorite_title_is_optional() -> Result<()> {
    let mut test_app = create_test_app();

    let payload = json!({
        "gifId": "abc123",
        "gifUrl": "https://media.giphy.com/media/abc123/giphy.gif",
        "thumbnailUrl": "https://media.giphy.com/media/abc123/200.gif",
    });
    let (status, body) = make_request(&mut test_app.app, post_favorite(&payload)).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["favorite"]["gifTitle"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn test_deleting_user_cascades_to_favorites() -> Result<()> {
    let mut test_app = create_test_app();

    make_request(
        &mut test_app.app,
        post_favorite(&sample_favorite("abc123")),
    )
    .await?;

    {
        use gifstash_service::schema::users;
        let mut conn = test_app.db.lock().unwrap();
        diesel::delete(users::table).execute(&mut *conn)?;
        assert_eq!(db_utils::count_favorites(&mut conn), 0);
    }
    Ok(())
}
