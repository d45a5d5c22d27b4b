use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use bookstore_kernel::settings::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let mut settings = Settings::default();
    settings.database.url = "sqlite::memory:".to_string();

    let (registry, _pool) = bookstore_api::app::prepare(&settings).await.unwrap();
    bookstore_http::build_router(&registry, &settings)
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    Reply {
        status,
        location,
        body,
    }
}

async fn create_austen(app: &Router) -> i64 {
    let reply = send(
        app,
        "POST",
        "/api/Authors",
        Some(json!({ "firstName": "Jane", "lastName": "Austen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_i64().unwrap()
}

fn emma(author_id: i64) -> Value {
    json!({
        "title": "Emma",
        "year": 1815,
        "isbn": "978-0141439587",
        "summary": "A young woman meddles in matchmaking.",
        "price": 9.99,
        "authorId": author_id
    })
}

#[tokio::test]
async fn author_lifecycle() {
    let app = app().await;

    let created = send(
        &app,
        "POST",
        "/api/Authors",
        Some(json!({ "firstName": "Jane", "lastName": "Austen" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(
        created.body,
        json!({ "id": 1, "firstName": "Jane", "lastName": "Austen", "bio": null })
    );
    assert_eq!(created.location.as_deref(), Some("/api/Authors/1"));

    let fetched = send(&app, "GET", "/api/Authors/1", None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    let listed = send(&app, "GET", "/api/Authors", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([created.body]));

    let deleted = send(&app, "DELETE", "/api/Authors/1", None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = send(&app, "GET", "/api/Authors/1", None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["error"]["code"], "not_found");

    let again = send(&app, "DELETE", "/api/Authors/1", None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_author_list_is_an_empty_array() {
    let app = app().await;

    let listed = send(&app, "GET", "/api/Authors", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn author_update_replaces_fields() {
    let app = app().await;
    let id = create_austen(&app).await;

    let updated = send(
        &app,
        "PUT",
        &format!("/api/Authors/{id}"),
        Some(json!({
            "id": id,
            "firstName": "Jane",
            "lastName": "Austen",
            "bio": "English novelist."
        })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    let fetched = send(&app, "GET", &format!("/api/Authors/{id}"), None).await;
    assert_eq!(fetched.body["bio"], "English novelist.");
}

#[tokio::test]
async fn author_update_with_mismatched_id_is_bad_request() {
    let app = app().await;
    let id = create_austen(&app).await;

    let reply = send(
        &app,
        "PUT",
        &format!("/api/Authors/{id}"),
        Some(json!({ "id": id + 1, "firstName": "Jane", "lastName": "Austen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "bad_request");

    let fetched = send(&app, "GET", &format!("/api/Authors/{id}"), None).await;
    assert_eq!(fetched.body["bio"], Value::Null);
}

#[tokio::test]
async fn author_update_of_missing_id_is_not_found() {
    let app = app().await;

    let reply = send(
        &app,
        "PUT",
        "/api/Authors/42",
        Some(json!({ "id": 42, "firstName": "Jane", "lastName": "Austen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overlong_first_name_is_rejected_and_not_stored() {
    let app = app().await;

    let reply = send(
        &app,
        "POST",
        "/api/Authors",
        Some(json!({ "firstName": "x".repeat(51), "lastName": "Austen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "validation_error");
    assert_eq!(reply.body["error"]["details"][0]["field"], "firstName");

    let listed = send(&app, "GET", "/api/Authors", None).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/Authors")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"firstName\":"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_reads_embed_author_name() {
    let app = app().await;
    let author_id = create_austen(&app).await;

    let created = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let book_id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.location, Some(format!("/api/Books/{book_id}")));
    assert_eq!(created.body["isbn"], "978-0141439587");

    let listed = send(&app, "GET", "/api/Books", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(
        listed.body,
        json!([{
            "id": book_id,
            "title": "Emma",
            "image": null,
            "price": 9.99,
            "authorId": author_id,
            "authorName": "Jane Austen"
        }])
    );

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["year"], 1815);
    assert_eq!(details.body["summary"], "A young woman meddles in matchmaking.");
    assert_eq!(details.body["authorName"], "Jane Austen");
}

#[tokio::test]
async fn book_update_and_delete() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    let created = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    let book_id = created.body["id"].as_i64().unwrap();

    let mut update = emma(author_id);
    update["id"] = json!(book_id);
    update["price"] = json!(12.5);
    let updated = send(&app, "PUT", &format!("/api/Books/{book_id}"), Some(update)).await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.body["price"], 12.5);

    let deleted = send(&app, "DELETE", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_for_unknown_author_is_rejected() {
    let app = app().await;

    let reply = send(&app, "POST", "/api/Books", Some(emma(99))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["details"][0]["field"], "authorId");
}

#[tokio::test]
async fn invalid_book_lists_every_failing_field() {
    let app = app().await;
    let author_id = create_austen(&app).await;

    let mut book = emma(author_id);
    book["year"] = json!(999);
    book["summary"] = json!("too short");
    book["price"] = json!(-1.0);

    let reply = send(&app, "POST", "/api/Books", Some(book)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = reply.body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"year"));
    assert!(fields.contains(&"summary"));
    assert!(fields.contains(&"price"));
}

#[tokio::test]
async fn duplicate_isbn_conflicts() {
    let app = app().await;
    let author_id = create_austen(&app).await;

    let first = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"]["code"], "conflict");
}

#[tokio::test]
async fn author_with_books_cannot_be_deleted() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    send(&app, "POST", "/api/Books", Some(emma(author_id))).await;

    let reply = send(&app, "DELETE", &format!("/api/Authors/{author_id}"), None).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let still_there = send(&app, "GET", &format!("/api/Authors/{author_id}"), None).await;
    assert_eq!(still_there.status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_lists_both_resources() {
    let app = app().await;

    let reply = send(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["paths"]["/api/Authors"].is_object());
    assert!(reply.body["paths"]["/api/Books/{id}"].is_object());
    assert!(reply.body["components"]["schemas"]["BookDetails"].is_object());
}

#[tokio::test]
async fn module_lifecycle_runs_against_migrated_store() {
    let mut settings = Settings::default();
    settings.database.url = "sqlite::memory:".to_string();

    let (registry, pool) = bookstore_api::app::prepare(&settings).await.unwrap();
    let ctx = bookstore_kernel::InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_modules(&ctx).await.unwrap();
    registry.start_modules(&ctx).await.unwrap();
    registry.stop_modules().await.unwrap();
}

#[tokio::test]
async fn unparsable_ids_are_json_not_found() {
    let app = app().await;

    for (method, uri) in [
        ("GET", "/api/Authors/abc"),
        ("GET", "/api/Authors/99999999999999999999"),
        ("DELETE", "/api/Authors/abc"),
        ("GET", "/api/Books/abc"),
        ("DELETE", "/api/Books/1.5"),
    ] {
        let reply = send(&app, method, uri, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(reply.body["error"]["code"], "not_found", "{method} {uri}");
    }
}

#[tokio::test]
async fn book_update_and_delete_of_missing_id_are_not_found() {
    let app = app().await;
    let author_id = create_austen(&app).await;

    let mut update = emma(author_id);
    update["id"] = json!(42);
    let updated = send(&app, "PUT", "/api/Books/42", Some(update)).await;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);

    let deleted = send(&app, "DELETE", "/api/Books/42", None).await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_update_with_mismatched_id_leaves_row_unchanged() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    let created = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    let book_id = created.body["id"].as_i64().unwrap();

    let mut update = emma(author_id);
    update["id"] = json!(book_id + 1);
    update["title"] = json!("Emma (Revised)");
    let reply = send(&app, "PUT", &format!("/api/Books/{book_id}"), Some(update)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "bad_request");

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.body["title"], "Emma");
}

#[tokio::test]
async fn author_update_with_overlong_first_name_is_not_stored() {
    let app = app().await;
    let id = create_austen(&app).await;

    let reply = send(
        &app,
        "PUT",
        &format!("/api/Authors/{id}"),
        Some(json!({ "id": id, "firstName": "x".repeat(51), "lastName": "Austen" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "validation_error");
    assert_eq!(reply.body["error"]["details"][0]["field"], "firstName");

    let fetched = send(&app, "GET", &format!("/api/Authors/{id}"), None).await;
    assert_eq!(fetched.body["firstName"], "Jane");
}

#[tokio::test]
async fn author_update_keeps_their_books() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    let created = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    let book_id = created.body["id"].as_i64().unwrap();

    let updated = send(
        &app,
        "PUT",
        &format!("/api/Authors/{author_id}"),
        Some(json!({ "id": author_id, "firstName": "Janet", "lastName": "Austen" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["authorId"], author_id);
    assert_eq!(details.body["authorName"], "Janet Austen");
}

#[tokio::test]
async fn book_update_to_taken_isbn_conflicts() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    send(&app, "POST", "/api/Books", Some(emma(author_id))).await;

    let mut persuasion = emma(author_id);
    persuasion["title"] = json!("Persuasion");
    persuasion["isbn"] = json!("978-0141439686");
    let created = send(&app, "POST", "/api/Books", Some(persuasion.clone())).await;
    let book_id = created.body["id"].as_i64().unwrap();

    persuasion["id"] = json!(book_id);
    persuasion["isbn"] = json!("978-0141439587");
    let reply = send(&app, "PUT", &format!("/api/Books/{book_id}"), Some(persuasion)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.body["isbn"], "978-0141439686");
}

#[tokio::test]
async fn book_update_to_unknown_author_is_rejected() {
    let app = app().await;
    let author_id = create_austen(&app).await;
    let created = send(&app, "POST", "/api/Books", Some(emma(author_id))).await;
    let book_id = created.body["id"].as_i64().unwrap();

    let mut update = emma(author_id + 100);
    update["id"] = json!(book_id);
    let reply = send(&app, "PUT", &format!("/api/Books/{book_id}"), Some(update)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["details"][0]["field"], "authorId");

    let details = send(&app, "GET", &format!("/api/Books/{book_id}"), None).await;
    assert_eq!(details.body["authorId"], author_id);
}
